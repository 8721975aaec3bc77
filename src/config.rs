// ABOUTME: Weight, threshold, and limit configuration for the prescription pipeline
// ABOUTME: Every fixed constant of the scoring, selection, and recovery algorithms lives here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Prescription Engine Configuration
//!
//! Groups the scoring weights, selector limits, volume prescriptions, and
//! recovery thresholds into one injectable configuration object. Defaults
//! carry the production constants; tests and experiments override fields
//! individually.

use crate::models::ExerciseType;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the prescription engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrescriptionConfig {
    /// Weights of the scoring terms
    pub weights: ScoringWeights,
    /// Selection budget and diversity limits
    pub selector: SelectorConfig,
    /// Set/rep/rest prescription parameters
    pub volume: VolumeConfig,
    /// Recovery score component parameters and thresholds
    pub recovery: RecoveryConfig,
    /// Recovery-driven plan adjustment parameters
    pub adjustment: AdjustmentConfig,
    /// Warmup/cooldown satellite list parameters
    pub satellites: SatelliteConfig,
}

/// Weights of the eight scoring terms plus the preference multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Equipment fit weight; awarded in full once the hard gate passes
    pub equipment_match: f64,
    /// Goal alignment weight, split evenly across declared goals
    pub goal_alignment: f64,
    /// Muscle imbalance weight
    pub muscle_need: f64,
    /// Exercise-recency weight
    pub recovery_fit: f64,
    /// Skill match weight
    pub skill_fit: f64,
    /// Periodization fit weight
    pub periodization_fit: f64,
    /// Variety bonus weight
    pub variety_bonus: f64,
    /// Multiplier applied to the user preference modifier
    pub preference: f64,
    /// Hard exclusion applied when a primary muscle is explicitly excluded
    pub excluded_muscle_penalty: f64,
    /// Flat penalty for an overtrained primary muscle
    pub overtrained_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            equipment_match: 25.0,
            goal_alignment: 20.0,
            muscle_need: 20.0,
            recovery_fit: 15.0,
            skill_fit: 10.0,
            periodization_fit: 5.0,
            variety_bonus: 5.0,
            preference: 5.0,
            excluded_muscle_penalty: -50.0,
            overtrained_penalty: -5.0,
        }
    }
}

/// Budget and diversity limits for the greedy selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Minutes of session time assumed per exercise
    pub minutes_per_exercise: u32,
    /// Lower clamp on the time-derived exercise budget
    pub min_exercises: usize,
    /// Upper clamp on the time-derived exercise budget
    pub max_exercises: usize,
    /// Budget multiplier during a deload phase
    pub deload_factor: f64,
    /// Budget floor during a deload phase
    pub deload_min: usize,
    /// Budget multiplier when recovery classifies as poor
    pub poor_recovery_factor: f64,
    /// Budget floor when recovery classifies as poor
    pub poor_recovery_min: usize,
    /// Budget multiplier when recovery classifies as fair
    pub fair_recovery_factor: f64,
    /// Budget floor when recovery classifies as fair
    pub fair_recovery_min: usize,
    /// Picks accepted before muscle-overlap exclusion kicks in
    ///
    /// Behavioral constant carried from the original algorithm; overridable
    /// but not derived from anything.
    pub free_overlap_picks: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            minutes_per_exercise: 6,
            min_exercises: 4,
            max_exercises: 12,
            deload_factor: 0.6,
            deload_min: 3,
            poor_recovery_factor: 0.5,
            poor_recovery_min: 3,
            fair_recovery_factor: 0.7,
            fair_recovery_min: 4,
            free_overlap_picks: 3,
        }
    }
}

/// Set/rep/rest prescription parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Baseline sets before phase/experience/time adjustments
    pub base_sets: u32,
    /// Lower clamp on prescribed sets
    pub min_sets: u32,
    /// Upper clamp on prescribed sets
    pub max_sets: u32,
    /// Sets cap for beginners
    pub beginner_max_sets: u32,
    /// Sets floor for elite users
    pub elite_min_sets: u32,
    /// Sessions shorter than this force the short-session set count
    pub short_session_minutes: u32,
    /// Sets prescribed when the session is short
    pub short_session_sets: u32,
    /// Lower clamp on prescribed reps
    pub min_reps: u32,
    /// Upper clamp on prescribed reps
    pub max_reps: u32,
    /// Rep multiplier during an accumulation phase
    pub accumulation_rep_scale: f64,
    /// Rep multiplier during a realization phase
    pub realization_rep_scale: f64,
    /// Seconds of work assumed per rep when estimating session duration
    pub seconds_per_rep: f64,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            base_sets: 3,
            min_sets: 2,
            max_sets: 5,
            beginner_max_sets: 3,
            elite_min_sets: 4,
            short_session_minutes: 30,
            short_session_sets: 2,
            min_reps: 3,
            max_reps: 20,
            accumulation_rep_scale: 1.2,
            realization_rep_scale: 0.7,
            seconds_per_rep: 4.0,
        }
    }
}

impl VolumeConfig {
    /// Baseline reps per set for an exercise type
    #[must_use]
    pub const fn base_reps(exercise_type: ExerciseType) -> u32 {
        match exercise_type {
            ExerciseType::Strength | ExerciseType::Power => 5,
            ExerciseType::Endurance | ExerciseType::Cardio => 15,
            ExerciseType::Hiit => 12,
            _ => 10,
        }
    }

    /// Baseline rest seconds between sets for an exercise type
    #[must_use]
    pub const fn base_rest_seconds(exercise_type: ExerciseType) -> u32 {
        match exercise_type {
            ExerciseType::Strength | ExerciseType::Power => 180,
            ExerciseType::Endurance | ExerciseType::Cardio | ExerciseType::Hiit => 60,
            _ => 90,
        }
    }
}

/// Recovery score component parameters and classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Hours of sleep below which the duration component scores zero
    pub sleep_min_hours: f64,
    /// Hours of sleep at which the duration component caps out
    pub sleep_target_hours: f64,
    /// Duration points awarded per hour above the minimum
    pub sleep_points_per_hour: f64,
    /// Cap on the sleep duration component
    pub sleep_duration_max: f64,
    /// Duration component used when no sleep record exists
    pub sleep_duration_default: f64,
    /// Quality points per rating unit (1-5 scale)
    pub sleep_quality_points_per_rating: f64,
    /// Cap on the sleep quality component
    pub sleep_quality_max: f64,
    /// Quality component used when no sleep record exists
    pub sleep_quality_default: f64,
    /// Full credit for the rest-days component
    pub rest_days_max: f64,
    /// Rest-days component used when no training history exists
    pub rest_days_default: f64,
    /// Decay per day of inactivity beyond the optimal rest window
    pub detraining_decay_per_day: f64,
    /// Weekly workout count that, with zero rest days, trips the strain penalty
    pub strain_weekly_workouts: u32,
    /// Flat penalty applied under unsustainable training density
    pub strain_penalty: f64,
    /// HRV readings at or above this value are dropped from the baseline
    pub hrv_outlier_cutoff: f64,
    /// Current/baseline ratio at or above which the full HRV bonus applies
    pub hrv_high_ratio: f64,
    /// Current/baseline ratio at or above which the partial HRV bonus applies
    pub hrv_normal_ratio: f64,
    /// Current/baseline ratio below which the HRV penalty applies
    pub hrv_low_ratio: f64,
    /// Full HRV bonus
    pub hrv_bonus_high: f64,
    /// Partial HRV bonus
    pub hrv_bonus_normal: f64,
    /// HRV suppression penalty
    pub hrv_penalty_low: f64,
    /// Bedtime deviation (minutes) earning the full consistency bonus
    pub consistency_tight_minutes: i64,
    /// Bedtime deviation (minutes) earning the partial consistency bonus
    pub consistency_loose_minutes: i64,
    /// Full consistency bonus
    pub consistency_bonus_full: f64,
    /// Partial consistency bonus
    pub consistency_bonus_partial: f64,
    /// Cache lifetime of a computed score, hours
    pub cache_ttl_hours: i64,
    /// History window for trend computation, days
    pub trend_window_days: u32,
    /// Minimum historical points before a trend is reported
    pub trend_min_points: usize,
    /// Mean difference beyond which the trend counts as moving
    pub trend_epsilon: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            sleep_min_hours: 4.0,
            sleep_target_hours: 8.0,
            sleep_points_per_hour: 10.0,
            sleep_duration_max: 40.0,
            sleep_duration_default: 20.0,
            sleep_quality_points_per_rating: 6.0,
            sleep_quality_max: 30.0,
            sleep_quality_default: 15.0,
            rest_days_max: 20.0,
            rest_days_default: 10.0,
            detraining_decay_per_day: 2.0,
            strain_weekly_workouts: 6,
            strain_penalty: -10.0,
            hrv_outlier_cutoff: 80.0,
            hrv_high_ratio: 1.05,
            hrv_normal_ratio: 0.95,
            hrv_low_ratio: 0.85,
            hrv_bonus_high: 10.0,
            hrv_bonus_normal: 5.0,
            hrv_penalty_low: -5.0,
            consistency_tight_minutes: 30,
            consistency_loose_minutes: 60,
            consistency_bonus_full: 5.0,
            consistency_bonus_partial: 2.5,
            cache_ttl_hours: 24,
            trend_window_days: 7,
            trend_min_points: 3,
            trend_epsilon: 5.0,
        }
    }
}

/// Recovery-driven plan adjustment parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Floor on adjusted sets
    pub min_sets: u32,
    /// Floor on adjusted reps
    pub min_reps: u32,
    /// Rest-seconds multiplier when recovery classifies as poor
    pub poor_rest_scale: f64,
    /// Rest-seconds multiplier when recovery classifies as excellent
    pub excellent_rest_scale: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            min_sets: 2,
            min_reps: 5,
            poor_rest_scale: 1.3,
            excellent_rest_scale: 0.9,
        }
    }
}

/// Warmup/cooldown satellite list parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SatelliteConfig {
    /// Maximum warmup exercises
    pub warmup_count: usize,
    /// Maximum cooldown exercises
    pub cooldown_count: usize,
    /// Nominal score assigned to satellite exercises
    pub nominal_score: f64,
    /// Warmup sets
    pub warmup_sets: u32,
    /// Warmup reps per set
    pub warmup_reps: u32,
    /// Warmup rest between sets, seconds
    pub warmup_rest_seconds: u32,
    /// Cooldown sets
    pub cooldown_sets: u32,
    /// Cooldown reps per set
    pub cooldown_reps: u32,
    /// Cooldown rest between sets, seconds
    pub cooldown_rest_seconds: u32,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            warmup_count: 4,
            cooldown_count: 3,
            nominal_score: 10.0,
            warmup_sets: 2,
            warmup_reps: 10,
            warmup_rest_seconds: 30,
            cooldown_sets: 1,
            cooldown_reps: 10,
            cooldown_rest_seconds: 15,
        }
    }
}

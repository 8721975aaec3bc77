// ABOUTME: Multi-factor exercise scoring against user context, history, injuries, and recovery
// ABOUTME: Eight weighted additive terms plus preference and recovery-state modifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise Scorer
//!
//! Scores every candidate exercise with an additive, independently bounded
//! breakdown: equipment fit, goal alignment, muscle-imbalance need, recency,
//! skill match, periodization fit, variety, and injury penalty, plus a
//! preference modifier and a recovery-state adjustment.
//!
//! Two rules are hard, not scored: an exercise requiring equipment the user
//! lacks is skipped outright, and a final score at or below zero drops the
//! exercise from the ranked candidate list.
//!
//! The reported `recovery_fit` term is the sum of two distinct sub-terms
//! computed separately: the exercise-recency score and the recovery-state
//! adjustment. Keeping them apart internally avoids one silently
//! overwriting the other.

use crate::config::{ScoringWeights, VolumeConfig};
use crate::models::{
    Exercise, ExerciseType, ExperienceLevel, FitnessGoal, InjurySeverity, InjuryStatus,
    PhaseType, PreferenceTag, RecoveryClassification, RecoveryScore, ScoreBreakdown,
    ScoredExercise, TrainingPhase, UserContext, UserInjury, WorkoutHistoryEntry,
};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Muscle volume below this fraction of the user's average counts as
/// undertrained
const UNDERTRAINED_RATIO: f64 = 0.7;
/// Muscle volume above this fraction of the user's average counts as
/// overtrained
const OVERTRAINED_RATIO: f64 = 1.3;
/// Penalty for repeating an exercise performed less than a day ago
const TOO_SOON_PENALTY: f64 = -20.0;
/// Penalty for an exercise more than one skill tier above the user
const TOO_ADVANCED_PENALTY: f64 = -10.0;
/// Veto for a movement pattern contraindicated by a current injury
const MOVEMENT_VETO: f64 = -100.0;
/// Bonus for rehab-tagged exercises while an injury is active
const REHAB_BONUS: f64 = 10.0;

/// Everything the scorer needs beyond the exercise itself
///
/// Borrowed from the orchestrator's fan-in so scoring a whole catalog
/// allocates nothing per candidate.
pub struct ScoringContext<'a> {
    /// Immutable per-request user context
    pub user: &'a UserContext,
    /// Active and recovering injuries
    pub injuries: &'a [UserInjury],
    /// Per-exercise 30-day history aggregates
    pub history: &'a HashMap<Uuid, WorkoutHistoryEntry>,
    /// Active periodization phase, if any
    pub phase: Option<&'a TrainingPhase>,
    /// Muscle tag -> 14-day training volume
    pub muscle_volumes: &'a HashMap<String, f64>,
    /// Exercise id -> recorded preference
    pub preferences: &'a HashMap<Uuid, PreferenceTag>,
    /// Current recovery score, if one could be computed
    pub recovery: Option<&'a RecoveryScore>,
    /// When set, only exercises hitting these muscles earn muscle-need credit
    pub target_muscles: Option<&'a [String]>,
    /// Muscles that must not be loaded today
    pub excluded_muscles: &'a [String],
    /// Request timestamp; fixed once so recency scoring is deterministic
    pub now: DateTime<Utc>,
}

/// Weighted multi-factor exercise scorer
pub struct ExerciseScorer {
    weights: ScoringWeights,
    volume: VolumeConfig,
}

impl ExerciseScorer {
    /// Build a scorer with the given weights and volume parameters
    #[must_use]
    pub const fn new(weights: ScoringWeights, volume: VolumeConfig) -> Self {
        Self { weights, volume }
    }

    /// Score every candidate, drop non-positive scores, and rank descending
    ///
    /// The sort is stable, so equal-scored candidates keep their catalog
    /// order and repeated runs over identical inputs produce identical
    /// rankings.
    #[must_use]
    pub fn rank(&self, candidates: &[Exercise], ctx: &ScoringContext<'_>) -> Vec<ScoredExercise> {
        let mut scored: Vec<ScoredExercise> = candidates
            .iter()
            .filter_map(|exercise| self.score(exercise, ctx))
            .filter(|s| s.score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored
    }

    /// Score one exercise against the request context
    ///
    /// Returns `None` only for the equipment hard gate: declared required
    /// equipment the user does not have means the exercise is never
    /// considered, not scored at zero. Negative totals are returned as-is;
    /// [`Self::rank`] applies the non-positive cutoff.
    #[must_use]
    pub fn score(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> Option<ScoredExercise> {
        if !exercise
            .equipment_required
            .iter()
            .all(|needed| ctx.user.equipment.contains(needed))
        {
            return None;
        }

        let recency = self.recency_score(exercise, ctx);
        let recovery_state = Self::recovery_state_adjustment(exercise, ctx.recovery);

        let breakdown = ScoreBreakdown {
            equipment_match: self.weights.equipment_match,
            goal_alignment: self.goal_alignment(exercise, ctx),
            muscle_need: self.muscle_need(exercise, ctx),
            recovery_fit: recency + recovery_state,
            skill_fit: self.skill_fit(exercise, ctx),
            periodization_fit: self.periodization_fit(exercise, ctx),
            variety_bonus: self.variety_bonus(exercise, ctx),
            injury_penalty: Self::injury_penalty(exercise, ctx.injuries),
            preference: self.preference_modifier(exercise, ctx),
        };
        let (sets, reps, rest_seconds) = self.prescribe_volume(exercise, ctx);

        Some(ScoredExercise {
            exercise_id: exercise.id,
            name: exercise.name.clone(),
            exercise_type: exercise.exercise_type,
            difficulty: exercise.difficulty,
            score: breakdown.total(),
            breakdown,
            sets,
            reps,
            rest_seconds,
            notes: None,
            primary_muscles: exercise.primary_muscles.clone(),
        })
    }

    /// Goal alignment: each declared goal whose favored types or
    /// methodologies cover this exercise contributes an even share of the
    /// weight
    fn goal_alignment(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        if ctx.user.goals.is_empty() {
            return 0.0;
        }
        let share = self.weights.goal_alignment / ctx.user.goals.len() as f64;
        ctx.user
            .goals
            .iter()
            .filter(|goal| goal_favors(**goal, exercise))
            .count() as f64
            * share
    }

    /// Muscle-imbalance need: undertrained primary muscles earn an even
    /// share of the weight, overtrained ones a flat penalty
    ///
    /// An explicitly excluded muscle short-circuits to a hard negative; a
    /// target-muscle filter that the exercise misses contributes zero. The
    /// final contribution is floored at zero (the exclusion penalty is the
    /// one deliberate exception).
    fn muscle_need(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        if exercise
            .primary_muscles
            .iter()
            .any(|m| ctx.excluded_muscles.contains(m))
        {
            return self.weights.excluded_muscle_penalty;
        }
        if let Some(targets) = ctx.target_muscles {
            if !exercise
                .primary_muscles
                .iter()
                .any(|m| targets.contains(m))
            {
                return 0.0;
            }
        }
        if exercise.primary_muscles.is_empty() {
            return 0.0;
        }

        let average = if ctx.muscle_volumes.is_empty() {
            0.0
        } else {
            ctx.muscle_volumes.values().sum::<f64>() / ctx.muscle_volumes.len() as f64
        };
        let share = self.weights.muscle_need / exercise.primary_muscles.len() as f64;

        let mut contribution = 0.0;
        for muscle in &exercise.primary_muscles {
            let volume = ctx.muscle_volumes.get(muscle).copied().unwrap_or(0.0);
            if average <= 0.0 || volume < UNDERTRAINED_RATIO * average {
                // untrained or undertrained relative to the user's average
                contribution += share;
            } else if volume > OVERTRAINED_RATIO * average {
                contribution += self.weights.overtrained_penalty;
            }
        }
        contribution.max(0.0)
    }

    /// Exercise-recency sub-term: novelty earns the full weight, repeating
    /// something performed under a day ago is penalized
    fn recency_score(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        let Some(entry) = ctx.history.get(&exercise.id) else {
            return self.weights.recovery_fit;
        };
        let days_since = (ctx.now - entry.last_performed).num_hours() as f64 / 24.0;
        if days_since < 1.0 {
            TOO_SOON_PENALTY
        } else if days_since < 2.0 {
            0.0
        } else if days_since < 4.0 {
            self.weights.recovery_fit / 2.0
        } else {
            self.weights.recovery_fit
        }
    }

    /// Recovery-state sub-term, stacked onto the recency score
    ///
    /// Poor recovery pushes hard against taxing work and toward restorative
    /// work; fair recovery applies half those adjustments; excellent
    /// recovery nudges taxing work up.
    fn recovery_state_adjustment(exercise: &Exercise, recovery: Option<&RecoveryScore>) -> f64 {
        let Some(score) = recovery else {
            return 0.0;
        };
        match score.classification {
            RecoveryClassification::Poor => {
                let mut adjustment = if exercise.exercise_type.is_high_intensity() {
                    -30.0
                } else if exercise.exercise_type.is_low_intensity() {
                    20.0
                } else {
                    0.0
                };
                if exercise.difficulty >= 4 {
                    adjustment -= 20.0;
                }
                adjustment
            }
            RecoveryClassification::Fair => {
                let mut adjustment = if exercise.exercise_type.is_high_intensity() {
                    -15.0
                } else if exercise.exercise_type.is_low_intensity() {
                    10.0
                } else {
                    0.0
                };
                if exercise.difficulty >= 4 {
                    adjustment -= 10.0;
                }
                adjustment
            }
            RecoveryClassification::Excellent => {
                if exercise.exercise_type.is_high_intensity() {
                    10.0
                } else {
                    0.0
                }
            }
            RecoveryClassification::Good | RecoveryClassification::Moderate => 0.0,
        }
    }

    /// Skill match between the user's tier and the exercise's tier
    fn skill_fit(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        let gap = ctx.user.experience_level.ordinal() - exercise.skill_level.ordinal();
        match gap {
            g if g < -1 => TOO_ADVANCED_PENALTY,
            -1 => self.weights.skill_fit / 2.0,
            0 => self.weights.skill_fit,
            _ => self.weights.skill_fit * 0.7,
        }
    }

    /// Fit with the active periodization phase; half weight when no phase
    /// is active
    fn periodization_fit(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        let Some(phase) = ctx.phase else {
            return self.weights.periodization_fit / 2.0;
        };
        if phase.exercise_types.contains(&exercise.exercise_type)
            || phase.movement_patterns.contains(&exercise.movement_pattern)
        {
            self.weights.periodization_fit
        } else {
            0.0
        }
    }

    /// Novelty bonus decaying with 30-day performance count
    fn variety_bonus(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        match ctx.history.get(&exercise.id) {
            None => self.weights.variety_bonus,
            Some(entry) if entry.times_performed > 10 => 0.0,
            Some(entry) if entry.times_performed > 5 => self.weights.variety_bonus * 0.3,
            Some(_) => self.weights.variety_bonus * 0.7,
        }
    }

    /// Injury veto, severity-scaled penalty, or rehab bonus
    ///
    /// The movement-pattern veto wins over everything, including the rehab
    /// bonus: a rehab exercise whose movement is explicitly contraindicated
    /// stays vetoed. With multiple matching injury profiles the worst
    /// severity applies once, not summed.
    fn injury_penalty(exercise: &Exercise, injuries: &[UserInjury]) -> f64 {
        if injuries.iter().any(|injury| {
            injury
                .contraindicated_movements
                .contains(&exercise.movement_pattern)
        }) {
            return MOVEMENT_VETO;
        }

        let worst_match = injuries
            .iter()
            .filter(|injury| {
                exercise
                    .contraindicated_injuries
                    .contains(&injury.injury_profile_id)
            })
            .map(|injury| injury.severity)
            .max();
        if let Some(severity) = worst_match {
            return match severity {
                InjurySeverity::Severe => -100.0,
                InjurySeverity::Moderate => -50.0,
                InjurySeverity::Mild => -25.0,
            };
        }

        if exercise.is_rehab_exercise
            && injuries.iter().any(|i| i.status == InjuryStatus::Active)
        {
            return REHAB_BONUS;
        }
        0.0
    }

    /// User preference modifier, pre-scaled by the preference weight
    fn preference_modifier(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> f64 {
        let modifier = match ctx.preferences.get(&exercise.id) {
            Some(PreferenceTag::Favorite) => 20.0,
            Some(
                PreferenceTag::Avoid
                | PreferenceTag::Injured
                | PreferenceTag::NoEquipment
                | PreferenceTag::TooDifficult,
            ) => -100.0,
            Some(PreferenceTag::TooEasy) => -20.0,
            None => 0.0,
        };
        modifier * self.weights.preference
    }

    /// Sets, reps, and rest for this exercise under the current phase,
    /// experience level, and time budget
    fn prescribe_volume(&self, exercise: &Exercise, ctx: &ScoringContext<'_>) -> (u32, u32, u32) {
        let vol = &self.volume;

        let mut sets = ctx.phase.map_or(vol.base_sets, |phase| {
            (f64::from(vol.base_sets) * phase.volume_modifier).round() as u32
        });
        if ctx.user.experience_level == ExperienceLevel::Beginner {
            sets = sets.min(vol.beginner_max_sets);
        }
        if ctx.user.experience_level == ExperienceLevel::Elite {
            sets = sets.max(vol.elite_min_sets);
        }
        if ctx.user.time_available_minutes < vol.short_session_minutes {
            sets = vol.short_session_sets;
        }
        sets = sets.clamp(vol.min_sets, vol.max_sets);

        let mut reps = f64::from(VolumeConfig::base_reps(exercise.exercise_type));
        match ctx.phase.map(|p| p.phase_type) {
            Some(PhaseType::Accumulation) => reps *= vol.accumulation_rep_scale,
            Some(PhaseType::Realization) => reps *= vol.realization_rep_scale,
            _ => {}
        }
        let reps = (reps.round() as u32).clamp(vol.min_reps, vol.max_reps);

        let rest_seconds = VolumeConfig::base_rest_seconds(exercise.exercise_type);
        (sets, reps, rest_seconds)
    }
}

/// Whether a goal's fixed tag set covers this exercise's type or source
/// methodology
fn goal_favors(goal: FitnessGoal, exercise: &Exercise) -> bool {
    if goal_types(goal).contains(&exercise.exercise_type) {
        return true;
    }
    exercise
        .source_methodology
        .as_deref()
        .is_some_and(|m| goal_methodologies(goal).contains(&m))
}

const fn goal_types(goal: FitnessGoal) -> &'static [ExerciseType] {
    match goal {
        FitnessGoal::Strength => &[ExerciseType::Strength, ExerciseType::Power],
        FitnessGoal::MuscleGain => &[ExerciseType::Hypertrophy, ExerciseType::Strength],
        FitnessGoal::FatLoss => &[ExerciseType::Hiit, ExerciseType::Cardio, ExerciseType::Endurance],
        FitnessGoal::Endurance => &[ExerciseType::Endurance, ExerciseType::Cardio],
        FitnessGoal::Mobility => &[
            ExerciseType::Mobility,
            ExerciseType::Stretching,
            ExerciseType::Yoga,
        ],
        FitnessGoal::GeneralFitness => &[
            ExerciseType::Strength,
            ExerciseType::Hypertrophy,
            ExerciseType::Cardio,
            ExerciseType::Endurance,
        ],
        FitnessGoal::AthleticPerformance => &[
            ExerciseType::Power,
            ExerciseType::Plyometric,
            ExerciseType::Strength,
            ExerciseType::Hiit,
        ],
    }
}

const fn goal_methodologies(goal: FitnessGoal) -> &'static [&'static str] {
    match goal {
        FitnessGoal::Strength => &["powerlifting", "starting_strength"],
        FitnessGoal::MuscleGain => &["bodybuilding"],
        FitnessGoal::FatLoss => &["crossfit", "circuit_training"],
        FitnessGoal::Endurance => &["running", "triathlon"],
        FitnessGoal::Mobility => &["yoga", "functional_movement"],
        FitnessGoal::GeneralFitness => &[],
        FitnessGoal::AthleticPerformance => &["sports_performance", "athletic_development"],
    }
}

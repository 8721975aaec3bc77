// ABOUTME: Domain data model for the adaptive exercise prescription pipeline
// ABOUTME: Request context, catalog exercises, recovery scores, and scored plan output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain model shared across the prescription pipeline.
//!
//! Closed vocabularies (experience levels, exercise types, goals, recovery
//! tiers) are typed enums so threshold and affinity tables stay
//! compile-time-checked. Open vocabularies sourced from the catalog (muscle
//! tags, equipment tags, movement patterns) stay plain strings, the same way
//! provider-sourced data does elsewhere on the platform.
//!
//! Everything here except the raw catalog/history/injury inputs is built
//! fresh per request and discarded once the result is returned.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Self-reported training experience, ordered beginner -> elite
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    /// New to structured training
    Beginner,
    /// Comfortable with common movement patterns
    Intermediate,
    /// Several years of consistent training
    Advanced,
    /// Competitive-level training background
    Elite,
}

impl ExperienceLevel {
    /// Ordinal used for skill-gap comparisons (beginner=1 ... elite=4)
    #[must_use]
    pub const fn ordinal(self) -> i8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
            Self::Elite => 4,
        }
    }

    /// Difficulty ceiling applied when querying the catalog (1-5 scale)
    #[must_use]
    pub const fn max_difficulty(self) -> u8 {
        match self {
            Self::Beginner => 2,
            Self::Intermediate => 3,
            Self::Advanced => 4,
            Self::Elite => 5,
        }
    }
}

/// Where the workout will take place
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Home training, typically limited equipment
    Home,
    /// Commercial or club gym
    Gym,
    /// Parks, tracks, trails
    Outdoor,
    /// Hotel rooms and other improvised spaces
    Travel,
}

/// Exercise type tag from the catalog
///
/// The `Other` arm absorbs catalog tags added after this crate shipped;
/// lookup tables treat it via their default arm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Heavy compound strength work
    Strength,
    /// Explosive power and speed-strength work
    Power,
    /// Volume-oriented muscle building
    Hypertrophy,
    /// Sustained aerobic or muscular endurance
    Endurance,
    /// High-intensity interval circuits
    Hiit,
    /// Steady-state cardiovascular work
    Cardio,
    /// Plyometric jumping and bounding
    Plyometric,
    /// Joint mobility drills
    Mobility,
    /// Static and dynamic stretching
    Stretching,
    /// Yoga flows and poses
    Yoga,
    /// Low-intensity recovery movement
    ActiveRecovery,
    /// Pre-workout preparation drills
    Warmup,
    /// Muscle activation primers
    Activation,
    /// Post-workout downshift work
    Cooldown,
    /// Injury rehabilitation movements
    Rehab,
    /// Any tag this crate does not know about
    #[serde(other)]
    Other,
}

impl ExerciseType {
    /// Types treated as taxing when recovery is compromised
    #[must_use]
    pub const fn is_high_intensity(self) -> bool {
        matches!(
            self,
            Self::Strength | Self::Power | Self::Hiit | Self::Plyometric
        )
    }

    /// Types treated as restorative when recovery is compromised
    #[must_use]
    pub const fn is_low_intensity(self) -> bool {
        matches!(
            self,
            Self::Mobility | Self::Stretching | Self::Yoga | Self::ActiveRecovery | Self::Cooldown
        )
    }
}

/// Training goal declared by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    /// Maximal strength development
    Strength,
    /// Muscle size gain
    MuscleGain,
    /// Body fat reduction
    FatLoss,
    /// Aerobic and muscular endurance
    Endurance,
    /// Range of motion and joint health
    Mobility,
    /// Broad conditioning without a single focus
    GeneralFitness,
    /// Sport-transferable athleticism
    AthleticPerformance,
}

/// Immutable per-request user context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// Platform user id
    pub user_id: Uuid,
    /// Self-assessed fitness level, 1-10
    pub fitness_level: u8,
    /// Training experience tier
    pub experience_level: ExperienceLevel,
    /// Equipment tags the user has access to
    pub equipment: Vec<String>,
    /// Where the workout happens
    pub location: Location,
    /// Minutes available for the session, positive
    pub time_available_minutes: u32,
    /// Declared training goals
    pub goals: Vec<FitnessGoal>,
    /// Optional training archetype id from onboarding
    pub archetype: Option<String>,
}

/// Catalog exercise record, read-only input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Catalog id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Type tag
    pub exercise_type: ExerciseType,
    /// Difficulty 1-5
    pub difficulty: u8,
    /// Primary muscle tags
    pub primary_muscles: Vec<String>,
    /// Equipment the exercise cannot be performed without
    pub equipment_required: Vec<String>,
    /// Equipment that enhances but is not required
    pub equipment_optional: Vec<String>,
    /// Locations the exercise suits
    pub locations: Vec<Location>,
    /// Movement pattern tag (hinge, squat, push, pull, ...)
    pub movement_pattern: String,
    /// Skill tier the exercise is written for
    pub skill_level: ExperienceLevel,
    /// Methodology tag of the source program, if any
    pub source_methodology: Option<String>,
    /// Injury profile ids this exercise is contraindicated for
    pub contraindicated_injuries: Vec<String>,
    /// Whether the exercise is a rehabilitation movement
    pub is_rehab_exercise: bool,
}

/// Severity tier of a recorded injury
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum InjurySeverity {
    /// Minor, train around it
    Mild,
    /// Meaningful restriction
    Moderate,
    /// Hard restriction
    Severe,
}

/// Current state of a recorded injury
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    /// Currently symptomatic
    Active,
    /// Healing, still guarded
    Recovering,
}

/// User injury record joined with its contraindicated movements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInjury {
    /// Injury profile id (matches `Exercise::contraindicated_injuries`)
    pub injury_profile_id: String,
    /// Severity tier
    pub severity: InjurySeverity,
    /// Active or recovering
    pub status: InjuryStatus,
    /// Movement pattern tags to avoid
    pub contraindicated_movements: Vec<String>,
}

/// Per-exercise aggregate over the fixed 30-day history window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutHistoryEntry {
    /// Exercise this aggregate covers
    pub exercise_id: Uuid,
    /// Most recent performance
    pub last_performed: DateTime<Utc>,
    /// Performances inside the window
    pub times_performed: u32,
    /// Average reported RPE, if logged
    pub avg_rpe: Option<f64>,
}

/// Periodization phase type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PhaseType {
    /// Volume accumulation block
    Accumulation,
    /// Intensity-biased block
    Intensification,
    /// Peaking / realization block
    Realization,
    /// Planned recovery week
    Deload,
}

/// Active training-cycle phase; absent for most users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPhase {
    /// Phase type
    pub phase_type: PhaseType,
    /// Multiplier applied to set volume
    pub volume_modifier: f64,
    /// Multiplier applied to intensity prescriptions
    pub intensity_modifier: f64,
    /// Exercise types the phase favors
    pub exercise_types: Vec<ExerciseType>,
    /// Movement patterns the phase favors
    pub movement_patterns: Vec<String>,
}

/// Exercise preference recorded by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceTag {
    /// User asked for more of this
    Favorite,
    /// User never wants this suggested
    Avoid,
    /// User flagged it as aggravating an injury
    Injured,
    /// User lacks the equipment despite catalog tags
    NoEquipment,
    /// Too hard for the user right now
    TooDifficult,
    /// Not stimulating enough
    TooEasy,
}

/// Five-tier recovery classification, threshold-ordered
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryClassification {
    /// Score below 40
    Poor,
    /// Score 40-59
    Fair,
    /// Score 60-74
    Moderate,
    /// Score 75-89
    Good,
    /// Score 90+
    Excellent,
}

/// Recommended workout intensity derived from the recovery score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntensityLevel {
    /// No training today
    Rest,
    /// Very easy movement only
    Light,
    /// Reduced-volume session
    Moderate,
    /// Train as planned
    Normal,
    /// Green light for hard training
    High,
}

/// Direction of the recovery score over the trailing week
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryTrend {
    /// Recent scores meaningfully above earlier ones
    Improving,
    /// No meaningful movement
    Stable,
    /// Recent scores meaningfully below earlier ones
    Declining,
}

/// Component breakdown behind a recovery score
///
/// Invariant: the clamped sum of all components equals
/// [`RecoveryScore::score`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryFactors {
    /// Sleep duration component, 0-40
    pub sleep_duration_score: f64,
    /// Sleep quality component, 0-30
    pub sleep_quality_score: f64,
    /// Rest-day pattern component, 0-20
    pub rest_days_score: f64,
    /// HRV deviation bonus, -5..=10, absent without HRV data
    pub hrv_bonus: Option<f64>,
    /// Flat strain penalty when training density is unsustainable
    pub strain_penalty: Option<f64>,
    /// Sleep-schedule consistency bonus, 0-5
    pub consistency_bonus: Option<f64>,
    /// Human-readable sleep sub-detail
    pub sleep_detail: Option<String>,
    /// Human-readable rest-pattern sub-detail
    pub rest_detail: Option<String>,
    /// Human-readable HRV sub-detail
    pub hrv_detail: Option<String>,
}

impl RecoveryFactors {
    /// Unclamped sum of every contributing component
    #[must_use]
    pub fn component_sum(&self) -> f64 {
        self.sleep_duration_score
            + self.sleep_quality_score
            + self.rest_days_score
            + self.hrv_bonus.unwrap_or(0.0)
            + self.strain_penalty.unwrap_or(0.0)
            + self.consistency_bonus.unwrap_or(0.0)
    }
}

/// Computed recovery score with 24-hour cache semantics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryScore {
    /// Score record id
    pub id: Uuid,
    /// User the score belongs to
    pub user_id: Uuid,
    /// Clamped 0-100 recovery score
    pub score: u8,
    /// Five-tier classification, a pure function of `score`
    pub classification: RecoveryClassification,
    /// Component breakdown
    pub factors: RecoveryFactors,
    /// Recommended intensity, a pure function of `score`
    pub recommended_intensity: IntensityLevel,
    /// Ordered workout-type tags suited to the current state
    pub recommended_workout_types: Vec<String>,
    /// Week-over-half-week trend, when enough history exists
    pub trend: Option<RecoveryTrend>,
    /// When the score was computed
    pub calculated_at: DateTime<Utc>,
    /// Cache expiry (24h TTL)
    pub expires_at: DateTime<Utc>,
    /// Which inputs actually contributed
    pub data_sources: Vec<String>,
}

/// Sleep record for a single night
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Night the record covers
    pub date: DateTime<Utc>,
    /// Hours slept
    pub hours_slept: f64,
    /// Subjective or device quality rating, 1-5
    pub quality_rating: Option<u8>,
    /// When the user went to bed, if tracked
    pub bedtime: Option<DateTime<Utc>>,
}

/// Recent training density used for rest-day scoring
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RestPattern {
    /// Full days since the last workout
    pub days_since_last_workout: u32,
    /// Workouts performed in the trailing 7 days
    pub workouts_last_7_days: u32,
}

/// Current HRV reading plus its 30-day rolling history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HrvSample {
    /// Most recent RMSSD-like reading (ms)
    pub current: f64,
    /// Raw 30-day readings; outliers are filtered during baselining
    pub baseline_readings: Vec<f64>,
}

/// Active sleep-schedule goal, enables the consistency bonus
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SleepScheduleGoal {
    /// Target bedtime (local clock time)
    pub target_bedtime: NaiveTime,
}

/// Named contributions behind a scored exercise
///
/// `recovery_fit` is the sum of two distinct sub-terms: the
/// exercise-recency score and the recovery-state adjustment. They are
/// computed separately and reported as one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Equipment fit; always the full weight once the hard gate passes
    pub equipment_match: f64,
    /// Goal alignment across the user's declared goals
    pub goal_alignment: f64,
    /// Muscle imbalance need (undertrained bonus / overtrained penalty)
    pub muscle_need: f64,
    /// Recency score plus recovery-state adjustment
    pub recovery_fit: f64,
    /// Skill match between user and exercise
    pub skill_fit: f64,
    /// Fit with the active periodization phase
    pub periodization_fit: f64,
    /// Novelty bonus decaying with recent use
    pub variety_bonus: f64,
    /// Injury veto / penalty / rehab bonus
    pub injury_penalty: f64,
    /// User preference modifier, already weight-scaled
    pub preference: f64,
}

impl ScoreBreakdown {
    /// Total score implied by the breakdown
    #[must_use]
    pub fn total(&self) -> f64 {
        self.equipment_match
            + self.goal_alignment
            + self.muscle_need
            + self.recovery_fit
            + self.skill_fit
            + self.periodization_fit
            + self.variety_bonus
            + self.injury_penalty
            + self.preference
    }
}

/// Exercise with its computed score and volume prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredExercise {
    /// Catalog exercise id
    pub exercise_id: Uuid,
    /// Display name
    pub name: String,
    /// Type tag
    pub exercise_type: ExerciseType,
    /// Catalog difficulty 1-5, carried for plan-level difficulty rating
    pub difficulty: u8,
    /// Final signed score; candidates at or below zero are excluded
    pub score: f64,
    /// Named score contributions
    pub breakdown: ScoreBreakdown,
    /// Prescribed sets
    pub sets: u32,
    /// Prescribed reps per set
    pub reps: u32,
    /// Prescribed rest between sets, seconds
    pub rest_seconds: u32,
    /// Guidance notes accumulated along the pipeline
    pub notes: Option<String>,
    /// Primary muscle tags, used for coverage accounting
    pub primary_muscles: Vec<String>,
}

/// Overall plan difficulty rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutDifficulty {
    /// Light or empty session
    Easy,
    /// Standard session
    Moderate,
    /// Demanding session
    Intense,
}

/// Prescription request supplied by the upstream handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionRequest {
    /// Fully-populated user context
    pub context: UserContext,
    /// When set, only exercises hitting these muscles earn muscle-need credit
    pub target_muscles: Option<Vec<String>>,
    /// Muscles that must not be loaded today
    pub excluded_muscles: Vec<String>,
    /// Explicit exercise-count override; wins over the time-derived budget
    pub max_exercises: Option<usize>,
    /// Bypass the recovery-score cache and recompute
    pub force_recovery_recalculation: bool,
}

/// Metadata recorded with every prescription for offline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionMetadata {
    /// Version of the scoring/selection algorithm
    pub algorithm_version: String,
    /// When the plan was generated
    pub generated_at: DateTime<Utc>,
    /// Context factors that actually informed scoring
    pub factors_considered: Vec<String>,
    /// Recovery score used, if one was available
    pub recovery_score: Option<u8>,
    /// Recommended intensity used, if one was available
    pub recovery_recommendation: Option<IntensityLevel>,
}

/// Final assembled workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionResult {
    /// Plan id
    pub id: Uuid,
    /// User the plan was generated for
    pub user_id: Uuid,
    /// Main exercises, ranked
    pub exercises: Vec<ScoredExercise>,
    /// Preparatory satellite list
    pub warmup: Vec<ScoredExercise>,
    /// Restorative satellite list
    pub cooldown: Vec<ScoredExercise>,
    /// Estimated total duration, minutes
    pub total_duration_minutes: u32,
    /// Muscle tag -> total sets x reps across the main list
    pub muscle_coverage: BTreeMap<String, u32>,
    /// Active periodization phase, when one applied
    pub periodization_phase: Option<PhaseType>,
    /// Overall plan difficulty
    pub difficulty: WorkoutDifficulty,
    /// Generation metadata for the feedback store
    pub metadata: PrescriptionMetadata,
}

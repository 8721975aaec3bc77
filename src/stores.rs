// ABOUTME: Collaborator store traits consumed by the prescription engine
// ABOUTME: Async read seams for catalog, injuries, history, phases, volumes, preferences, recovery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Collaborator store abstractions.
//!
//! The engine never talks to storage directly; every external read or write
//! goes through one of these traits so the algorithm can be exercised against
//! in-memory fakes. The catalog, injury, history, muscle-volume, and
//! preference stores are critical: a failure there aborts the request. The
//! training-phase and recovery stores are optional: a failure there degrades
//! to absence.

use crate::errors::StoreError;
use crate::models::{
    Exercise, ExerciseType, HrvSample, Location, PreferenceTag, PrescriptionResult, RecoveryScore,
    RestPattern, SleepRecord, SleepScheduleGoal, TrainingPhase, UserInjury, WorkoutHistoryEntry,
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Read-only exercise catalog
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Candidate exercises matching the user's equipment, location, and
    /// difficulty ceiling
    async fn find_candidates(
        &self,
        equipment: &[String],
        location: Location,
        max_difficulty: u8,
    ) -> Result<Vec<Exercise>, StoreError>;

    /// Exercises of the given types whose primary muscles intersect
    /// `muscles`, capped at `limit`; used for warmup/cooldown satellites
    async fn find_by_types(
        &self,
        types: &[ExerciseType],
        muscles: &[String],
        limit: usize,
    ) -> Result<Vec<Exercise>, StoreError>;
}

/// Read-only injury profile store
#[async_trait]
pub trait InjuryStore: Send + Sync {
    /// Active and recovering injuries joined with their contraindicated
    /// movement sets
    async fn current_injuries(&self, user_id: Uuid) -> Result<Vec<UserInjury>, StoreError>;
}

/// Read-only workout history store
#[async_trait]
pub trait WorkoutHistoryStore: Send + Sync {
    /// Per-exercise aggregates over the trailing `window_days`
    async fn recent_history(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<WorkoutHistoryEntry>, StoreError>;
}

/// Read-only periodization store
#[async_trait]
pub trait TrainingPhaseStore: Send + Sync {
    /// Current training-cycle phase; `None` is the common case
    async fn current_phase(&self, user_id: Uuid) -> Result<Option<TrainingPhase>, StoreError>;
}

/// Read-only per-muscle training volume store
#[async_trait]
pub trait MuscleVolumeStore: Send + Sync {
    /// Muscle tag -> aggregate training volume over the trailing
    /// `window_days` (reps x weight x activation fraction)
    async fn volume_by_muscle(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<HashMap<String, f64>, StoreError>;
}

/// Read-only user exercise preference store
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Exercise id -> preference tag pairs recorded by the user
    async fn preferences(&self, user_id: Uuid)
        -> Result<HashMap<Uuid, PreferenceTag>, StoreError>;
}

/// Read-only physiological inputs for recovery scoring
///
/// Every accessor yields `Option`: missing data is the normal case and must
/// resolve to the calculator's documented defaults, never an error.
#[async_trait]
pub trait RecoveryDataSource: Send + Sync {
    /// Most recent night's sleep record
    async fn latest_sleep(&self, user_id: Uuid) -> Result<Option<SleepRecord>, StoreError>;

    /// Recent training density (days since last workout, weekly count)
    async fn rest_pattern(&self, user_id: Uuid) -> Result<Option<RestPattern>, StoreError>;

    /// Current HRV reading plus its 30-day rolling history
    async fn hrv_sample(&self, user_id: Uuid) -> Result<Option<HrvSample>, StoreError>;

    /// Active sleep-schedule goal, when the user has one
    async fn sleep_schedule_goal(
        &self,
        user_id: Uuid,
    ) -> Result<Option<SleepScheduleGoal>, StoreError>;
}

/// Recovery score cache with TTL semantics
///
/// Treated as an append-with-expiry log, not a single mutable cell: two
/// concurrent recomputations racing to `put` is harmless because the
/// computation is idempotent.
#[async_trait]
pub trait RecoveryScoreRepository: Send + Sync {
    /// Most recent unexpired score for the user, if any
    async fn fresh(&self, user_id: Uuid) -> Result<Option<RecoveryScore>, StoreError>;

    /// Append a computed score
    async fn put(&self, score: &RecoveryScore) -> Result<(), StoreError>;

    /// Scores computed within the trailing `window_days`, oldest first;
    /// feeds trend computation
    async fn recent_scores(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<RecoveryScore>, StoreError>;
}

/// Write-only feedback sink for offline model tuning
///
/// Never read back synchronously; failures are logged and swallowed by the
/// orchestrator.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Append a generated prescription
    async fn record(&self, result: &PrescriptionResult) -> Result<(), StoreError>;
}

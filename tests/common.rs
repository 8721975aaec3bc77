// ABOUTME: Shared in-memory store fakes and fixtures for integration tests
// ABOUTME: Provides catalog, history, injury, preference, and recovery fakes plus user builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Shared test utilities for `pierre_prescription`
//!
//! In-memory implementations of every collaborator store trait, plus
//! fixture builders for users, catalogs, and recovery scores.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pierre_prescription::errors::StoreError;
use pierre_prescription::models::{
    Exercise, ExerciseType, ExperienceLevel, FitnessGoal, HrvSample, Location, PreferenceTag,
    PrescriptionRequest, PrescriptionResult, RecoveryFactors, RecoveryScore, RestPattern,
    SleepRecord, SleepScheduleGoal, TrainingPhase, UserContext, UserInjury, WorkoutHistoryEntry,
};
use pierre_prescription::stores::{
    ExerciseCatalog, FeedbackStore, InjuryStore, MuscleVolumeStore, PreferenceStore,
    RecoveryDataSource, RecoveryScoreRepository, TrainingPhaseStore, WorkoutHistoryStore,
};
use pierre_prescription::{CollaboratorStores, RecoveryScoreCalculator};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Catalog fake filtering by location and difficulty only, so the scorer's
/// equipment hard gate is exercised by tests
#[derive(Default)]
pub struct FakeCatalog {
    pub exercises: Vec<Exercise>,
}

#[async_trait]
impl ExerciseCatalog for FakeCatalog {
    async fn find_candidates(
        &self,
        _equipment: &[String],
        location: Location,
        max_difficulty: u8,
    ) -> Result<Vec<Exercise>, StoreError> {
        Ok(self
            .exercises
            .iter()
            .filter(|ex| ex.locations.contains(&location) && ex.difficulty <= max_difficulty)
            .cloned()
            .collect())
    }

    async fn find_by_types(
        &self,
        types: &[ExerciseType],
        muscles: &[String],
        limit: usize,
    ) -> Result<Vec<Exercise>, StoreError> {
        Ok(self
            .exercises
            .iter()
            .filter(|ex| types.contains(&ex.exercise_type))
            .filter(|ex| ex.primary_muscles.iter().any(|m| muscles.contains(m)))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeInjuryStore {
    pub injuries: Vec<UserInjury>,
}

#[async_trait]
impl InjuryStore for FakeInjuryStore {
    async fn current_injuries(&self, _user_id: Uuid) -> Result<Vec<UserInjury>, StoreError> {
        Ok(self.injuries.clone())
    }
}

#[derive(Default)]
pub struct FakeHistoryStore {
    pub entries: Vec<WorkoutHistoryEntry>,
}

#[async_trait]
impl WorkoutHistoryStore for FakeHistoryStore {
    async fn recent_history(
        &self,
        _user_id: Uuid,
        _window_days: u32,
    ) -> Result<Vec<WorkoutHistoryEntry>, StoreError> {
        Ok(self.entries.clone())
    }
}

#[derive(Default)]
pub struct FakePhaseStore {
    pub phase: Option<TrainingPhase>,
}

#[async_trait]
impl TrainingPhaseStore for FakePhaseStore {
    async fn current_phase(&self, _user_id: Uuid) -> Result<Option<TrainingPhase>, StoreError> {
        Ok(self.phase.clone())
    }
}

/// Phase store that always fails, for degradation tests
pub struct FailingPhaseStore;

#[async_trait]
impl TrainingPhaseStore for FailingPhaseStore {
    async fn current_phase(&self, _user_id: Uuid) -> Result<Option<TrainingPhase>, StoreError> {
        Err(StoreError::Unavailable("phase store down".to_owned()))
    }
}

#[derive(Default)]
pub struct FakeVolumeStore {
    pub volumes: HashMap<String, f64>,
}

#[async_trait]
impl MuscleVolumeStore for FakeVolumeStore {
    async fn volume_by_muscle(
        &self,
        _user_id: Uuid,
        _window_days: u32,
    ) -> Result<HashMap<String, f64>, StoreError> {
        Ok(self.volumes.clone())
    }
}

#[derive(Default)]
pub struct FakePreferenceStore {
    pub preferences: HashMap<Uuid, PreferenceTag>,
}

#[async_trait]
impl PreferenceStore for FakePreferenceStore {
    async fn preferences(
        &self,
        _user_id: Uuid,
    ) -> Result<HashMap<Uuid, PreferenceTag>, StoreError> {
        Ok(self.preferences.clone())
    }
}

/// Preference store that always fails, for critical-path tests
pub struct FailingPreferenceStore;

#[async_trait]
impl PreferenceStore for FailingPreferenceStore {
    async fn preferences(
        &self,
        _user_id: Uuid,
    ) -> Result<HashMap<Uuid, PreferenceTag>, StoreError> {
        Err(StoreError::Unavailable("preference store down".to_owned()))
    }
}

#[derive(Default)]
pub struct FakeRecoveryData {
    pub sleep: Option<SleepRecord>,
    pub rest: Option<RestPattern>,
    pub hrv: Option<HrvSample>,
    pub schedule_goal: Option<SleepScheduleGoal>,
}

#[async_trait]
impl RecoveryDataSource for FakeRecoveryData {
    async fn latest_sleep(&self, _user_id: Uuid) -> Result<Option<SleepRecord>, StoreError> {
        Ok(self.sleep.clone())
    }

    async fn rest_pattern(&self, _user_id: Uuid) -> Result<Option<RestPattern>, StoreError> {
        Ok(self.rest)
    }

    async fn hrv_sample(&self, _user_id: Uuid) -> Result<Option<HrvSample>, StoreError> {
        Ok(self.hrv.clone())
    }

    async fn sleep_schedule_goal(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<SleepScheduleGoal>, StoreError> {
        Ok(self.schedule_goal)
    }
}

/// Append-with-expiry score repository backed by a mutex-guarded vec
#[derive(Default)]
pub struct InMemoryScoreRepository {
    pub rows: Mutex<Vec<RecoveryScore>>,
}

#[async_trait]
impl RecoveryScoreRepository for InMemoryScoreRepository {
    async fn fresh(&self, user_id: Uuid) -> Result<Option<RecoveryScore>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let now = Utc::now();
        Ok(rows
            .iter()
            .filter(|r| r.user_id == user_id && r.expires_at > now)
            .max_by_key(|r| r.calculated_at)
            .cloned())
    }

    async fn put(&self, score: &RecoveryScore) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(score.clone());
        Ok(())
    }

    async fn recent_scores(
        &self,
        user_id: Uuid,
        window_days: u32,
    ) -> Result<Vec<RecoveryScore>, StoreError> {
        let cutoff = Utc::now() - Duration::days(i64::from(window_days));
        let mut rows: Vec<RecoveryScore> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.calculated_at >= cutoff)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.calculated_at);
        Ok(rows)
    }
}

/// Feedback sink recording every appended prescription
#[derive(Default)]
pub struct RecordingFeedbackStore {
    pub records: Mutex<Vec<PrescriptionResult>>,
}

impl RecordingFeedbackStore {
    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedbackStore for RecordingFeedbackStore {
    async fn record(&self, result: &PrescriptionResult) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(result.clone());
        Ok(())
    }
}

/// A gym user with a barbell, a bench, and a strength goal
pub fn gym_user() -> UserContext {
    UserContext {
        user_id: Uuid::new_v4(),
        fitness_level: 6,
        experience_level: ExperienceLevel::Intermediate,
        equipment: vec!["barbell".to_owned(), "bench".to_owned()],
        location: Location::Gym,
        time_available_minutes: 60,
        goals: vec![FitnessGoal::Strength],
        archetype: None,
    }
}

/// Basic prescription request around the given context
pub fn request_for(context: UserContext) -> PrescriptionRequest {
    PrescriptionRequest {
        context,
        target_muscles: None,
        excluded_muscles: vec![],
        max_exercises: None,
        force_recovery_recalculation: false,
    }
}

/// Strength exercise available at the gym with no equipment requirement
pub fn bodyweight_exercise(name: &str, muscle: &str) -> Exercise {
    Exercise {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        exercise_type: ExerciseType::Strength,
        difficulty: 3,
        primary_muscles: vec![muscle.to_owned()],
        equipment_required: vec![],
        equipment_optional: vec![],
        locations: vec![Location::Gym, Location::Home],
        movement_pattern: "push".to_owned(),
        skill_level: ExperienceLevel::Intermediate,
        source_methodology: None,
        contraindicated_injuries: vec![],
        is_rehab_exercise: false,
    }
}

/// Catalog of `count` distinct-muscle strength exercises
pub fn strength_catalog(count: usize) -> Vec<Exercise> {
    (0..count)
        .map(|i| bodyweight_exercise(&format!("exercise {i}"), &format!("muscle_{i}")))
        .collect()
}

/// A recovery score row as the calculator would have produced it
pub fn stored_recovery_score(user_id: Uuid, score: u8, expires_at: DateTime<Utc>) -> RecoveryScore {
    RecoveryScore {
        id: Uuid::new_v4(),
        user_id,
        score,
        classification: RecoveryScoreCalculator::classify(score),
        factors: distribute_factors(score),
        recommended_intensity: RecoveryScoreCalculator::recommend_intensity(score),
        recommended_workout_types: RecoveryScoreCalculator::recommend_workout_types(score, false),
        trend: None,
        calculated_at: Utc::now(),
        expires_at,
        data_sources: vec!["sleep".to_owned(), "rest_pattern".to_owned()],
    }
}

/// Component breakdown whose sum equals `score`, honoring each cap
fn distribute_factors(score: u8) -> RecoveryFactors {
    let mut remaining = f64::from(score);
    let rest_days_score = remaining.min(20.0);
    remaining -= rest_days_score;
    let sleep_quality_score = remaining.min(30.0);
    remaining -= sleep_quality_score;
    let sleep_duration_score = remaining.min(40.0);
    remaining -= sleep_duration_score;
    RecoveryFactors {
        sleep_duration_score,
        sleep_quality_score,
        rest_days_score,
        hrv_bonus: (remaining > 0.0).then_some(remaining),
        strain_penalty: None,
        consistency_bonus: None,
        sleep_detail: None,
        rest_detail: None,
        hrv_detail: None,
    }
}

/// Bundle of wired stores for engine construction, each part replaceable
pub struct StoreBuilder {
    pub catalog: FakeCatalog,
    pub injuries: FakeInjuryStore,
    pub history: FakeHistoryStore,
    pub phase: FakePhaseStore,
    pub volumes: FakeVolumeStore,
    pub preferences: FakePreferenceStore,
    pub recovery_data: FakeRecoveryData,
    pub scores: Arc<InMemoryScoreRepository>,
    pub feedback: Arc<RecordingFeedbackStore>,
}

impl StoreBuilder {
    pub fn new(catalog: Vec<Exercise>) -> Self {
        Self {
            catalog: FakeCatalog { exercises: catalog },
            injuries: FakeInjuryStore::default(),
            history: FakeHistoryStore::default(),
            phase: FakePhaseStore::default(),
            volumes: FakeVolumeStore::default(),
            preferences: FakePreferenceStore::default(),
            recovery_data: FakeRecoveryData::default(),
            scores: Arc::new(InMemoryScoreRepository::default()),
            feedback: Arc::new(RecordingFeedbackStore::default()),
        }
    }

    pub fn build(self) -> CollaboratorStores {
        CollaboratorStores {
            catalog: Arc::new(self.catalog),
            injuries: Arc::new(self.injuries),
            history: Arc::new(self.history),
            phases: Arc::new(self.phase),
            muscle_volumes: Arc::new(self.volumes),
            preferences: Arc::new(self.preferences),
            recovery_data: Arc::new(self.recovery_data),
            recovery_scores: self.scores,
            feedback: self.feedback,
        }
    }
}

// ABOUTME: Prescription orchestrator wiring the scoring pipeline to collaborator stores
// ABOUTME: Concurrent context fan-out, pipeline sequencing, result assembly, feedback append
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Prescription Orchestrator
//!
//! Gathers the request context from the collaborator stores concurrently,
//! runs the scorer, selector, adjuster, and satellite generator in sequence,
//! and assembles the final [`PrescriptionResult`].
//!
//! Catalog, injury, history, muscle-volume, and preference fetches are
//! critical: their failure aborts the request. The training-phase and
//! recovery fetches degrade to absence. The feedback append is
//! fire-and-forget: never on the critical path, its failure is logged and
//! swallowed.

use crate::adjustment::RecoveryAdjuster;
use crate::config::PrescriptionConfig;
use crate::errors::{EngineError, EngineResult};
use crate::models::{
    IntensityLevel, PrescriptionMetadata, PrescriptionRequest, PrescriptionResult, RecoveryScore,
    ScoredExercise, WorkoutDifficulty, WorkoutHistoryEntry,
};
use crate::recovery::RecoveryScoreCalculator;
use crate::scoring::{ExerciseScorer, ScoringContext};
use crate::selection::ExerciseSelector;
use crate::stores::{
    ExerciseCatalog, FeedbackStore, InjuryStore, MuscleVolumeStore, PreferenceStore,
    RecoveryDataSource, RecoveryScoreRepository, TrainingPhaseStore, WorkoutHistoryStore,
};
use crate::warmup::WarmupCooldownGenerator;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Version tag recorded with every prescription for offline tuning
pub const ALGORITHM_VERSION: &str = "1.0.0";

/// Fixed lookback for per-exercise history aggregates, days
const HISTORY_WINDOW_DAYS: u32 = 30;
/// Fixed lookback for per-muscle volume aggregates, days
const MUSCLE_VOLUME_WINDOW_DAYS: u32 = 14;

/// The collaborator stores the engine reads from and writes to
#[derive(Clone)]
pub struct CollaboratorStores {
    /// Exercise catalog
    pub catalog: Arc<dyn ExerciseCatalog>,
    /// Injury profiles
    pub injuries: Arc<dyn InjuryStore>,
    /// Workout history aggregates
    pub history: Arc<dyn WorkoutHistoryStore>,
    /// Periodization phases
    pub phases: Arc<dyn TrainingPhaseStore>,
    /// Per-muscle training volume
    pub muscle_volumes: Arc<dyn MuscleVolumeStore>,
    /// User exercise preferences
    pub preferences: Arc<dyn PreferenceStore>,
    /// Physiological recovery inputs
    pub recovery_data: Arc<dyn RecoveryDataSource>,
    /// Recovery score TTL cache
    pub recovery_scores: Arc<dyn RecoveryScoreRepository>,
    /// Write-only feedback sink
    pub feedback: Arc<dyn FeedbackStore>,
}

/// Adaptive exercise prescription engine
///
/// Stateless between requests: every prescription is computed fresh from
/// the stores, and nothing here mutates after construction.
pub struct PrescriptionEngine {
    stores: CollaboratorStores,
    calculator: RecoveryScoreCalculator,
    scorer: ExerciseScorer,
    selector: ExerciseSelector,
    adjuster: RecoveryAdjuster,
    satellites: WarmupCooldownGenerator,
    seconds_per_rep: f64,
}

impl PrescriptionEngine {
    /// Build an engine over the given stores and configuration
    #[must_use]
    pub fn new(stores: CollaboratorStores, config: PrescriptionConfig) -> Self {
        let calculator = RecoveryScoreCalculator::new(
            Arc::clone(&stores.recovery_data),
            Arc::clone(&stores.recovery_scores),
            config.recovery,
        );
        let satellites =
            WarmupCooldownGenerator::new(Arc::clone(&stores.catalog), config.satellites);
        Self {
            calculator,
            scorer: ExerciseScorer::new(config.weights, config.volume.clone()),
            selector: ExerciseSelector::new(config.selector),
            adjuster: RecoveryAdjuster::new(config.adjustment),
            satellites,
            seconds_per_rep: config.volume.seconds_per_rep,
            stores,
        }
    }

    /// Generate a prescription for the request
    ///
    /// A request that yields zero eligible exercises (recovery demands
    /// rest, or filters eliminate everything) returns a well-formed empty
    /// result with difficulty `easy`, not an error.
    ///
    /// # Errors
    /// Fails when the request is invalid or a critical store (catalog,
    /// injuries, history, muscle volume, preferences) cannot be read.
    pub async fn prescribe(
        &self,
        request: &PrescriptionRequest,
    ) -> EngineResult<PrescriptionResult> {
        let context = &request.context;
        if context.time_available_minutes == 0 {
            return Err(EngineError::InvalidRequest(
                "time_available_minutes must be positive".to_owned(),
            ));
        }
        let user_id = context.user_id;
        debug!(%user_id, minutes = context.time_available_minutes, "generating prescription");

        let (candidates, injuries, history, phase, muscle_volumes, preferences, recovery) = tokio::join!(
            self.stores.catalog.find_candidates(
                &context.equipment,
                context.location,
                context.experience_level.max_difficulty(),
            ),
            self.stores.injuries.current_injuries(user_id),
            self.stores.history.recent_history(user_id, HISTORY_WINDOW_DAYS),
            self.stores.phases.current_phase(user_id),
            self.stores
                .muscle_volumes
                .volume_by_muscle(user_id, MUSCLE_VOLUME_WINDOW_DAYS),
            self.stores.preferences.preferences(user_id),
            self.calculator
                .calculate(user_id, request.force_recovery_recalculation),
        );

        let candidates = candidates.map_err(|e| EngineError::critical("catalog", e))?;
        let injuries = injuries.map_err(|e| EngineError::critical("injuries", e))?;
        let history = history.map_err(|e| EngineError::critical("history", e))?;
        let muscle_volumes =
            muscle_volumes.map_err(|e| EngineError::critical("muscle volumes", e))?;
        let preferences = preferences.map_err(|e| EngineError::critical("preferences", e))?;
        let phase = match phase {
            Ok(phase) => phase,
            Err(e) => {
                warn!(%user_id, error = %e, "training phase fetch failed; proceeding without");
                None
            }
        };
        let recovery = match recovery {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(%user_id, error = %e, "recovery score unavailable; degrading to neutral");
                None
            }
        };

        let history: HashMap<Uuid, WorkoutHistoryEntry> = history
            .into_iter()
            .map(|entry| (entry.exercise_id, entry))
            .collect();
        let scoring_ctx = ScoringContext {
            user: context,
            injuries: &injuries,
            history: &history,
            phase: phase.as_ref(),
            muscle_volumes: &muscle_volumes,
            preferences: &preferences,
            recovery: recovery.as_ref(),
            target_muscles: request.target_muscles.as_deref(),
            excluded_muscles: &request.excluded_muscles,
            now: Utc::now(),
        };

        let ranked = self.scorer.rank(&candidates, &scoring_ctx);
        debug!(
            candidates = candidates.len(),
            eligible = ranked.len(),
            "scored candidate catalog"
        );
        let selected = self.selector.select(
            ranked,
            context.time_available_minutes,
            request.max_exercises,
            phase.as_ref(),
            recovery.as_ref(),
        );
        let exercises = self.adjuster.adjust(selected, recovery.as_ref());

        let (warmup, cooldown) = if exercises.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let warmup = self
                .satellites
                .warmup(&exercises)
                .await
                .map_err(|e| EngineError::critical("catalog", e))?;
            let cooldown = self
                .satellites
                .cooldown(&exercises)
                .await
                .map_err(|e| EngineError::critical("catalog", e))?;
            (warmup, cooldown)
        };

        let result = self.assemble(request, exercises, warmup, cooldown, recovery, phase);
        info!(
            %user_id,
            plan = %result.id,
            exercises = result.exercises.len(),
            difficulty = ?result.difficulty,
            "prescription generated"
        );

        self.record_feedback(result.clone());
        Ok(result)
    }

    fn assemble(
        &self,
        request: &PrescriptionRequest,
        exercises: Vec<ScoredExercise>,
        warmup: Vec<ScoredExercise>,
        cooldown: Vec<ScoredExercise>,
        recovery: Option<RecoveryScore>,
        phase: Option<crate::models::TrainingPhase>,
    ) -> PrescriptionResult {
        let mut muscle_coverage: BTreeMap<String, u32> = BTreeMap::new();
        for exercise in &exercises {
            let volume = exercise.sets * exercise.reps;
            for muscle in &exercise.primary_muscles {
                *muscle_coverage.entry(muscle.clone()).or_insert(0) += volume;
            }
        }

        let total_duration_minutes = self.estimate_duration(&exercises, &warmup, &cooldown);
        let difficulty = Self::derive_difficulty(&exercises, recovery.as_ref());

        let mut factors_considered = vec![
            "equipment".to_owned(),
            "goals".to_owned(),
            "muscle_balance".to_owned(),
            "training_history".to_owned(),
            "injuries".to_owned(),
            "preferences".to_owned(),
        ];
        if phase.is_some() {
            factors_considered.push("periodization".to_owned());
        }
        if recovery.is_some() {
            factors_considered.push("recovery_score".to_owned());
        }

        PrescriptionResult {
            id: Uuid::new_v4(),
            user_id: request.context.user_id,
            exercises,
            warmup,
            cooldown,
            total_duration_minutes,
            muscle_coverage,
            periodization_phase: phase.map(|p| p.phase_type),
            difficulty,
            metadata: PrescriptionMetadata {
                algorithm_version: ALGORITHM_VERSION.to_owned(),
                generated_at: Utc::now(),
                factors_considered,
                recovery_score: recovery.as_ref().map(|r| r.score),
                recovery_recommendation: recovery.as_ref().map(|r| r.recommended_intensity),
            },
        }
    }

    /// Per-exercise time model summed across main work and satellites
    fn estimate_duration(
        &self,
        exercises: &[ScoredExercise],
        warmup: &[ScoredExercise],
        cooldown: &[ScoredExercise],
    ) -> u32 {
        let seconds: f64 = exercises
            .iter()
            .chain(warmup)
            .chain(cooldown)
            .map(|e| {
                f64::from(e.sets)
                    * (f64::from(e.reps) * self.seconds_per_rep + f64::from(e.rest_seconds))
            })
            .sum();
        (seconds / 60.0).ceil() as u32
    }

    /// Plan-level difficulty from the recovery recommendation when present,
    /// otherwise from the mean catalog difficulty of the selected work
    fn derive_difficulty(
        exercises: &[ScoredExercise],
        recovery: Option<&RecoveryScore>,
    ) -> WorkoutDifficulty {
        if exercises.is_empty() {
            return WorkoutDifficulty::Easy;
        }
        let mean = exercises.iter().map(|e| f64::from(e.difficulty)).sum::<f64>()
            / exercises.len() as f64;
        match recovery.map(|r| r.recommended_intensity) {
            Some(IntensityLevel::Rest | IntensityLevel::Light) => WorkoutDifficulty::Easy,
            Some(IntensityLevel::Moderate) => WorkoutDifficulty::Moderate,
            Some(IntensityLevel::High) => WorkoutDifficulty::Intense,
            Some(IntensityLevel::Normal) => {
                if mean >= 3.0 {
                    WorkoutDifficulty::Intense
                } else {
                    WorkoutDifficulty::Moderate
                }
            }
            None => {
                if mean < 2.5 {
                    WorkoutDifficulty::Easy
                } else if mean < 3.5 {
                    WorkoutDifficulty::Moderate
                } else {
                    WorkoutDifficulty::Intense
                }
            }
        }
    }

    /// Fire-and-forget feedback append; failure is logged, never surfaced
    fn record_feedback(&self, result: PrescriptionResult) {
        let feedback = Arc::clone(&self.stores.feedback);
        tokio::spawn(async move {
            if let Err(e) = feedback.record(&result).await {
                warn!(plan = %result.id, error = %e, "feedback store append failed");
            }
        });
    }
}

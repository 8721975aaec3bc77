// ABOUTME: Greedy diversity-constrained exercise selection under a time-derived budget
// ABOUTME: Applies deload and recovery-state budget cuts, including the rest-day short circuit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise Selector
//!
//! Turns the ranked candidate list into the final main-exercise list. The
//! budget derives from available time, shrinks under deload phases and
//! compromised recovery, and a `rest` recommendation short-circuits to an
//! empty plan. The pick itself is greedy with a muscle-diversity constraint;
//! it does not backtrack and makes no optimality claim.

use crate::config::SelectorConfig;
use crate::models::{
    IntensityLevel, PhaseType, RecoveryClassification, RecoveryScore, ScoredExercise,
    TrainingPhase,
};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Budgeted, diversity-constrained exercise selector
pub struct ExerciseSelector {
    config: SelectorConfig,
}

impl ExerciseSelector {
    /// Build a selector with the given budget and diversity limits
    #[must_use]
    pub const fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Select the main exercises from the ranked candidates
    ///
    /// Candidates must arrive ranked descending by score; under poor or fair
    /// recovery they are re-sorted to bias toward gentler movements before
    /// the greedy pick runs.
    #[must_use]
    pub fn select(
        &self,
        candidates: Vec<ScoredExercise>,
        time_available_minutes: u32,
        max_exercises_override: Option<usize>,
        phase: Option<&TrainingPhase>,
        recovery: Option<&RecoveryScore>,
    ) -> Vec<ScoredExercise> {
        if let Some(score) = recovery {
            if score.recommended_intensity == IntensityLevel::Rest {
                debug!("recovery recommends rest; returning empty selection");
                return Vec::new();
            }
        }

        let budget = self.budget(time_available_minutes, max_exercises_override, phase, recovery);
        let ordered = Self::order_candidates(candidates, recovery);
        self.greedy_pick(ordered, budget)
    }

    /// Exercise-count budget after time, phase, and recovery cuts
    ///
    /// An explicit override wins outright: no phase or recovery cut touches
    /// it. Only the rest short circuit can still empty the plan.
    fn budget(
        &self,
        time_available_minutes: u32,
        max_exercises_override: Option<usize>,
        phase: Option<&TrainingPhase>,
        recovery: Option<&RecoveryScore>,
    ) -> usize {
        if let Some(override_count) = max_exercises_override {
            return override_count;
        }

        let cfg = &self.config;
        let base = (time_available_minutes / cfg.minutes_per_exercise) as usize;
        let mut budget = base.clamp(cfg.min_exercises, cfg.max_exercises);
        if phase.is_some_and(|p| p.phase_type == PhaseType::Deload) {
            budget = ((budget as f64 * cfg.deload_factor).floor() as usize).max(cfg.deload_min);
        }

        match recovery.map(|r| r.classification) {
            Some(RecoveryClassification::Poor) => {
                budget = ((budget as f64 * cfg.poor_recovery_factor).floor() as usize)
                    .max(cfg.poor_recovery_min);
            }
            Some(RecoveryClassification::Fair) => {
                budget = ((budget as f64 * cfg.fair_recovery_factor).floor() as usize)
                    .max(cfg.fair_recovery_min);
            }
            _ => {}
        }
        budget
    }

    /// Under poor or fair recovery, re-sort by the recovery-fit sub-score
    /// first and total score second; otherwise keep the incoming ranking
    fn order_candidates(
        mut candidates: Vec<ScoredExercise>,
        recovery: Option<&RecoveryScore>,
    ) -> Vec<ScoredExercise> {
        let compromised = matches!(
            recovery.map(|r| r.classification),
            Some(RecoveryClassification::Poor | RecoveryClassification::Fair)
        );
        if compromised {
            candidates.sort_by(|a, b| {
                b.breakdown
                    .recovery_fit
                    .partial_cmp(&a.breakdown.recovery_fit)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| {
                        b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
                    })
            });
        }
        candidates
    }

    /// Greedy pick: early picks may repeat muscles freely; once
    /// `free_overlap_picks` are accepted, a candidate covering zero new
    /// muscles is skipped
    fn greedy_pick(&self, candidates: Vec<ScoredExercise>, budget: usize) -> Vec<ScoredExercise> {
        let mut selected: Vec<ScoredExercise> = Vec::with_capacity(budget);
        let mut covered: HashSet<String> = HashSet::new();

        for candidate in candidates {
            if selected.len() >= budget {
                break;
            }
            let adds_new_muscle = candidate
                .primary_muscles
                .iter()
                .any(|m| !covered.contains(m));
            if !adds_new_muscle && selected.len() >= self.config.free_overlap_picks {
                continue;
            }
            covered.extend(candidate.primary_muscles.iter().cloned());
            selected.push(candidate);
        }
        selected
    }
}

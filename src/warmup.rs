// ABOUTME: Warmup and cooldown satellite list generation around the main selection
// ABOUTME: Small catalog-sourced lists targeting the same muscles, scored nominally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Warmup/Cooldown Generator
//!
//! Derives small preparatory and restorative exercise lists targeting the
//! union of the main selection's primary muscles. Satellites are not run
//! through the weighted scorer: they get a fixed nominal score and fixed
//! low-volume set/rep/rest values, because their purpose is preparation and
//! downshift, not performance ranking.

use crate::config::SatelliteConfig;
use crate::errors::StoreError;
use crate::models::{Exercise, ExerciseType, ScoreBreakdown, ScoredExercise};
use crate::stores::ExerciseCatalog;
use std::collections::BTreeSet;
use std::sync::Arc;

const WARMUP_TYPES: [ExerciseType; 3] = [
    ExerciseType::Mobility,
    ExerciseType::Warmup,
    ExerciseType::Activation,
];
const COOLDOWN_TYPES: [ExerciseType; 2] = [ExerciseType::Stretching, ExerciseType::Cooldown];

/// Catalog-backed warmup/cooldown list generator
pub struct WarmupCooldownGenerator {
    catalog: Arc<dyn ExerciseCatalog>,
    config: SatelliteConfig,
}

impl WarmupCooldownGenerator {
    /// Build a generator over the given catalog
    #[must_use]
    pub fn new(catalog: Arc<dyn ExerciseCatalog>, config: SatelliteConfig) -> Self {
        Self { catalog, config }
    }

    /// Warmup list for the given main selection
    ///
    /// # Errors
    /// Propagates catalog query failures.
    pub async fn warmup(
        &self,
        main_selection: &[ScoredExercise],
    ) -> Result<Vec<ScoredExercise>, StoreError> {
        let muscles = Self::muscle_union(main_selection);
        if muscles.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .catalog
            .find_by_types(&WARMUP_TYPES, &muscles, self.config.warmup_count)
            .await?;
        Ok(found
            .into_iter()
            .map(|ex| {
                self.satellite(
                    ex,
                    self.config.warmup_sets,
                    self.config.warmup_reps,
                    self.config.warmup_rest_seconds,
                )
            })
            .collect())
    }

    /// Cooldown list for the given main selection
    ///
    /// # Errors
    /// Propagates catalog query failures.
    pub async fn cooldown(
        &self,
        main_selection: &[ScoredExercise],
    ) -> Result<Vec<ScoredExercise>, StoreError> {
        let muscles = Self::muscle_union(main_selection);
        if muscles.is_empty() {
            return Ok(Vec::new());
        }
        let found = self
            .catalog
            .find_by_types(&COOLDOWN_TYPES, &muscles, self.config.cooldown_count)
            .await?;
        Ok(found
            .into_iter()
            .map(|ex| {
                self.satellite(
                    ex,
                    self.config.cooldown_sets,
                    self.config.cooldown_reps,
                    self.config.cooldown_rest_seconds,
                )
            })
            .collect())
    }

    /// Sorted union keeps the catalog query deterministic across runs
    fn muscle_union(selection: &[ScoredExercise]) -> Vec<String> {
        let set: BTreeSet<&str> = selection
            .iter()
            .flat_map(|s| s.primary_muscles.iter())
            .map(String::as_str)
            .collect();
        set.into_iter().map(str::to_owned).collect()
    }

    fn satellite(&self, exercise: Exercise, sets: u32, reps: u32, rest: u32) -> ScoredExercise {
        ScoredExercise {
            exercise_id: exercise.id,
            name: exercise.name,
            exercise_type: exercise.exercise_type,
            difficulty: exercise.difficulty,
            score: self.config.nominal_score,
            breakdown: ScoreBreakdown::default(),
            sets,
            reps,
            rest_seconds: rest,
            notes: None,
            primary_muscles: exercise.primary_muscles,
        }
    }
}

// ABOUTME: Recovery-driven rescaling of a selected plan's sets, reps, and rest
// ABOUTME: Applies the intensity multiplier and annotates each exercise with a recovery note
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recovery Adjuster
//!
//! Rescales the selected exercises by the intensity multiplier implied by
//! the recovery recommendation. A missing recovery score makes this a no-op
//! (multiplier 1.0), and a `rest` recommendation empties the plan here too,
//! mirroring the selector's short circuit.

use crate::config::AdjustmentConfig;
use crate::models::{IntensityLevel, RecoveryClassification, RecoveryScore, ScoredExercise};

/// Recovery-driven plan adjuster
pub struct RecoveryAdjuster {
    config: AdjustmentConfig,
}

impl RecoveryAdjuster {
    /// Build an adjuster with the given floors and rest scalers
    #[must_use]
    pub const fn new(config: AdjustmentConfig) -> Self {
        Self { config }
    }

    /// Volume multiplier implied by a recommended intensity
    #[must_use]
    pub const fn intensity_multiplier(intensity: IntensityLevel) -> f64 {
        match intensity {
            IntensityLevel::Rest => 0.0,
            IntensityLevel::Light => 0.5,
            IntensityLevel::Moderate => 0.75,
            IntensityLevel::Normal => 1.0,
            IntensityLevel::High => 1.1,
        }
    }

    /// Rescale the selected plan by the recovery state
    ///
    /// Sets floor at the configured minimum after scaling, reps round with
    /// their own floor, and rest seconds stretch under poor recovery or
    /// tighten under excellent recovery. The appended note never overwrites
    /// guidance accumulated earlier in the pipeline.
    #[must_use]
    pub fn adjust(
        &self,
        selected: Vec<ScoredExercise>,
        recovery: Option<&RecoveryScore>,
    ) -> Vec<ScoredExercise> {
        let Some(score) = recovery else {
            return selected;
        };
        if score.recommended_intensity == IntensityLevel::Rest {
            return Vec::new();
        }

        let multiplier = Self::intensity_multiplier(score.recommended_intensity);
        let rest_scale = match score.classification {
            RecoveryClassification::Poor => self.config.poor_rest_scale,
            RecoveryClassification::Excellent => self.config.excellent_rest_scale,
            _ => 1.0,
        };
        let note = format!(
            "[recovery {}: {:?} intensity applied]",
            score.score, score.recommended_intensity
        )
        .to_lowercase();

        selected
            .into_iter()
            .map(|mut exercise| {
                exercise.sets = ((f64::from(exercise.sets) * multiplier).floor() as u32)
                    .max(self.config.min_sets);
                exercise.reps = ((f64::from(exercise.reps) * multiplier).round() as u32)
                    .max(self.config.min_reps);
                exercise.rest_seconds =
                    (f64::from(exercise.rest_seconds) * rest_scale).round() as u32;
                exercise.notes = Some(match exercise.notes.take() {
                    Some(existing) => format!("{existing} {note}"),
                    None => note.clone(),
                });
                exercise
            })
            .collect()
    }
}

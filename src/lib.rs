// ABOUTME: Main library entry point for the Pierre adaptive exercise prescription engine
// ABOUTME: Recovery scoring, multi-factor exercise scoring, and time-boxed workout selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Prescription Engine
//!
//! Adaptive exercise prescription for the Pierre fitness platform. Turns a
//! user's physical state, equipment, goals, injury history, and training
//! history into a ranked, time-boxed, risk-adjusted workout plan.
//!
//! The pipeline has two coupled halves:
//!
//! - **Recovery scoring** ([`recovery::RecoveryScoreCalculator`]): a 0-100
//!   physiological recovery estimate from sleep, rest-day history, and an
//!   optional HRV signal, classified into five tiers with a recommended
//!   training intensity.
//! - **Exercise scoring and selection** ([`scoring::ExerciseScorer`],
//!   [`selection::ExerciseSelector`]): an eight-term weighted score over the
//!   candidate catalog, followed by a greedy, muscle-diverse pick under a
//!   time budget, rescaled by the recovery state.
//!
//! [`engine::PrescriptionEngine`] orchestrates both halves: it fans out the
//! context reads to the collaborator stores, runs the pipeline, and appends
//! the result to the feedback store for offline tuning.
//!
//! All per-request state is recomputed from recent history; the engine holds
//! no long-lived mutable user model.

/// Recovery-driven set/rep/rest rescaling of a selected plan
pub mod adjustment;
/// Weight, threshold, and limit configuration with defaults
pub mod config;
/// Prescription orchestrator wiring the pipeline to collaborator stores
pub mod engine;
/// Engine and store error types
pub mod errors;
/// Domain data model shared across the pipeline
pub mod models;
/// Recovery score calculation and classification
pub mod recovery;
/// Multi-factor exercise scoring
pub mod scoring;
/// Budgeted, diversity-constrained exercise selection
pub mod selection;
/// Collaborator store traits (catalog, history, injuries, preferences, ...)
pub mod stores;
/// Warmup and cooldown satellite list generation
pub mod warmup;

pub use adjustment::RecoveryAdjuster;
pub use config::PrescriptionConfig;
pub use engine::{CollaboratorStores, PrescriptionEngine, ALGORITHM_VERSION};
pub use errors::{EngineError, EngineResult, StoreError};
pub use models::{
    PrescriptionRequest, PrescriptionResult, RecoveryClassification, RecoveryScore,
    ScoredExercise,
};
pub use recovery::RecoveryScoreCalculator;
pub use scoring::ExerciseScorer;
pub use selection::ExerciseSelector;
pub use warmup::WarmupCooldownGenerator;

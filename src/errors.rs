// ABOUTME: Error types for the prescription engine and its collaborator stores
// ABOUTME: Distinguishes critical store failures from tolerated missing-data conditions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error handling for the prescription engine.
//!
//! Missing optional data (no sleep log, no HRV, no training phase, no cached
//! recovery score) is never an error; those conditions resolve to documented
//! defaults inside the calculators. Errors here cover the cases where the
//! pipeline genuinely cannot proceed: a critical collaborator store failed or
//! the request itself is malformed.

use thiserror::Error;

/// Failure reported by a collaborator store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend reachable but the query failed
    #[error("store query failed: {0}")]
    Query(String),

    /// Backend unreachable or timed out
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded into the domain model
    #[error("stored data malformed: {0}")]
    Corrupt(String),
}

/// Request-level failure of the prescription pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store the scorer cannot run without failed (catalog, injuries,
    /// history, muscle volume, preferences)
    #[error("critical {store} fetch failed: {source}")]
    CriticalFetch {
        /// Which collaborator failed
        store: &'static str,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// The request inputs are invalid (e.g. non-positive time budget)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience result alias used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Wrap a store failure for a critical collaborator
    #[must_use]
    pub const fn critical(store: &'static str, source: StoreError) -> Self {
        Self::CriticalFetch { store, source }
    }
}

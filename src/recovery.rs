// ABOUTME: Recovery score calculation from sleep, rest patterns, and optional HRV signal
// ABOUTME: Classifies 0-100 scores into five tiers and derives a recommended training intensity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recovery Score Calculator
//!
//! Computes a 0-100 recovery score from sleep duration and quality, rest-day
//! history, an optional HRV deviation bonus, and sleep-schedule consistency.
//! Missing data never fails the calculation: each absent component resolves
//! to a documented neutral default, so "no data" does not read as "poor
//! recovery".
//!
//! Scores are cached with a 24-hour TTL through [`RecoveryScoreRepository`];
//! recomputation is idempotent, so a cache-write race is harmless.

use crate::config::RecoveryConfig;
use crate::errors::EngineResult;
use crate::models::{
    HrvSample, IntensityLevel, RecoveryClassification, RecoveryFactors, RecoveryScore,
    RecoveryTrend, RestPattern, SleepRecord, SleepScheduleGoal,
};
use crate::stores::{RecoveryDataSource, RecoveryScoreRepository};
use chrono::{Duration, Timelike, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Recovery score calculator with TTL-cached results
pub struct RecoveryScoreCalculator {
    data: Arc<dyn RecoveryDataSource>,
    repository: Arc<dyn RecoveryScoreRepository>,
    config: RecoveryConfig,
}

impl RecoveryScoreCalculator {
    /// Build a calculator over the given physiological data source and
    /// score repository
    #[must_use]
    pub fn new(
        data: Arc<dyn RecoveryDataSource>,
        repository: Arc<dyn RecoveryScoreRepository>,
        config: RecoveryConfig,
    ) -> Self {
        Self {
            data,
            repository,
            config,
        }
    }

    /// Calculate the user's current recovery score
    ///
    /// Returns a cached score while its TTL holds unless `force` is set.
    /// Every optional input (sleep record, rest pattern, HRV, schedule goal)
    /// degrades to its neutral default when missing or when its store read
    /// fails; the cache write is best-effort.
    ///
    /// # Errors
    /// Currently infallible in practice; the `Result` surface is kept so
    /// callers do not change when a critical input is introduced.
    pub async fn calculate(&self, user_id: Uuid, force: bool) -> EngineResult<RecoveryScore> {
        if !force {
            match self.repository.fresh(user_id).await {
                Ok(Some(cached)) => {
                    debug!(%user_id, score = cached.score, "recovery score cache hit");
                    return Ok(cached);
                }
                Ok(None) => {}
                Err(e) => warn!(%user_id, error = %e, "recovery score cache read failed"),
            }
        }

        let (sleep, rest, hrv, schedule) = tokio::join!(
            self.data.latest_sleep(user_id),
            self.data.rest_pattern(user_id),
            self.data.hrv_sample(user_id),
            self.data.sleep_schedule_goal(user_id),
        );
        let sleep = Self::tolerate(sleep, user_id, "sleep record");
        let rest = Self::tolerate(rest, user_id, "rest pattern");
        let hrv = Self::tolerate(hrv, user_id, "hrv sample");
        let schedule = Self::tolerate(schedule, user_id, "sleep schedule goal");

        let score = self.assemble(user_id, sleep, rest, hrv, schedule).await;

        if let Err(e) = self.repository.put(&score).await {
            warn!(%user_id, error = %e, "recovery score cache write failed");
        }
        Ok(score)
    }

    fn tolerate<T>(
        fetched: Result<Option<T>, crate::errors::StoreError>,
        user_id: Uuid,
        what: &str,
    ) -> Option<T> {
        match fetched {
            Ok(value) => value,
            Err(e) => {
                warn!(%user_id, error = %e, "{what} fetch failed; treating as absent");
                None
            }
        }
    }

    async fn assemble(
        &self,
        user_id: Uuid,
        sleep: Option<SleepRecord>,
        rest: Option<RestPattern>,
        hrv: Option<HrvSample>,
        schedule: Option<SleepScheduleGoal>,
    ) -> RecoveryScore {
        let cfg = &self.config;

        let (sleep_duration_score, sleep_quality_score, sleep_detail) =
            Self::score_sleep(sleep.as_ref(), cfg);
        let (rest_days_score, strain_penalty, rest_detail) =
            Self::score_rest_days(rest.as_ref(), cfg);
        let (hrv_bonus, hrv_detail) = Self::score_hrv(hrv.as_ref(), cfg);
        let consistency_bonus = Self::score_consistency(schedule.as_ref(), sleep.as_ref(), cfg);

        let factors = RecoveryFactors {
            sleep_duration_score,
            sleep_quality_score,
            rest_days_score,
            hrv_bonus,
            strain_penalty,
            consistency_bonus,
            sleep_detail: Some(sleep_detail),
            rest_detail: Some(rest_detail),
            hrv_detail,
        };
        let score = factors.component_sum().clamp(0.0, 100.0).round() as u8;

        let trend = match self
            .repository
            .recent_scores(user_id, cfg.trend_window_days)
            .await
        {
            Ok(history) => {
                let values: Vec<f64> = history.iter().map(|s| f64::from(s.score)).collect();
                Self::compute_trend(&values, cfg)
            }
            Err(e) => {
                warn!(%user_id, error = %e, "score history fetch failed; omitting trend");
                None
            }
        };

        let strained = strain_penalty.is_some();
        let mut data_sources = Vec::new();
        if sleep.is_some() {
            data_sources.push("sleep".to_owned());
        }
        if rest.is_some() {
            data_sources.push("rest_pattern".to_owned());
        }
        if hrv_bonus.is_some() {
            data_sources.push("hrv".to_owned());
        }
        if consistency_bonus.is_some() {
            data_sources.push("schedule_goal".to_owned());
        }
        if trend.is_some() {
            data_sources.push("score_history".to_owned());
        }

        let now = Utc::now();
        RecoveryScore {
            id: Uuid::new_v4(),
            user_id,
            score,
            classification: Self::classify(score),
            factors,
            recommended_intensity: Self::recommend_intensity(score),
            recommended_workout_types: Self::recommend_workout_types(score, strained),
            trend,
            calculated_at: now,
            expires_at: now + Duration::hours(cfg.cache_ttl_hours),
            data_sources,
        }
    }

    /// Score sleep duration and quality for the most recent night
    ///
    /// Duration scales linearly above the minimum-hours floor up to a cap at
    /// the target; a missing record earns 50% of each maximum rather than
    /// zero.
    #[must_use]
    pub fn score_sleep(sleep: Option<&SleepRecord>, config: &RecoveryConfig) -> (f64, f64, String) {
        let Some(record) = sleep else {
            return (
                config.sleep_duration_default,
                config.sleep_quality_default,
                "no sleep record; neutral defaults applied".to_owned(),
            );
        };

        let duration = if record.hours_slept < config.sleep_min_hours {
            0.0
        } else {
            ((record.hours_slept - config.sleep_min_hours) * config.sleep_points_per_hour)
                .min(config.sleep_duration_max)
        };
        let quality = record.quality_rating.map_or(config.sleep_quality_default, |r| {
            (f64::from(r) * config.sleep_quality_points_per_rating).min(config.sleep_quality_max)
        });
        let detail = match record.quality_rating {
            Some(r) => format!("slept {:.1}h, quality {r}/5", record.hours_slept),
            None => format!("slept {:.1}h, quality not rated", record.hours_slept),
        };
        (duration, quality, detail)
    }

    /// Score the rest-day pattern
    ///
    /// Returns the positive rest-days component, the strain penalty when
    /// training density is unsustainable, and a human-readable detail. The
    /// optimal window is 1-2 full days since the last workout; longer gaps
    /// decay toward zero.
    #[must_use]
    pub fn score_rest_days(
        rest: Option<&RestPattern>,
        config: &RecoveryConfig,
    ) -> (f64, Option<f64>, String) {
        let Some(pattern) = rest else {
            return (
                config.rest_days_default,
                None,
                "no recent training history; half credit applied".to_owned(),
            );
        };

        let days = pattern.days_since_last_workout;
        let weekly = pattern.workouts_last_7_days;
        if days == 0 && weekly >= config.strain_weekly_workouts {
            return (
                0.0,
                Some(config.strain_penalty),
                format!("trained today with {weekly} workouts this week; strain penalty applied"),
            );
        }
        let score = match days {
            0 => config.rest_days_max / 2.0,
            1 | 2 => config.rest_days_max,
            d => (config.rest_days_max - config.detraining_decay_per_day * f64::from(d - 2))
                .max(0.0),
        };
        (
            score,
            None,
            format!("{days} day(s) since last workout, {weekly} workouts this week"),
        )
    }

    /// Score HRV deviation from the 30-day rolling baseline
    ///
    /// Readings at or above the outlier cutoff are dropped before the
    /// baseline mean is taken; without a current reading and a usable
    /// baseline the bonus is absent entirely.
    #[must_use]
    pub fn score_hrv(
        hrv: Option<&HrvSample>,
        config: &RecoveryConfig,
    ) -> (Option<f64>, Option<String>) {
        let Some(sample) = hrv else {
            return (None, None);
        };
        let baseline: Vec<f64> = sample
            .baseline_readings
            .iter()
            .copied()
            .filter(|&r| r < config.hrv_outlier_cutoff)
            .collect();
        if baseline.is_empty() {
            return (None, None);
        }
        let mean = baseline.iter().sum::<f64>() / baseline.len() as f64;
        if mean <= 0.0 {
            return (None, None);
        }

        let ratio = sample.current / mean;
        let bonus = if ratio >= config.hrv_high_ratio {
            config.hrv_bonus_high
        } else if ratio >= config.hrv_normal_ratio {
            config.hrv_bonus_normal
        } else if ratio < config.hrv_low_ratio {
            config.hrv_penalty_low
        } else {
            0.0
        };
        let detail = format!(
            "hrv {:.1} vs {:.1} baseline ({:.0}%)",
            sample.current,
            mean,
            ratio * 100.0
        );
        (Some(bonus), Some(detail))
    }

    /// Score bedtime consistency against an active sleep-schedule goal
    ///
    /// Requires both the goal and a same-night sleep record with a tracked
    /// bedtime; the deviation is circular so a target near midnight does not
    /// penalize an 11:50pm bedtime by a full day.
    #[must_use]
    pub fn score_consistency(
        goal: Option<&SleepScheduleGoal>,
        sleep: Option<&SleepRecord>,
        config: &RecoveryConfig,
    ) -> Option<f64> {
        let goal = goal?;
        let bedtime = sleep?.bedtime?;

        let actual = i64::from(bedtime.time().hour()) * 60 + i64::from(bedtime.time().minute());
        let target = i64::from(goal.target_bedtime.hour()) * 60
            + i64::from(goal.target_bedtime.minute());
        let raw = (actual - target).abs();
        let deviation = raw.min(MINUTES_PER_DAY - raw);

        if deviation <= config.consistency_tight_minutes {
            Some(config.consistency_bonus_full)
        } else if deviation <= config.consistency_loose_minutes {
            Some(config.consistency_bonus_partial)
        } else {
            Some(0.0)
        }
    }

    /// Classify a clamped score into the five-tier recovery classification
    #[must_use]
    pub const fn classify(score: u8) -> RecoveryClassification {
        match score {
            90.. => RecoveryClassification::Excellent,
            75.. => RecoveryClassification::Good,
            60.. => RecoveryClassification::Moderate,
            40.. => RecoveryClassification::Fair,
            _ => RecoveryClassification::Poor,
        }
    }

    /// Derive the recommended training intensity from a clamped score
    #[must_use]
    pub const fn recommend_intensity(score: u8) -> IntensityLevel {
        match score {
            85.. => IntensityLevel::High,
            70.. => IntensityLevel::Normal,
            50.. => IntensityLevel::Moderate,
            30.. => IntensityLevel::Light,
            _ => IntensityLevel::Rest,
        }
    }

    /// Ordered workout-type tags suited to the current recovery bracket
    ///
    /// `active_recovery` and `mobility` are prepended whenever the strain
    /// penalty fired, regardless of bracket.
    #[must_use]
    pub fn recommend_workout_types(score: u8, strained: bool) -> Vec<String> {
        let bracket: &[&str] = match score {
            75.. => &["strength", "hiit", "hypertrophy", "endurance"],
            60.. => &["hypertrophy", "endurance", "strength"],
            40.. => &["endurance", "mobility", "light_cardio"],
            _ => &["mobility", "stretching", "active_recovery"],
        };
        let mut types: Vec<String> = Vec::with_capacity(bracket.len() + 2);
        if strained {
            types.push("active_recovery".to_owned());
            types.push("mobility".to_owned());
        }
        for tag in bracket {
            if !types.iter().any(|t| t == tag) {
                types.push((*tag).to_owned());
            }
        }
        types
    }

    /// Week-over-half-week trend from historical scores, oldest first
    ///
    /// Splits the window chronologically in half and compares means; the
    /// recent half gets the extra point on odd counts. Omitted below the
    /// minimum point count.
    #[must_use]
    pub fn compute_trend(values: &[f64], config: &RecoveryConfig) -> Option<RecoveryTrend> {
        if values.len() < config.trend_min_points {
            return None;
        }
        let mid = values.len() / 2;
        let older = values[..mid].iter().sum::<f64>() / mid as f64;
        let recent = values[mid..].iter().sum::<f64>() / (values.len() - mid) as f64;
        let diff = recent - older;
        if diff > config.trend_epsilon {
            Some(RecoveryTrend::Improving)
        } else if diff < -config.trend_epsilon {
            Some(RecoveryTrend::Declining)
        } else {
            Some(RecoveryTrend::Stable)
        }
    }
}

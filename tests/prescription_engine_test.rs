// ABOUTME: End-to-end pipeline tests for the prescription engine over in-memory stores
// ABOUTME: Covers budgets, recovery overrides, hard exclusions, determinism, and degradation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::{
    bodyweight_exercise, gym_user, request_for, stored_recovery_score, strength_catalog,
    FailingPhaseStore, FailingPreferenceStore, StoreBuilder,
};
use pierre_prescription::config::PrescriptionConfig;
use pierre_prescription::errors::EngineError;
use pierre_prescription::models::{ExerciseType, IntensityLevel, WorkoutDifficulty};
use pierre_prescription::stores::RecoveryScoreRepository;
use pierre_prescription::PrescriptionEngine;
use std::sync::Arc;

fn engine(stores: pierre_prescription::CollaboratorStores) -> PrescriptionEngine {
    PrescriptionEngine::new(stores, PrescriptionConfig::default())
}

#[tokio::test]
async fn sixty_minutes_with_excellent_recovery_fills_a_ten_exercise_intense_plan() {
    let user = gym_user();
    let builder = StoreBuilder::new(strength_catalog(20));
    builder
        .scores
        .put(&stored_recovery_score(
            user.user_id,
            95,
            Utc::now() + Duration::hours(12),
        ))
        .await
        .unwrap();

    let result = engine(builder.build())
        .prescribe(&request_for(user))
        .await
        .unwrap();

    // clamp(floor(60/6), [4,12]) = 10, no recovery cut at excellent
    assert_eq!(result.exercises.len(), 10);
    assert_eq!(result.difficulty, WorkoutDifficulty::Intense);
    assert_eq!(result.metadata.recovery_score, Some(95));
    assert_eq!(
        result.metadata.recovery_recommendation,
        Some(IntensityLevel::High)
    );
    for exercise in &result.exercises {
        // strength rest 180s tightened x0.9 under excellent recovery
        assert_eq!(exercise.rest_seconds, 162);
        assert_eq!(exercise.reps, 6); // round(5 x 1.1)
    }
}

#[tokio::test]
async fn poor_recovery_halves_the_budget_and_inflates_rest() {
    let user = gym_user();
    let builder = StoreBuilder::new(strength_catalog(20));
    builder
        .scores
        .put(&stored_recovery_score(
            user.user_id,
            35,
            Utc::now() + Duration::hours(12),
        ))
        .await
        .unwrap();

    let result = engine(builder.build())
        .prescribe(&request_for(user))
        .await
        .unwrap();

    // max(3, floor(10 x 0.5)) = 5
    assert_eq!(result.exercises.len(), 5);
    assert_eq!(result.difficulty, WorkoutDifficulty::Easy);
    for exercise in &result.exercises {
        // strength rest 180s stretched x1.3 under poor recovery
        assert_eq!(exercise.rest_seconds, 234);
        assert_eq!(exercise.sets, 2); // floor(3 x 0.5) lifted to the floor
        assert!(exercise.notes.as_deref().unwrap().contains("[recovery 35"));
    }
}

#[tokio::test]
async fn rest_recommendation_yields_a_wellformed_empty_plan_not_an_error() {
    let user = gym_user();
    let builder = StoreBuilder::new(strength_catalog(20));
    builder
        .scores
        .put(&stored_recovery_score(
            user.user_id,
            20,
            Utc::now() + Duration::hours(12),
        ))
        .await
        .unwrap();

    let result = engine(builder.build())
        .prescribe(&request_for(user))
        .await
        .unwrap();

    assert!(result.exercises.is_empty());
    assert!(result.warmup.is_empty());
    assert!(result.cooldown.is_empty());
    assert!(result.muscle_coverage.is_empty());
    assert_eq!(result.total_duration_minutes, 0);
    assert_eq!(result.difficulty, WorkoutDifficulty::Easy);
    assert_eq!(result.metadata.recovery_score, Some(20));
}

#[tokio::test]
async fn an_empty_catalog_also_yields_a_wellformed_empty_plan() {
    let result = engine(StoreBuilder::new(vec![]).build())
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap();
    assert!(result.exercises.is_empty());
    assert_eq!(result.difficulty, WorkoutDifficulty::Easy);
}

#[tokio::test]
async fn exercises_requiring_unavailable_equipment_never_appear() {
    let mut catalog = strength_catalog(10);
    let mut machine_work = bodyweight_exercise("cable crossover", "chest");
    machine_work.equipment_required = vec!["cable_machine".to_owned()];
    let machine_id = machine_work.id;
    catalog.push(machine_work);

    let result = engine(StoreBuilder::new(catalog).build())
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap();

    assert!(!result.exercises.is_empty());
    assert!(result
        .exercises
        .iter()
        .all(|e| e.exercise_id != machine_id));
}

#[tokio::test]
async fn identical_inputs_produce_identical_exercise_ordering() {
    let user = gym_user();
    let catalog = strength_catalog(20);

    let first = engine(StoreBuilder::new(catalog.clone()).build())
        .prescribe(&request_for(user.clone()))
        .await
        .unwrap();
    let second = engine(StoreBuilder::new(catalog).build())
        .prescribe(&request_for(user))
        .await
        .unwrap();

    let ids = |r: &pierre_prescription::PrescriptionResult| {
        r.exercises.iter().map(|e| e.exercise_id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn warmup_and_cooldown_target_the_selected_muscles_with_nominal_scores() {
    let mut catalog = strength_catalog(6);
    catalog.push({
        let mut ex = bodyweight_exercise("leg swings", "muscle_0");
        ex.exercise_type = ExerciseType::Mobility;
        ex.difficulty = 1;
        ex
    });
    catalog.push({
        let mut ex = bodyweight_exercise("standing stretch", "muscle_1");
        ex.exercise_type = ExerciseType::Stretching;
        ex.difficulty = 1;
        ex
    });

    let result = engine(StoreBuilder::new(catalog).build())
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap();

    assert_eq!(result.warmup.len(), 1);
    assert_eq!(result.warmup[0].name, "leg swings");
    assert!((result.warmup[0].score - 10.0).abs() < f64::EPSILON);
    assert_eq!(result.warmup[0].sets, 2);
    assert_eq!(result.cooldown.len(), 1);
    assert_eq!(result.cooldown[0].name, "standing stretch");
    assert_eq!(result.cooldown[0].sets, 1);
}

#[tokio::test]
async fn muscle_coverage_sums_sets_times_reps_per_muscle() {
    let user = gym_user();
    let builder = StoreBuilder::new(strength_catalog(4));
    let result = engine(builder.build())
        .prescribe(&request_for(user))
        .await
        .unwrap();

    for exercise in &result.exercises {
        let expected = exercise.sets * exercise.reps;
        for muscle in &exercise.primary_muscles {
            assert_eq!(result.muscle_coverage[muscle], expected);
        }
    }
    assert!(result.total_duration_minutes > 0);
}

#[tokio::test]
async fn critical_store_failure_aborts_the_request() {
    let mut stores = StoreBuilder::new(strength_catalog(10)).build();
    stores.preferences = Arc::new(FailingPreferenceStore);

    let err = engine(stores)
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::CriticalFetch {
            store: "preferences",
            ..
        }
    ));
}

#[tokio::test]
async fn optional_store_failure_degrades_instead_of_aborting() {
    let mut stores = StoreBuilder::new(strength_catalog(10)).build();
    stores.phases = Arc::new(FailingPhaseStore);

    let result = engine(stores)
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap();
    assert!(!result.exercises.is_empty());
    assert!(result.periodization_phase.is_none());
    assert!(!result
        .metadata
        .factors_considered
        .contains(&"periodization".to_owned()));
}

#[tokio::test]
async fn zero_available_time_is_an_invalid_request() {
    let mut user = gym_user();
    user.time_available_minutes = 0;
    let err = engine(StoreBuilder::new(strength_catalog(10)).build())
        .prescribe(&request_for(user))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRequest(_)));
}

#[tokio::test]
async fn max_exercise_override_wins_over_the_time_budget() {
    let result = engine(StoreBuilder::new(strength_catalog(20)).build())
        .prescribe(&{
            let mut request = request_for(gym_user());
            request.max_exercises = Some(3);
            request
        })
        .await
        .unwrap();
    assert_eq!(result.exercises.len(), 3);
}

#[tokio::test]
async fn excluded_muscles_are_kept_out_of_the_plan() {
    let result = engine(StoreBuilder::new(strength_catalog(20)).build())
        .prescribe(&{
            let mut request = request_for(gym_user());
            request.excluded_muscles = vec!["muscle_0".to_owned()];
            request
        })
        .await
        .unwrap();
    assert!(!result.exercises.is_empty());
    assert!(result
        .exercises
        .iter()
        .all(|e| !e.primary_muscles.contains(&"muscle_0".to_owned())));
}

#[tokio::test]
async fn generated_prescriptions_land_in_the_feedback_store() {
    let builder = StoreBuilder::new(strength_catalog(10));
    let feedback = Arc::clone(&builder.feedback);

    let result = engine(builder.build())
        .prescribe(&request_for(gym_user()))
        .await
        .unwrap();

    // the append is spawned off the critical path; give it a moment
    for _ in 0..50 {
        if feedback.count() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    let records = feedback.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, result.id);
    assert_eq!(records[0].metadata.algorithm_version, "1.0.0");
}

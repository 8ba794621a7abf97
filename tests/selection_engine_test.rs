// ABOUTME: Integration tests for the weather-aware selection engine
// ABOUTME: Tests sampling, rejection bookkeeping, retry ceiling, failures and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs, clippy::panic)]

mod common;

use anyhow::Result;
use common::{
    activity, create_test_cache, init_test_logging, CountingClassifier, RecordingGuard,
    ScriptedLookup,
};
use fairweather_providers::ProviderError;
use fairweather_server::errors::SelectionError;
use fairweather_server::models::{Activity, SelectionMode, UnfavorableConditions, WeatherCondition};
use fairweather_server::selection::{ScriptedSamplers, SelectionConfig, SelectionEngine};
use fairweather_server::weather::WeatherCache;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn scripted_engine(lookup: Arc<ScriptedLookup>, script: Vec<usize>) -> SelectionEngine {
    SelectionEngine::with_sampler_factory(
        lookup,
        SelectionConfig::default(),
        Arc::new(ScriptedSamplers::new(script)),
    )
}

fn rainy_pool(count: usize) -> (Vec<Activity>, ScriptedLookup) {
    let mut lookup = ScriptedLookup::new();
    let pool = (0..count)
        .map(|i| {
            let location = format!("Town{i}");
            lookup = std::mem::take(&mut lookup).with(&location, WeatherCondition::Rain);
            activity(&format!("walk {i}"), &location, true)
        })
        .collect();
    (pool, lookup)
}

#[tokio::test]
async fn test_not_sunny_accepts_first_draw_without_lookup() -> Result<()> {
    init_test_logging();
    let lookup = Arc::new(ScriptedLookup::new());
    let engine = scripted_engine(lookup.clone(), vec![1]);
    let candidates = vec![
        activity("cinema", "Lisburn", false),
        activity("swimming", "Armagh", false),
    ];

    let selection = engine
        .select(candidates, SelectionMode::NotSunny, None)
        .await?;

    assert_eq!(selection.activity, activity("swimming", "Armagh", false));
    assert_eq!(selection.evaluated, 1);
    assert!(selection.discarded.is_empty());
    assert_eq!(lookup.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_pool_is_invalid_input() {
    let engine = scripted_engine(Arc::new(ScriptedLookup::new()), vec![]);

    for mode in [SelectionMode::Sunny, SelectionMode::NotSunny] {
        let result = engine.select(Vec::new(), mode, None).await;
        assert!(matches!(result, Err(SelectionError::InvalidInput(_))));
    }
}

#[tokio::test]
async fn test_rejected_candidates_are_never_resampled() -> Result<()> {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .with("Belfast", WeatherCondition::Rain)
            .with("Dublin", WeatherCondition::Drizzle)
            .with("Coleraine", WeatherCondition::Clear),
    );
    // Always draw index 0: each rejection must shift the next candidate into place
    let engine = scripted_engine(lookup.clone(), vec![0, 0, 0, 0]);
    let candidates = vec![
        activity("Hike Cavehill", "Belfast", true),
        activity("shopping dublin", "Dublin", true),
        activity("Trip to the causeway coast", "Coleraine", true),
    ];

    let selection = engine
        .select(candidates.clone(), SelectionMode::Sunny, None)
        .await?;

    assert_eq!(selection.activity, candidates[2]);
    assert_eq!(selection.discarded, candidates[..2].to_vec());
    assert_eq!(selection.evaluated, selection.discarded.len() + 1);

    let calls = lookup.calls();
    let distinct: HashSet<&String> = calls.iter().collect();
    assert_eq!(calls, vec!["Belfast", "Dublin", "Coleraine"]);
    assert_eq!(distinct.len(), calls.len());
    Ok(())
}

#[tokio::test]
async fn test_evaluated_counts_discarded_plus_one() -> Result<()> {
    let lookup = Arc::new(
        ScriptedLookup::new()
            .with("Fermanagh", WeatherCondition::Snow)
            .with("Armagh", WeatherCondition::Clouds),
    );
    let engine = scripted_engine(lookup, vec![1, 0]);
    let candidates = vec![
        activity("Gosford Forest Park", "Armagh", true),
        activity("Marble Arch Caves", "Fermanagh", true),
    ];

    let selection = engine.select(candidates, SelectionMode::Sunny, None).await?;

    assert_eq!(selection.activity.location, "Armagh");
    assert_eq!(selection.discarded.len(), 1);
    assert_eq!(selection.evaluated, 2);
    Ok(())
}

#[tokio::test]
async fn test_gives_up_after_max_retries_rejections() {
    let (pool, lookup) = rainy_pool(6);
    let lookup = Arc::new(lookup);
    let engine = scripted_engine(lookup.clone(), vec![0; 10]);

    let result = engine.select(pool, SelectionMode::Sunny, None).await;

    match result {
        Err(SelectionError::SelectionExhausted { attempts }) => assert_eq!(attempts, 4),
        other => panic!("expected SelectionExhausted, got {other:?}"),
    }
    assert_eq!(lookup.call_count(), 4);
}

#[tokio::test]
async fn test_custom_retry_ceiling() {
    let (pool, lookup) = rainy_pool(5);
    let lookup = Arc::new(lookup);
    let engine = SelectionEngine::with_sampler_factory(
        lookup.clone(),
        SelectionConfig {
            max_retries: 0,
            unfavorable: UnfavorableConditions::default(),
        },
        Arc::new(ScriptedSamplers::new(vec![])),
    );

    let result = engine.select(pool, SelectionMode::Sunny, None).await;

    assert!(matches!(
        result,
        Err(SelectionError::SelectionExhausted { attempts: 1 })
    ));
    assert_eq!(lookup.call_count(), 1);
}

#[tokio::test]
async fn test_drained_pool_is_exhausted() {
    let (pool, lookup) = rainy_pool(2);
    let lookup = Arc::new(lookup);
    let engine = scripted_engine(lookup.clone(), vec![1, 0]);

    let result = engine.select(pool, SelectionMode::Sunny, None).await;

    assert!(matches!(
        result,
        Err(SelectionError::SelectionExhausted { attempts: 2 })
    ));
    assert_eq!(lookup.call_count(), 2);
}

#[tokio::test]
async fn test_configured_unfavorable_set_is_respected() -> Result<()> {
    let lookup = Arc::new(ScriptedLookup::new().with("Belfast", WeatherCondition::Rain));
    let engine = SelectionEngine::with_sampler_factory(
        lookup,
        SelectionConfig {
            max_retries: 3,
            unfavorable: UnfavorableConditions::parse_list("Snow,Fog"),
        },
        Arc::new(ScriptedSamplers::new(vec![0])),
    );

    let selection = engine
        .select(
            vec![activity("Hike Cavehill", "Belfast", true)],
            SelectionMode::Sunny,
            None,
        )
        .await?;

    assert_eq!(selection.activity.location, "Belfast");
    Ok(())
}

#[tokio::test]
async fn test_provider_failure_aborts_without_retry() {
    let lookup = Arc::new(
        ScriptedLookup::new().failing("Belfast", ProviderError::Network("reset".into())),
    );
    let engine = scripted_engine(lookup.clone(), vec![0, 0, 0]);
    let candidates = vec![
        activity("Hike Cavehill", "Belfast", true),
        activity("mini golf", "Craigavon", true),
    ];

    let result = engine.select(candidates, SelectionMode::Sunny, None).await;

    assert!(matches!(
        result,
        Err(SelectionError::WeatherUnavailable(ProviderError::Network(_)))
    ));
    assert_eq!(lookup.call_count(), 1);
}

#[tokio::test]
async fn test_slow_lookup_is_cancelled_at_deadline() {
    let lookup = Arc::new(ScriptedLookup::new().with_delay(Duration::from_millis(500)));
    let engine = scripted_engine(lookup.clone(), vec![0]);
    let deadline = Instant::now() + Duration::from_millis(50);

    let started = Instant::now();
    let result = engine
        .select(
            vec![activity("mini golf", "Craigavon", true)],
            SelectionMode::Sunny,
            Some(deadline),
        )
        .await;

    assert!(matches!(result, Err(SelectionError::Cancelled)));
    assert!(started.elapsed() < Duration::from_millis(400));
}

#[tokio::test]
async fn test_passed_deadline_skips_lookup() {
    let lookup = Arc::new(ScriptedLookup::new());
    let engine = scripted_engine(lookup.clone(), vec![0]);
    let deadline = Instant::now();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let result = engine
        .select(
            vec![activity("mini golf", "Craigavon", true)],
            SelectionMode::Sunny,
            Some(deadline),
        )
        .await;

    assert!(matches!(result, Err(SelectionError::Cancelled)));
    assert_eq!(lookup.call_count(), 0);
}

#[tokio::test]
async fn test_time_seeded_engine_picks_from_pool() -> Result<()> {
    let engine = SelectionEngine::new(Arc::new(ScriptedLookup::new()), SelectionConfig::default());
    let candidates = vec![
        activity("cinema", "Lisburn", false),
        activity("axe throwing", "Belfast", false),
        activity("swimming", "Armagh", false),
    ];

    for _ in 0..20 {
        let selection = engine
            .select(candidates.clone(), SelectionMode::NotSunny, None)
            .await?;
        assert!(candidates.contains(&selection.activity));
    }
    Ok(())
}

#[tokio::test]
async fn test_craigavon_clear_end_to_end() -> Result<()> {
    let cache = create_test_cache().await;
    let classifier = Arc::new(CountingClassifier::returning(WeatherCondition::Clear));
    let weather = WeatherCache::new(
        cache.clone(),
        classifier.clone(),
        Arc::new(RecordingGuard::default()),
    );
    let engine = SelectionEngine::new(Arc::new(weather), SelectionConfig::default());
    let mini_golf = activity("mini golf", "Craigavon", true);

    let selection = engine
        .select(vec![mini_golf.clone()], SelectionMode::Sunny, None)
        .await?;

    assert_eq!(selection.activity, mini_golf);
    assert_eq!(cache.get("Craigavon").await?.as_deref(), Some("Clear"));
    let ttl = cache.ttl("Craigavon").await?;
    assert!(ttl.is_some_and(|ttl| ttl > Duration::from_secs(590)));
    assert_eq!(classifier.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_lisburn_rain_end_to_end() -> Result<()> {
    let cache = create_test_cache().await;
    let weather = WeatherCache::new(
        cache.clone(),
        Arc::new(CountingClassifier::returning(WeatherCondition::Rain)),
        Arc::new(RecordingGuard::default()),
    );
    let engine = SelectionEngine::new(Arc::new(weather), SelectionConfig::default());

    let result = engine
        .select(
            vec![activity("cinema", "Lisburn", false)],
            SelectionMode::Sunny,
            None,
        )
        .await;

    assert!(matches!(
        result,
        Err(SelectionError::SelectionExhausted { attempts: 1 })
    ));
    assert_eq!(cache.get("Lisburn").await?.as_deref(), Some("Rain"));
    Ok(())
}

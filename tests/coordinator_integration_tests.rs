//! Integration Tests for the Request Coordinator
//!
//! Exercises freshness, deduplication, capacity, invalidation and failure
//! handling through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use request_cache::{
    CacheConfig, CacheError, CachePolicies, InvalidationPattern, PoliciesConfig,
    RequestCoordinator, ResolveOptions,
};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

fn coordinator(ttl: Duration, max_size: usize) -> RequestCoordinator<Value> {
    RequestCoordinator::new("integration", CacheConfig::new(ttl, max_size).unwrap())
}

fn counting_op(
    calls: &Arc<AtomicUsize>,
    value: Value,
    delay: Duration,
) -> impl FnOnce() -> BoxFuture<'static, anyhow::Result<Value>> {
    let calls = Arc::clone(calls);
    move || {
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Ok(value)
        }
        .boxed()
    }
}

// == Freshness ==

#[tokio::test(start_paused = true)]
async fn test_entry_served_until_ttl_elapses() {
    let cache = coordinator(Duration::from_secs(60), 10);

    cache
        .set("GET:/a", json!({"id": 1}), Some(Duration::from_millis(1000)))
        .await;
    assert_eq!(cache.get("GET:/a").await, Some(json!({"id": 1})));

    tokio::time::advance(Duration::from_millis(1001)).await;
    assert_eq!(cache.get("GET:/a").await, None);
}

#[tokio::test]
async fn test_cached_null_is_a_hit() {
    let cache = coordinator(Duration::from_secs(60), 10);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let value = cache
            .resolve(
                "GET:/empty",
                counting_op(&calls, Value::Null, Duration::ZERO),
                ResolveOptions::default(),
            )
            .await;
        assert_eq!(assert_ok!(value), Value::Null);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// == Deduplication ==

#[tokio::test(start_paused = true)]
async fn test_three_concurrent_resolves_fetch_once() {
    let cache = coordinator(Duration::from_secs(60), 10);
    let calls = Arc::new(AtomicUsize::new(0));
    let user = json!({"id": 1, "name": "ada"});

    let (a, b, c) = tokio::join!(
        cache.resolve(
            "GET:/user/1",
            counting_op(&calls, user.clone(), Duration::from_millis(50)),
            ResolveOptions::default()
        ),
        cache.resolve(
            "GET:/user/1",
            counting_op(&calls, user.clone(), Duration::from_millis(50)),
            ResolveOptions::default()
        ),
        cache.resolve(
            "GET:/user/1",
            counting_op(&calls, user.clone(), Duration::from_millis(50)),
            ResolveOptions::default()
        ),
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(assert_ok!(a), user);
    assert_eq!(assert_ok!(b), user);
    assert_eq!(assert_ok!(c), user);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dedup_across_worker_threads() {
    let cache = coordinator(Duration::from_secs(60), 10);
    let calls = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let cache = cache.clone();
            let op = counting_op(&calls, json!("shared"), Duration::from_millis(50));
            tokio::spawn(async move {
                cache
                    .resolve("GET:/shared", op, ResolveOptions::default())
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), json!("shared"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.pending_count().await, 0);
}

// == Capacity ==

#[tokio::test]
async fn test_capacity_keeps_newest_insertions() {
    let cache = coordinator(Duration::from_secs(60), 2);

    for key in ["a", "b", "c"] {
        cache.set(key, json!(key), None).await;
    }

    assert_eq!(cache.get("a").await, None);
    assert_eq!(cache.get("b").await, Some(json!("b")));
    assert_eq!(cache.get("c").await, Some(json!("c")));
    assert_eq!(cache.stats().await.size, 2);
}

// == Invalidation ==

#[tokio::test]
async fn test_regex_invalidation() {
    let cache = coordinator(Duration::from_secs(60), 10);
    cache.set("GET:/posts/1", json!("x"), None).await;
    cache.set("GET:/users/1", json!("u"), None).await;

    let pattern = assert_ok!(InvalidationPattern::regex("/posts/"));
    assert_eq!(cache.invalidate(pattern).await, 1);

    assert_eq!(cache.get("GET:/posts/1").await, None);
    assert!(cache.get("GET:/users/1").await.is_some());
}

#[tokio::test]
async fn test_write_cascades_across_policies_explicitly() {
    let policies: CachePolicies<Value> = CachePolicies::new(&PoliciesConfig::default()).unwrap();
    policies.user_profiles().set("GET:/users/1", json!("u"), None).await;
    policies.follow_state().set("GET:/follows/1", json!("f"), None).await;
    policies.posts().set("GET:/posts/1", json!("p"), None).await;

    // a profile write: drop the profile, then the families that embed it
    policies.user_profiles().invalidate("/users/1").await;
    policies.follow_state().invalidate_related("PUT:/users/1").await;
    policies.posts().invalidate_related("PUT:/users/1").await;

    assert_eq!(policies.user_profiles().get("GET:/users/1").await, None);
    assert_eq!(policies.follow_state().get("GET:/follows/1").await, None);
    assert_eq!(policies.posts().get("GET:/posts/1").await, None);
}

// == Failure Handling ==

#[tokio::test]
async fn test_failed_resolve_is_not_cached() {
    let cache = coordinator(Duration::from_secs(60), 10);
    let calls = Arc::new(AtomicUsize::new(0));

    for attempt in 1..=2 {
        let calls = Arc::clone(&calls);
        let result = cache
            .resolve(
                "GET:/x",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<Value, _>(anyhow::anyhow!("rejected"))
                },
                ResolveOptions::default(),
            )
            .await;

        let err = assert_err!(result);
        assert!(matches!(err, CacheError::Operation(_)), "attempt {}", attempt);
        assert_eq!(cache.get("GET:/x").await, None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clear_resets_store_and_stats_size() {
    let cache = coordinator(Duration::from_secs(60), 10);
    cache.set("GET:/a", json!(1), None).await;
    cache.set("GET:/b", json!(2), None).await;

    cache.clear().await;

    let stats = cache.stats().await;
    assert_eq!(stats.size, 0);
    assert_eq!(stats.pending_requests, 0);
}

// == Configuration ==

#[test]
fn test_zero_capacity_config_cannot_be_loaded() {
    let result = serde_json::from_value::<CacheConfig>(json!({"ttl": 60000, "maxSize": 0}));
    assert!(result.is_err());

    let result =
        serde_json::from_value::<PoliciesConfig>(json!({"posts": {"ttl": 1000, "maxSize": 0}}));
    assert!(result.is_err());
}

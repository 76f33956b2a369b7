//! In-memory integration tests for exclusive acquisition and chain ordering.

use super::helpers::{build_pool, seed_server, settings};
use relaypool::pool::{
    adapters::memory::InMemoryServerRepository,
    domain::{PriorityTier, ServerIdentity, TenantKey},
    ports::ServerRepository,
    services::Acquisition,
};
use std::collections::HashSet;
use std::sync::Arc;

fn tenant(name: &str) -> TenantKey {
    TenantKey::named(name).expect("valid tenant key")
}

#[tokio::test]
async fn high_tier_servers_are_handed_out_before_normal() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let acme = tenant("acme");
    let a_high = seed_server(&repository, "a_high", PriorityTier::High).await;
    let b_normal = seed_server(&repository, "b_normal", PriorityTier::Normal).await;
    let c_high = seed_server(&repository, "c_high", PriorityTier::High).await;
    for id in [a_high, b_normal, c_high] {
        repository
            .bind_tenant(&acme, id)
            .await
            .expect("bind should succeed");
    }
    let pool = build_pool(repository);

    let first = pool.acquire_next(&acme).await;
    let second = pool.acquire_next(&acme).await;
    let third = pool.acquire_next(&acme).await;

    // Both high-tier servers go out before the normal one; ties resolve in
    // binding order.
    assert_eq!(
        first.record().expect("first acquire").identity(),
        &ServerIdentity::from(a_high)
    );
    assert_eq!(
        second.record().expect("second acquire").identity(),
        &ServerIdentity::from(c_high)
    );
    assert_eq!(
        third.record().expect("third acquire").identity(),
        &ServerIdentity::from(b_normal)
    );
}

#[tokio::test]
async fn tenant_default_wins_priority_ties_but_not_higher_tiers() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let acme = tenant("acme");
    repository
        .set_tenant_default(&acme, settings("acme_default", PriorityTier::Normal))
        .await
        .expect("default should persist");
    let bound_high = seed_server(&repository, "bound_high", PriorityTier::High).await;
    repository
        .bind_tenant(&acme, bound_high)
        .await
        .expect("bind should succeed");
    let pool = build_pool(repository);

    let first = pool.acquire_next(&acme).await;
    let second = pool.acquire_next(&acme).await;

    assert_eq!(
        first.record().expect("first acquire").identity(),
        &ServerIdentity::from(bound_high)
    );
    assert_eq!(
        second.record().expect("second acquire").identity(),
        &ServerIdentity::TenantDefault(acme)
    );
}

#[tokio::test]
async fn tenant_without_any_candidates_is_permanently_unavailable() {
    let pool = build_pool(Arc::new(InMemoryServerRepository::new()));
    let lonely = tenant("lonely");

    for _ in 0..2 {
        assert!(matches!(
            pool.acquire_next(&lonely).await,
            Acquisition::PermanentlyUnavailable
        ));
    }
}

#[tokio::test]
async fn tenant_without_bindings_falls_back_to_global_servers() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let global_id = seed_server(&repository, "global_relay", PriorityTier::Normal).await;
    let pool = build_pool(repository);

    let outcome = pool.acquire_next(&tenant("unbound")).await;

    assert_eq!(
        outcome.record().expect("global fallback").identity(),
        &ServerIdentity::from(global_id)
    );
}

#[tokio::test]
async fn disabled_servers_are_skipped_in_favour_of_global_fallback() {
    // Scenario: global G1(normal), tenant acme bound to A1(high) and
    // A2(high, disabled). Expected hand-out order: A1, then G1, then
    // exhaustion, then A1 again after its release.
    let repository = Arc::new(InMemoryServerRepository::new());
    let acme = tenant("acme");
    let g1 = seed_server(&repository, "g1", PriorityTier::Normal).await;
    let a1 = seed_server(&repository, "a1", PriorityTier::High).await;
    let a2 = seed_server(&repository, "a2", PriorityTier::High).await;
    for id in [a1, a2] {
        repository
            .bind_tenant(&acme, id)
            .await
            .expect("bind should succeed");
    }
    let mut disabled = repository
        .get_record(a2)
        .await
        .expect("get should succeed")
        .expect("record exists");
    disabled.disable(&mockable::DefaultClock);
    repository
        .update(&disabled)
        .await
        .expect("update should succeed");
    let pool = build_pool(repository);

    let first = pool.acquire_next(&acme).await;
    assert_eq!(
        first.record().expect("first acquire").identity(),
        &ServerIdentity::from(a1)
    );

    let second = pool.acquire_next(&acme).await;
    assert_eq!(
        second.record().expect("second acquire").identity(),
        &ServerIdentity::from(g1)
    );

    let third = pool.acquire_next(&acme).await;
    assert!(matches!(third, Acquisition::TemporarilyUnavailable(None)));

    pool.release(&ServerIdentity::from(a1)).await;
    let fourth = pool.acquire_next(&acme).await;
    assert_eq!(
        fourth.record().expect("fourth acquire").identity(),
        &ServerIdentity::from(a1)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_acquires_never_hand_out_the_same_server_twice() {
    let repository = Arc::new(InMemoryServerRepository::new());
    for index in 0..4 {
        seed_server(&repository, &format!("relay_{index}"), PriorityTier::Normal).await;
    }
    let pool = build_pool(repository);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let worker_pool = pool.clone();
        handles.push(tokio::spawn(async move {
            worker_pool.acquire_next(&TenantKey::global()).await
        }));
    }

    let mut acquired = HashSet::new();
    let mut unavailable = 0_usize;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Acquisition::Available(record) => {
                assert!(
                    acquired.insert(record.identity().clone()),
                    "server {} was handed out twice",
                    record.identity()
                );
            }
            Acquisition::TemporarilyUnavailable(None) => unavailable += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert_eq!(acquired.len(), 4);
    assert_eq!(unavailable, 4);
}

#[tokio::test]
async fn release_all_recovers_every_stuck_server() {
    let repository = Arc::new(InMemoryServerRepository::new());
    seed_server(&repository, "relay_a", PriorityTier::Normal).await;
    seed_server(&repository, "relay_b", PriorityTier::Normal).await;
    let pool = build_pool(repository);

    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
    assert!(matches!(
        pool.acquire_next(&TenantKey::global()).await,
        Acquisition::TemporarilyUnavailable(None)
    ));

    pool.release_all().await;

    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
}

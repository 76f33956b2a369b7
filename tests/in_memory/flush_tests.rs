//! In-memory integration tests for flush semantics and cache invalidation.

use super::helpers::{build_pool, seed_server};
use relaypool::pool::{
    adapters::memory::InMemoryServerRepository,
    domain::{PriorityTier, ServerIdentity, TenantKey},
    ports::ServerRepository,
    services::Acquisition,
};
use std::sync::Arc;

#[tokio::test]
async fn flush_preserves_busy_state_for_surviving_records() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let survivor = seed_server(&repository, "survivor", PriorityTier::Normal).await;
    let pool = build_pool(repository);

    let acquired = pool.acquire_next(&TenantKey::global()).await;
    assert_eq!(
        acquired.record().expect("acquire").identity(),
        &ServerIdentity::from(survivor)
    );

    pool.flush().await.expect("flush should succeed");

    // The survivor is still busy after the reload, so the chain is
    // exhausted rather than re-handing the same server out.
    assert!(matches!(
        pool.acquire_next(&TenantKey::global()).await,
        Acquisition::TemporarilyUnavailable(None)
    ));
}

#[tokio::test]
async fn flush_drops_records_deleted_from_the_repository() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let doomed = seed_server(&repository, "doomed", PriorityTier::Normal).await;
    let keeper = seed_server(&repository, "keeper", PriorityTier::Normal).await;
    let pool = build_pool(repository.clone());

    let first = pool.acquire_next(&TenantKey::global()).await;
    assert_eq!(
        first.record().expect("acquire").identity(),
        &ServerIdentity::from(doomed)
    );

    repository.delete(doomed).await.expect("delete should succeed");
    pool.flush().await.expect("flush should succeed");

    // The doomed record is gone; the keeper is unaffected and idle.
    let outcome = pool.acquire_next(&TenantKey::global()).await;
    assert_eq!(
        outcome.record().expect("acquire").identity(),
        &ServerIdentity::from(keeper)
    );
}

#[tokio::test]
async fn releasing_an_identity_dropped_by_flush_is_harmless() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let doomed = seed_server(&repository, "doomed", PriorityTier::Normal).await;
    let keeper = seed_server(&repository, "keeper", PriorityTier::Normal).await;
    let pool = build_pool(repository.clone());

    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());

    repository.delete(doomed).await.expect("delete should succeed");
    pool.flush().await.expect("flush should succeed");

    // Stale release: the identity vanished with the flush.
    pool.release(&ServerIdentity::from(doomed)).await;

    // The keeper's busy state is untouched by the stale release.
    assert!(matches!(
        pool.acquire_next(&TenantKey::global()).await,
        Acquisition::TemporarilyUnavailable(None)
    ));
    pool.release(&ServerIdentity::from(keeper)).await;
    assert!(pool.acquire_next(&TenantKey::global()).await.is_available());
}

#[tokio::test]
async fn flush_invalidates_cached_chains_wholesale() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let acme = TenantKey::named("acme").expect("valid tenant key");
    let original = seed_server(&repository, "original", PriorityTier::Normal).await;
    repository
        .bind_tenant(&acme, original)
        .await
        .expect("bind should succeed");
    let pool = build_pool(repository.clone());

    let first = pool.acquire_next(&acme).await;
    assert_eq!(
        first.record().expect("acquire").identity(),
        &ServerIdentity::from(original)
    );
    pool.release(&ServerIdentity::from(original)).await;

    // Rebind the tenant to a higher-priority newcomer; without a flush the
    // cached chain would still start at the original server.
    let newcomer = seed_server(&repository, "newcomer", PriorityTier::High).await;
    repository
        .bind_tenant(&acme, newcomer)
        .await
        .expect("bind should succeed");
    pool.flush().await.expect("flush should succeed");

    let second = pool.acquire_next(&acme).await;
    assert_eq!(
        second.record().expect("acquire").identity(),
        &ServerIdentity::from(newcomer)
    );
}

#[tokio::test]
async fn tenant_default_resets_to_idle_when_flush_drops_it() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let acme = TenantKey::named("acme").expect("valid tenant key");
    repository
        .set_tenant_default(&acme, super::helpers::settings("acme_default", PriorityTier::High))
        .await
        .expect("default should persist");
    let pool = build_pool(repository);

    let first = pool.acquire_next(&acme).await;
    assert_eq!(
        first.record().expect("acquire").identity(),
        &ServerIdentity::TenantDefault(acme.clone())
    );

    // Inline defaults are synthesised per chain build, not persisted as
    // records, so a flush re-creates them idle.
    pool.flush().await.expect("flush should succeed");

    let second = pool.acquire_next(&acme).await;
    assert_eq!(
        second.record().expect("acquire").identity(),
        &ServerIdentity::TenantDefault(acme)
    );
}

//! In-memory integration tests for cross-instance convergence.
//!
//! Two pools over one shared repository stand in for two process instances
//! of the same application; the recording bus plays the deployment's
//! messaging layer, delivered by hand so staleness windows are observable.

use super::helpers::{build_admin, build_pool, settings};
use relaypool::pool::{
    adapters::memory::{InMemoryServerRepository, RecordingInvalidationBus},
    domain::{PriorityTier, TenantKey},
    services::Acquisition,
};
use std::sync::Arc;

#[tokio::test]
async fn peer_converges_once_the_broadcast_is_delivered() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let transport = Arc::new(RecordingInvalidationBus::new());
    let instance_a = build_pool(repository.clone());
    let instance_b = build_pool(repository.clone());
    let admin = build_admin(instance_a.clone(), repository, transport.clone());

    // Instance B has already materialised an empty view.
    assert!(matches!(
        instance_b.acquire_next(&TenantKey::global()).await,
        Acquisition::PermanentlyUnavailable
    ));

    admin
        .create_server(settings("relay_a", PriorityTier::Normal))
        .await
        .expect("create should succeed");

    // The mutating instance flushed synchronously.
    assert!(instance_a.acquire_next(&TenantKey::global()).await.is_available());

    // Until delivery, instance B is stale: an accepted staleness window.
    assert!(matches!(
        instance_b.acquire_next(&TenantKey::global()).await,
        Acquisition::PermanentlyUnavailable
    ));

    for command in transport.drain() {
        instance_b.apply(&command).await;
    }

    assert!(instance_b.acquire_next(&TenantKey::global()).await.is_available());
}

#[tokio::test]
async fn duplicated_and_reordered_commands_are_idempotent() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let transport = Arc::new(RecordingInvalidationBus::new());
    let instance_a = build_pool(repository.clone());
    let instance_b = build_pool(repository.clone());
    let admin = build_admin(instance_a, repository, transport.clone());

    admin
        .create_server(settings("relay_a", PriorityTier::Normal))
        .await
        .expect("create should succeed");
    admin
        .create_server(settings("relay_b", PriorityTier::High))
        .await
        .expect("create should succeed");

    let mut commands = transport.drain();
    commands.reverse();
    // Deliver out of order, then deliver everything again.
    for command in commands.iter().chain(commands.iter()) {
        instance_b.apply(command).await;
    }

    let first = instance_b.acquire_next(&TenantKey::global()).await;
    assert_eq!(
        first.record().expect("acquire").name().as_str(),
        "relay_b",
        "converged view should order by priority"
    );
    assert!(instance_b.acquire_next(&TenantKey::global()).await.is_available());
}

#[tokio::test]
async fn local_busy_state_survives_a_broadcast_flush() {
    let repository = Arc::new(InMemoryServerRepository::new());
    let transport = Arc::new(RecordingInvalidationBus::new());
    let instance_a = build_pool(repository.clone());
    let instance_b = build_pool(repository.clone());
    let admin = build_admin(instance_a, repository, transport.clone());

    admin
        .create_server(settings("relay_a", PriorityTier::Normal))
        .await
        .expect("create should succeed");
    for command in transport.drain() {
        instance_b.apply(&command).await;
    }
    assert!(instance_b.acquire_next(&TenantKey::global()).await.is_available());

    // A second mutation flushes B again; B's exclusive hold must survive.
    admin
        .create_server(settings("relay_b", PriorityTier::Low))
        .await
        .expect("create should succeed");
    for command in transport.drain() {
        instance_b.apply(&command).await;
    }

    let outcome = instance_b.acquire_next(&TenantKey::global()).await;
    assert_eq!(
        outcome.record().expect("acquire").name().as_str(),
        "relay_b",
        "only the newcomer should be idle"
    );
}

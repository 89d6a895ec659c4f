use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::metrics::{ACTIVE_CLIENTS, EVICTED_CLIENTS};
use crate::registry::ClientRegistry;

// Idle eviction loop - runs every `sweep_interval` until cancelled

pub async fn idle_sweeper(
    registry: Arc<ClientRegistry>,
    sweep_interval: Duration,
    idle_threshold: Duration,
    shutdown: CancellationToken,
) {
    // first sweep one full interval after start, not immediately
    let mut interval = interval_at(Instant::now() + sweep_interval, sweep_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(?sweep_interval, ?idle_threshold, "idle sweeper started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                let removed = registry.evict_idle_older_than(idle_threshold);
                let remaining = registry.len();

                EVICTED_CLIENTS.inc_by(removed as f64);
                ACTIVE_CLIENTS.set(remaining as f64);

                if removed > 0 {
                    tracing::info!(removed, remaining, "evicted idle clients");
                } else {
                    tracing::debug!(remaining, "sweep found no idle clients");
                }
            }
        }
    }

    tracing::info!("idle sweeper stopped");
}

pub fn spawn_sweeper(
    registry: Arc<ClientRegistry>,
    sweep_interval: Duration,
    idle_threshold: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(idle_sweeper(registry, sweep_interval, idle_threshold, shutdown))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn evicts_client_idle_past_threshold() {
        let registry = Arc::new(ClientRegistry::new(3, 1.0));
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(Arc::clone(&registry), MINUTE, 3 * MINUTE, shutdown.clone());

        registry.get_or_create("B");

        // sweeps at 1, 2 and 3 minutes keep it (3m idle is not older than 3m)
        tokio::time::sleep(3 * MINUTE + Duration::from_secs(1)).await;
        assert!(registry.contains("B"));

        // the 4 minute sweep removes it
        tokio::time::sleep(MINUTE).await;
        assert!(!registry.contains("B"));

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn active_client_survives_sweeps() {
        let registry = Arc::new(ClientRegistry::new(3, 1.0));
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(Arc::clone(&registry), MINUTE, 3 * MINUTE, shutdown.clone());

        for _ in 0..10 {
            registry.get_or_create("A");
            tokio::time::sleep(MINUTE + Duration::from_secs(1)).await;
        }
        assert!(registry.contains("A"));

        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_cancel() {
        let registry = Arc::new(ClientRegistry::new(3, 1.0));
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(registry, MINUTE, 3 * MINUTE, shutdown.clone());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop")
            .unwrap();
    }
}

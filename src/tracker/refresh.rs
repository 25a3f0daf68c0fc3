use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Tracker;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Calls `Tracker::refresh_tick` every `period` until `token` is cancelled.
pub fn spawn_refresh_loop(
    tracker: Arc<Tracker>,
    period: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!("Refreshing vehicle locations every {:?}", period);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Refresh loop stopped");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Refresh tick");
                    tracker.refresh_tick().await;
                }
            }
        }
    })
}

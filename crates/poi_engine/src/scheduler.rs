//! Poll timer driving the search pipeline.
//!
//! The first cycle runs after a startup delay so the position source can
//! get a fix; later cycles tick on a fixed interval measured from start.
//! Cycles are not awaited, so a slow one may overlap the next.

use std::sync::Arc;
use std::time::Duration;

use common::config::WatchConfig;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::dispatcher::SearchDispatcher;
use crate::geo::{reach_km, ring};
use crate::position::PositionProvider;

pub struct PollScheduler {
    position: Arc<dyn PositionProvider>,
    dispatcher: SearchDispatcher,
    ring_radius_km: f64,
    startup_delay: Duration,
    poll_interval: Duration,
}

impl PollScheduler {
    pub fn new(
        position: Arc<dyn PositionProvider>,
        dispatcher: SearchDispatcher,
        cfg: &WatchConfig,
    ) -> Self {
        Self {
            position,
            dispatcher,
            ring_radius_km: cfg.search.ring_radius_km,
            startup_delay: Duration::from_secs(cfg.timing.startup_delay_secs),
            poll_interval: Duration::from_secs(cfg.timing.poll_interval_secs),
        }
    }

    /// Run one cycle for the current position.
    ///
    /// Returns `None` without doing anything when no position is available.
    pub fn trigger(&self) -> Option<Vec<JoinHandle<usize>>> {
        let Some(center) = self.position.position() else {
            debug!("No position available, skipping POI cycle");
            return None;
        };

        info!(
            "Searching POIs within {} km of {}",
            self.ring_radius_km, center
        );
        let points = ring(center, self.ring_radius_km);
        debug!(
            "Ring of {} points reaches {:.2} km from {}",
            points.len(),
            reach_km(center, &points),
            center
        );
        Some(self.dispatcher.dispatch(&points))
    }

    /// Trigger after the startup delay, then on every interval tick. Never
    /// returns.
    pub async fn run(&self) {
        let start = Instant::now();
        let mut ticker = interval_at(start + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        sleep(self.startup_delay).await;
        self.trigger();

        loop {
            ticker.tick().await;
            self.trigger();
        }
    }
}

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;

use super::task::ScheduledJob;
use crate::event::EventError;
use crate::notify::{messages, Notifier};

/// Broadcasts one randomly chosen tip per firing
///
/// Each pick is independent of the last, so a tip may repeat.
pub struct AnnouncementJob {
    notifier: Notifier,
    tips: Vec<String>,
    rng: Mutex<StdRng>,
}

impl AnnouncementJob {
    pub fn new(notifier: Notifier, tips: Vec<String>, rng: StdRng) -> Self {
        Self {
            notifier,
            tips,
            rng: Mutex::new(rng),
        }
    }

    /// Uses a fixed seed so the sequence of tips is reproducible
    pub fn seeded(notifier: Notifier, tips: Vec<String>, seed: u64) -> Self {
        Self::new(notifier, tips, StdRng::seed_from_u64(seed))
    }

    /// Uses a seed drawn from the operating system
    pub fn from_entropy(notifier: Notifier, tips: Vec<String>) -> Self {
        Self::new(notifier, tips, StdRng::from_os_rng())
    }

    fn pick_tip(&self) -> Option<&str> {
        if self.tips.is_empty() {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let index = rng.random_range(0..self.tips.len());
        Some(&self.tips[index])
    }
}

#[async_trait]
impl ScheduledJob for AnnouncementJob {
    async fn run(&self) -> Result<(), EventError> {
        let tip = self
            .pick_tip()
            .ok_or_else(|| EventError::failed("No tips configured"))?;

        debug!(tip = %tip, "Broadcasting ambient announcement");
        self.notifier.broadcast(&messages::tip(tip)).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "AnnouncementJob"
    }
}

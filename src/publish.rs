//! The "current standings" slot shared by the acquisition and presentation tasks.
//!
//! A single writer replaces the whole value; readers always observe one
//! complete tick.

use std::sync::Arc;

use async_std::sync::RwLock;
use async_trait::async_trait;

use crate::standings::Standings;

/// Anything the acquisition task can hand a freshly computed leaderboard to.
#[async_trait]
pub trait StandingsSink: Send {
    async fn publish(&mut self, standings: Standings);
}

pub struct StandingsPublisher {
    slot: Arc<RwLock<Arc<Standings>>>,
}

#[derive(Clone)]
pub struct StandingsReader {
    slot: Arc<RwLock<Arc<Standings>>>,
}

pub fn channel() -> (StandingsPublisher, StandingsReader) {
    let slot = Arc::new(RwLock::new(Arc::new(Standings::default())));
    (
        StandingsPublisher { slot: slot.clone() },
        StandingsReader { slot },
    )
}

#[async_trait]
impl StandingsSink for StandingsPublisher {
    async fn publish(&mut self, standings: Standings) {
        let standings = Arc::new(standings);
        *self.slot.write().await = standings;
    }
}

impl StandingsReader {
    pub async fn latest(&self) -> Arc<Standings> {
        self.slot.read().await.clone()
    }
}

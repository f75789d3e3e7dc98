//! Best-effort per-game tournament counts read from a remote document
//! collection. Counts are decorative: callers go through [`CountBoard`],
//! which never surfaces a fetch failure.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use shared::protocol::{TournamentCountMap, TournamentCountsSnapshot};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info, warn};

pub mod error;
pub mod rules;
pub mod source;

pub use error::FetchError;
pub use rules::{GameRule, GameRuleTable};
pub use source::{DocumentStoreConfig, DocumentStoreSource, RecordListSource, TournamentRecord};

#[async_trait]
pub trait TournamentSource: Send + Sync {
    /// Reads every record of the collection, unfiltered.
    async fn fetch_all(&self) -> Result<Vec<TournamentRecord>, FetchError>;
}

pub async fn fetch_counts(
    source: &dyn TournamentSource,
    rules: &GameRuleTable,
) -> Result<TournamentCountMap, FetchError> {
    let records = source.fetch_all().await?;
    let counts = rules.tally(&records);
    debug!(
        records = records.len(),
        matched = counts.total(),
        "tallied tournament records"
    );
    Ok(counts)
}

/// Holds the counts currently on display. Starts zeroed for every known
/// game; a successful fetch replaces the whole map, a failed one leaves it
/// untouched.
///
/// Each refresh takes a sequence number when it starts. A result is only
/// applied if no later-started refresh has been applied already, so a slow
/// fetch cannot overwrite newer counts.
pub struct CountBoard {
    rules: GameRuleTable,
    next_refresh: AtomicU64,
    state: RwLock<BoardState>,
}

struct BoardState {
    snapshot: TournamentCountsSnapshot,
    applied_refresh: u64,
}

impl CountBoard {
    pub fn new(rules: GameRuleTable) -> Self {
        let counts = TournamentCountMap::zeroed(rules.game_ids());
        Self {
            rules,
            next_refresh: AtomicU64::new(1),
            state: RwLock::new(BoardState {
                snapshot: TournamentCountsSnapshot {
                    counts,
                    refreshed_at: None,
                },
                applied_refresh: 0,
            }),
        }
    }

    pub fn rules(&self) -> &GameRuleTable {
        &self.rules
    }

    pub async fn snapshot(&self) -> TournamentCountsSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn counts(&self) -> TournamentCountMap {
        self.state.read().await.snapshot.counts.clone()
    }

    /// Fetches and applies fresh counts. Returns `true` when new counts
    /// were applied; failures are logged, never returned.
    pub async fn refresh(&self, source: &dyn TournamentSource) -> bool {
        let sequence = self.start_refresh();
        let result = fetch_counts(source, &self.rules).await;
        self.apply(sequence, result).await
    }

    /// Runs a refresh in the background. The task only holds a weak
    /// reference, so a board dropped mid-fetch discards the result.
    pub fn spawn_refresh(self: &Arc<Self>, source: Arc<dyn TournamentSource>) -> JoinHandle<()> {
        let sequence = self.start_refresh();
        let board = Arc::downgrade(self);
        let rules = self.rules.clone();
        tokio::spawn(async move {
            let result = fetch_counts(source.as_ref(), &rules).await;
            match board.upgrade() {
                Some(board) => {
                    board.apply(sequence, result).await;
                }
                None => debug!("count board dropped before fetch finished; discarding result"),
            }
        })
    }

    fn start_refresh(&self) -> u64 {
        self.next_refresh.fetch_add(1, Ordering::Relaxed)
    }

    async fn apply(&self, sequence: u64, result: Result<TournamentCountMap, FetchError>) -> bool {
        match result {
            Ok(counts) => {
                let mut state = self.state.write().await;
                if sequence < state.applied_refresh {
                    debug!(
                        sequence,
                        applied = state.applied_refresh,
                        "discarding counts from a superseded refresh"
                    );
                    return false;
                }
                info!(sequence, total = counts.total(), "tournament counts refreshed");
                state.applied_refresh = sequence;
                state.snapshot.counts = counts;
                state.snapshot.refreshed_at = Some(Utc::now());
                true
            }
            Err(error) => {
                warn!(%error, "failed to refresh tournament counts; keeping previous values");
                false
            }
        }
    }
}

impl Default for CountBoard {
    fn default() -> Self {
        Self::new(GameRuleTable::standard())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

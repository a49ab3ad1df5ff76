//! Asynchronous progression writer
//!
//! In-memory state is authoritative; this worker trails it, pushing
//! snapshots to the store off the hot path. It coalesces queued saves per
//! player and always writes the newest snapshot, which is what guarantees
//! per-player write-after-write ordering: an older snapshot is simply
//! never written once a newer one exists.
//!
//! Store failures are retried with bounded exponential backoff. When the
//! store stays down, the worker declares it degraded, keeps every dirty
//! record in memory, and re-offers them on a recovery interval. Nothing is
//! dropped short of process death.

use crate::core::config::PersistenceConfig;
use crate::core::types::PlayerId;
use crate::progression::progress::PlayerProgression;
use crate::progression::store::{SharedStore, StoreError};
use ahash::AHashMap;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum Command {
    Save(Box<PlayerProgression>),
    Flush(oneshot::Sender<()>),
}

/// Cheap cloneable handle for queueing saves
#[derive(Clone)]
pub struct PersistenceQueue {
    tx: mpsc::UnboundedSender<Command>,
}

impl PersistenceQueue {
    /// Queue a snapshot for persistence. Never blocks; a later snapshot
    /// for the same player supersedes this one if it is still queued.
    pub fn queue_save(&self, record: PlayerProgression) {
        // Send fails only when the worker is gone; at that point the
        // process is shutting down and the final flush already ran.
        let _ = self.tx.send(Command::Save(Box::new(record)));
    }

    /// Resolve once every queued record has reached the store
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

/// Owns the background writer task
pub struct PersistenceWorker {
    queue: PersistenceQueue,
    join: JoinHandle<()>,
}

impl PersistenceWorker {
    /// Spawn the writer onto the current tokio runtime
    pub fn spawn(store: SharedStore, config: PersistenceConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(run(store, config, rx));
        Self {
            queue: PersistenceQueue { tx },
            join,
        }
    }

    pub fn queue(&self) -> PersistenceQueue {
        self.queue.clone()
    }

    /// Flush outstanding saves and stop the worker
    pub async fn shutdown(self) {
        self.queue.flush().await;
        let PersistenceWorker { queue, join } = self;
        drop(queue);
        let _ = join.await;
    }
}

async fn run(
    store: SharedStore,
    config: PersistenceConfig,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut dirty: AHashMap<PlayerId, PlayerProgression> = AHashMap::new();
    let mut waiters: Vec<oneshot::Sender<()>> = Vec::new();
    let mut open = true;
    let mut degraded = false;

    while open || !dirty.is_empty() {
        // Block for work only when idle
        if dirty.is_empty() {
            match rx.recv().await {
                Some(command) => apply(command, &mut dirty, &mut waiters),
                None => {
                    open = false;
                    continue;
                }
            }
        }
        // Coalesce everything already queued
        loop {
            match rx.try_recv() {
                Ok(command) => apply(command, &mut dirty, &mut waiters),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    open = false;
                    break;
                }
            }
        }

        let players: Vec<PlayerId> = dirty.keys().copied().collect();
        let mut pass_failed = false;
        for player in players {
            let Some(record) = dirty.get(&player).cloned() else {
                continue;
            };
            match save_with_retries(&store, &config, record).await {
                Ok(()) => {
                    // No newer snapshot can have arrived: commands are only
                    // applied by this task, and it was busy saving.
                    dirty.remove(&player);
                    if degraded {
                        degraded = false;
                        tracing::info!("progression store recovered");
                    }
                }
                Err(error) => {
                    pass_failed = true;
                    if !degraded {
                        degraded = true;
                        tracing::warn!(
                            "progression store degraded ({}); keeping records in memory",
                            error
                        );
                    }
                }
            }
        }

        if dirty.is_empty() {
            for waiter in waiters.drain(..) {
                let _ = waiter.send(());
            }
        } else if pass_failed {
            if !open {
                // Shutting down against a dead store; nothing left to wait for
                break;
            }
            wait_for_recovery(&config, &mut rx, &mut dirty, &mut waiters, &mut open).await;
        }
    }

    if !dirty.is_empty() {
        tracing::error!(
            "persistence worker exiting with {} unpersisted records",
            dirty.len()
        );
    }
    for waiter in waiters.drain(..) {
        let _ = waiter.send(());
    }
}

fn apply(
    command: Command,
    dirty: &mut AHashMap<PlayerId, PlayerProgression>,
    waiters: &mut Vec<oneshot::Sender<()>>,
) {
    match command {
        Command::Save(record) => {
            dirty.insert(record.player, *record);
        }
        Command::Flush(done) => waiters.push(done),
    }
}

/// Sleep out the recovery interval, still accepting new commands
async fn wait_for_recovery(
    config: &PersistenceConfig,
    rx: &mut mpsc::UnboundedReceiver<Command>,
    dirty: &mut AHashMap<PlayerId, PlayerProgression>,
    waiters: &mut Vec<oneshot::Sender<()>>,
    open: &mut bool,
) {
    let sleep = tokio::time::sleep(Duration::from_millis(config.recovery_interval_ms));
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => break,
            command = rx.recv() => match command {
                Some(command) => apply(command, dirty, waiters),
                None => {
                    *open = false;
                    break;
                }
            }
        }
    }
}

async fn save_with_retries(
    store: &SharedStore,
    config: &PersistenceConfig,
    record: PlayerProgression,
) -> Result<(), StoreError> {
    let mut backoff = config.initial_backoff_ms;
    let mut attempt = 1u32;
    loop {
        let store = store.clone();
        let snapshot = record.clone();
        let result = tokio::task::spawn_blocking(move || store.save(&snapshot)).await;
        let error = match result {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(error)) => error,
            Err(join_error) => StoreError::Unavailable(join_error.to_string()),
        };
        if attempt >= config.max_attempts {
            return Err(error);
        }
        tracing::debug!(
            "save attempt {}/{} for {} failed: {}",
            attempt,
            config.max_attempts,
            record.player,
            error
        );
        tokio::time::sleep(Duration::from_millis(backoff)).await;
        backoff = backoff.saturating_mul(2).min(config.max_backoff_ms);
        attempt += 1;
    }
}

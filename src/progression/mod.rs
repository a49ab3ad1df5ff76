//! Player progression: experience, levels, and persistence
//!
//! `progress` holds the durable per-player state, `ledger` is the only
//! mutation path, `store` is the persistence adapter boundary, and
//! `worker` trails in-memory state with ordered asynchronous writes.

pub mod ledger;
pub mod progress;
pub mod store;
pub mod worker;

pub use ledger::{
    award_experience, grant_levels, is_consistent, reset_skill, InvalidAward, ProgressionEvent,
};
pub use progress::{PlayerProgression, SkillProgress};
pub use store::{JsonFileStore, MemoryStore, ProgressionStore, SharedStore, StoreError};
pub use worker::{PersistenceQueue, PersistenceWorker};

//! Per-user rolling state owned by the decision engine.

mod user_state;

pub use user_state::{
    HistoryRecord, LastReco, Outcome, PoolItem, Stats, UserState, HISTORY_CAP, POOL_CAP,
};

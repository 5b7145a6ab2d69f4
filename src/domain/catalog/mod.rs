//! Candidate catalog: the static table of merchandising directions the
//! engine can recommend, plus the vocabulary it is described in.

mod candidate;
mod season;

pub use candidate::{catalog, AccountStage, Candidate, Category, RiskTag};
pub use season::Season;

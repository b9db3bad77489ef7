pub mod router;
mod service;

pub use router::{scoring_router, ScoreRequest, ScoringState};
pub use service::{ScoringError, ScoringOutcome, ScoringService};

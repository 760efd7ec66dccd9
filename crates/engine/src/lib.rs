//! Dynasty Scout Engine — heuristic valuation over Sleeper league data
//!
//! Provides:
//! - Sleeper public-API client with soft rate limiting
//! - Player base-value estimator and ranked dynasty value pool
//! - Trade fairness calculator (base and roster-context-adjusted)
//! - Team relationship / trade-network scorer
//! - Timed caches with an injectable clock

pub mod api;
pub mod cache;
pub mod network;
pub mod sample;
pub mod service;
pub mod teams;
pub mod trades;
pub mod types;
pub mod valuation;

// Re-exports for convenience
pub use api::{FetchError, FetchResult, SleeperClient};
pub use cache::{Clock, SystemClock, TimedCache};
pub use network::score_network;
pub use service::{LeagueSource, ScoutService, TradeAnalysis, TradesView};
pub use teams::{assemble_teams, resolve_team_name};
pub use trades::{
    evaluate, evaluate_adjusted, Fairness, FairnessReport, RosterContext, TradeAsset, Winner,
};
pub use types::*;
pub use valuation::{base_value, rank_catalog, trend, VALUE_POOL_SIZE};

//! Domain types for the dynasty league scout

use serde::{Deserialize, Serialize};

/// Fantasy-relevant positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    K,
    DEF,
    Unknown,
}

impl Position {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("QB") => Self::QB,
            Some("RB") => Self::RB,
            Some("WR") => Self::WR,
            Some("TE") => Self::TE,
            Some("K") => Self::K,
            Some("DEF") => Self::DEF,
            _ => Self::Unknown,
        }
    }

    pub fn is_fantasy(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::QB => "QB",
            Self::RB => "RB",
            Self::WR => "WR",
            Self::TE => "TE",
            Self::K => "K",
            Self::DEF => "DEF",
            Self::Unknown => "?",
        }
    }
}

/// Direction a player's dynasty value is expected to move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// A valued player, ranked within the league-wide pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerValue {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    /// NFL team code, or "FA" for free agents
    pub team: String,
    pub age: Option<u32>,
    pub years_exp: u32,
    pub value: i64,
    pub trend: Trend,
    pub dynasty_rank: u32,
    pub redraft_rank: u32,
}

/// A league team: roster joined with its owner, plus standings data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub roster_id: u64,
    pub owner_name: String,
    pub team_name: String,
    pub standing: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Completed,
    Vetoed,
}

/// One participant's view of a trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSide {
    pub roster_id: u64,
    pub players_sent: Vec<String>,
    pub players_received: Vec<String>,
    pub picks_sent: Vec<String>,
    pub picks_received: Vec<String>,
}

/// Synthetic hindsight payload attached to demo trades only.
/// Values are illustrative; there is no real valuation-history feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeHindsight {
    pub value_at_execution: [i64; 2],
    pub value_after_one_year: [i64; 2],
    pub value_after_three_years: [i64; 2],
    pub grade: String,
    pub sample: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub week: Option<u32>,
    pub status: TradeStatus,
    pub roster_ids: Vec<u64>,
    pub sides: Vec<TradeSide>,
    pub hindsight: Option<TradeHindsight>,
}

/// How two teams relate, judged purely by trade counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Allies,
    Enemies,
    Neutral,
}

/// An unordered pair of teams and the strength of their trading bond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRelationship {
    pub roster_a: u64,
    pub roster_b: u64,
    pub trade_count: usize,
    pub kind: RelationshipKind,
    pub strength: u32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamActivity {
    pub roster_id: u64,
    pub trades: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamCentrality {
    pub roster_id: u64,
    pub score: u32,
}

/// Pairwise relationships plus league-wide aggregates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub total_trades: usize,
    pub relationships: Vec<TeamRelationship>,
    pub top_traders: Vec<TeamActivity>,
    pub isolated_teams: Vec<u64>,
    pub centrality: Vec<TeamCentrality>,
}

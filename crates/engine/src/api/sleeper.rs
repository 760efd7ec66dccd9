//! Sleeper API client — public endpoints, no authentication required
//!
//! Uses `api.sleeper.app/v1` for league metadata, users, rosters, matchups,
//! transactions, drafts, and the bulk NFL player catalog.

use super::{FetchError, FetchResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

const BASE_URL: &str = "https://api.sleeper.app/v1";

/// Sleeper publishes a 1000 req/min ceiling; we back off well before it.
const SOFT_CALLS_PER_MINUTE: u32 = 100;
const BACKOFF_MS: u64 = 500;

// ---------------------------------------------------------------------------
// Deserialization structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub league_id: Option<String>,
    pub name: Option<String>,
    pub season: Option<String>,
    pub status: Option<String>,
    pub total_rosters: Option<u32>,
    pub draft_id: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMetadata {
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueUser {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub metadata: Option<UserMetadata>,
}

/// Sleeper splits fractional points into an integer part and a
/// two-digit decimal companion field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSettings {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ties: Option<u32>,
    pub fpts: Option<f64>,
    pub fpts_decimal: Option<f64>,
    pub fpts_against: Option<f64>,
    pub fpts_against_decimal: Option<f64>,
}

impl RosterSettings {
    pub fn points_for(&self) -> f64 {
        self.fpts.unwrap_or(0.0) + self.fpts_decimal.unwrap_or(0.0) / 100.0
    }

    pub fn points_against(&self) -> f64 {
        self.fpts_against.unwrap_or(0.0) + self.fpts_against_decimal.unwrap_or(0.0) / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    pub roster_id: u64,
    pub owner_id: Option<String>,
    pub players: Option<Vec<String>>,
    pub starters: Option<Vec<String>>,
    pub settings: Option<RosterSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub roster_id: Option<u64>,
    pub matchup_id: Option<u64>,
    pub points: Option<f64>,
    pub players: Option<Vec<String>>,
    pub starters: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraftPick {
    pub season: Option<String>,
    pub round: Option<u32>,
    pub roster_id: Option<u64>,
    pub owner_id: Option<u64>,
    pub previous_owner_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub leg: Option<u32>,
    pub roster_ids: Option<Vec<u64>>,
    /// player_id -> roster_id receiving the player
    pub adds: Option<HashMap<String, u64>>,
    /// player_id -> roster_id giving the player up
    pub drops: Option<HashMap<String, u64>>,
    pub draft_picks: Option<Vec<TransactionDraftPick>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftInfo {
    pub draft_id: Option<String>,
    pub status: Option<String>,
    pub season: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPickRecord {
    pub player_id: Option<String>,
    pub picked_by: Option<String>,
    pub roster_id: Option<u64>,
    pub round: Option<u32>,
    pub pick_no: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogPlayer {
    pub player_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub age: Option<u32>,
    pub years_exp: Option<u32>,
    pub active: Option<bool>,
    pub status: Option<String>,
    pub search_rank: Option<u32>,
}

impl CatalogPlayer {
    /// Team defenses carry no `full_name`; fall back to first + last.
    pub fn display_name(&self) -> String {
        if let Some(full) = &self.full_name {
            if !full.is_empty() {
                return full.clone();
            }
        }
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Soft rate limiter
// ---------------------------------------------------------------------------

/// Counter-based limiter: once the per-minute call count approaches the
/// soft ceiling, each further call sleeps briefly until the window rolls.
struct RateGate {
    window_start: Instant,
    calls: u32,
}

impl RateGate {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            calls: 0,
        }
    }

    /// Returns how long the caller should pause before issuing the request.
    fn register(&mut self) -> Option<Duration> {
        if self.window_start.elapsed() >= Duration::from_secs(60) {
            self.window_start = Instant::now();
            self.calls = 0;
        }
        self.calls += 1;
        if self.calls > SOFT_CALLS_PER_MINUTE {
            Some(Duration::from_millis(BACKOFF_MS))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Client implementation
// ---------------------------------------------------------------------------

/// Sleeper API client, scoped to a single league
pub struct SleeperClient {
    client: Client,
    league_id: String,
    gate: Mutex<RateGate>,
}

impl SleeperClient {
    pub fn new(league_id: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            league_id: league_id.into(),
            gate: Mutex::new(RateGate::new()),
        }
    }

    pub fn league_id(&self) -> &str {
        &self.league_id
    }

    async fn throttle(&self) {
        let pause = self.gate.lock().await.register();
        if let Some(pause) = pause {
            debug!(ms = pause.as_millis() as u64, "Soft rate limit reached, backing off");
            tokio::time::sleep(pause).await;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        self.throttle().await;
        let url = format!("{}{}", BASE_URL, path);
        debug!("Fetching {}", url);

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Upstream {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        Ok(resp.json().await?)
    }

    /// GET /league/{id} — league metadata
    pub async fn get_league(&self) -> FetchResult<LeagueInfo> {
        self.get_json(&format!("/league/{}", self.league_id)).await
    }

    /// GET /league/{id}/users — league members
    pub async fn get_users(&self) -> FetchResult<Vec<LeagueUser>> {
        self.get_json(&format!("/league/{}/users", self.league_id))
            .await
    }

    /// GET /league/{id}/rosters — rosters with records and points
    pub async fn get_rosters(&self) -> FetchResult<Vec<RosterRecord>> {
        self.get_json(&format!("/league/{}/rosters", self.league_id))
            .await
    }

    /// GET /league/{id}/matchups/{week} — weekly matchups
    pub async fn get_matchups(&self, week: u32) -> FetchResult<Vec<MatchupRecord>> {
        self.get_json(&format!("/league/{}/matchups/{}", self.league_id, week))
            .await
    }

    /// GET /league/{id}/transactions/{week} — trades, waivers, free agency
    pub async fn get_transactions(&self, week: u32) -> FetchResult<Vec<TransactionRecord>> {
        self.get_json(&format!("/league/{}/transactions/{}", self.league_id, week))
            .await
    }

    /// GET /league/{id}/drafts — draft metadata
    pub async fn get_drafts(&self) -> FetchResult<Vec<DraftInfo>> {
        self.get_json(&format!("/league/{}/drafts", self.league_id))
            .await
    }

    /// GET /draft/{draft_id}/picks — individual draft selections
    pub async fn get_draft_picks(&self, draft_id: &str) -> FetchResult<Vec<DraftPickRecord>> {
        self.get_json(&format!("/draft/{}/picks", draft_id)).await
    }

    /// GET /players/nfl — bulk player catalog keyed by player id (~5 MB)
    pub async fn get_player_catalog(&self) -> FetchResult<HashMap<String, CatalogPlayer>> {
        self.get_json("/players/nfl").await
    }
}

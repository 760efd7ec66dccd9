//! Scout service — orchestrates fetching, caching, and the heuristic layer
//!
//! An explicitly constructed service object (no globals) generic over the
//! `LeagueSource` seam, so tests can drive it with an in-memory fake. Owns
//! the two timed caches: the bulk player catalog (24h) and the computed
//! value pool (1h). On upstream failure a stale cache is served as a
//! degraded fallback; with no cache the typed error surfaces to the caller.

use crate::api::sleeper::{
    CatalogPlayer, LeagueInfo, LeagueUser, RosterRecord, SleeperClient, TransactionRecord,
};
use crate::api::FetchResult;
use crate::cache::{Clock, SystemClock, TimedCache};
use crate::network::score_network;
use crate::sample;
use crate::teams::assemble_teams;
use crate::trades::{evaluate, evaluate_adjusted, FairnessReport, RosterContext, TradeAsset};
use crate::types::{
    NetworkSummary, PlayerValue, Position, Team, Trade, TradeSide, TradeStatus,
};
use crate::valuation::{base_value, rank_catalog};
use async_trait::async_trait;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Sleeper pages transactions by NFL week
pub const SEASON_WEEKS: u32 = 18;

const CATALOG_TTL_HOURS: i64 = 24;
const VALUES_TTL_HOURS: i64 = 1;

// ---------------------------------------------------------------------------
// Data source seam
// ---------------------------------------------------------------------------

/// The slice of the upstream API the heuristic layer depends on
#[async_trait]
pub trait LeagueSource: Send + Sync {
    async fn league(&self) -> FetchResult<LeagueInfo>;
    async fn users(&self) -> FetchResult<Vec<LeagueUser>>;
    async fn rosters(&self) -> FetchResult<Vec<RosterRecord>>;
    async fn transactions(&self, week: u32) -> FetchResult<Vec<TransactionRecord>>;
    async fn player_catalog(&self) -> FetchResult<HashMap<String, CatalogPlayer>>;
}

#[async_trait]
impl LeagueSource for SleeperClient {
    async fn league(&self) -> FetchResult<LeagueInfo> {
        self.get_league().await
    }

    async fn users(&self) -> FetchResult<Vec<LeagueUser>> {
        self.get_users().await
    }

    async fn rosters(&self) -> FetchResult<Vec<RosterRecord>> {
        self.get_rosters().await
    }

    async fn transactions(&self, week: u32) -> FetchResult<Vec<TransactionRecord>> {
        self.get_transactions(week).await
    }

    async fn player_catalog(&self) -> FetchResult<HashMap<String, CatalogPlayer>> {
        self.get_player_catalog().await
    }
}

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// Trade list plus an explicit marker when sample data is substituted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradesView {
    pub trades: Vec<Trade>,
    pub sample: bool,
    pub note: Option<String>,
}

/// Full analysis of a proposed trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAnalysis {
    pub side_a: Vec<TradeAsset>,
    pub side_b: Vec<TradeAsset>,
    pub base: FairnessReport,
    /// Present only when both sides supplied roster context
    pub adjusted: Option<FairnessReport>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct ScoutService<S: LeagueSource> {
    source: S,
    clock: Arc<dyn Clock>,
    catalog: RwLock<TimedCache<Arc<HashMap<String, CatalogPlayer>>>>,
    values: RwLock<TimedCache<Arc<Vec<PlayerValue>>>>,
}

impl<S: LeagueSource> ScoutService<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            catalog: RwLock::new(TimedCache::new(Duration::hours(CATALOG_TTL_HOURS))),
            values: RwLock::new(TimedCache::new(Duration::hours(VALUES_TTL_HOURS))),
        }
    }

    pub fn with_system_clock(source: S) -> Self {
        Self::new(source, Arc::new(SystemClock))
    }

    pub async fn league(&self) -> FetchResult<LeagueInfo> {
        self.source.league().await
    }

    /// The bulk player catalog, cached for 24 hours. A stale copy is
    /// served if the refresh fails.
    pub async fn catalog(&self) -> FetchResult<Arc<HashMap<String, CatalogPlayer>>> {
        {
            let cache = self.catalog.read().unwrap();
            if let Some(cached) = cache.fresh(self.clock.as_ref()) {
                return Ok(cached.clone());
            }
        }

        match self.source.player_catalog().await {
            Ok(fetched) => {
                debug!(players = fetched.len(), "Player catalog refreshed");
                let fetched = Arc::new(fetched);
                self.catalog
                    .write()
                    .unwrap()
                    .put(fetched.clone(), self.clock.as_ref());
                Ok(fetched)
            }
            Err(err) => {
                let stale = self.catalog.read().unwrap().stale().cloned();
                match stale {
                    Some(stale) => {
                        warn!(error = %err, "Catalog refresh failed, serving stale cache");
                        Ok(stale)
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// The ranked value pool, recomputed at most hourly
    pub async fn player_values(&self) -> FetchResult<Arc<Vec<PlayerValue>>> {
        {
            let cache = self.values.read().unwrap();
            if let Some(cached) = cache.fresh(self.clock.as_ref()) {
                return Ok(cached.clone());
            }
        }

        match self.catalog().await {
            Ok(catalog) => {
                let ranked = Arc::new(rank_catalog(&catalog));
                self.values
                    .write()
                    .unwrap()
                    .put(ranked.clone(), self.clock.as_ref());
                Ok(ranked)
            }
            Err(err) => {
                let stale = self.values.read().unwrap().stale().cloned();
                match stale {
                    Some(stale) => {
                        warn!(error = %err, "Value refresh failed, serving stale values");
                        Ok(stale)
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Standings: rosters and users fetched concurrently, then joined
    pub async fn teams(&self) -> FetchResult<Vec<Team>> {
        let (rosters, users) = tokio::join!(self.source.rosters(), self.source.users());
        Ok(assemble_teams(&rosters?, &users?))
    }

    /// All trades across the season's transaction pages (weeks 1–18)
    pub async fn league_trades(&self) -> FetchResult<Vec<Trade>> {
        let mut trades = Vec::new();
        for week in 1..=SEASON_WEEKS {
            for tx in self.source.transactions(week).await? {
                if let Some(trade) = trade_from_transaction(&tx, week) {
                    trades.push(trade);
                }
            }
        }
        Ok(trades)
    }

    /// Trade list for display; substitutes clearly labeled sample data
    /// when the league has no trading history
    pub async fn trades_view(&self) -> FetchResult<TradesView> {
        let trades = self.league_trades().await?;
        if trades.is_empty() {
            return Ok(TradesView {
                trades: sample::demo_trades(),
                sample: true,
                note: Some("No trading history yet; showing sample data".to_string()),
            });
        }
        Ok(TradesView {
            trades,
            sample: false,
            note: None,
        })
    }

    /// Relationship network over completed trades
    pub async fn network(&self) -> FetchResult<NetworkSummary> {
        let (rosters, trades) = tokio::join!(self.source.rosters(), self.league_trades());
        let roster_ids: Vec<u64> = rosters?.iter().map(|r| r.roster_id).collect();
        Ok(score_network(&roster_ids, &trades?))
    }

    /// Resolve player ids to valued trade assets. Ids missing from the
    /// catalog are skipped, never errors.
    pub async fn resolve_assets(&self, player_ids: &[String]) -> FetchResult<Vec<TradeAsset>> {
        let catalog = self.catalog().await?;
        Ok(player_ids
            .iter()
            .filter_map(|id| {
                let player = catalog.get(id)?;
                let position = Position::parse(player.position.as_deref());
                let age = player.age.filter(|a| *a > 0);
                let years_exp = player.years_exp.unwrap_or(0);
                Some(TradeAsset {
                    player_id: id.clone(),
                    name: player.display_name(),
                    position,
                    value: base_value(position, age, years_exp, player.search_rank),
                })
            })
            .collect())
    }

    /// Positional composition of one roster, for the adjusted variant
    pub async fn roster_context(&self, roster_id: u64) -> FetchResult<RosterContext> {
        let (rosters, catalog) = tokio::join!(self.source.rosters(), self.catalog());
        let rosters = rosters?;
        let catalog = catalog?;

        let mut context = RosterContext::default();
        let Some(roster) = rosters.iter().find(|r| r.roster_id == roster_id) else {
            return Ok(context);
        };
        for id in roster.players.as_deref().unwrap_or(&[]) {
            let position = catalog
                .get(id)
                .map(|p| Position::parse(p.position.as_deref()))
                .unwrap_or(Position::Unknown);
            match position {
                Position::QB => context.qb_count += 1,
                Position::WR => context.wr_count += 1,
                _ => {}
            }
        }
        Ok(context)
    }

    /// Analyze a proposed trade. Sides list the player ids each side
    /// receives; roster ids enable the context-adjusted variant.
    pub async fn analyze_trade(
        &self,
        side_a_ids: &[String],
        side_b_ids: &[String],
        roster_a: Option<u64>,
        roster_b: Option<u64>,
    ) -> FetchResult<TradeAnalysis> {
        let side_a = self.resolve_assets(side_a_ids).await?;
        let side_b = self.resolve_assets(side_b_ids).await?;
        let base = evaluate(&side_a, &side_b);

        let adjusted = match (roster_a, roster_b) {
            (Some(a), Some(b)) => {
                let ctx_a = self.roster_context(a).await?;
                let ctx_b = self.roster_context(b).await?;
                Some(evaluate_adjusted(&side_a, &side_b, &ctx_a, &ctx_b))
            }
            _ => None,
        };

        Ok(TradeAnalysis {
            side_a,
            side_b,
            base,
            adjusted,
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction -> Trade
// ---------------------------------------------------------------------------

/// Build a domain trade from a raw transaction record; non-trade
/// transactions (waivers, free agency) yield `None`.
pub fn trade_from_transaction(tx: &TransactionRecord, week: u32) -> Option<Trade> {
    if tx.kind.as_deref() != Some("trade") {
        return None;
    }

    let status = match tx.status.as_deref() {
        Some("complete") => TradeStatus::Completed,
        Some("vetoed") => TradeStatus::Vetoed,
        _ => TradeStatus::Pending,
    };

    let roster_ids = tx.roster_ids.clone().unwrap_or_default();
    let adds = tx.adds.clone().unwrap_or_default();
    let drops = tx.drops.clone().unwrap_or_default();
    let picks = tx.draft_picks.clone().unwrap_or_default();

    let sides = roster_ids
        .iter()
        .map(|&roster_id| {
            let mut players_received: Vec<String> = adds
                .iter()
                .filter(|(_, &rid)| rid == roster_id)
                .map(|(id, _)| id.clone())
                .collect();
            players_received.sort_unstable();
            let mut players_sent: Vec<String> = drops
                .iter()
                .filter(|(_, &rid)| rid == roster_id)
                .map(|(id, _)| id.clone())
                .collect();
            players_sent.sort_unstable();

            let pick_label = |p: &crate::api::sleeper::TransactionDraftPick| {
                format!(
                    "{} round {}",
                    p.season.as_deref().unwrap_or("?"),
                    p.round.map(|r| r.to_string()).unwrap_or_else(|| "?".into())
                )
            };
            let picks_received: Vec<String> = picks
                .iter()
                .filter(|p| p.owner_id == Some(roster_id))
                .map(pick_label)
                .collect();
            let picks_sent: Vec<String> = picks
                .iter()
                .filter(|p| p.previous_owner_id == Some(roster_id))
                .map(pick_label)
                .collect();

            TradeSide {
                roster_id,
                players_sent,
                players_received,
                picks_sent,
                picks_received,
            }
        })
        .collect();

    Some(Trade {
        trade_id: tx
            .transaction_id
            .clone()
            .unwrap_or_else(|| format!("week-{}-trade", week)),
        week: Some(week),
        status,
        roster_ids,
        sides,
        hindsight: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::cache::testing::ManualClock;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    fn make_player(
        id: &str,
        position: &str,
        age: Option<u32>,
        years_exp: u32,
        search_rank: Option<u32>,
    ) -> CatalogPlayer {
        CatalogPlayer {
            player_id: Some(id.into()),
            first_name: None,
            last_name: None,
            full_name: Some(format!("Player {}", id)),
            position: Some(position.into()),
            team: Some("KC".into()),
            age,
            years_exp: Some(years_exp),
            active: Some(true),
            status: Some("Active".into()),
            search_rank,
        }
    }

    struct FakeSource {
        catalog: HashMap<String, CatalogPlayer>,
        transactions: Vec<TransactionRecord>,
        rosters: Vec<RosterRecord>,
        fail_catalog: Arc<AtomicBool>,
        catalog_fetches: Arc<AtomicU32>,
    }

    impl FakeSource {
        fn new() -> Self {
            let mut catalog = HashMap::new();
            catalog.insert("qb1".into(), make_player("qb1", "QB", Some(22), 1, Some(10)));
            catalog.insert("wr1".into(), make_player("wr1", "WR", Some(25), 3, Some(40)));
            catalog.insert("rb1".into(), make_player("rb1", "RB", Some(27), 5, Some(80)));
            Self {
                catalog,
                transactions: Vec::new(),
                rosters: Vec::new(),
                fail_catalog: Arc::new(AtomicBool::new(false)),
                catalog_fetches: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl LeagueSource for FakeSource {
        async fn league(&self) -> FetchResult<LeagueInfo> {
            Ok(LeagueInfo {
                league_id: Some("test".into()),
                name: Some("Test League".into()),
                season: Some("2025".into()),
                status: Some("in_season".into()),
                total_rosters: Some(12),
                draft_id: None,
                avatar: None,
            })
        }

        async fn users(&self) -> FetchResult<Vec<LeagueUser>> {
            Ok(Vec::new())
        }

        async fn rosters(&self) -> FetchResult<Vec<RosterRecord>> {
            Ok(self.rosters.clone())
        }

        async fn transactions(&self, week: u32) -> FetchResult<Vec<TransactionRecord>> {
            Ok(self
                .transactions
                .iter()
                .filter(|t| t.leg == Some(week))
                .cloned()
                .collect())
        }

        async fn player_catalog(&self) -> FetchResult<HashMap<String, CatalogPlayer>> {
            self.catalog_fetches.fetch_add(1, Ordering::Relaxed);
            if self.fail_catalog.load(Ordering::Relaxed) {
                return Err(FetchError::Upstream {
                    endpoint: "/players/nfl".into(),
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(self.catalog.clone())
        }
    }

    fn service(source: FakeSource, clock: Arc<ManualClock>) -> ScoutService<FakeSource> {
        ScoutService::new(source, clock)
    }

    #[tokio::test]
    async fn values_are_cached_within_their_windows() {
        let source = FakeSource::new();
        let fetches = source.catalog_fetches.clone();
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let svc = service(source, clock.clone());

        let first = svc.player_values().await.unwrap();
        let second = svc.player_values().await.unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(fetches.load(Ordering::Relaxed), 1);

        // Values expire hourly but recompute from the still-fresh catalog
        clock.advance(Duration::hours(2));
        svc.player_values().await.unwrap();
        assert_eq!(fetches.load(Ordering::Relaxed), 1);

        // Past the catalog window both refresh
        clock.advance(Duration::hours(25));
        svc.player_values().await.unwrap();
        assert_eq!(fetches.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn stale_cache_serves_through_upstream_failure() {
        let source = FakeSource::new();
        let fail = source.fail_catalog.clone();
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let svc = service(source, clock.clone());

        svc.player_values().await.unwrap();
        clock.advance(Duration::hours(30));
        fail.store(true, Ordering::Relaxed);

        let values = svc.player_values().await.unwrap();
        assert!(!values.is_empty());
    }

    #[tokio::test]
    async fn failure_with_no_cache_surfaces_typed_error() {
        let source = FakeSource::new();
        source.fail_catalog.store(true, Ordering::Relaxed);
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let svc = service(source, clock);

        let err = svc.player_values().await.unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn analyze_trade_skips_unknown_ids() {
        let source = FakeSource::new();
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let svc = service(source, clock);

        let analysis = svc
            .analyze_trade(
                &["qb1".into(), "ghost".into()],
                &["wr1".into()],
                None,
                None,
            )
            .await
            .unwrap();

        assert_eq!(analysis.side_a.len(), 1);
        // Worked example: 1000 * 1.2 * 1.4 * 1.2 * 1.8 = 3628.8 -> 3629
        assert_eq!(analysis.side_a[0].value, 3629);
        assert!(analysis.adjusted.is_none());
    }

    #[test]
    fn transaction_becomes_trade_with_sorted_sides() {
        let tx = TransactionRecord {
            transaction_id: Some("tx1".into()),
            kind: Some("trade".into()),
            status: Some("complete".into()),
            leg: Some(4),
            roster_ids: Some(vec![1, 2]),
            adds: Some(HashMap::from([
                ("wr9".to_string(), 1u64),
                ("rb7".to_string(), 1u64),
                ("qb3".to_string(), 2u64),
            ])),
            drops: Some(HashMap::from([
                ("qb3".to_string(), 1u64),
                ("wr9".to_string(), 2u64),
                ("rb7".to_string(), 2u64),
            ])),
            draft_picks: Some(vec![crate::api::sleeper::TransactionDraftPick {
                season: Some("2026".into()),
                round: Some(2),
                roster_id: Some(1),
                owner_id: Some(2),
                previous_owner_id: Some(1),
            }]),
        };

        let trade = trade_from_transaction(&tx, 4).unwrap();
        assert_eq!(trade.status, TradeStatus::Completed);
        assert_eq!(trade.roster_ids, vec![1, 2]);

        let side_one = &trade.sides[0];
        assert_eq!(side_one.players_received, vec!["rb7", "wr9"]);
        assert_eq!(side_one.players_sent, vec!["qb3"]);
        assert_eq!(side_one.picks_sent, vec!["2026 round 2"]);

        let side_two = &trade.sides[1];
        assert_eq!(side_two.players_received, vec!["qb3"]);
        assert_eq!(side_two.picks_received, vec!["2026 round 2"]);
    }

    #[test]
    fn waivers_are_not_trades() {
        let tx = TransactionRecord {
            transaction_id: Some("tx2".into()),
            kind: Some("waiver".into()),
            status: Some("complete".into()),
            leg: Some(4),
            roster_ids: Some(vec![1]),
            adds: None,
            drops: None,
            draft_picks: None,
        };
        assert!(trade_from_transaction(&tx, 4).is_none());
    }

    #[tokio::test]
    async fn empty_league_gets_labeled_sample_trades() {
        let source = FakeSource::new();
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let svc = service(source, clock);

        let view = svc.trades_view().await.unwrap();
        assert!(view.sample);
        assert!(view.note.is_some());
        assert!(view.trades.iter().all(|t| t
            .hindsight
            .as_ref()
            .map(|h| h.sample)
            .unwrap_or(false)));
    }
}

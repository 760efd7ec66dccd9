//! Team Relationship / Network Scorer
//!
//! Derives pairwise team relationships and league-wide aggregates purely
//! from trade counts. With zero trades league-wide (pre-draft) every pair
//! is neutral and every team isolated; relationships are never fabricated.

use crate::types::{
    NetworkSummary, RelationshipKind, TeamActivity, TeamCentrality, TeamRelationship, Trade,
    TradeStatus,
};

/// Trades between a pair at or above this count make them allies
const ALLY_TRADE_COUNT: usize = 3;
const ALLY_STRENGTH_MULT: usize = 25;
const NEUTRAL_STRENGTH_MULT: usize = 20;
const ENEMY_STRENGTH: u32 = 40;

/// League-wide completed trades above this signal that a zero-trade pair
/// is avoiding each other rather than simply in a quiet league
const LEAGUE_ACTIVITY_THRESHOLD: usize = 10;

const TOP_TRADERS: usize = 5;

/// Score every unordered pair of rosters against the completed trade list
pub fn score_network(roster_ids: &[u64], trades: &[Trade]) -> NetworkSummary {
    let completed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Completed)
        .collect();
    let total_trades = completed.len();

    let mut relationships = Vec::new();
    for (i, &a) in roster_ids.iter().enumerate() {
        for &b in &roster_ids[i + 1..] {
            let count = completed
                .iter()
                .filter(|t| t.roster_ids.contains(&a) && t.roster_ids.contains(&b))
                .count();
            relationships.push(classify_pair(a, b, count, total_trades));
        }
    }

    // Per-team totals across all pairs
    let mut activity: Vec<TeamActivity> = roster_ids
        .iter()
        .map(|&roster_id| TeamActivity {
            roster_id,
            trades: relationships
                .iter()
                .filter(|r| r.roster_a == roster_id || r.roster_b == roster_id)
                .map(|r| r.trade_count)
                .sum(),
        })
        .collect();
    activity.sort_by(|a, b| b.trades.cmp(&a.trades).then(a.roster_id.cmp(&b.roster_id)));

    let isolated_teams: Vec<u64> = {
        let mut ids: Vec<u64> = activity
            .iter()
            .filter(|a| a.trades <= 1)
            .map(|a| a.roster_id)
            .collect();
        ids.sort_unstable();
        ids
    };

    let relationship_count = relationships.len();
    let mut centrality: Vec<TeamCentrality> = roster_ids
        .iter()
        .map(|&roster_id| {
            let strength_sum: u32 = relationships
                .iter()
                .filter(|r| r.roster_a == roster_id || r.roster_b == roster_id)
                .map(|r| r.strength)
                .sum();
            let score = if relationship_count > 0 {
                (strength_sum as f64 / relationship_count as f64).round() as u32
            } else {
                0
            };
            TeamCentrality { roster_id, score }
        })
        .collect();
    centrality.sort_by(|a, b| b.score.cmp(&a.score).then(a.roster_id.cmp(&b.roster_id)));

    let top_traders = activity.iter().take(TOP_TRADERS).cloned().collect();

    NetworkSummary {
        total_trades,
        relationships,
        top_traders,
        isolated_teams,
        centrality,
    }
}

fn classify_pair(a: u64, b: u64, count: usize, league_total: usize) -> TeamRelationship {
    let (kind, strength, note) = if count >= ALLY_TRADE_COUNT {
        (
            RelationshipKind::Allies,
            (count * ALLY_STRENGTH_MULT).min(100) as u32,
            None,
        )
    } else if count == 0 {
        if league_total > LEAGUE_ACTIVITY_THRESHOLD {
            // Active league, never trade with each other: avoidance
            (RelationshipKind::Enemies, ENEMY_STRENGTH, None)
        } else {
            (
                RelationshipKind::Neutral,
                0,
                Some("No trades between these teams yet".to_string()),
            )
        }
    } else {
        (
            RelationshipKind::Neutral,
            (count * NEUTRAL_STRENGTH_MULT) as u32,
            None,
        )
    };

    TeamRelationship {
        roster_a: a,
        roster_b: b,
        trade_count: count,
        kind,
        strength,
        note,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeSide;

    fn make_trade(id: u32, rosters: &[u64]) -> Trade {
        Trade {
            trade_id: format!("t{}", id),
            week: Some(1 + id % 17),
            status: TradeStatus::Completed,
            roster_ids: rosters.to_vec(),
            sides: rosters
                .iter()
                .map(|&roster_id| TradeSide {
                    roster_id,
                    players_sent: vec![],
                    players_received: vec![],
                    picks_sent: vec![],
                    picks_received: vec![],
                })
                .collect(),
            hindsight: None,
        }
    }

    fn relationship(summary: &NetworkSummary, a: u64, b: u64) -> &TeamRelationship {
        summary
            .relationships
            .iter()
            .find(|r| (r.roster_a == a && r.roster_b == b) || (r.roster_a == b && r.roster_b == a))
            .unwrap()
    }

    #[test]
    fn quiet_pair_in_active_league_is_enemies() {
        // 11 trades league-wide, none between rosters 1 and 2
        let trades: Vec<Trade> = (0..11).map(|i| make_trade(i, &[3, 4])).collect();
        let summary = score_network(&[1, 2, 3, 4], &trades);

        let pair = relationship(&summary, 1, 2);
        assert_eq!(pair.kind, RelationshipKind::Enemies);
        assert_eq!(pair.strength, 40);
    }

    #[test]
    fn pre_draft_league_is_all_neutral_and_isolated() {
        let summary = score_network(&[1, 2, 3, 4], &[]);

        assert_eq!(summary.total_trades, 0);
        assert!(summary
            .relationships
            .iter()
            .all(|r| r.kind == RelationshipKind::Neutral && r.strength == 0));
        assert!(summary
            .relationships
            .iter()
            .all(|r| r.note.as_deref() == Some("No trades between these teams yet")));
        assert_eq!(summary.isolated_teams, vec![1, 2, 3, 4]);
        assert!(summary.centrality.iter().all(|c| c.score == 0));
    }

    #[test]
    fn frequent_partners_become_allies_capped_at_100() {
        let trades: Vec<Trade> = (0..5).map(|i| make_trade(i, &[1, 2])).collect();
        let summary = score_network(&[1, 2, 3], &trades);

        let pair = relationship(&summary, 1, 2);
        assert_eq!(pair.kind, RelationshipKind::Allies);
        assert_eq!(pair.strength, 100); // 5 * 25 capped
    }

    #[test]
    fn occasional_partners_stay_neutral() {
        let trades = vec![make_trade(0, &[1, 2]), make_trade(1, &[1, 2])];
        let summary = score_network(&[1, 2], &trades);

        let pair = relationship(&summary, 1, 2);
        assert_eq!(pair.kind, RelationshipKind::Neutral);
        assert_eq!(pair.strength, 40); // 2 * 20
        assert!(pair.note.is_none());
    }

    #[test]
    fn aggregates_rank_the_most_active_traders() {
        let mut trades = vec![
            make_trade(0, &[1, 2]),
            make_trade(1, &[1, 2]),
            make_trade(2, &[1, 3]),
            make_trade(3, &[2, 3]),
        ];
        trades.push(make_trade(4, &[1, 4]));
        let summary = score_network(&[1, 2, 3, 4, 5, 6], &trades);

        assert_eq!(summary.top_traders.len(), 5);
        assert_eq!(summary.top_traders[0].roster_id, 1);
        assert_eq!(summary.top_traders[0].trades, 4);
        assert_eq!(summary.isolated_teams, vec![4, 5, 6]);

        // Centrality sorted descending, roster 1 on top
        assert_eq!(summary.centrality[0].roster_id, 1);
        for pair in summary.centrality.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn vetoed_trades_do_not_count() {
        let mut vetoed = make_trade(0, &[1, 2]);
        vetoed.status = TradeStatus::Vetoed;
        let summary = score_network(&[1, 2], &[vetoed]);

        assert_eq!(summary.total_trades, 0);
        assert_eq!(relationship(&summary, 1, 2).trade_count, 0);
    }
}

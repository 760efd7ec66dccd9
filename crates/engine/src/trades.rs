//! Trade Fairness Calculator — compare two bundles of players
//!
//! Sides are described by what each side *receives*. The base variant
//! compares raw value sums; the adjusted variant applies roster-context
//! multipliers (asset-count penalty, elite consolidation, positional need)
//! before reclassifying against tightened thresholds.

use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Received single asset at or above this value counts as elite
const ELITE_VALUE: i64 = 6000;

/// Per excess asset given over received
const ASSET_COUNT_PENALTY: f64 = 0.05;
const CONSOLIDATION_BONUS: f64 = 1.15;
const QB_NEED_BONUS: f64 = 1.20;
const WR_NEED_BONUS: f64 = 1.15;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A player resolved to its dynasty value for trade analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAsset {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub value: i64,
}

/// Positional composition of a side's existing roster
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RosterContext {
    pub qb_count: usize,
    pub wr_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fairness {
    VeryFair,
    Fair,
    SomewhatUnfair,
    VeryUnfair,
}

impl Fairness {
    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryFair => "Very Fair",
            Self::Fair => "Fair",
            Self::SomewhatUnfair => "Somewhat Unfair",
            Self::VeryUnfair => "Very Unfair",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    SideA,
    SideB,
    Even,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessReport {
    pub side_a_total: i64,
    pub side_b_total: i64,
    pub pct_difference: f64,
    pub fairness: Fairness,
    pub winner: Winner,
    pub recommendation: String,
    /// Human-readable adjustment reasons, empty for the base variant
    pub adjustments_a: Vec<String>,
    pub adjustments_b: Vec<String>,
}

/// Classification thresholds: (very_fair, fair, somewhat_unfair)
const BASE_THRESHOLDS: (f64, f64, f64) = (5.0, 15.0, 25.0);
const ADJUSTED_THRESHOLDS: (f64, f64, f64) = (3.0, 8.0, 20.0);

// ---------------------------------------------------------------------------
// Base evaluation
// ---------------------------------------------------------------------------

/// Compare the raw value sums of what each side receives
pub fn evaluate(side_a: &[TradeAsset], side_b: &[TradeAsset]) -> FairnessReport {
    let total_a: i64 = side_a.iter().map(|a| a.value).sum();
    let total_b: i64 = side_b.iter().map(|a| a.value).sum();
    classify(total_a, total_b, BASE_THRESHOLDS, Vec::new(), Vec::new())
}

/// Compare adjusted sums: each side's raw sum scaled by its compounded
/// context multipliers, rounded, then reclassified with tighter thresholds
pub fn evaluate_adjusted(
    side_a: &[TradeAsset],
    side_b: &[TradeAsset],
    roster_a: &RosterContext,
    roster_b: &RosterContext,
) -> FairnessReport {
    let (mult_a, reasons_a) = side_multiplier(side_a, side_b, roster_a);
    let (mult_b, reasons_b) = side_multiplier(side_b, side_a, roster_b);

    let raw_a: i64 = side_a.iter().map(|a| a.value).sum();
    let raw_b: i64 = side_b.iter().map(|a| a.value).sum();
    let adjusted_a = (raw_a as f64 * mult_a).round() as i64;
    let adjusted_b = (raw_b as f64 * mult_b).round() as i64;

    classify(adjusted_a, adjusted_b, ADJUSTED_THRESHOLDS, reasons_a, reasons_b)
}

/// Multiplier for one side. `received` is what the side gets, `given` is
/// what it sends away (the other side's received bundle).
fn side_multiplier(
    received: &[TradeAsset],
    given: &[TradeAsset],
    roster: &RosterContext,
) -> (f64, Vec<String>) {
    let mut mult = 1.0;
    let mut reasons = Vec::new();

    if given.len() > received.len() {
        let excess = given.len() - received.len();
        mult *= 1.0 - ASSET_COUNT_PENALTY * excess as f64;
        reasons.push(format!(
            "Gives {} more asset{} than received (-{}%)",
            excess,
            if excess == 1 { "" } else { "s" },
            excess * 5
        ));
    }

    if received.len() == 1 && given.len() >= 2 && received[0].value >= ELITE_VALUE {
        mult *= CONSOLIDATION_BONUS;
        reasons.push(format!(
            "Consolidates into elite asset {} (+15%)",
            received[0].name
        ));
    }

    if roster.qb_count < 2 && received.iter().any(|a| a.position == Position::QB) {
        mult *= QB_NEED_BONUS;
        reasons.push("Fills quarterback need (+20%)".to_string());
    }
    if roster.wr_count < 3 && received.iter().any(|a| a.position == Position::WR) {
        mult *= WR_NEED_BONUS;
        reasons.push("Fills wide receiver need (+15%)".to_string());
    }

    (mult, reasons)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

fn classify(
    total_a: i64,
    total_b: i64,
    thresholds: (f64, f64, f64),
    adjustments_a: Vec<String>,
    adjustments_b: Vec<String>,
) -> FairnessReport {
    let avg = (total_a + total_b) as f64 / 2.0;
    let pct_difference = if avg > 0.0 {
        (total_a - total_b).abs() as f64 / avg * 100.0
    } else {
        0.0
    };

    let (very_fair, fair, somewhat) = thresholds;
    let fairness = if pct_difference < very_fair {
        Fairness::VeryFair
    } else if pct_difference < fair {
        Fairness::Fair
    } else if pct_difference < somewhat {
        Fairness::SomewhatUnfair
    } else {
        Fairness::VeryUnfair
    };

    let winner = if pct_difference < very_fair {
        Winner::Even
    } else if total_a > total_b {
        Winner::SideA
    } else {
        Winner::SideB
    };

    let gap = (total_a - total_b).abs();
    let recommendation = match winner {
        Winner::Even => "Trade is balanced".to_string(),
        Winner::SideA => format!("Side B should add about {} points of value to balance", gap),
        Winner::SideB => format!("Side A should add about {} points of value to balance", gap),
    };

    FairnessReport {
        side_a_total: total_a,
        side_b_total: total_b,
        pct_difference,
        fairness,
        winner,
        recommendation,
        adjustments_a,
        adjustments_b,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, position: Position, value: i64) -> TradeAsset {
        TradeAsset {
            player_id: id.into(),
            name: format!("Player {}", id.to_uppercase()),
            position,
            value,
        }
    }

    fn deep_roster() -> RosterContext {
        RosterContext { qb_count: 3, wr_count: 6 }
    }

    #[test]
    fn single_player_swap_worked_example() {
        // |9200 - 8500| / 8850 * 100 ≈ 7.9% → Fair, side A wins
        let a = [asset("a", Position::RB, 9200)];
        let b = [asset("b", Position::RB, 8500)];
        let report = evaluate(&a, &b);

        assert!((report.pct_difference - 7.909604519774012).abs() < 1e-9);
        assert_eq!(report.fairness, Fairness::Fair);
        assert_eq!(report.winner, Winner::SideA);
        assert!(report.recommendation.contains("700"));
    }

    #[test]
    fn equal_sums_classify_even() {
        let a = [asset("a", Position::WR, 4000), asset("b", Position::RB, 2000)];
        let b = [asset("c", Position::QB, 6000)];
        let report = evaluate(&a, &b);

        assert_eq!(report.fairness, Fairness::VeryFair);
        assert_eq!(report.winner, Winner::Even);
        assert_eq!(report.recommendation, "Trade is balanced");
    }

    #[test]
    fn side_swap_is_symmetric() {
        let a = [asset("a", Position::WR, 7000)];
        let b = [asset("b", Position::RB, 5000)];

        let forward = evaluate(&a, &b);
        let swapped = evaluate(&b, &a);

        assert_eq!(forward.fairness, swapped.fairness);
        assert!((forward.pct_difference - swapped.pct_difference).abs() < 1e-9);
        assert_eq!(forward.winner, Winner::SideA);
        assert_eq!(swapped.winner, Winner::SideB);
    }

    #[test]
    fn lopsided_bundle_is_very_unfair() {
        let a = [asset("a", Position::QB, 9000)];
        let b = [asset("b", Position::K, 1000)];
        let report = evaluate(&a, &b);
        assert_eq!(report.fairness, Fairness::VeryUnfair);
    }

    #[test]
    fn asset_count_penalty_applies_to_the_deeper_giver() {
        // Side A receives one asset but gives three: −10% on its sum
        let a = [asset("a", Position::TE, 4000)];
        let b = [
            asset("b", Position::RB, 1500),
            asset("c", Position::RB, 1500),
            asset("d", Position::RB, 1000),
        ];
        let report = evaluate_adjusted(&a, &b, &deep_roster(), &deep_roster());

        assert_eq!(report.side_a_total, 3600);
        assert_eq!(report.side_b_total, 4000);
        assert!(report.adjustments_a.iter().any(|r| r.contains("-10%")));
        assert!(report.adjustments_b.is_empty());
    }

    #[test]
    fn consolidation_bonus_needs_an_elite_return() {
        let elite = [asset("a", Position::WR, 8000)];
        let pieces = [asset("b", Position::RB, 3500), asset("c", Position::WR, 3500)];
        let report = evaluate_adjusted(&elite, &pieces, &deep_roster(), &deep_roster());

        // -5% for the extra asset given, +15% consolidation: 8000 * 0.95 * 1.15
        assert_eq!(report.side_a_total, 8740);
        assert!(report
            .adjustments_a
            .iter()
            .any(|r| r.contains("Consolidates into elite asset")));

        // Below the elite bar the bonus does not trigger
        let modest = [asset("a", Position::WR, 5000)];
        let report = evaluate_adjusted(&modest, &pieces, &deep_roster(), &deep_roster());
        assert!(!report
            .adjustments_a
            .iter()
            .any(|r| r.contains("Consolidates")));
    }

    #[test]
    fn positional_need_bonuses() {
        let qb_thin = RosterContext { qb_count: 1, wr_count: 6 };
        let wr_thin = RosterContext { qb_count: 3, wr_count: 2 };

        let a = [asset("a", Position::QB, 5000)];
        let b = [asset("b", Position::WR, 5000)];
        let report = evaluate_adjusted(&a, &b, &qb_thin, &wr_thin);

        assert_eq!(report.side_a_total, 6000); // +20% QB need
        assert_eq!(report.side_b_total, 5750); // +15% WR need
        assert!(report.adjustments_a.iter().any(|r| r.contains("quarterback")));
        assert!(report.adjustments_b.iter().any(|r| r.contains("wide receiver")));
    }

    #[test]
    fn adjusted_thresholds_are_tighter() {
        // 4% apart: Very Fair at base thresholds, only Fair adjusted
        let a = [asset("a", Position::RB, 5100)];
        let b = [asset("b", Position::RB, 4900)];

        assert_eq!(evaluate(&a, &b).fairness, Fairness::VeryFair);
        let adjusted = evaluate_adjusted(&a, &b, &deep_roster(), &deep_roster());
        assert_eq!(adjusted.fairness, Fairness::Fair);
        assert_eq!(adjusted.winner, Winner::SideA);
    }

    #[test]
    fn empty_sides_are_balanced() {
        let report = evaluate(&[], &[]);
        assert_eq!(report.pct_difference, 0.0);
        assert_eq!(report.winner, Winner::Even);
    }
}

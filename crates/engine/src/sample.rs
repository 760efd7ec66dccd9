//! Sample data provider — illustrative trades for leagues with no history
//!
//! Used only when the real data source reports emptiness (pre-draft, no
//! trading yet). Every record is tagged `sample: true` and carries a
//! synthetic hindsight payload; nothing here is ever mixed into results
//! computed from real league data.

use crate::types::{Trade, TradeHindsight, TradeSide, TradeStatus};

/// A single illustrative trade with fabricated hindsight grading
pub fn demo_trades() -> Vec<Trade> {
    vec![Trade {
        trade_id: "sample-1".to_string(),
        week: Some(3),
        status: TradeStatus::Completed,
        roster_ids: vec![1, 2],
        sides: vec![
            TradeSide {
                roster_id: 1,
                players_sent: vec!["4034".to_string()],
                players_received: vec!["6794".to_string(), "7547".to_string()],
                picks_sent: vec![],
                picks_received: vec!["2026 2nd".to_string()],
            },
            TradeSide {
                roster_id: 2,
                players_sent: vec!["6794".to_string(), "7547".to_string()],
                players_received: vec!["4034".to_string()],
                picks_sent: vec!["2026 2nd".to_string()],
                picks_received: vec![],
            },
        ],
        hindsight: Some(demo_hindsight()),
    }]
}

/// Fabricated value evolution; no real historical value feed exists
pub fn demo_hindsight() -> TradeHindsight {
    TradeHindsight {
        value_at_execution: [7800, 7650],
        value_after_one_year: [8400, 6900],
        value_after_three_years: [9100, 5200],
        grade: "A-".to_string(),
        sample: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_trades_are_always_tagged_sample() {
        for trade in demo_trades() {
            let hindsight = trade.hindsight.expect("demo trades carry hindsight");
            assert!(hindsight.sample);
        }
    }
}

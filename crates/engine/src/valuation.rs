//! Player Base-Value Estimator — map raw player records to dynasty value
//!
//! All factors are multiplicative against a base of 1000: position, age,
//! experience, and popularity rank. The valued pool is active players at
//! fantasy positions, ranked 1..=500 by descending score.

use crate::api::sleeper::CatalogPlayer;
use crate::types::{PlayerValue, Position, Trend};
use std::collections::HashMap;

pub const BASE_VALUE: f64 = 1000.0;

/// Ranked pool size exposed to the front-end
pub const VALUE_POOL_SIZE: usize = 500;

/// Popularity ranks beyond this are treated as unranked
const POPULARITY_CUTOFF: u32 = 300;

// ---------------------------------------------------------------------------
// Multiplier tables
// ---------------------------------------------------------------------------

fn position_multiplier(position: Position) -> f64 {
    match position {
        Position::QB => 1.2,
        Position::RB => 1.0,
        Position::WR => 1.1,
        Position::TE => 0.8,
        Position::K => 0.3,
        Position::DEF => 0.4,
        Position::Unknown => 0.5,
    }
}

/// Missing or zero age gets a neutral 0.9, deliberately below the
/// prime-years tier so unknown ages are not over-valued.
fn age_multiplier(age: Option<u32>) -> f64 {
    match age {
        None | Some(0) => 0.9,
        Some(a) if a <= 23 => 1.4,
        Some(a) if a <= 26 => 1.2,
        Some(a) if a <= 29 => 1.0,
        Some(a) if a <= 32 => 0.7,
        Some(_) => 0.4,
    }
}

fn experience_multiplier(years_exp: u32) -> f64 {
    match years_exp {
        0..=2 => 1.2,
        3..=5 => 1.1,
        _ => 1.0,
    }
}

fn popularity_multiplier(search_rank: Option<u32>) -> f64 {
    match search_rank {
        Some(r) if r <= 25 => 1.8,
        Some(r) if r <= 50 => 1.5,
        Some(r) if r <= 100 => 1.2,
        Some(r) if r <= 200 => 1.1,
        Some(r) if r <= POPULARITY_CUTOFF => 0.9,
        _ => 0.7,
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Dynasty value for one player, rounded to the nearest integer
pub fn base_value(
    position: Position,
    age: Option<u32>,
    years_exp: u32,
    search_rank: Option<u32>,
) -> i64 {
    let score = BASE_VALUE
        * position_multiplier(position)
        * age_multiplier(age)
        * experience_multiplier(years_exp)
        * popularity_multiplier(search_rank);
    score.round() as i64
}

/// Young with little experience trends up, 30+ trends down. A missing age
/// falls back to the experience signal alone.
pub fn trend(age: Option<u32>, years_exp: u32) -> Trend {
    match age {
        Some(a) if a > 0 => {
            if a <= 24 && years_exp <= 2 {
                Trend::Up
            } else if a >= 30 {
                Trend::Down
            } else {
                Trend::Stable
            }
        }
        _ => {
            if years_exp <= 2 {
                Trend::Up
            } else {
                Trend::Stable
            }
        }
    }
}

/// Value the whole catalog: active fantasy-position players only, sorted
/// descending by score, truncated to the top 500, ranks assigned by
/// position (dynasty and redraft ranks are identical in this model).
pub fn rank_catalog(catalog: &HashMap<String, CatalogPlayer>) -> Vec<PlayerValue> {
    let mut values: Vec<PlayerValue> = catalog
        .iter()
        .filter_map(|(player_id, player)| {
            if player.active != Some(true) {
                return None;
            }
            let position = Position::parse(player.position.as_deref());
            if !position.is_fantasy() {
                return None;
            }

            let age = player.age.filter(|a| *a > 0);
            let years_exp = player.years_exp.unwrap_or(0);
            Some(PlayerValue {
                player_id: player_id.clone(),
                name: player.display_name(),
                position,
                team: player.team.clone().unwrap_or_else(|| "FA".to_string()),
                age,
                years_exp,
                value: base_value(position, age, years_exp, player.search_rank),
                trend: trend(age, years_exp),
                dynasty_rank: 0,
                redraft_rank: 0,
            })
        })
        .collect();

    // Tie-break on player id so equal scores rank deterministically
    values.sort_by(|a, b| b.value.cmp(&a.value).then(a.player_id.cmp(&b.player_id)));
    values.truncate(VALUE_POOL_SIZE);

    for (i, v) in values.iter_mut().enumerate() {
        v.dynasty_rank = (i + 1) as u32;
        v.redraft_rank = (i + 1) as u32;
    }

    values
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

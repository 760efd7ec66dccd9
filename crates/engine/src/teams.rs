//! Team assembly — join rosters with league users and build standings

use crate::api::sleeper::{LeagueUser, RosterRecord};
use crate::types::Team;
use std::collections::HashMap;

/// Ordered fallback chain for a team's display name:
/// explicit team-name metadata, then "<owner>'s Team", then "Team <id>".
pub fn resolve_team_name(
    metadata_name: Option<&str>,
    owner_name: Option<&str>,
    roster_id: u64,
) -> String {
    if let Some(name) = metadata_name {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    if let Some(owner) = owner_name {
        let owner = owner.trim();
        if !owner.is_empty() {
            return format!("{}'s Team", owner);
        }
    }
    format!("Team {}", roster_id)
}

/// Join rosters with users, resolve names, and assign standings by wins
/// then points-for.
pub fn assemble_teams(rosters: &[RosterRecord], users: &[LeagueUser]) -> Vec<Team> {
    let by_user_id: HashMap<&str, &LeagueUser> = users
        .iter()
        .filter_map(|u| u.user_id.as_deref().map(|id| (id, u)))
        .collect();

    let mut teams: Vec<Team> = rosters
        .iter()
        .map(|roster| {
            let user = roster.owner_id.as_deref().and_then(|id| by_user_id.get(id));
            let owner_display = user.and_then(|u| u.display_name.clone());
            let metadata_name = user
                .and_then(|u| u.metadata.as_ref())
                .and_then(|m| m.team_name.as_deref());
            let team_name =
                resolve_team_name(metadata_name, owner_display.as_deref(), roster.roster_id);
            let owner_name = owner_display.unwrap_or_else(|| "Unknown Owner".to_string());

            let settings = roster.settings.clone().unwrap_or_default();
            Team {
                roster_id: roster.roster_id,
                owner_name,
                team_name,
                standing: 0,
                wins: settings.wins.unwrap_or(0),
                losses: settings.losses.unwrap_or(0),
                ties: settings.ties.unwrap_or(0),
                points_for: settings.points_for(),
                points_against: settings.points_against(),
            }
        })
        .collect();

    teams.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.points_for.partial_cmp(&a.points_for).unwrap_or(std::cmp::Ordering::Equal))
    });
    for (i, team) in teams.iter_mut().enumerate() {
        team.standing = (i + 1) as u32;
    }

    teams
}

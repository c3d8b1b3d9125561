//! Track-based panel assignment.
//!
//! The dominant track is isolated on the 4th panel. The rest are ranked and
//! packed two per panel onto panels 1-3; anything past six tracks goes
//! round-robin over panels 1-3, starting again at panel 1.

use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::domain::{Assignment, Panel, PanelId, Team, TrackId};
use crate::error::{HackulusError, Result};
use crate::scheduler::tracks::TrackCensus;

/// Number of panels the scheduler distributes over.
pub const PANEL_COUNT: usize = 4;

/// Tracks each of the first three panels takes before overflow starts.
pub const SLOTS_PER_PANEL: usize = 2;

/// Assign every team in `teams` to one of the four `panels`.
///
/// Panels are positional: callers pass them in a stable order (ascending id).
/// The result has one entry per team, in input order. Ties between tracks are
/// broken by which track appears first in `teams`, so team order matters too.
pub fn assign(panels: &[Panel], teams: &[Team]) -> Result<Vec<Assignment>> {
    let panel_ids = panel_positions(panels)?;

    if teams.is_empty() {
        return Ok(Vec::new());
    }

    let census = TrackCensus::scan(teams);
    let mapping = map_tracks(&panel_ids, &census);

    teams
        .iter()
        .map(|team| {
            mapping
                .get(&team.track_id)
                .map(|&panel_id| Assignment::new(team.team_id, panel_id))
                .ok_or(HackulusError::Mapping {
                    team_id: team.team_id,
                    track_id: team.track_id,
                })
        })
        .collect()
}

fn panel_positions(panels: &[Panel]) -> Result<[PanelId; PANEL_COUNT]> {
    match panels {
        [p1, p2, p3, p4] => Ok([p1.panel_id, p2.panel_id, p3.panel_id, p4.panel_id]),
        _ => Err(HackulusError::invalid(
            "panels",
            format!("expected exactly {} panels, got {}", PANEL_COUNT, panels.len()),
        )),
    }
}

/// Compute the track to panel table for a census.
pub fn map_tracks(panel_ids: &[PanelId; PANEL_COUNT], census: &TrackCensus) -> HashMap<TrackId, PanelId> {
    let mut mapping = HashMap::with_capacity(census.len());

    let Some(dominant) = census.dominant() else {
        return mapping;
    };
    let [lower @ .., last] = panel_ids;
    mapping.insert(dominant.track_id, *last);
    debug!(
        "Dominant track {} ({} teams) -> panel {}",
        dominant.track_id, dominant.count, last
    );

    let packed = SLOTS_PER_PANEL * lower.len();
    for (i, tally) in census.remaining_ranked().iter().enumerate() {
        let panel = if i < packed {
            lower[i / SLOTS_PER_PANEL]
        } else {
            lower[(i - packed) % lower.len()]
        };
        mapping.insert(tally.track_id, panel);
    }

    mapping
}

/// Teams per panel in an assignment list, keyed by panel id.
pub fn panel_loads(assignments: &[Assignment]) -> BTreeMap<PanelId, usize> {
    let mut loads = BTreeMap::new();
    for a in assignments {
        *loads.entry(a.panel_id).or_insert(0) += 1;
    }
    loads
}

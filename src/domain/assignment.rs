//! Scheduler output

use serde::{Deserialize, Serialize};

use super::team::{PanelId, TeamId};

/// A computed (team, panel) pairing. Not persisted on its own; callers apply it
/// as an update of the team's panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub team_id: TeamId,
    pub panel_id: PanelId,
}

impl Assignment {
    pub fn new(team_id: TeamId, panel_id: PanelId) -> Self {
        Self { team_id, panel_id }
    }
}

impl From<(TeamId, PanelId)> for Assignment {
    fn from((team_id, panel_id): (TeamId, PanelId)) -> Self {
        Self { team_id, panel_id }
    }
}

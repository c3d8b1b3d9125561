//! Panel reconciler: runs the scheduler against the stored registrations.
//!
//! Two modes:
//! - **Batch**: only teams without a panel are scheduled; existing
//!   assignments are left alone.
//! - **Full**: every team is rescheduled from scratch.
//!
//! Each run is one store transaction, so a failed run leaves every team where
//! it was.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Assignment, PanelId};
use crate::error::Result;
use crate::scheduler;
use crate::store::{HackStore, TeamScope};

/// Which teams a reconcile run touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    Batch,
    Full,
}

impl ReconcileMode {
    fn scope(self) -> TeamScope {
        match self {
            ReconcileMode::Batch => TeamScope::Unassigned,
            ReconcileMode::Full => TeamScope::All,
        }
    }
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileMode::Batch => write!(f, "batch"),
            ReconcileMode::Full => write!(f, "full"),
        }
    }
}

/// Result of a committed reconcile run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub mode: ReconcileMode,
    /// Teams read by the run
    pub teams_considered: usize,
    /// Assignments written, in creation order of the teams
    pub assignments: Vec<Assignment>,
    /// Teams written per panel by this run
    pub loads: BTreeMap<PanelId, usize>,
}

impl ReconcileReport {
    pub fn assigned(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_noop(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Runs scheduler cycles against one store.
pub struct PanelReconciler<'a> {
    store: &'a mut HackStore,
}

impl<'a> PanelReconciler<'a> {
    pub fn new(store: &'a mut HackStore) -> Self {
        Self { store }
    }

    /// Assign every team that has no panel yet.
    ///
    /// With nothing unassigned the run is a no-op and does not consult the
    /// scheduler.
    pub fn assign_unassigned(&mut self) -> Result<ReconcileReport> {
        self.run(ReconcileMode::Batch)
    }

    /// Recompute the panel of every team.
    pub fn reassign_all(&mut self) -> Result<ReconcileReport> {
        self.run(ReconcileMode::Full)
    }

    pub fn run(&mut self, mode: ReconcileMode) -> Result<ReconcileReport> {
        info!("Reconcile ({}) starting", mode);

        let result = self.store.run_assignment_cycle(mode.scope(), |panels, teams| {
            if mode == ReconcileMode::Batch && teams.is_empty() {
                debug!("No unassigned teams");
                return Ok(Vec::new());
            }
            scheduler::assign(panels, teams)
        });

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Reconcile ({}) failed: {}", mode, e);
                return Err(e);
            }
        };

        let loads = scheduler::panel_loads(&outcome.assignments);
        info!(
            "Reconcile ({}) assigned {} of {} teams: {:?}",
            mode,
            outcome.assignments.len(),
            outcome.teams_considered,
            loads
        );

        Ok(ReconcileReport {
            mode,
            teams_considered: outcome.teams_considered,
            assignments: outcome.assignments,
            loads,
        })
    }
}

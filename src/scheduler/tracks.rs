//! Per-track tallies gathered in one pass over the team list.
//!
//! Tracks are ranked by team count (descending), then by the index of their
//! first team in the input (ascending). First-occurrence indices are distinct,
//! so the ranking is a strict total order: choosing the dominant track by
//! pairwise comparison or by a simultaneous maximum gives the same answer.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{Team, TrackId};

/// Count and first-occurrence index for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackTally {
    pub track_id: TrackId,
    pub count: usize,
    pub first_index: usize,
}

/// Order two tallies so that the higher-priority one sorts first.
pub fn rank(a: &TrackTally, b: &TrackTally) -> Ordering {
    b.count.cmp(&a.count).then(a.first_index.cmp(&b.first_index))
}

/// All distinct tracks of a team list, in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct TrackCensus {
    tallies: Vec<TrackTally>,
}

impl TrackCensus {
    /// Scan `teams` once.
    pub fn scan(teams: &[Team]) -> Self {
        let mut position: HashMap<TrackId, usize> = HashMap::new();
        let mut tallies: Vec<TrackTally> = Vec::new();

        for (index, team) in teams.iter().enumerate() {
            match position.get(&team.track_id) {
                Some(&slot) => tallies[slot].count += 1,
                None => {
                    position.insert(team.track_id, tallies.len());
                    tallies.push(TrackTally {
                        track_id: team.track_id,
                        count: 1,
                        first_index: index,
                    });
                }
            }
        }

        Self { tallies }
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    /// Tallies in first-occurrence order.
    pub fn tallies(&self) -> &[TrackTally] {
        &self.tallies
    }

    /// Track with the most teams; earliest first occurrence wins ties.
    pub fn dominant(&self) -> Option<TrackTally> {
        self.tallies.iter().copied().min_by(rank)
    }

    /// Every track except the dominant one, highest rank first.
    pub fn remaining_ranked(&self) -> Vec<TrackTally> {
        let Some(dominant) = self.dominant() else {
            return Vec::new();
        };
        let mut remaining: Vec<TrackTally> = self
            .tallies
            .iter()
            .copied()
            .filter(|t| t.track_id != dominant.track_id)
            .collect();
        remaining.sort_by(rank);
        remaining
    }
}

//! Multi-subject slot tracking
//!
//! Keeps per-subject display slots stable across frames when several faces
//! are visible. Subjects are matched to last frame's slots by centroid
//! distance; this is the only stateful piece of the crate and the classifier
//! never reads it.

use crate::landmarks::{centroid, Landmark};

/// Number of subjects that can hold a slot at once.
pub const MAX_SUBJECTS: usize = 5;

/// Display color per slot.
pub const COLORS: [&str; MAX_SUBJECTS] = ["#00ff00", "#0088ff", "#ff0000", "#ffff00", "#ff00ff"];

/// Default centroid distance (normalized units) under which a subject keeps its slot.
pub const DEFAULT_MAX_MATCH_DISTANCE: f64 = 0.15;

#[derive(Debug, Clone)]
pub struct SlotTracker {
    slots: [Option<Landmark>; MAX_SUBJECTS],
    max_match_distance: f64,
}

impl Default for SlotTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTracker {
    pub fn new() -> Self {
        Self::with_max_match_distance(DEFAULT_MAX_MATCH_DISTANCE)
    }

    pub fn with_max_match_distance(max_match_distance: f64) -> Self {
        Self {
            slots: [None; MAX_SUBJECTS],
            max_match_distance,
        }
    }

    /// Assigns a slot to each subject centroid of the current frame.
    ///
    /// Closest (subject, previous slot) pairs within range are matched first;
    /// the remaining subjects take the lowest unclaimed slot in input order.
    /// Returns `None` for subjects that found no slot. Slots nobody claimed
    /// are released.
    pub fn assign(&mut self, centroids: &[Landmark]) -> Vec<Option<usize>> {
        let mut result = vec![None; centroids.len()];
        let mut claimed = [false; MAX_SUBJECTS];

        let mut pairs: Vec<(f64, usize, usize)> = Vec::new();
        for (subject, c) in centroids.iter().enumerate() {
            for (slot, previous) in self.slots.iter().enumerate() {
                if let Some(p) = previous {
                    let d = c.distance(p);
                    if d <= self.max_match_distance {
                        pairs.push((d, subject, slot));
                    }
                }
            }
        }
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (_, subject, slot) in pairs {
            if result[subject].is_none() && !claimed[slot] {
                result[subject] = Some(slot);
                claimed[slot] = true;
            }
        }

        for assigned in result.iter_mut().filter(|r| r.is_none()) {
            match claimed.iter().position(|c| !c) {
                Some(slot) => {
                    *assigned = Some(slot);
                    claimed[slot] = true;
                }
                None => break,
            }
        }

        let mut next = [None; MAX_SUBJECTS];
        for (subject, slot) in result.iter().enumerate() {
            if let Some(slot) = slot {
                next[*slot] = Some(centroids[subject]);
            }
        }
        self.slots = next;

        result
    }

    /// Same as [`assign`](Self::assign), taking whole landmark sets.
    ///
    /// Empty sets have no centroid and get no slot.
    pub fn assign_subjects(&mut self, subjects: &[Vec<Landmark>]) -> Vec<Option<usize>> {
        let centroids: Vec<Option<Landmark>> = subjects.iter().map(|s| centroid(s)).collect();
        let present: Vec<Landmark> = centroids.iter().flatten().copied().collect();
        let mut assigned = self.assign(&present).into_iter();
        centroids
            .iter()
            .map(|c| c.and_then(|_| assigned.next().flatten()))
            .collect()
    }

    pub fn color_of(slot: usize) -> Option<&'static str> {
        COLORS.get(slot).copied()
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn reset(&mut self) {
        self.slots = [None; MAX_SUBJECTS];
    }
}

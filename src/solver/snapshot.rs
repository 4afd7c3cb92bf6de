//! Capture and restore of search state between trials
//!
//! Only plan offsets and assignment flags change while searching, so a trial
//! is undone by restoring these two fields on every wall and corner.

use bitvec::prelude::*;

use crate::structure::{CornId, Corns, GroupId, Structure};

/// Plan offsets and assignment flags of every wall and corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    group_offsets: Vec<usize>,
    group_touched: BitVec,
    corner_offsets: Vec<usize>,
    corner_touched: BitVec,
}

impl Snapshot {
    /// Record the current assignment state
    pub fn take(structure: &Structure, corns: &Corns) -> Self {
        let groups = structure.groups();
        let corners = corns.corners();
        Self {
            group_offsets: groups.iter().map(|group| group.plan_offset).collect(),
            group_touched: groups.iter().map(|group| group.touched).collect(),
            corner_offsets: corners.iter().map(|corn| corn.plan_offset).collect(),
            corner_touched: corners.iter().map(|corn| corn.touched).collect(),
        }
    }

    /// Write the recorded state back
    pub fn restore(&self, structure: &mut Structure, corns: &mut Corns) {
        let groups = self
            .group_offsets
            .iter()
            .zip(self.group_touched.iter().by_vals());
        for (index, (&offset, touched)) in groups.enumerate() {
            if let Some(group) = structure.group_mut(GroupId(index)) {
                group.plan_offset = offset;
                group.touched = touched;
            }
        }

        let corners = self
            .corner_offsets
            .iter()
            .zip(self.corner_touched.iter().by_vals());
        for (index, (&offset, touched)) in corners.enumerate() {
            if let Some(corn) = corns.get_mut(CornId(index)) {
                corn.plan_offset = offset;
                corn.touched = touched;
            }
        }
    }

    /// Number of walls already assigned
    pub fn touched_walls(&self) -> usize {
        self.group_touched.count_ones()
    }

    /// Number of corners already assigned
    pub fn touched_corners(&self) -> usize {
        self.corner_touched.count_ones()
    }
}

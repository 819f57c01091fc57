use lane_pair_core::{Line, Point};
use log::debug;

use crate::slots::{LanePair, LaneSlots, SLOT_COUNT};

/// Greedy pairwise scan that fills the lane slots in detection order.
///
/// Pairs `(i, j)` with `i < j` are visited row by row. The first pair
/// accepted by `qualifies` goes to slot 0, the next to slot 1, and the scan
/// stops as soon as both slots are full. `qualifies` sees the slots filled
/// so far, which lets it reject lines that are already in use.
///
/// Returns the number of slots filled.
pub fn extract_lanes<F>(
    lines: &[Line],
    reference: &Point,
    slots: &mut LaneSlots,
    mut qualifies: F,
) -> usize
where
    F: FnMut(&Line, &Line, &LaneSlots) -> bool,
{
    let mut index = 0;
    for (i, l1) in lines.iter().enumerate() {
        for (j, l2) in lines.iter().enumerate().skip(i + 1) {
            if !qualifies(l1, l2, slots) {
                continue;
            }
            slots.fill(index, LanePair::assign(*l1, *l2, reference));
            debug!("slot {index}: accepted lines {i} and {j}");
            index += 1;
            if index == SLOT_COUNT {
                return index;
            }
        }
    }
    index
}

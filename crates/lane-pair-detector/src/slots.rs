use lane_pair_core::{Line, Point};
use serde::{Deserialize, Serialize};

/// Number of ranked lane slots per frame.
pub const SLOT_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// LEFT and RIGHT boundary of one accepted lane pair.
///
/// Holding both lines in one value keeps a slot from ever carrying only one
/// side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LanePair {
    pub left: Line,
    pub right: Line,
}

impl LanePair {
    /// Assign sides by signed distance from `reference`: the line with the
    /// larger distance is LEFT.
    pub fn assign(l1: Line, l2: Line, reference: &Point) -> Self {
        if l1.distance_from_point(reference) > l2.distance_from_point(reference) {
            Self {
                left: l1,
                right: l2,
            }
        } else {
            Self {
                left: l2,
                right: l1,
            }
        }
    }

    pub fn lane(&self, side: Side) -> &Line {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn lines(&self) -> [&Line; 2] {
        [&self.left, &self.right]
    }
}

/// Ranked lane slots of a single frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneSlots {
    slots: [Option<LanePair>; SLOT_COUNT],
}

impl LaneSlots {
    pub fn clear(&mut self) {
        self.slots = [None; SLOT_COUNT];
    }

    /// Store `pair` at `index`. Indices past the last slot are ignored.
    pub fn fill(&mut self, index: usize, pair: LanePair) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(pair);
        }
    }

    pub fn get(&self, index: usize) -> Option<&LanePair> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether slot `index` holds a LEFT and a RIGHT lane.
    pub fn lanes_found(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn lane(&self, side: Side, index: usize) -> Option<&Line> {
        self.get(index).map(|pair| pair.lane(side))
    }

    pub fn found_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_full(&self) -> bool {
        self.found_count() == SLOT_COUNT
    }

    /// Every line already accepted into any slot.
    pub fn accepted_lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.slots.iter().flatten().flat_map(|pair| pair.lines())
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&LanePair>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }
}

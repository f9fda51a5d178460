use std::cmp::Reverse;

use crate::pair::{Bound, WeightedPair};

/// Which block sequence a block belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    /// Filled by `batch_prepend`; always pulled first.
    Prepended,
    /// Filled by individual inserts, ordered by upper bound.
    Normal,
}

/// Arena slot of a block. Slots are recycled once a block is released.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    pub(crate) const MIN: BlockId = BlockId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef {
    pub owner: Owner,
    pub id: BlockId,
}

/// Where a present vertex currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPosition {
    pub block: BlockRef,
    pub slot: usize,
}

/// Position of a prepended block in pull order: newest batch first, and
/// ascending chunks inside one batch.
pub(crate) type Rank = (Reverse<u64>, usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Free,
    Normal,
    Prepended(Rank),
}

#[derive(Debug)]
pub(crate) struct Block {
    pub(crate) items: Vec<WeightedPair>,
    pub(crate) upper: Bound,
    pub(crate) placement: Placement,
}

impl Block {
    pub(crate) fn vacant() -> Self {
        Self { items: Vec::new(), upper: Bound::INFINITE, placement: Placement::Free }
    }

    pub(crate) fn owner(&self) -> Owner {
        match self.placement {
            Placement::Prepended(_) => Owner::Prepended,
            Placement::Normal | Placement::Free => Owner::Normal,
        }
    }

    /// Smallest pair held, by linear scan.
    pub(crate) fn min(&self) -> Option<WeightedPair> {
        self.items.iter().copied().min()
    }
}

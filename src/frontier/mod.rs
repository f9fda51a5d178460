//! Block-partitioned frontier used by one level of the recursion.
//!
//! Pairs live in bounded blocks held in two sequences. *Normal* blocks take
//! individual inserts and are indexed by their upper bound; every pair in a
//! Normal block sorts above every pair in the Normal blocks before it.
//! *Prepended* blocks take whole batches whose values sort below everything
//! already stored, so they are consulted first by [`Frontier::pull`].
//!
//! Blocks are stored in an arena and addressed by [`BlockId`]; a dense
//! per-vertex [`KeyPosition`] table gives O(1) lookup and erase.

mod block;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use crate::graph::VertexId;
use crate::pair::{Bound, WeightedPair};

pub use block::{BlockId, BlockRef, KeyPosition, Owner};
use block::{Block, Placement, Rank};

#[derive(Debug)]
pub struct Frontier {
    vertex_count: usize,
    capacity: usize,
    bound: Bound,
    blocks: Vec<Block>,
    free: Vec<BlockId>,
    normal: BTreeSet<(Bound, BlockId)>,
    prepended: BTreeMap<Rank, BlockId>,
    // indexed by vertex id
    positions: Vec<Option<KeyPosition>>,
    len: usize,
    next_batch: u64,
}

impl Frontier {
    /// An empty frontier over vertex ids `0..vertex_count` with block
    /// capacity `capacity` and overall bound `bound`. Starts with one empty
    /// Normal block whose upper bound is `bound`.
    pub fn new(vertex_count: usize, capacity: usize, bound: Bound) -> Self {
        let mut frontier = Self {
            vertex_count,
            capacity: capacity.max(1),
            bound,
            blocks: Vec::new(),
            free: Vec::new(),
            normal: BTreeSet::new(),
            prepended: BTreeMap::new(),
            positions: vec![None; vertex_count],
            len: 0,
            next_batch: 0,
        };
        frontier.create_normal(bound);
        frontier
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.position(vertex).is_some()
    }

    /// The pair currently stored for `vertex`.
    pub fn get(&self, vertex: VertexId) -> Option<WeightedPair> {
        let pos = self.position(vertex)?;
        Some(self.blocks[pos.block.id.0].items[pos.slot])
    }

    pub fn position(&self, vertex: VertexId) -> Option<KeyPosition> {
        self.positions.get(vertex).copied().flatten()
    }

    /// Present vertices in increasing id order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(v, pos)| pos.map(|_| v))
    }

    /// Number of live `(prepended, normal)` blocks, empty ones included.
    pub fn block_counts(&self) -> (usize, usize) {
        (self.prepended.len(), self.normal.len())
    }

    /// Store `pair` unless its vertex is already present with a value that
    /// is not larger.
    pub fn insert(&mut self, pair: WeightedPair) {
        debug_assert!(pair.vertex < self.vertex_count, "vertex {} out of range", pair.vertex);
        if let Some(current) = self.get(pair.vertex) {
            if current.key() <= pair.key() {
                return;
            }
            self.erase(pair.vertex);
        }
        let key = pair.key();
        let id = match self.normal.range((key, BlockId::MIN)..).next() {
            Some(&(_, id)) => id,
            None => match self.normal.iter().next_back() {
                Some(&(_, id)) => id,
                None => self.create_normal(key),
            },
        };
        let block = &mut self.blocks[id.0];
        block.items.push(pair);
        let slot = block.items.len() - 1;
        let upper = block.upper;
        let full = block.items.len() > self.capacity;
        self.place(pair.vertex, KeyPosition { block: BlockRef { owner: Owner::Normal, id }, slot });
        if key > upper {
            self.normal.remove(&(upper, id));
            self.blocks[id.0].upper = key;
            self.normal.insert((key, id));
        }
        if full {
            self.split(id);
        }
    }

    /// Remove `vertex`, returning the pair it held. Blocks left empty are
    /// released.
    pub fn erase(&mut self, vertex: VertexId) -> Option<WeightedPair> {
        let pos = self.positions.get_mut(vertex)?.take()?;
        self.len -= 1;
        let block = &mut self.blocks[pos.block.id.0];
        let pair = block.items.swap_remove(pos.slot);
        if let Some(moved) = block.items.get(pos.slot) {
            if let Some(p) = &mut self.positions[moved.vertex] {
                p.slot = pos.slot;
            }
        }
        if block.items.is_empty() {
            self.release(pos.block.id);
        }
        Some(pair)
    }

    /// Insert a batch whose values all sort below every pair currently in
    /// the frontier. Per vertex the smallest offered value wins, and a
    /// vertex already stored with a value that is not larger is left alone.
    /// Batches larger than the capacity are cut into chunks of at most
    /// `ceil(capacity / 2)` by repeated median partition.
    pub fn batch_prepend<I>(&mut self, items: I, upper: Bound)
    where
        I: IntoIterator<Item = WeightedPair>,
    {
        let mut batch: Vec<WeightedPair> = items.into_iter().collect();
        batch.sort_unstable_by(|a, b| {
            a.vertex.cmp(&b.vertex).then(a.cmp(b))
        });
        batch.dedup_by_key(|p| p.vertex);
        batch.retain(|p| match self.get(p.vertex) {
            Some(current) => current > *p,
            None => true,
        });
        for p in &batch {
            self.erase(p.vertex);
        }
        if batch.is_empty() {
            return;
        }
        debug_assert!(
            self.normal_min().map_or(true, |min| batch.iter().all(|p| *p < min)),
            "batch must sort below the Normal blocks"
        );

        let seq = Reverse(self.next_batch);
        self.next_batch += 1;
        if batch.len() <= self.capacity {
            self.create_prepended(upper, (seq, 0), batch);
            return;
        }
        let mut chunks = Vec::new();
        median_chunks(batch, self.capacity.div_ceil(2), &mut chunks);
        for (i, chunk) in chunks.into_iter().enumerate() {
            self.create_prepended(upper, (seq, i), chunk);
        }
    }

    /// Remove and return at most `capacity` pairs with the smallest keys,
    /// together with a bound `x` such that every returned key is below `x`
    /// and every remaining key is at least `x`. When nothing remains `x` is
    /// the frontier's overall bound.
    pub fn pull(&mut self) -> (Vec<WeightedPair>, Bound) {
        let m = self.capacity;
        let mut gathered = Vec::new();
        let prepended = gather(&self.blocks, self.prepended.values().copied(), m, &mut gathered);
        let normal = gather(&self.blocks, self.normal.iter().map(|&(_, id)| id), m, &mut gathered);

        let mut candidates: Vec<WeightedPair> = gathered
            .iter()
            .flat_map(|id| self.blocks[id.0].items.iter().copied())
            .collect();

        if prepended + normal <= m {
            for p in &candidates {
                self.positions[p.vertex] = None;
            }
            self.len -= candidates.len();
            for id in gathered {
                self.release(id);
            }
            return (candidates, self.bound);
        }

        candidates.select_nth_unstable(m);
        let separator = candidates[m].key();
        candidates.truncate(m);
        for p in &candidates {
            self.erase(p.vertex);
        }
        (candidates, separator)
    }

    fn split(&mut self, id: BlockId) {
        let upper = self.blocks[id.0].upper;
        let mut low = std::mem::take(&mut self.blocks[id.0].items);
        self.release(id);
        let mid = low.len() / 2;
        low.select_nth_unstable(mid);
        let high = low.split_off(mid);
        // Normal uppers stay strictly increasing.
        let low_upper = low.iter().max().map_or(upper, WeightedPair::key);

        let low_id = self.create_normal(low_upper);
        self.fill(low_id, low);
        let high_id = self.create_normal(upper);
        self.fill(high_id, high);
    }

    fn normal_min(&self) -> Option<WeightedPair> {
        self.normal
            .iter()
            .find_map(|&(_, id)| self.blocks[id.0].min())
    }

    fn alloc(&mut self, upper: Bound, placement: Placement) -> BlockId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.blocks.push(Block::vacant());
                BlockId(self.blocks.len() - 1)
            }
        };
        let block = &mut self.blocks[id.0];
        block.upper = upper;
        block.placement = placement;
        id
    }

    fn create_normal(&mut self, upper: Bound) -> BlockId {
        let id = self.alloc(upper, Placement::Normal);
        self.normal.insert((upper, id));
        id
    }

    fn create_prepended(&mut self, upper: Bound, rank: Rank, items: Vec<WeightedPair>) {
        let id = self.alloc(upper, Placement::Prepended(rank));
        self.prepended.insert(rank, id);
        self.fill(id, items);
    }

    fn fill(&mut self, id: BlockId, items: Vec<WeightedPair>) {
        let owner = self.blocks[id.0].owner();
        for (slot, p) in items.iter().enumerate() {
            self.place(p.vertex, KeyPosition { block: BlockRef { owner, id }, slot });
        }
        self.blocks[id.0].items = items;
    }

    fn place(&mut self, vertex: VertexId, pos: KeyPosition) {
        if self.positions[vertex].replace(pos).is_none() {
            self.len += 1;
        }
    }

    fn release(&mut self, id: BlockId) {
        let block = &mut self.blocks[id.0];
        match block.placement {
            Placement::Normal => {
                self.normal.remove(&(block.upper, id));
            }
            Placement::Prepended(rank) => {
                self.prepended.remove(&rank);
            }
            Placement::Free => return,
        }
        block.items.clear();
        block.placement = Placement::Free;
        self.free.push(id);
    }
}

/// Push non-empty blocks from `order` onto `out` until more than `limit`
/// pairs have been collected. Returns the number collected.
fn gather(
    blocks: &[Block],
    order: impl Iterator<Item = BlockId>,
    limit: usize,
    out: &mut Vec<BlockId>,
) -> usize {
    let mut scanned = 0;
    for id in order {
        if scanned > limit {
            break;
        }
        let len = blocks[id.0].items.len();
        if len > 0 {
            out.push(id);
            scanned += len;
        }
    }
    scanned
}

fn median_chunks(mut items: Vec<WeightedPair>, target: usize, out: &mut Vec<Vec<WeightedPair>>) {
    if items.len() <= target {
        out.push(items);
        return;
    }
    let mid = items.len() / 2;
    items.select_nth_unstable(mid);
    let high = items.split_off(mid);
    median_chunks(items, target, out);
    median_chunks(high, target, out);
}

//! Data types for the connectivity graph and its passes.

/// Index of a point in the owning `Net`.
pub type PointIdx = usize;
/// Index of an edge in the graph arena.
pub type EdgeIdx = usize;

/// Traversal state of a point.
///
/// The derived order is load-bearing: `Unvisited < Seen < OnStack(0) <
/// OnStack(1) < ...`. When the search leaves a point it demotes it to `Seen`
/// only if its state ranks above the point it is leaving from, so a loop
/// target recorded at a shallower depth is never erased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visit {
    #[default]
    Unvisited,
    /// Reached by a finished descent.
    Seen,
    /// Sits on the current search path; `stack[d]` is the edge leaving it.
    OnStack(usize),
}

impl Visit {
    #[inline]
    pub fn is_visited(self) -> bool {
        self != Visit::Unvisited
    }
}

/// One directed arc. Edges always come in forward/reverse pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: PointIdx,
    pub to: PointIdx,
    /// Next entry of `from`'s adjacency list.
    pub next: Option<EdgeIdx>,
    pub reverse: EdgeIdx,
    /// Short record this edge stands for; `None` for wire segments.
    pub short: Option<usize>,
    /// Originating wire segment; `None` for shorts.
    pub seg: Option<usize>,
    pub visited: bool,
    pub skip: bool,
}

impl Edge {
    #[inline]
    pub fn is_short(&self) -> bool {
        self.short.is_some()
    }

    /// Eligible for traversal.
    #[inline]
    pub(crate) fn usable(&self) -> bool {
        !self.visited && !self.skip
    }
}

/// Per-point graph state.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GraphPt {
    pub head: Option<EdgeIdx>,
    pub path: Option<usize>,
    pub visit: Visit,
}

/// Repair configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepairCfg {
    /// Longest chain of shorts `get_first_non_short_edge` will hop across.
    pub max_short_hops: usize,
    /// Largest short group shape reconciliation will work on.
    pub max_group: usize,
    pub relocate_shorts: bool,
    pub adjust_shapes: bool,
}

impl Default for RepairCfg {
    fn default() -> Self {
        Self {
            max_short_hops: 16,
            max_group: 256,
            relocate_shorts: false,
            adjust_shapes: true,
        }
    }
}

/// Outcome of a read-only sweep over the whole graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Components with at least one traversable edge.
    pub components: usize,
    /// Edges that reached an already visited point.
    pub loops: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopReport {
    /// Shorts newly marked `skip` by the pass.
    pub shorts_cut: usize,
    /// Full searches run before reaching the fixpoint.
    pub sweeps: usize,
    /// Read-only sweep after the pass.
    pub sweep: SweepReport,
}

/// Reports of the short-loop pass and the wire-loop pass that follows it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopPasses {
    pub short: LoopReport,
    pub wire: LoopReport,
}

impl LoopPasses {
    pub fn shorts_cut(&self) -> usize {
        self.short.shorts_cut + self.wire.shorts_cut
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdjustReport {
    /// Short groups whose points disagree on coordinates.
    pub groups: usize,
    /// Groups collapsed onto one point by editing shapes.
    pub moved: usize,
    /// Shorts dropped because every point of the group sits on one terminal.
    pub dropped_ties: usize,
    /// Groups left as they were.
    pub unresolved: usize,
    /// Groups larger than `RepairCfg::max_group`, left as they were.
    pub overflowed: usize,
}

/// One step of the exposed traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfsStep {
    pub from: PointIdx,
    pub to: PointIdx,
    pub seg: Option<usize>,
    pub is_short: bool,
    /// `to` was already visited: the edge closes a surviving cycle.
    pub is_loop: bool,
}

/// Smallest component of a disconnected net.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisconnectReport {
    pub components: usize,
    /// First point of the smallest component.
    pub start: PointIdx,
    /// Edges walked in the smallest component.
    pub edges: usize,
}

//! Flat storage for points, edges and the search stack.
//!
//! Adjacency lists are intrusive singly-linked lists over edge indices:
//! each point stores its first edge, each edge the next entry of its
//! source's list. Nothing is allocated per edge; the arena is reused
//! across nets and only grows.

use crate::net::Net;

use super::types::{Edge, EdgeIdx, GraphPt, PointIdx, RepairCfg, Visit};

const INITIAL_CAPACITY: usize = 1024;

/// Connectivity graph of one net at a time.
#[derive(Clone, Debug)]
pub struct ConnGraph {
    pub(super) cfg: RepairCfg,
    pub(super) pts: Vec<GraphPt>,
    pub(super) edges: Vec<Edge>,
    pub(super) stack: Vec<EdgeIdx>,
    /// Next edge of the exposed traversal.
    pub(super) cursor: Option<EdgeIdx>,
    /// Scratch buffer for short groups in shape reconciliation.
    pub(super) group: Vec<PointIdx>,
    /// Scratch buffer for one adjacency list during short relocation.
    pub(super) order: Vec<EdgeIdx>,
}

impl Default for ConnGraph {
    fn default() -> Self {
        Self::new(RepairCfg::default())
    }
}

impl ConnGraph {
    pub fn new(cfg: RepairCfg) -> Self {
        Self {
            cfg,
            pts: Vec::with_capacity(INITIAL_CAPACITY),
            edges: Vec::with_capacity(2 * INITIAL_CAPACITY),
            stack: Vec::with_capacity(INITIAL_CAPACITY),
            cursor: None,
            group: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn cfg(&self) -> &RepairCfg {
        &self.cfg
    }

    /// Size the arena for `pt_n` points and `short_n` shorts and drop all edges.
    ///
    /// Every segment and every short contributes a forward and a reverse
    /// edge, so `4 * pt_n + 2 * short_n` edges always suffice. Storage grows
    /// by doubling, or straight to the requirement if doubling is not enough.
    pub fn init(&mut self, pt_n: usize, short_n: usize) {
        let need = 4 * pt_n + 2 * short_n;
        self.edges.clear();
        if need > self.edges.capacity() {
            let target = (2 * self.edges.capacity()).max(need);
            self.edges.reserve_exact(target);
        }
        self.stack.clear();
        if short_n > self.stack.capacity() {
            self.stack.reserve_exact(2 * short_n);
        }
        self.pts.clear();
        self.pts.resize(pt_n, GraphPt::default());
        self.cursor = None;
    }

    pub fn point_count(&self) -> usize {
        self.pts.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_capacity(&self) -> usize {
        self.edges.capacity()
    }

    pub fn edge(&self, e: EdgeIdx) -> &Edge {
        &self.edges[e]
    }

    pub fn visit(&self, j: PointIdx) -> Visit {
        self.pts[j].visit
    }

    /// Current search path, root first.
    pub fn stack(&self) -> &[EdgeIdx] {
        &self.stack
    }

    /// Edges leaving `j`, in list order.
    pub fn adjacency(&self, j: PointIdx) -> Vec<EdgeIdx> {
        let mut out = Vec::new();
        self.collect_adjacency(j, &mut out);
        out
    }

    /// Replace `out` with the edges leaving `j`, keeping its allocation.
    pub(super) fn collect_adjacency(&self, j: PointIdx, out: &mut Vec<EdgeIdx>) {
        out.clear();
        let mut cur = self.pts[j].head;
        while let Some(e) = cur {
            out.push(e);
            cur = self.edges[e].next;
        }
    }

    /// First edge in `a`'s list that ends at `b`, skipped or not.
    pub fn find_edge(&self, a: PointIdx, b: PointIdx) -> Option<EdgeIdx> {
        let mut cur = self.pts[a].head;
        while let Some(e) = cur {
            if self.edges[e].to == b {
                return Some(e);
            }
            cur = self.edges[e].next;
        }
        None
    }

    /// Reset every edge and point to unvisited.
    pub fn clear_visited(&mut self) {
        for e in &mut self.edges {
            e.visited = false;
        }
        for p in &mut self.pts {
            p.visit = Visit::Unvisited;
        }
    }

    #[inline]
    pub(super) fn mark_pair_visited(&mut self, e: EdgeIdx) {
        let r = self.edges[e].reverse;
        self.edges[e].visited = true;
        self.edges[r].visited = true;
    }

    /// Set `skip` on an edge pair and on the short record behind it.
    pub(super) fn set_pair_skip(&mut self, net: &mut Net, e: EdgeIdx, skip: bool) {
        let r = self.edges[e].reverse;
        self.edges[e].skip = skip;
        self.edges[r].skip = skip;
        if let Some(s) = self.edges[e].short {
            net.shorts[s].skip = skip;
        }
    }

    /// Relink `j`'s adjacency list in the given order.
    pub(super) fn relink(&mut self, j: PointIdx, order: &[EdgeIdx]) {
        self.pts[j].head = order.first().copied();
        for w in order.windows(2) {
            self.edges[w[0]].next = Some(w[1]);
        }
        if let Some(&last) = order.last() {
            self.edges[last].next = None;
        }
    }

    /// Every edge is the reverse of its reverse, pairs mirror each other's
    /// endpoints and carry the same `visited` and `skip` flags.
    pub fn edge_pairs_consistent(&self) -> bool {
        self.edges.iter().enumerate().all(|(i, e)| {
            let r = &self.edges[e.reverse];
            r.reverse == i
                && r.from == e.to
                && r.to == e.from
                && r.visited == e.visited
                && r.skip == e.skip
                && r.short == e.short
                && r.seg == e.seg
        })
    }
}

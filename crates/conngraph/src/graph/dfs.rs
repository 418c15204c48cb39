//! Explicit-stack depth-first search.
//!
//! The stack holds the edges of the current descent path. `get_next_edge`
//! makes one of three moves from the edge on top: descend into the far
//! point, advance to the next sibling at the same depth, or ascend until
//! some shallower level still has a sibling. Callers decide per step
//! whether descending is allowed, which is how loop-closing edges are
//! stepped over without entering them.

use super::arena::ConnGraph;
use super::types::{EdgeIdx, PointIdx, Visit};

impl ConnGraph {
    /// First usable edge at or after `cur` in a list.
    #[inline]
    fn first_usable(&self, mut cur: Option<EdgeIdx>) -> Option<EdgeIdx> {
        while let Some(e) = cur {
            if self.edges[e].usable() {
                return Some(e);
            }
            cur = self.edges[e].next;
        }
        None
    }

    /// Start a search at `start`: its first usable edge becomes the whole stack.
    ///
    /// Fails if `start` is already visited or has nothing usable to leave by.
    pub fn get_first_edge(&mut self, start: PointIdx) -> Option<EdgeIdx> {
        let p = self.pts[start];
        if p.visit.is_visited() {
            return None;
        }
        let e = self.first_usable(p.head)?;
        self.stack.clear();
        self.stack.push(e);
        Some(e)
    }

    /// Like `get_first_edge`, but treats shorts as identity: while the
    /// chosen edge is a short, hop to its far point and take that point's
    /// first usable edge instead. Returns the point the search really starts
    /// from. A chain that still ends in a short after `max_short_hops` tries
    /// yields nothing.
    pub fn get_first_non_short_edge(&mut self, start: PointIdx) -> Option<(PointIdx, EdgeIdx)> {
        let p = self.pts[start];
        if p.visit.is_visited() {
            return None;
        }
        let mut e = self.first_usable(p.head)?;
        let mut root = start;
        let mut found = None;
        for _ in 0..self.cfg.max_short_hops {
            if !self.edges[e].is_short() {
                found = Some(e);
                break;
            }
            root = self.edges[e].to;
            match self.first_usable(self.pts[root].head) {
                Some(n) => e = n,
                None => break,
            }
        }
        self.stack.clear();
        let e = found?;
        self.stack.push(e);
        Some((root, e))
    }

    /// Advance the search by one edge; `None` once the component is exhausted.
    pub fn get_next_edge(&mut self, can_descend: bool) -> Option<EdgeIdx> {
        let top = *self.stack.last()?;
        let e = self.edges[top];

        if can_descend {
            if let Some(child) = self.first_usable(self.pts[e.to].head) {
                self.stack.push(child);
                return Some(child);
            }
        }

        // sibling; keep a loop target recorded at a shallower depth
        if self.pts[e.to].visit > self.pts[e.from].visit {
            self.pts[e.to].visit = Visit::Seen;
        }
        if let Some(sib) = self.first_usable(e.next) {
            if let Some(slot) = self.stack.last_mut() {
                *slot = sib;
            }
            return Some(sib);
        }

        // ascend
        self.stack.pop();
        while let Some(&parent) = self.stack.last() {
            let pe = self.edges[parent];
            self.pts[pe.to].visit = Visit::Seen;
            if let Some(sib) = self.first_usable(pe.next) {
                if let Some(slot) = self.stack.last_mut() {
                    *slot = sib;
                }
                return Some(sib);
            }
            self.stack.pop();
        }
        None
    }
}

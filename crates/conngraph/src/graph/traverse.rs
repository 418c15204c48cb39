//! Traversal of the repaired graph and disconnect diagnostics.
//!
//! One traversal is in flight at a time: `dfs_start` seeds it, `dfs_next`
//! yields one step per call until the component is exhausted, and the
//! visited markers it leaves behind drive `check_visited` and
//! `disconnected_start`.

use tracing::warn;

use crate::net::Net;

use super::arena::ConnGraph;
use super::types::{DfsStep, DisconnectReport, PointIdx, Visit};

impl ConnGraph {
    pub fn dfs_clear(&mut self) {
        self.clear_visited();
        self.cursor = None;
    }

    /// Seed a traversal at `start`, hopping across shorts to a wire.
    /// Returns the point the traversal really starts from.
    pub fn dfs_start(&mut self, start: PointIdx) -> Option<PointIdx> {
        match self.get_first_non_short_edge(start) {
            Some((root, e)) => {
                self.cursor = Some(e);
                Some(root)
            }
            None => {
                self.cursor = None;
                None
            }
        }
    }

    pub fn dfs_next(&mut self) -> Option<DfsStep> {
        let e = self.cursor?;
        let edge = self.edges[e];
        self.mark_pair_visited(e);
        self.pts[edge.from].visit = Visit::Seen;
        let is_loop = self.pts[edge.to].visit.is_visited();
        self.cursor = if is_loop {
            self.get_next_edge(false)
        } else {
            self.pts[edge.to].visit = Visit::Seen;
            self.get_next_edge(true)
        };
        Some(DfsStep {
            from: edge.from,
            to: edge.to,
            seg: edge.seg,
            is_short: edge.is_short(),
            is_loop,
        })
    }

    /// The rest of the current traversal as an iterator.
    pub fn dfs_steps(&mut self) -> impl Iterator<Item = DfsStep> + '_ {
        std::iter::from_fn(move || self.dfs_next())
    }

    pub fn is_visited(&self, j: PointIdx) -> bool {
        self.pts[j].visit.is_visited()
    }

    /// Every point was reached; `false` means the net is disconnected.
    pub fn check_visited(&self) -> bool {
        self.pts.iter().all(|p| p.visit.is_visited())
    }

    /// Where to resume after a traversal: the first unreached dangling end
    /// (a point with exactly one edge), else the first unreached point with
    /// any edge.
    pub fn disconnected_start(&self) -> Option<PointIdx> {
        let unreached = |j: &PointIdx| !self.pts[*j].visit.is_visited();
        let dangling = (0..self.pts.len()).filter(unreached).find(|&j| {
            self.pts[j]
                .head
                .map_or(false, |e| self.edges[e].next.is_none())
        });
        dangling.or_else(|| {
            (0..self.pts.len())
                .filter(unreached)
                .find(|&j| self.pts[j].head.is_some())
        })
    }

    /// Hand `j`'s wire id to every visited point short-tied to it that has none.
    pub fn copy_wire_id_to_visited_shorts(&self, net: &mut Net, j: PointIdx) {
        let Some(id) = net.points[j].wire_id else {
            return;
        };
        for k in 0..net.shorts.len() {
            let s = net.shorts[k];
            if s.i0 != j && s.i1 != j {
                continue;
            }
            let o = s.other_end(j);
            if o != j && net.points[o].wire_id.is_none() && self.is_visited(o) {
                net.points[o].wire_id = Some(id);
            }
        }
    }

    /// Walk every component and report the smallest by edge count.
    ///
    /// A component extends across terminals: once its wires are exhausted,
    /// the walk continues from any unreached point on a terminal it touched.
    /// On return the smallest component alone is marked visited. `None`
    /// when the net has fewer than two components.
    pub fn smallest_component(&mut self, net: &Net) -> Option<DisconnectReport> {
        self.clear_visited();
        let mut terms: Vec<usize> = Vec::new();
        let mut t0 = 0usize;
        let mut components = 0usize;
        let mut smallest: Option<(PointIdx, usize)> = None;

        for j in 0..self.pts.len() {
            let Some(first) = self.get_first_edge(j) else {
                continue;
            };
            if let Some(t) = net.points[j].term {
                terms.push(t);
            }
            components += 1;
            self.pts[j].visit = Visit::Seen;
            let mut count = 0usize;
            let mut cur = Some(first);
            loop {
                while let Some(e) = cur {
                    count += 1;
                    self.mark_pair_visited(e);
                    let to = self.edges[e].to;
                    if let Some(t) = net.points[to].term {
                        if net.terms[t].points.len() > 1 {
                            terms.push(t);
                        }
                    }
                    cur = if self.pts[to].visit.is_visited() {
                        self.get_next_edge(false)
                    } else {
                        self.pts[to].visit = Visit::Seen;
                        self.get_next_edge(true)
                    };
                }
                // wires exhausted; continue through a terminal
                let mut resume = None;
                while t0 < terms.len() && resume.is_none() {
                    let t = terms[t0];
                    t0 += 1;
                    resume = net.terms[t]
                        .points
                        .iter()
                        .copied()
                        .find(|&p| !self.pts[p].visit.is_visited());
                }
                let Some(p) = resume else {
                    break;
                };
                t0 -= 1;
                cur = self.get_first_edge(p);
                self.pts[p].visit = Visit::Seen;
            }
            if smallest.map_or(true, |(_, n)| count < n) {
                smallest = Some((j, count));
            }
        }

        let (start, edges) = smallest?;
        if components < 2 {
            return None;
        }

        self.clear_visited();
        let mut cur = self.get_first_edge(start);
        self.pts[start].visit = Visit::Seen;
        while let Some(e) = cur {
            self.mark_pair_visited(e);
            let to = self.edges[e].to;
            cur = if self.pts[to].visit.is_visited() {
                self.get_next_edge(false)
            } else {
                self.pts[to].visit = Visit::Seen;
                self.get_next_edge(true)
            };
        }
        warn!(components, start, edges, "net is disconnected");
        Some(DisconnectReport {
            components,
            start,
            edges,
        })
    }
}

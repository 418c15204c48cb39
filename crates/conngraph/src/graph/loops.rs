//! Loop elimination.
//!
//! The short-loop pass builds a graph of shorts only and breaks every cycle
//! it finds by dropping the short that closes it. The wire-loop pass then
//! adds the wire segments and, until a full search cuts nothing, breaks each
//! cycle by dropping the longest short on it. Cycles made of wires alone are
//! left in place; routers are not expected to produce them.

use tracing::debug;

use crate::net::Net;

use super::arena::ConnGraph;
use super::types::{EdgeIdx, LoopPasses, LoopReport, SweepReport, Visit};

impl ConnGraph {
    /// Drop a short for good: both edges and the short record.
    fn cut_short(&mut self, net: &mut Net, e: EdgeIdx) {
        self.set_pair_skip(net, e, true);
        let edge = self.edges[e];
        debug!(
            short = ?edge.short,
            from = edge.from,
            to = edge.to,
            len = net.pt_dist(edge.from, edge.to),
            "cut short"
        );
    }

    /// Read-only search over the whole graph: counts components and edges
    /// that close a cycle.
    pub fn sweep(&mut self) -> SweepReport {
        self.clear_visited();
        let mut rep = SweepReport::default();
        for start in 0..self.pts.len() {
            let Some(mut e) = self.get_first_edge(start) else {
                continue;
            };
            rep.components += 1;
            self.pts[start].visit = Visit::OnStack(0);
            loop {
                self.mark_pair_visited(e);
                let to = self.edges[e].to;
                let next = if self.pts[to].visit.is_visited() {
                    rep.loops += 1;
                    self.get_next_edge(false)
                } else {
                    self.pts[to].visit = Visit::OnStack(self.stack.len());
                    self.get_next_edge(true)
                };
                match next {
                    Some(n) => e = n,
                    None => break,
                }
            }
        }
        rep
    }

    /// Break every cycle made of shorts alone.
    ///
    /// Resets the graph, assigns path ids, drops shorts that are redundant
    /// with a path or with an earlier short between the same points, adds an
    /// edge pair for every surviving short, and then cuts each short that a
    /// search reaches an already visited point through.
    pub fn remove_short_loops(&mut self, net: &mut Net) -> LoopReport {
        self.init(net.points.len(), net.shorts.len());
        let (paths, _) = net.path_ids();
        for (p, path) in self.pts.iter_mut().zip(paths) {
            p.path = path;
        }

        let mut cut = 0usize;
        for s in net.shorts.iter_mut() {
            if s.skip {
                continue;
            }
            let (a, b) = (self.pts[s.i0].path, self.pts[s.i1].path);
            if a.is_some() && a == b {
                s.skip = true;
                cut += 1;
            }
        }
        for s in 0..net.shorts.len() {
            let short = net.shorts[s];
            if short.skip {
                continue;
            }
            if self.find_edge(short.i0, short.i1).is_some() {
                net.shorts[s].skip = true;
                cut += 1;
                continue;
            }
            self.add_short_edges(net, s);
        }

        self.clear_visited();
        for start in 0..self.pts.len() {
            let Some(mut e) = self.get_first_edge(start) else {
                continue;
            };
            self.pts[start].visit = Visit::OnStack(0);
            loop {
                self.mark_pair_visited(e);
                let to = self.edges[e].to;
                let next = if self.pts[to].visit.is_visited() {
                    self.cut_short(net, e);
                    cut += 1;
                    self.get_next_edge(false)
                } else {
                    self.pts[to].visit = Visit::OnStack(self.stack.len());
                    self.get_next_edge(true)
                };
                match next {
                    Some(n) => e = n,
                    None => break,
                }
            }
        }

        let sweep = self.sweep();
        LoopReport {
            shorts_cut: cut,
            sweeps: 1,
            sweep,
        }
    }

    /// Run the short-loop pass, add the wire segments, and cut the longest
    /// short of every remaining cycle until a full search cuts nothing.
    pub fn remove_wire_loops(&mut self, net: &mut Net) -> LoopPasses {
        let short = self.remove_short_loops(net);
        if net.segments.is_empty() {
            return LoopPasses {
                short,
                wire: LoopReport {
                    sweep: short.sweep,
                    ..LoopReport::default()
                },
            };
        }
        for k in 0..net.segments.len() {
            self.add_edges(net, k);
        }

        let mut cut = 0usize;
        let mut sweeps = 0usize;
        loop {
            sweeps += 1;
            let mut removed = 0usize;
            self.clear_visited();
            for start in 0..self.pts.len() {
                let Some(mut e) = self.get_first_edge(start) else {
                    continue;
                };
                self.pts[start].visit = Visit::OnStack(0);
                loop {
                    self.mark_pair_visited(e);
                    let to = self.edges[e].to;
                    if let Visit::OnStack(depth) = self.pts[to].visit {
                        if self.break_loop(net, depth) {
                            removed += 1;
                        }
                    }
                    let next = if self.pts[to].visit.is_visited() {
                        self.get_next_edge(false)
                    } else {
                        self.pts[to].visit = Visit::OnStack(self.stack.len());
                        self.get_next_edge(true)
                    };
                    match next {
                        Some(n) => e = n,
                        None => break,
                    }
                }
            }
            cut += removed;
            if removed == 0 {
                break;
            }
        }

        let sweep = self.sweep();
        debug!(
            cut,
            sweeps,
            components = sweep.components,
            loops = sweep.loops,
            "wire loops removed"
        );
        LoopPasses {
            short,
            wire: LoopReport {
                shorts_cut: cut,
                sweeps,
                sweep,
            },
        }
    }

    /// Cut the longest short on the stack between `depth` and the top; the
    /// first one wins a tie. The search resumes from the cut edge, so the
    /// points above it go back to plain visited.
    fn break_loop(&mut self, net: &mut Net, depth: usize) -> bool {
        let mut best: Option<(usize, i64)> = None;
        for k in depth..self.stack.len() {
            let e = self.edges[self.stack[k]];
            if !e.is_short() {
                continue;
            }
            let dist = net.pt_dist(e.from, e.to);
            if best.map_or(true, |(_, max)| dist > max) {
                best = Some((k, dist));
            }
        }
        let Some((max_k, _)) = best else {
            return false;
        };
        self.cut_short(net, self.stack[max_k]);
        let top = self.stack.len();
        if max_k + 1 < top {
            for k in max_k + 1..top - 1 {
                let to = self.edges[self.stack[k]].to;
                self.pts[to].visit = Visit::Seen;
            }
            self.stack.truncate(max_k + 1);
        }
        true
    }
}

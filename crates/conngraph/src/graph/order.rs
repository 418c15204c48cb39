//! Sorted insertion into adjacency lists.
//!
//! Wire edges are kept ordered by their far point `(x, y)`, and the scan for
//! their slot stops at the first short edge, so they always precede the
//! shorts already in the list. Short edges are ordered by their own length,
//! then by far point. A new edge goes in front of any equal key, which makes
//! the final order a pure function of the insertion sequence.

use crate::geom::Pt;
use crate::net::Net;

use super::arena::ConnGraph;
use super::types::{Edge, EdgeIdx, PointIdx};

impl ConnGraph {
    fn push_edge(&mut self, from: PointIdx, to: PointIdx) -> EdgeIdx {
        let e = self.edges.len();
        self.edges.push(Edge {
            from,
            to,
            next: None,
            reverse: e,
            short: None,
            seg: None,
            visited: false,
            skip: false,
        });
        e
    }

    fn splice(&mut self, from: PointIdx, prev: Option<EdgeIdx>, e: EdgeIdx, next: Option<EdgeIdx>) {
        self.edges[e].next = next;
        match prev {
            Some(p) => self.edges[p].next = Some(e),
            None => self.pts[from].head = Some(e),
        }
    }

    /// New wire edge `from -> to`, placed among `from`'s wire edges.
    pub fn insert_plain_edge(&mut self, net: &Net, from: PointIdx, to: PointIdx) -> EdgeIdx {
        let e = self.push_edge(from, to);
        let key: Pt = net.xy(to);
        let mut prev = None;
        let mut cur = self.pts[from].head;
        while let Some(c) = cur {
            let ce = &self.edges[c];
            if ce.is_short() || key <= net.xy(ce.to) {
                break;
            }
            prev = cur;
            cur = ce.next;
        }
        self.splice(from, prev, e, cur);
        e
    }

    /// New short edge `from -> to`, placed by length then far point.
    pub fn insert_short_edge(&mut self, net: &Net, from: PointIdx, to: PointIdx) -> EdgeIdx {
        let e = self.push_edge(from, to);
        let key = (net.pt_dist(from, to), net.xy(to));
        let mut prev = None;
        let mut cur = self.pts[from].head;
        while let Some(c) = cur {
            let ce = &self.edges[c];
            if key <= (net.pt_dist(ce.from, ce.to), net.xy(ce.to)) {
                break;
            }
            prev = cur;
            cur = ce.next;
        }
        self.splice(from, prev, e, cur);
        e
    }

    /// Edge pair for wire segment `k`.
    pub fn add_edges(&mut self, net: &Net, k: usize) -> (EdgeIdx, EdgeIdx) {
        let (i0, i1) = (net.segments[k].from, net.segments[k].to);
        let e = self.insert_plain_edge(net, i0, i1);
        let e2 = self.insert_plain_edge(net, i1, i0);
        self.pair(e, e2, None, Some(k));
        (e, e2)
    }

    /// Edge pair for short `s`.
    pub fn add_short_edges(&mut self, net: &Net, s: usize) -> (EdgeIdx, EdgeIdx) {
        let (i0, i1) = (net.shorts[s].i0, net.shorts[s].i1);
        let e = self.insert_short_edge(net, i0, i1);
        let e2 = self.insert_short_edge(net, i1, i0);
        self.pair(e, e2, Some(s), None);
        (e, e2)
    }

    fn pair(&mut self, e: EdgeIdx, e2: EdgeIdx, short: Option<usize>, seg: Option<usize>) {
        for (a, b) in [(e, e2), (e2, e)] {
            let edge = &mut self.edges[a];
            edge.reverse = b;
            edge.short = short;
            edge.seg = seg;
        }
    }
}

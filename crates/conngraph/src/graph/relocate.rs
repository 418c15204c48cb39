//! Re-sorting of short edges and reassignment of the skipped short.
//!
//! After the loop passes, a point's shorts are ordered by the wire anchor
//! they lead to rather than by their own endpoint. Once sorted, a point on a
//! main branch whose group of shorts has one skipped member hands the skip
//! over to the short that directly joins the last two shorted neighbours.

use std::mem;

use tracing::debug;

use crate::geom::Pt;
use crate::net::Net;

use super::arena::ConnGraph;
use super::types::{EdgeIdx, PointIdx};

impl ConnGraph {
    /// Far end of a short's wire anchor: the destination of the first wire
    /// edge leaving the short's far point. Wire edges, and shorts whose far
    /// point has no wire, use their own far point.
    pub fn edge_ref_coord(&self, net: &Net, e: EdgeIdx) -> Pt {
        let edge = &self.edges[e];
        if !edge.is_short() {
            return net.xy(edge.to);
        }
        let mut cur = self.pts[edge.to].head;
        while let Some(c) = cur {
            if !self.edges[c].is_short() {
                return net.xy(self.edges[c].to);
            }
            cur = self.edges[c].next;
        }
        net.xy(edge.to)
    }

    /// A short edge whose endpoints disagree on coordinates.
    pub fn is_bad_short(&self, net: &Net, e: EdgeIdx) -> bool {
        let edge = &self.edges[e];
        edge.is_short() && net.xy(edge.from) != net.xy(edge.to)
    }

    /// Bubble-sort one point's list by reference coordinate. Pairs of wire
    /// edges and pairs involving a bad short are never compared.
    fn sort_by_ref(&mut self, net: &Net, jp: PointIdx, order: &mut Vec<EdgeIdx>) {
        self.collect_adjacency(jp, order);
        if order.len() < 2 {
            return;
        }
        loop {
            let mut swapped = false;
            for i in 0..order.len() - 1 {
                let (a, b) = (order[i], order[i + 1]);
                let both_wire = !self.edges[a].is_short() && !self.edges[b].is_short();
                if both_wire || self.is_bad_short(net, a) || self.is_bad_short(net, b) {
                    continue;
                }
                if self.edge_ref_coord(net, a) > self.edge_ref_coord(net, b) {
                    order.swap(i, i + 1);
                    swapped = true;
                }
            }
            self.relink(jp, order);
            if !swapped {
                break;
            }
        }
    }

    /// Re-sort every adjacency list, then move skips onto direct shorts.
    /// Returns the number of skips moved.
    pub fn relocate_shorts(&mut self, net: &mut Net) -> usize {
        let mut order = mem::take(&mut self.order);
        for jp in 0..self.pts.len() {
            self.sort_by_ref(net, jp, &mut order);
        }

        let mut moved = 0usize;
        for jp in 0..self.pts.len() {
            let mut wires = 0usize;
            let mut shorts = 0usize;
            let mut skipped: Option<EdgeIdx> = None;
            let mut prev_last: Option<EdgeIdx> = None;
            let mut last: Option<EdgeIdx> = None;
            self.collect_adjacency(jp, &mut order);
            for &e in &order {
                let edge = self.edges[e];
                if !edge.is_short() {
                    wires += 1;
                    continue;
                }
                shorts += 1;
                if self.is_bad_short(net, e) {
                    continue;
                }
                if edge.skip && skipped.is_none() {
                    skipped = Some(e);
                }
                prev_last = last;
                last = Some(e);
            }
            // only the main branch of a point with several shorts
            if wires <= 1 || shorts <= 1 {
                continue;
            }
            let (Some(old), Some(a), Some(b)) = (skipped, prev_last, last) else {
                continue;
            };
            let (a, b) = (self.edges[a].to, self.edges[b].to);
            let Some(direct) = self.find_edge(a, b) else {
                continue;
            };
            let de = self.edges[direct];
            if !de.is_short() || de.short == self.edges[old].short {
                continue;
            }
            self.set_pair_skip(net, direct, true);
            self.set_pair_skip(net, old, false);
            debug!(
                point = jp,
                skipped = ?de.short,
                restored = ?self.edges[old].short,
                "moved short skip"
            );
            moved += 1;
        }
        self.order = order;
        moved
    }
}

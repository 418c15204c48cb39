//! Shape reconciliation for short groups whose points disagree on coordinates.
//!
//! A short group is every point reachable from a seed through live shorts.
//! When its points are not all at one coordinate, the wires and vias that
//! touch the group are inspected and, if one of three layouts is
//! recognized, the points are collapsed onto a single target by stretching
//! or shrinking the touching shapes:
//! - via-anchored: all vias share a point of the group and every wire is
//!   centered on it without running past it on both sides;
//! - single axis: all wires share one axis extent and width, and the other
//!   points can slide along that axis;
//! - cross junction: horizontal wires share a y center, vertical wires an x
//!   center, and no shape runs past the crossing.
//!
//! Groups that fit none of these but sit entirely on one terminal lose
//! their shorts instead. Anything else is reported and left untouched.

use tracing::{debug, warn};

use crate::geom::{Pt, Rect, Shape};
use crate::net::Net;

use super::arena::ConnGraph;
use super::types::{AdjustReport, PointIdx, Visit};

/// A wire or via touching a short group, seen from the group point it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeRef {
    pub pt: PointIdx,
    pub seg: usize,
}

/// What the wires of a group have in common.
#[derive(Clone, Copy, Debug)]
struct Extents {
    nvia: usize,
    /// Shared wire width, 0 if widths differ or there are no wires.
    w: i32,
    /// All wires share their y extent.
    ok_hor: bool,
    /// All wires share their x extent.
    ok_ver: bool,
    xlo: i32,
    xhi: i32,
    ylo: i32,
    yhi: i32,
}

impl Extents {
    fn of(net: &Net, refs: &[ShapeRef]) -> Self {
        let mut x = Extents {
            nvia: 0,
            w: 0,
            ok_hor: true,
            ok_ver: true,
            xlo: 0,
            xhi: 0,
            ylo: 0,
            yhi: 0,
        };
        let mut first = true;
        for r in refs {
            let s = net.segments[r.seg].shape;
            if s.via {
                x.nvia += 1;
                continue;
            }
            let rc = s.rect;
            if first {
                first = false;
                x.w = s.width();
                x.xlo = rc.xmin;
                x.xhi = rc.xmax;
                x.ylo = rc.ymin;
                x.yhi = rc.ymax;
                continue;
            }
            if s.width() != x.w {
                x.w = 0;
            }
            if rc.xmin != x.xlo || rc.xmax != x.xhi {
                x.ok_ver = false;
                x.xlo = x.xlo.min(rc.xmin);
                x.xhi = x.xhi.max(rc.xmax);
            }
            if rc.ymin != x.ylo || rc.ymax != x.yhi {
                x.ok_hor = false;
                x.ylo = x.ylo.min(rc.ymin);
                x.yhi = x.yhi.max(rc.ymax);
            }
        }
        x
    }
}

struct Group<'a> {
    net: &'a Net,
    pts: &'a [PointIdx],
    refs: &'a [ShapeRef],
    ext: Extents,
}

impl<'a> Group<'a> {
    fn new(net: &'a Net, pts: &'a [PointIdx], refs: &'a [ShapeRef]) -> Self {
        Self {
            net,
            pts,
            refs,
            ext: Extents::of(net, refs),
        }
    }

    fn xy(&self, i: usize) -> Pt {
        self.net.xy(self.pts[i])
    }

    fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.refs.iter().map(|r| self.net.segments[r.seg].shape)
    }

    fn index_at(&self, t: Pt) -> Option<usize> {
        (0..self.pts.len()).find(|&i| self.xy(i) == t)
    }

    /// Point of the first via, if every via of the group sits on it.
    fn common_via(&self) -> Option<Pt> {
        let mut vias = self
            .refs
            .iter()
            .filter(|r| self.net.segments[r.seg].shape.via)
            .map(|r| self.net.xy(r.pt));
        let t = vias.next()?;
        vias.all(|p| p == t).then_some(t)
    }

    /// `s` reaches past `t` by more than half a wire width on both sides of one axis.
    fn protrudes(&self, s: &Shape, t: Pt) -> bool {
        let h = self.ext.w / 2;
        let r = s.rect;
        (r.xmin < t.x - h && t.x + h < r.xmax) || (r.ymin < t.y - h && t.y + h < r.ymax)
    }

    fn via_anchored(&self) -> Option<usize> {
        if self.ext.nvia == 0 {
            return None;
        }
        let t = self.common_via()?;
        let ii = self.index_at(t)?;
        let centered = self.shapes().all(|s| {
            let c = s.rect.center2();
            if s.is_horizontal() {
                c.y == 2 * t.y
            } else {
                c.x == 2 * t.x
            }
        });
        if !centered || self.shapes().any(|s| !s.via && self.protrudes(&s, t)) {
            return None;
        }
        Some(ii)
    }

    fn single_axis(&self) -> Option<usize> {
        let x = self.ext;
        if x.w == 0 || !(x.ok_ver || x.ok_hor) || x.nvia > 1 {
            return None;
        }
        let n = self.pts.len();
        let h = x.w / 2;
        let anchor = match x.nvia {
            1 => Some(self.index_at(self.common_via()?)?),
            _ => None,
        };
        // a point on an endcap must not move
        let at_end = |i: usize| {
            let p = self.xy(i);
            if x.ok_ver {
                p.y - h == x.ylo || p.y + h == x.yhi
            } else {
                p.x - h == x.xlo || p.x + h == x.xhi
            }
        };
        let ii = anchor.unwrap_or_else(|| (0..n).find(|&i| at_end(i)).unwrap_or(0));
        let t = self.xy(ii);
        let slides = (0..n).filter(|&k| k != ii).all(|k| {
            let p = self.xy(k);
            let on_axis = if x.ok_ver { p.x == t.x } else { p.y == t.y };
            !at_end(k) && on_axis
        });
        slides.then_some(ii)
    }

    fn cross_junction(&self) -> Option<usize> {
        let x = self.ext;
        if x.w == 0 || x.ok_ver || x.ok_hor {
            return None;
        }
        let t = if x.nvia > 0 {
            self.common_via()?
        } else {
            let hor = self.shapes().find(Shape::is_horizontal)?;
            let ver = self.shapes().find(Shape::is_vertical)?;
            Pt::new(
                (ver.rect.xmin + ver.rect.xmax) / 2,
                (hor.rect.ymin + hor.rect.ymax) / 2,
            )
        };
        let ii = self.index_at(t)?;
        let centered = self.shapes().all(|s| {
            let c = s.rect.center2();
            !(s.is_horizontal() && c.y != 2 * t.y) && !(s.is_vertical() && c.x != 2 * t.x)
        });
        if !centered || self.shapes().any(|s| self.protrudes(&s, t)) {
            return None;
        }
        Some(ii)
    }
}

/// Move every point in `refs` onto `target`, stretching or shrinking the
/// shape it touches on the axis that changes.
///
/// The side to edit is picked from the shape's other endpoint: if the target
/// lies below it the min extent moves, above it the max extent. All edits are
/// staged first; if any would turn a shape inside out nothing is written and
/// `false` comes back.
pub fn adjust_commit(net: &mut Net, target: PointIdx, refs: &[ShapeRef]) -> bool {
    let p = net.xy(target);
    let mut staged: Vec<(usize, Rect)> = Vec::with_capacity(refs.len());
    for r in refs.iter().filter(|r| r.pt != target) {
        let here = net.xy(r.pt);
        let (dx, dy) = (p.x - here.x, p.y - here.y);
        let seg = &net.segments[r.seg];
        let far = net.xy(seg.other_end(r.pt));
        let mut rect = staged
            .iter()
            .rev()
            .find(|(s, _)| *s == r.seg)
            .map_or(seg.shape.rect, |&(_, rc)| rc);
        if dx != 0 {
            if p.x < far.x {
                rect.xmin += dx;
            } else if p.x > far.x {
                rect.xmax += dx;
            }
        } else if dy != 0 {
            if p.y < far.y {
                rect.ymin += dy;
            } else if p.y > far.y {
                rect.ymax += dy;
            }
        }
        if rect.is_degenerate() {
            return false;
        }
        staged.push((r.seg, rect));
    }
    for (seg, rect) in staged {
        net.segments[seg].shape.rect = rect;
    }
    for r in refs.iter().filter(|r| r.pt != target) {
        net.points[r.pt].pt = p;
    }
    true
}

impl ConnGraph {
    /// Flood live shorts from `j` into the group buffer, marking points seen.
    fn collect_group(&mut self, j: PointIdx) {
        self.group.clear();
        self.pts[j].visit = Visit::Seen;
        self.group.push(j);
        let mut i = 0;
        while i < self.group.len() {
            let q = self.group[i];
            i += 1;
            let mut cur = self.pts[q].head;
            while let Some(e) = cur {
                let edge = self.edges[e];
                cur = edge.next;
                if edge.skip || !edge.is_short() || self.group.contains(&edge.to) {
                    continue;
                }
                self.pts[edge.to].visit = Visit::Seen;
                self.group.push(edge.to);
            }
        }
    }

    /// Reconcile every short group whose points disagree on coordinates.
    pub fn adjust_shapes(&mut self, net: &mut Net) -> AdjustReport {
        let mut rep = AdjustReport::default();
        let mut refs: Vec<ShapeRef> = Vec::new();
        self.clear_visited();
        for j in 0..self.pts.len() {
            if self.pts[j].visit.is_visited() {
                continue;
            }
            self.collect_group(j);
            if self.group.len() == 1 {
                continue;
            }
            let group = std::mem::take(&mut self.group);
            let p0 = net.xy(group[0]);
            if group.iter().any(|&p| net.xy(p) != p0) {
                rep.groups += 1;
                if group.len() > self.cfg.max_group {
                    warn!(
                        point = j,
                        size = group.len(),
                        limit = self.cfg.max_group,
                        "short group too large to reconcile"
                    );
                    rep.overflowed += 1;
                } else {
                    self.reconcile(net, &group, &mut refs, &mut rep);
                }
            }
            self.group = group;
        }
        rep
    }

    fn reconcile(
        &mut self,
        net: &mut Net,
        group: &[PointIdx],
        refs: &mut Vec<ShapeRef>,
        rep: &mut AdjustReport,
    ) {
        refs.clear();
        for &p in group {
            let mut cur = self.pts[p].head;
            while let Some(e) = cur {
                let edge = self.edges[e];
                cur = edge.next;
                if let (None, Some(seg)) = (edge.short, edge.seg) {
                    refs.push(ShapeRef { pt: p, seg });
                }
            }
        }

        let candidates = {
            let g = Group::new(net, group, refs);
            [g.via_anchored(), g.single_axis(), g.cross_junction()]
        };
        for ii in candidates.into_iter().flatten() {
            if adjust_commit(net, group[ii], refs) {
                debug!(target_pt = group[ii], size = group.len(), "collapsed short group");
                rep.moved += 1;
                return;
            }
        }

        let term = net.points[group[0]].term;
        if term.is_some() && group.iter().all(|&p| net.points[p].term == term) {
            for &p in group {
                let mut cur = self.pts[p].head;
                while let Some(e) = cur {
                    let edge = self.edges[e];
                    cur = edge.next;
                    if !edge.skip && edge.is_short() && group.contains(&edge.to) {
                        self.set_pair_skip(net, e, true);
                        rep.dropped_ties += 1;
                    }
                }
            }
            debug!(term = ?term, size = group.len(), "dropped terminal shorts");
            return;
        }

        rep.unresolved += 1;
        warn!(point = group[0], size = group.len(), "short group left unresolved");
    }
}

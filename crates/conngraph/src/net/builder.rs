//! Incremental construction of a `Net`, used by tests, the generator and the CLI.

use crate::geom::{Pt, Shape};

use super::{Net, NetError, NetPoint, Segment, Short};

#[derive(Clone, Debug, Default)]
pub struct NetBuilder {
    points: Vec<NetPoint>,
    segments: Vec<Segment>,
    shorts: Vec<Short>,
}

impl NetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(&mut self, x: i32, y: i32) -> usize {
        self.points.push(NetPoint {
            pt: Pt::new(x, y),
            term: None,
            wire_id: None,
        });
        self.points.len() - 1
    }

    /// A point sitting on terminal `term`.
    pub fn term_point(&mut self, x: i32, y: i32, term: usize) -> usize {
        let j = self.point(x, y);
        self.set_term(j, term);
        j
    }

    /// Attach an existing point to terminal `term`.
    pub fn set_term(&mut self, j: usize, term: usize) {
        if let Some(p) = self.points.get_mut(j) {
            p.term = Some(term);
        }
    }

    pub fn xy(&self, j: usize) -> Option<Pt> {
        self.points.get(j).map(|p| p.pt)
    }

    /// Wire of `width` drawn between the current coordinates of `from` and `to`.
    pub fn wire(&mut self, from: usize, to: usize, width: i32) -> usize {
        let shape = match (self.xy(from), self.xy(to)) {
            (Some(a), Some(b)) => Shape::wire(a, b, width),
            // left for `build` to reject
            _ => Shape::default(),
        };
        self.segment(from, to, shape)
    }

    /// Via of side `size` centered on `from`.
    pub fn via(&mut self, from: usize, to: usize, size: i32) -> usize {
        let shape = Shape::via(self.xy(from).unwrap_or_default(), size);
        self.segment(from, to, shape)
    }

    pub fn segment(&mut self, from: usize, to: usize, shape: Shape) -> usize {
        self.segments.push(Segment { from, to, shape });
        self.segments.len() - 1
    }

    pub fn short(&mut self, i0: usize, i1: usize) -> usize {
        self.shorts.push(Short::new(i0, i1));
        self.shorts.len() - 1
    }

    pub fn points_len(&self) -> usize {
        self.points.len()
    }

    pub fn build(self) -> Result<Net, NetError> {
        Net::new(self.points, self.segments, self.shorts)
    }
}

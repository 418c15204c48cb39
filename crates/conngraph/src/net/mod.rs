//! Net connectivity records: points, routed segments, shorts and terminals.
//!
//! Purpose
//! - Hold the as-routed description of one electrical net, in the order the
//!   router emitted it. The graph engine reads this and mutates only short
//!   `skip` flags, shape extents and point coordinates.
//!
//! Conventions
//! - Points, segments and shorts are addressed by their index in the owning
//!   vectors. Indices are validated once in `Net::new`.
//! - Segments are listed in path order: consecutive segments that share an
//!   endpoint (`segments[k].from == segments[k - 1].to`) form one path.

mod builder;

pub use builder::NetBuilder;

use std::fmt;

use crate::geom::{Pt, Shape};

/// One endpoint of a wire segment or short.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetPoint {
    pub pt: Pt,
    /// Terminal (pin) this point sits on, if any.
    pub term: Option<usize>,
    /// Wire id handed out by the traversal that first reached the point.
    pub wire_id: Option<u32>,
}

/// One routed wire or via between two points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub shape: Shape,
}

impl Segment {
    /// The endpoint that is not `p`.
    #[inline]
    pub fn other_end(&self, p: usize) -> usize {
        if self.from == p {
            self.to
        } else {
            self.from
        }
    }
}

/// An electrical tie between two points that no drawn wire connects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Short {
    pub i0: usize,
    pub i1: usize,
    /// Logically removed from the connectivity graph.
    pub skip: bool,
}

impl Short {
    #[inline]
    pub fn new(i0: usize, i1: usize) -> Self {
        Self { i0, i1, skip: false }
    }

    #[inline]
    pub fn other_end(&self, p: usize) -> usize {
        if self.i0 == p {
            self.i1
        } else {
            self.i0
        }
    }
}

/// Term ring: every point attached to one terminal, in point order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Term {
    pub points: Vec<usize>,
}

/// Invalid net description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetError {
    SegmentEndpoint { segment: usize, point: usize },
    ShortEndpoint { short: usize, point: usize },
    /// Terminal numbers index the term rings, which never outnumber points.
    Term { point: usize, term: usize },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentEndpoint { segment, point } => {
                write!(f, "segment {segment} references missing point {point}")
            }
            Self::ShortEndpoint { short, point } => {
                write!(f, "short {short} references missing point {point}")
            }
            Self::Term { point, term } => {
                write!(
                    f,
                    "point {point} references terminal {term} beyond the point count"
                )
            }
        }
    }
}

impl std::error::Error for NetError {}

/// The connectivity of one net.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Net {
    pub points: Vec<NetPoint>,
    pub segments: Vec<Segment>,
    pub shorts: Vec<Short>,
    pub terms: Vec<Term>,
}

impl Net {
    /// Validate indices and derive the term rings from `NetPoint::term`.
    pub fn new(
        points: Vec<NetPoint>,
        segments: Vec<Segment>,
        shorts: Vec<Short>,
    ) -> Result<Self, NetError> {
        let n = points.len();
        for (k, s) in segments.iter().enumerate() {
            for p in [s.from, s.to] {
                if p >= n {
                    return Err(NetError::SegmentEndpoint {
                        segment: k,
                        point: p,
                    });
                }
            }
        }
        for (k, s) in shorts.iter().enumerate() {
            for p in [s.i0, s.i1] {
                if p >= n {
                    return Err(NetError::ShortEndpoint { short: k, point: p });
                }
            }
        }
        for (j, p) in points.iter().enumerate() {
            if let Some(t) = p.term.filter(|&t| t >= n) {
                return Err(NetError::Term { point: j, term: t });
            }
        }
        let term_n = points
            .iter()
            .filter_map(|p| p.term)
            .max()
            .map_or(0, |t| t + 1);
        let mut terms = vec![Term::default(); term_n];
        for (j, p) in points.iter().enumerate() {
            if let Some(t) = p.term {
                terms[t].points.push(j);
            }
        }
        Ok(Self {
            points,
            segments,
            shorts,
            terms,
        })
    }

    #[inline]
    pub fn xy(&self, j: usize) -> Pt {
        self.points[j].pt
    }

    /// Manhattan distance between two points of the net.
    #[inline]
    pub fn pt_dist(&self, a: usize, b: usize) -> i64 {
        self.xy(a).manhattan(self.xy(b))
    }

    /// A short whose endpoints disagree on coordinates.
    #[inline]
    pub fn is_bad_short(&self, s: usize) -> bool {
        let s = &self.shorts[s];
        self.xy(s.i0) != self.xy(s.i1)
    }

    /// Skip flags of all shorts, in short order.
    pub fn short_skips(&self) -> Vec<bool> {
        self.shorts.iter().map(|s| s.skip).collect()
    }

    pub fn skipped_shorts(&self) -> usize {
        self.shorts.iter().filter(|s| s.skip).count()
    }

    /// Path id per point: a new path starts whenever a segment does not
    /// continue from the previous segment's end. Returns the ids and the
    /// number of paths.
    pub fn path_ids(&self) -> (Vec<Option<usize>>, usize) {
        let mut ids = vec![None; self.points.len()];
        let mut npath = 0usize;
        for (k, s) in self.segments.iter().enumerate() {
            if k > 0 && s.from != self.segments[k - 1].to {
                npath += 1;
            }
            ids[s.from] = Some(npath);
            ids[s.to] = Some(npath);
        }
        let count = if self.segments.is_empty() { 0 } else { npath + 1 };
        (ids, count)
    }
}

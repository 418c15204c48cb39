//! Random Manhattan nets (random-walk paths + replay tokens).
//!
//! Purpose
//! - Provide a small, deterministic source of nets for benchmarks and
//!   property tests. Every draw is reproducible from its replay token.
//!
//! Model
//! - The first path starts at the origin. Every later path starts on a fresh
//!   point placed on top of a random earlier point and tied to it by a short,
//!   the way a router hands over between layers.
//! - Each step walks one to three grid pitches along a random axis and lays a
//!   wire, or with probability `via_frac` drops a via in place.
//! - `loop_wires` lays wires between random pairs of existing points. These
//!   close cycles through wires, so the nets also carry wire-only loops and
//!   loops that mix wires with shorts.
//! - `extra_shorts` ties random pairs of points; these are mostly redundant
//!   and often span a distance, which is what the loop passes must clean up.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::net::{Net, NetBuilder, NetError};

/// Generator configuration.
#[derive(Clone, Copy, Debug)]
pub struct NetGenCfg {
    pub paths: usize,
    /// Segments per path.
    pub steps: usize,
    /// Grid pitch; every coordinate is a multiple of it.
    pub pitch: i32,
    pub width: i32,
    pub extra_shorts: usize,
    /// Wires drawn between existing points after the paths.
    pub loop_wires: usize,
    /// Probability that a step is a via rather than a wire. Clamped to [0, 1].
    pub via_frac: f64,
    /// Number of terminals the path ends are spread over; 0 for none.
    pub terms: usize,
}

impl Default for NetGenCfg {
    fn default() -> Self {
        Self {
            paths: 8,
            steps: 6,
            pitch: 10,
            width: 2,
            extra_shorts: 4,
            loop_wires: 0,
            via_frac: 0.1,
            terms: 2,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one net.
pub fn draw_net(cfg: &NetGenCfg, tok: ReplayToken) -> Result<Net, NetError> {
    let mut rng = tok.to_std_rng();
    let via_frac = cfg.via_frac.clamp(0.0, 1.0);
    let pitch = cfg.pitch.max(1);
    let mut b = NetBuilder::new();

    for k in 0..cfg.paths {
        let mut cur = if k == 0 {
            b.point(0, 0)
        } else {
            let anchor = rng.gen_range(0..b.points_len());
            let at = b.xy(anchor).unwrap_or_default();
            let p = b.point(at.x, at.y);
            b.short(anchor, p);
            p
        };
        for _ in 0..cfg.steps {
            let at = b.xy(cur).unwrap_or_default();
            let next = if rng.gen_bool(via_frac) {
                let p = b.point(at.x, at.y);
                b.via(cur, p, cfg.width.max(2));
                p
            } else {
                let len = pitch * rng.gen_range(1..=3);
                let (dx, dy) = match rng.gen_range(0..4) {
                    0 => (len, 0),
                    1 => (-len, 0),
                    2 => (0, len),
                    _ => (0, -len),
                };
                let p = b.point(at.x + dx, at.y + dy);
                b.wire(cur, p, cfg.width);
                p
            };
            cur = next;
        }
        if cfg.terms > 0 {
            b.set_term(cur, k % cfg.terms);
        }
    }

    let n = b.points_len();
    if n >= 2 {
        for _ in 0..cfg.loop_wires {
            let i = rng.gen_range(0..n);
            let j = (i + rng.gen_range(1..n)) % n;
            b.wire(i, j, cfg.width);
        }
        for _ in 0..cfg.extra_shorts {
            let i = rng.gen_range(0..n);
            let j = (i + rng.gen_range(1..n)) % n;
            b.short(i, j);
        }
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproducible_draw() {
        let cfg = NetGenCfg::default();
        let tok = ReplayToken { seed: 42, index: 7 };
        let a = draw_net(&cfg, tok).unwrap();
        let b = draw_net(&cfg, tok).unwrap();
        assert_eq!(a, b);
        let c = draw_net(&cfg, ReplayToken { seed: 42, index: 8 }).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn counts_follow_the_config() {
        let cfg = NetGenCfg {
            paths: 5,
            steps: 4,
            extra_shorts: 3,
            ..NetGenCfg::default()
        };
        let net = draw_net(&cfg, ReplayToken { seed: 1, index: 0 }).unwrap();
        assert_eq!(net.segments.len(), 5 * 4);
        assert_eq!(net.points.len(), 1 + 5 * 4 + 4);
        assert_eq!(net.shorts.len(), 4 + 3);
        assert_eq!(net.terms.len(), 2);
        assert!(net.shorts.iter().all(|s| s.i0 != s.i1));
        let (_, paths) = net.path_ids();
        assert_eq!(paths, 5);
    }

    #[test]
    fn loop_wires_join_existing_points() {
        let base = NetGenCfg {
            paths: 3,
            steps: 4,
            ..NetGenCfg::default()
        };
        let cfg = NetGenCfg {
            loop_wires: 5,
            ..base
        };
        let tok = ReplayToken { seed: 9, index: 2 };
        let plain = draw_net(&base, tok).unwrap();
        let net = draw_net(&cfg, tok).unwrap();
        assert_eq!(net.segments.len(), 3 * 4 + 5);
        assert_eq!(net.points.len(), plain.points.len());
        assert_eq!(net.segments[..12], plain.segments[..]);
        assert!(net.segments[12..].iter().all(|s| s.from != s.to && !s.shape.via));
    }

    #[test]
    fn empty_config_draws_an_empty_net() {
        let cfg = NetGenCfg {
            paths: 0,
            ..NetGenCfg::default()
        };
        let net = draw_net(&cfg, ReplayToken { seed: 0, index: 0 }).unwrap();
        assert!(net.points.is_empty());
        assert!(net.shorts.is_empty());
    }
}

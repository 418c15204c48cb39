//! Connectivity repair for routed nets.
//!
//! A net arrives as the router left it: wire segments and vias in path
//! order, plus shorts tying points that no drawn shape connects. The graph
//! engine breaks every cycle that runs through a short, optionally moves
//! skips and reconciles shapes around shorted points, and exposes a
//! traversal that hands out wire ids.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api`
//!   is the curated surface for the CLI and benchmarks.

pub mod api;
pub mod gen;
pub mod geom;
pub mod graph;
pub mod net;
pub mod repair;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use graph::{ConnGraph, RepairCfg};
pub use net::{Net, NetError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::geom::{Pt, Rect, Shape};
    pub use crate::graph::{ConnGraph, RepairCfg, Visit};
    pub use crate::net::{Net, NetBuilder, NetError};
    pub use crate::repair::{repair_net, RepairReport};
}

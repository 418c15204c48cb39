//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI, benchmarks and tests. Breaking changes
//! are allowed.

// Geometry and net model
pub use crate::geom::{Pt, Rect, Shape};
pub use crate::net::{Net, NetBuilder, NetError, NetPoint, Segment, Short, Term};
// Graph engine
pub use crate::graph::{
    adjust_commit, AdjustReport, ConnGraph, DfsStep, DisconnectReport, LoopPasses, LoopReport,
    RepairCfg, ShapeRef, SweepReport, Visit,
};
// Pipeline and synthetic nets
pub use crate::gen::{draw_net, NetGenCfg, ReplayToken};
pub use crate::repair::{repair_net, repair_with, RepairReport};

//! Connectivity graph: edge arena, loop elimination and traversal.
//!
//! Purpose
//! - Turn one `Net` into an undirected multigraph of wire segments and
//!   shorts, break every cycle that runs through a short, and expose a
//!   depth-first traversal of what is left.
//!
//! Conventions
//! - Each segment and short becomes a forward/reverse edge pair; `visited`
//!   and `skip` are always set on both halves together.
//! - Adjacency lists are ordered at insertion time (see `order.rs`), so every
//!   pass is deterministic for a given net.
//! - Passes only ever flip short `skip` flags on the net, except shape
//!   reconciliation, which also edits shape extents and point coordinates.
//!
//! Layout
//! - `types.rs` (data types), `arena.rs` (storage), `order.rs` (insertion),
//!   `dfs.rs` (search primitive), `loops.rs` (loop passes), `relocate.rs`
//!   and `adjust.rs` (post-passes), `traverse.rs` (exposed traversal and
//!   disconnect diagnostics).

mod adjust;
mod arena;
mod dfs;
mod loops;
mod order;
mod relocate;
mod traverse;
mod types;

pub use adjust::{adjust_commit, ShapeRef};
pub use arena::ConnGraph;
pub use types::{
    AdjustReport, DfsStep, DisconnectReport, Edge, EdgeIdx, LoopPasses, LoopReport, PointIdx,
    RepairCfg, SweepReport, Visit,
};

//! Repair pipeline: loop removal, optional post-passes, wire-id assignment.
//!
//! Purpose
//! - Run the graph passes over one net in their fixed order and collect what
//!   each reported, so callers (the CLI, benchmarks) need a single entry point.
//!
//! Notes
//! - Wire ids are reset and handed out by traversal: every successful
//!   `dfs_start` opens a new id, and points tied to a traversed point only by
//!   a short inherit its id afterwards.
//! - Connectivity is judged on the first traversal, or on the whole graph when
//!   no traversal could start (shorts only). A net whose islands all
//!   meet on shared terminals counts as connected; points with no wires or
//!   shorts at all are ignored.

use tracing::debug;

use crate::graph::{AdjustReport, ConnGraph, DisconnectReport, LoopPasses, RepairCfg};
use crate::net::Net;

/// What one run of the pipeline did to a net.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub passes: LoopPasses,
    /// Skips moved by short relocation (0 when disabled).
    pub relocated: usize,
    /// `None` when shape reconciliation is disabled.
    pub adjust: Option<AdjustReport>,
    /// Traversals needed to reach every point; one per wire id.
    pub wires: usize,
    /// Wire-only cycles the traversal stepped over.
    pub residual_loops: usize,
    pub connected: bool,
    pub disconnect: Option<DisconnectReport>,
}

/// Repair `net` with a fresh graph.
pub fn repair_net(net: &mut Net, cfg: &RepairCfg) -> RepairReport {
    let mut g = ConnGraph::new(*cfg);
    repair_with(&mut g, net)
}

/// Repair `net` reusing `g`'s storage and configuration.
pub fn repair_with(g: &mut ConnGraph, net: &mut Net) -> RepairReport {
    let cfg = *g.cfg();
    let mut rep = RepairReport {
        passes: g.remove_wire_loops(net),
        ..RepairReport::default()
    };
    if cfg.relocate_shorts {
        rep.relocated = g.relocate_shorts(net);
    }
    if cfg.adjust_shapes {
        rep.adjust = Some(g.adjust_shapes(net));
    }
    debug_assert!(g.edge_pairs_consistent());

    for p in net.points.iter_mut() {
        p.wire_id = None;
    }
    g.dfs_clear();
    let mut first_reached_all = true;
    for j in 0..net.points.len() {
        let Some(root) = g.dfs_start(j) else {
            continue;
        };
        let id = rep.wires as u32;
        rep.wires += 1;
        net.points[root].wire_id.get_or_insert(id);
        while let Some(step) = g.dfs_next() {
            if step.is_loop {
                rep.residual_loops += 1;
            }
            net.points[step.to].wire_id.get_or_insert(id);
        }
        if rep.wires == 1 {
            first_reached_all = g.check_visited();
        }
    }
    if rep.wires == 0 {
        // nothing to start from; shorts alone can still split the net
        first_reached_all = g.check_visited();
    }
    for j in 0..net.points.len() {
        g.copy_wire_id_to_visited_shorts(net, j);
    }

    if !first_reached_all {
        rep.disconnect = g.smallest_component(net);
    }
    rep.connected = rep.disconnect.is_none();
    debug!(
        shorts_cut = rep.passes.shorts_cut(),
        relocated = rep.relocated,
        wires = rep.wires,
        residual_loops = rep.residual_loops,
        connected = rep.connected,
        "net repaired"
    );
    rep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NetBuilder;

    fn wire_and_two_shorts() -> Net {
        let mut b = NetBuilder::new();
        let a = b.point(0, 0);
        let c = b.point(5, 0);
        let d = b.point(5, 0);
        b.wire(a, c, 2);
        b.short(c, d);
        b.short(a, d);
        b.build().unwrap()
    }

    #[test]
    fn connected_net_gets_one_wire_id() {
        let mut net = wire_and_two_shorts();
        let rep = repair_net(&mut net, &RepairCfg::default());
        assert_eq!(rep.passes.shorts_cut(), 1);
        assert_eq!(net.short_skips(), vec![false, true]);
        assert_eq!(rep.wires, 1);
        assert_eq!(rep.residual_loops, 0);
        assert!(rep.connected);
        assert_eq!(rep.disconnect, None);
        assert_eq!(rep.adjust.map(|a| a.groups), Some(0));
        assert!(net.points.iter().all(|p| p.wire_id == Some(0)));
    }

    #[test]
    fn disabled_post_passes_leave_no_report() {
        let mut net = wire_and_two_shorts();
        let cfg = RepairCfg {
            adjust_shapes: false,
            ..RepairCfg::default()
        };
        let rep = repair_net(&mut net, &cfg);
        assert_eq!(rep.adjust, None);
        assert_eq!(rep.relocated, 0);
    }

    #[test]
    fn islands_are_reported() {
        let mut b = NetBuilder::new();
        let a = b.point(0, 0);
        let c = b.point(5, 0);
        let d = b.point(20, 0);
        let e = b.point(25, 0);
        let f = b.point(30, 0);
        b.wire(a, c, 2);
        b.wire(d, e, 2);
        b.wire(e, f, 2);
        let mut net = b.build().unwrap();

        let rep = repair_net(&mut net, &RepairCfg::default());
        assert_eq!(rep.wires, 2);
        assert!(!rep.connected);
        assert_eq!(
            rep.disconnect,
            Some(DisconnectReport {
                components: 2,
                start: a,
                edges: 1
            })
        );
        assert_eq!(net.points[c].wire_id, Some(0));
        assert_eq!(net.points[f].wire_id, Some(1));
    }

    #[test]
    fn islands_on_one_terminal_count_as_connected() {
        let mut b = NetBuilder::new();
        let a = b.term_point(0, 0, 0);
        let c = b.point(5, 0);
        let d = b.term_point(20, 0, 0);
        let e = b.point(25, 0);
        b.wire(a, c, 2);
        b.wire(d, e, 2);
        let mut net = b.build().unwrap();

        let rep = repair_net(&mut net, &RepairCfg::default());
        assert_eq!(rep.wires, 2);
        assert!(rep.connected);
    }

    #[test]
    fn short_only_islands_are_reported() {
        let mut b = NetBuilder::new();
        let p0 = b.point(0, 0);
        let p1 = b.point(0, 0);
        let p2 = b.point(50, 50);
        let p3 = b.point(50, 50);
        b.short(p0, p1);
        b.short(p2, p3);
        let mut net = b.build().unwrap();

        let mut g = ConnGraph::default();
        let rep = repair_with(&mut g, &mut net);
        assert_eq!(rep.wires, 0);
        assert!(!rep.connected);
        assert_eq!(
            rep.disconnect,
            Some(DisconnectReport {
                components: 2,
                start: p0,
                edges: 1
            })
        );
    }

    #[test]
    fn single_short_island_counts_as_connected() {
        let mut b = NetBuilder::new();
        let p0 = b.point(0, 0);
        let p1 = b.point(0, 0);
        b.short(p0, p1);
        let mut net = b.build().unwrap();
        let rep = repair_net(&mut net, &RepairCfg::default());
        assert_eq!(rep.wires, 0);
        assert!(rep.connected);
    }

    #[test]
    fn wire_cycle_shows_up_as_residual_loop() {
        let mut b = NetBuilder::new();
        let p = [b.point(0, 0), b.point(10, 0), b.point(10, 10), b.point(0, 10)];
        for k in 0..4 {
            b.wire(p[k], p[(k + 1) % 4], 2);
        }
        let mut net = b.build().unwrap();
        let rep = repair_net(&mut net, &RepairCfg::default());
        assert_eq!(rep.residual_loops, 1);
        assert_eq!(rep.wires, 1);
        assert!(rep.connected);
    }

    #[test]
    fn graph_can_be_reused_across_nets() {
        let mut g = ConnGraph::default();
        let mut first = wire_and_two_shorts();
        let mut second = wire_and_two_shorts();
        let a = repair_with(&mut g, &mut first);
        let b = repair_with(&mut g, &mut second);
        assert_eq!(a, b);
        assert_eq!(first, second);
    }
}

//! Property tests over generated nets.

use conngraph::gen::{draw_net, NetGenCfg, ReplayToken};
use conngraph::graph::{ConnGraph, RepairCfg};
use conngraph::net::Net;
use conngraph::repair::repair_net;
use proptest::prelude::*;

fn net_strategy() -> impl Strategy<Value = Net> {
    (
        any::<u64>(),
        0u64..1000,
        1usize..8,
        1usize..7,
        0usize..10,
        0usize..4,
        0usize..3,
    )
        .prop_map(|(seed, index, paths, steps, extra_shorts, loop_wires, terms)| {
            let cfg = NetGenCfg {
                paths,
                steps,
                extra_shorts,
                loop_wires,
                terms,
                ..NetGenCfg::default()
            };
            draw_net(&cfg, ReplayToken { seed, index }).expect("generated indices are valid")
        })
}

struct Dsu(Vec<usize>);

impl Dsu {
    fn new(n: usize) -> Self {
        Dsu((0..n).collect())
    }

    fn find(&mut self, mut a: usize) -> usize {
        while self.0[a] != a {
            self.0[a] = self.0[self.0[a]];
            a = self.0[a];
        }
        a
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        self.0[ra] = rb;
    }
}

/// True if the live short `s` could be dropped without disconnecting its ends.
fn short_on_cycle(net: &Net, s: usize) -> bool {
    let mut dsu = Dsu::new(net.points.len());
    for seg in &net.segments {
        dsu.union(seg.from, seg.to);
    }
    for (k, sh) in net.shorts.iter().enumerate() {
        if k != s && !sh.skip {
            dsu.union(sh.i0, sh.i1);
        }
    }
    dsu.find(net.shorts[s].i0) == dsu.find(net.shorts[s].i1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn no_live_short_closes_a_cycle(mut net in net_strategy()) {
        let mut g = ConnGraph::default();
        let passes = g.remove_wire_loops(&mut net);
        prop_assert_eq!(passes.wire.sweep.loops, count_wire_cycles(&net));
        for s in 0..net.shorts.len() {
            if !net.shorts[s].skip {
                prop_assert!(!short_on_cycle(&net, s), "short {} still on a cycle", s);
            }
        }
    }

    #[test]
    fn traversal_steps_over_every_wire_cycle(mut net in net_strategy()) {
        let cycles = count_wire_cycles(&net);
        let rep = repair_net(&mut net, &RepairCfg::default());
        prop_assert_eq!(rep.passes.wire.sweep.loops, cycles);
        prop_assert_eq!(rep.residual_loops, cycles);
    }

    #[test]
    fn edge_pairs_stay_mirrored(mut net in net_strategy()) {
        let mut g = ConnGraph::default();
        g.remove_wire_loops(&mut net);
        prop_assert!(g.edge_pairs_consistent());
        g.relocate_shorts(&mut net);
        prop_assert!(g.edge_pairs_consistent());
        g.adjust_shapes(&mut net);
        prop_assert!(g.edge_pairs_consistent());
    }

    #[test]
    fn loop_removal_is_idempotent(mut net in net_strategy()) {
        let mut g = ConnGraph::default();
        g.remove_wire_loops(&mut net);
        let skips = net.short_skips();
        let again = g.remove_wire_loops(&mut net);
        prop_assert_eq!(again.shorts_cut(), 0);
        prop_assert_eq!(net.short_skips(), skips);
    }

    #[test]
    fn same_path_shorts_are_skipped(mut net in net_strategy()) {
        let (paths, _) = net.path_ids();
        let mut g = ConnGraph::default();
        g.remove_short_loops(&mut net);
        for s in &net.shorts {
            if paths[s.i0].is_some() && paths[s.i0] == paths[s.i1] {
                prop_assert!(s.skip);
            }
        }
    }

    #[test]
    fn repair_never_degenerates_a_shape(mut net in net_strategy(), relocate in any::<bool>()) {
        let cfg = RepairCfg { relocate_shorts: relocate, ..RepairCfg::default() };
        let rep = repair_net(&mut net, &cfg);
        for seg in &net.segments {
            prop_assert!(!seg.shape.rect.is_degenerate());
        }
        let adjust = rep.adjust.unwrap_or_default();
        prop_assert!(adjust.moved + adjust.unresolved + adjust.overflowed <= adjust.groups);
        prop_assert!(rep.wires >= 1);
    }
}

/// Independent cycles left among wires alone: edges minus points plus components.
fn count_wire_cycles(net: &Net) -> usize {
    let mut dsu = Dsu::new(net.points.len());
    let mut cycles = 0;
    for seg in &net.segments {
        if dsu.find(seg.from) == dsu.find(seg.to) {
            cycles += 1;
        } else {
            dsu.union(seg.from, seg.to);
        }
    }
    cycles
}

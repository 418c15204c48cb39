use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conngraph::api::*;
use serde_json::{json, Value};
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "conn")]
#[command(about = "Connectivity repair for routed nets")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Repair one net and write a JSON report
    Repair {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
        /// Also write the repaired net here
        #[arg(long)]
        net_out: Option<String>,
        /// Move skips onto direct shorts after loop removal
        #[arg(long)]
        relocate: bool,
        /// Leave shapes around shorted points untouched
        #[arg(long)]
        no_adjust: bool,
        #[arg(long)]
        max_group: Option<usize>,
        #[arg(long)]
        max_short_hops: Option<usize>,
    },
    /// Draw a synthetic net
    Gen {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 8)]
        paths: usize,
        #[arg(long, default_value_t = 6)]
        steps: usize,
        #[arg(long, default_value_t = 4)]
        extra_shorts: usize,
        /// Wires between existing points, closing wire cycles
        #[arg(long, default_value_t = 0)]
        loop_wires: usize,
        #[arg(long)]
        out: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Repair {
            input,
            out,
            net_out,
            relocate,
            no_adjust,
            max_group,
            max_short_hops,
        } => {
            let mut cfg = RepairCfg {
                relocate_shorts: relocate,
                adjust_shapes: !no_adjust,
                ..RepairCfg::default()
            };
            if let Some(n) = max_group {
                cfg.max_group = n;
            }
            if let Some(n) = max_short_hops {
                cfg.max_short_hops = n;
            }
            repair(&input, &out, net_out.as_deref(), cfg)
        }
        Action::Gen {
            seed,
            index,
            paths,
            steps,
            extra_shorts,
            loop_wires,
            out,
        } => {
            let cfg = NetGenCfg {
                paths,
                steps,
                extra_shorts,
                loop_wires,
                ..NetGenCfg::default()
            };
            gen(ReplayToken { seed, index }, cfg, &out)
        }
        Action::Report => report(),
    }
}

fn repair(input: &str, out: &str, net_out: Option<&str>, cfg: RepairCfg) -> Result<()> {
    tracing::info!(input, out, "repair");
    let mut net = io::load_net(input)?;
    let rep = repair_net(&mut net, &cfg);
    tracing::info!(
        points = net.points.len(),
        shorts_cut = rep.passes.shorts_cut(),
        wires = rep.wires,
        connected = rep.connected,
        "repaired"
    );

    let doc = report_json(&rep, &net);
    let out_path = Path::new(out);
    io::ensure_parent(out_path)?;
    std::fs::write(out_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {out}"))?;
    let mut outputs = vec![out.to_string()];
    if let Some(path) = net_out {
        io::save_net(path, &net)?;
        outputs.push(path.to_string());
    }

    let params = json!({
        "max_short_hops": cfg.max_short_hops,
        "max_group": cfg.max_group,
        "relocate_shorts": cfg.relocate_shorts,
        "adjust_shapes": cfg.adjust_shapes,
        "outputs": outputs,
    });
    write_sidecar(out_path, Payload::new(params).with_input(input))?;
    Ok(())
}

fn loop_json(r: &LoopReport) -> Value {
    json!({
        "shorts_cut": r.shorts_cut,
        "sweeps": r.sweeps,
        "components": r.sweep.components,
        "loops": r.sweep.loops,
    })
}

fn report_json(rep: &RepairReport, net: &Net) -> Value {
    json!({
        "points": net.points.len(),
        "segments": net.segments.len(),
        "shorts": net.shorts.len(),
        "skipped_shorts": net.skipped_shorts(),
        "short_pass": loop_json(&rep.passes.short),
        "wire_pass": loop_json(&rep.passes.wire),
        "relocated": rep.relocated,
        "adjust": rep.adjust.map(|a| json!({
            "groups": a.groups,
            "moved": a.moved,
            "dropped_ties": a.dropped_ties,
            "unresolved": a.unresolved,
            "overflowed": a.overflowed,
        })),
        "wires": rep.wires,
        "residual_loops": rep.residual_loops,
        "connected": rep.connected,
        "disconnect": rep.disconnect.map(|d| json!({
            "components": d.components,
            "start": d.start,
            "edges": d.edges,
        })),
    })
}

fn gen(tok: ReplayToken, cfg: NetGenCfg, out: &str) -> Result<()> {
    tracing::info!(seed = tok.seed, index = tok.index, paths = cfg.paths, out, "gen");
    let net = draw_net(&cfg, tok)?;
    io::save_net(out, &net)?;
    let params = json!({
        "seed": tok.seed,
        "index": tok.index,
        "paths": cfg.paths,
        "steps": cfg.steps,
        "extra_shorts": cfg.extra_shorts,
        "loop_wires": cfg.loop_wires,
    });
    write_sidecar(out, Payload::new(params))?;
    Ok(())
}

fn report() -> Result<()> {
    let cfg = RepairCfg::default();
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "conngraph": conngraph::VERSION,
        "defaults": {
            "max_short_hops": cfg.max_short_hops,
            "max_group": cfg.max_group,
            "relocate_shorts": cfg.relocate_shorts,
            "adjust_shapes": cfg.adjust_shapes,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use crossbeam::atomic::AtomicCell;
use log::{debug, info};
use warehouse_router::cmd::ArgVals;
use warehouse_router::{Layout, RouteExecutor};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ArgVals::from_env();
    if args.is_empty() {
        println!(
            "Usage: warehouse_router layout_file [speed=cells_per_second] [budget=time] \
             [start=row,col] [end=row,col] [json] [animate]"
        );
    } else if let Err(e) = runner(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn runner(args: &ArgVals) -> anyhow::Result<()> {
    let filename = args.get_symbol(0).context("No layout file given")?;
    let mut layout = fs::read_to_string(filename)
        .with_context(|| format!("Reading {filename}"))?
        .parse::<Layout>()
        .with_context(|| format!("Parsing {filename}"))?;
    if let Some(speed) = args.get_value("speed")? {
        layout.speed = speed;
    }
    if let Some(budget) = args.get_value("budget")? {
        layout.budget = budget;
    }
    if let Some(start) = args.get_value("start")? {
        layout.start = start;
    }
    if let Some(end) = args.get_value("end")? {
        layout.end = end;
    }
    info!(
        "Loaded {filename}: {} grid, {} obstacles, {} pickups",
        layout.bounds,
        layout.obstacles.len(),
        layout.pickups.len()
    );

    let route = layout.plan()?;
    if route.is_empty() {
        anyhow::bail!(
            "No valid path found from {} to {}; check the obstacles",
            layout.start,
            layout.end
        );
    }
    let metrics = layout.metrics(&route)?;

    if args.has_flag("json") {
        let report = serde_json::json!({
            "bounds": layout.bounds,
            "route": route,
            "metrics": metrics,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", layout.render(&route));
        println!("Total distance: {} cells", metrics.distance);
        println!("Estimated time: {:.1}", metrics.estimated_time);
        println!(
            "Time constraint ({}) met: {}",
            layout.budget,
            if metrics.constraint_met { "Yes" } else { "No" }
        );
    }

    if args.has_flag("animate") {
        let running = Arc::new(AtomicCell::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || r.store(false))?;
        let mut executor = RouteExecutor::new(&route);
        debug!("Playing back {}", executor.full_path_copy());
        let finished = smol::block_on(executor.play(layout.speed, &running, |i, cell| {
            println!("step {i:>3}: {cell}");
        }))?;
        if let (true, Some(goal)) = (finished, executor.goal()) {
            info!("Robot reached {goal}");
        }
    }

    Ok(())
}

use std::fs;

use anyhow::Context;
use warehouse_router::Layout;
use warehouse_router::cmd::ArgVals;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ArgVals::from_env();
    match args.get_symbol(0) {
        None => println!("Usage: view_reachable layout_file"),
        Some(filename) => {
            if let Err(e) = show(filename) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn show(filename: &str) -> anyhow::Result<()> {
    let layout = fs::read_to_string(filename)
        .with_context(|| format!("Reading {filename}"))?
        .parse::<Layout>()
        .with_context(|| format!("Parsing {filename}"))?;
    println!("dim: {} start: {} end: {}", layout.bounds, layout.start, layout.end);
    print!("{}", layout.render_reachable()?);
    Ok(())
}

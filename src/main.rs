#[macro_use]
extern crate log;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use meminfo::*;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

fn load(path: &str) -> Result<HeapSnapshot> {
    let start = Instant::now();
    let heapdump = HeapDump::from_binpb_zst(path)?;
    if cfg!(debug_assertions) {
        let edges = sanity_check(&heapdump)?;
        info!("Sanity check verified {} edges", edges);
    }
    let snapshot = HeapSnapshot::new(heapdump);
    info!(
        "Loaded {} objects from {} in {} ms",
        snapshot.objects().len(),
        path,
        start.elapsed().as_micros() as f64 / 1000f64
    );
    Ok(snapshot)
}

fn run(snapshot: &HeapSnapshot, command: &Commands) -> Result<()> {
    println!("============================ Tabulate Statistics ============================");
    match command {
        Commands::Cycle(a) => {
            let report = find_cycle(snapshot, a.start, &a.filter(), &a.config())?;
            println!("examined\tdiscovered\tdepth\tcycle");
            let cycle: Vec<String> = report.cycle.iter().map(|o| o.to_string()).collect();
            println!(
                "{}\t{}\t{}\t{}",
                report.examined,
                report.discovered,
                report.depth,
                cycle.join(",")
            );
        }
        Commands::Total(a) => {
            println!("category\tbytes");
            println!("{:?}\t{}", a.category, aggregate_size(snapshot, a.category)?);
        }
        Commands::Tree(a) => {
            println!("roots\tmax_depth\tbytes");
            println!(
                "{}\t{}\t{}",
                a.root.len(),
                a.max_depth,
                forest_size(snapshot, &a.root, &a.config())?
            );
        }
        Commands::Fill => {
            let report = mapping_fill(snapshot)?;
            println!("used\tslots\tload_factor_sum\tmappings\tmean_load_factor");
            println!(
                "{}\t{}\t{}\t{}\t{}",
                report.used,
                report.slots,
                report.load_factor_sum,
                report.mappings,
                report.mean_load_factor().unwrap_or(0f64)
            );
        }
    }
    println!("-------------------------- End Tabulate Statistics --------------------------");
    Ok(())
}

fn get_git_info() -> String {
    match (built_info::GIT_COMMIT_HASH, built_info::GIT_DIRTY) {
        (Some(hash), Some(dirty)) => format!(
            "{}{}",
            hash.split_at(7).0,
            if dirty { "-dirty" } else { "" }
        ),
        (Some(hash), None) => format!("{}{}", hash.split_at(7).0, "-?"),
        _ => "unknown-git-version".to_string(),
    }
}

pub fn main() -> Result<()> {
    env_logger::init();
    println!("meminfo {}", get_git_info());
    let args = Args::parse();
    for path in &args.paths {
        let snapshot = load(path)?;
        run(&snapshot, &args.command)?;
    }
    Ok(())
}

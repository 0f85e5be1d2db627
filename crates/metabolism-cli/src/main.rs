//! Metabolism - stochastic chemistry on a toroidal lattice

use anyhow::{Context, Result};
use clap::Parser;
use metabolism_cli::{report, scenario, Options};
use metabolism_core::Sim;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();
    run(options)
}

fn run(options: Options) -> Result<()> {
    let config = scenario::resolve(&options)?;
    scenario::echo(&config, &options.config_file())?;

    let census_path = options.census_file();
    let census = File::create(&census_path)
        .with_context(|| format!("creating {}", census_path.display()))?;

    let mut sim = Sim::new(config);
    sim.set_census_writer(Box::new(BufWriter::new(census)));
    sim.initialize()?;

    if options.verbose {
        report::print_elements(sim.periodic_table());
        report::print_reactions(sim.reaction_table(), sim.periodic_table());
        println!("initial world:");
        if let Some(world) = sim.world() {
            report::print_world(world, sim.periodic_table());
        }
    }

    let mut last_percent = None;
    loop {
        let more = sim.iterate()?;

        if !options.progress_off {
            let progress = sim.force_progress_report();
            let percent = progress.percent() as u32;
            if last_percent != Some(percent) {
                eprint!(
                    "\r{percent:3}% ({}/{} iterations)",
                    progress.iters_completed, progress.max_iters
                );
                io::stderr().flush().ok();
                last_percent = Some(percent);
            }
        }

        if options.sleep > 0 {
            std::thread::sleep(Duration::from_millis(options.sleep));
        }
        if !more {
            break;
        }
    }
    if !options.progress_off {
        eprintln!();
    }

    if options.verbose {
        println!("final world:");
        if let Some(world) = sim.world() {
            report::print_world(world, sim.periodic_table());
        }
        report::print_elements(sim.periodic_table());
        let stats = sim.stats();
        println!(
            "{} moves, {} inert contacts, {} reactions over {} iterations",
            stats.moves,
            stats.inert_contacts,
            stats.reactions,
            sim.iters_completed()
        );
    }

    sim.finalize()?;
    log::info!("census written to {}", census_path.display());
    Ok(())
}

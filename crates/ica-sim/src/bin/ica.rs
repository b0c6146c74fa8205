//! ICA command-line driver
//!
//! Build a lattice, run it, and print or record what it does.

use std::io::{self, Write};
use std::ops::ControlFlow;
use std::process;

use ica_lattice::{write_state_pgm, write_threshold_pgm};
use ica_sim::{Cli, Command, CycleRecord, DumpKind, Error, Session, SimConfig, USAGE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays clean for tables and dumps
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ica=info,ica_sim=info,ica_lattice=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = match Cli::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(Error::Usage(msg)) => {
            eprintln!("error: {}", msg);
            eprintln!();
            eprintln!("{}", USAGE);
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if cli.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = cli.resolve(SimConfig::from_env()?)?;
    tracing::debug!(?config, "resolved configuration");

    let mut session = Session::new(config)?;
    tracing::info!(
        size = session.config().size,
        q = session.config().threshold_scale,
        seed = session.automaton().seed(),
        neighborhood = %session.config().neighborhood,
        "lattice created"
    );

    match &cli.command {
        Command::Run {
            dump_state,
            dump_threshold,
        } => {
            let cycles = session.config().cycles;
            println!("{}", CycleRecord::table_header());
            session.run(cycles, |record| {
                println!("{}", record.table_row());
                ControlFlow::Continue(())
            })?;

            if session.config().write_log {
                println!("Data log: {}", session.paths().data.display());
            }
            if session.config().write_plot {
                let plot = session.write_plot_script()?;
                println!("Plot script: {}", plot.display());
            }
            if let Some(path) = dump_state {
                session.write_state_dump(path)?;
                println!("State grid: {}", path.display());
            }
            if let Some(path) = dump_threshold {
                session.write_threshold_dump(path)?;
                println!("Threshold grid: {}", path.display());
            }
        }
        Command::Analyse { json } => {
            session.run_configured()?;
            let report = session.analyse()?;
            if *json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report);
            }
        }
        Command::Dump { kind } => {
            session.run_configured()?;
            let lattice = session.automaton().lattice()?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match kind {
                DumpKind::State => write_state_pgm(lattice, &mut out)?,
                DumpKind::Threshold => write_threshold_pgm(lattice, &mut out)?,
            }
            out.flush()?;
        }
        Command::Help => {}
    }

    Ok(())
}

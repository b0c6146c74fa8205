//! Command-line parsing for the `ica` binary.

use std::path::PathBuf;

use ica_lattice::Neighborhood;

use crate::config::SimConfig;
use crate::{Error, Result};

pub const USAGE: &str = "\
ica - adaptive-threshold lattice automaton

Usage:
  ica run      [options]   Run cycles, print the table, write the data log
  ica analyse  [options]   Run cycles silently and print a summary
  ica dump     [options]   Run cycles and print a PGM grid to stdout
  ica help                 Show this message

Options:
  --size L                  Interior side length
  -q, --threshold-scale Q   Threshold scale
  --cycles N                Cycles to run
  --seed S                  Fixed seed (drawn at random if omitted)
  --neighborhood RULE       von-neumann (default) or moore
  --output-dir DIR          Directory for the data log and plot script
  --config FILE             JSON file with any of the above settings

run:
  --plot                    Also write a gnuplot script
  --no-log                  Do not write the .dat data log
  --dump-state FILE         Write the final state grid (PGM)
  --dump-threshold FILE     Write the final threshold grid (PGM)

analyse:
  --json                    Print the summary as JSON

dump:
  --kind state|threshold    Grid to print (default: state)

Environment:
  ICA_SIZE, ICA_Q, ICA_CYCLES, ICA_SEED, ICA_NEIGHBORHOOD, ICA_OUTPUT_DIR
  RUST_LOG                  Log filter (logs go to stderr)";

/// Which grid `dump` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpKind {
    #[default]
    State,
    Threshold,
}

/// Subcommand with its specific options.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run {
        dump_state: Option<PathBuf>,
        dump_threshold: Option<PathBuf>,
    },
    Analyse {
        json: bool,
    },
    Dump {
        kind: DumpKind,
    },
    Help,
}

/// Settings given on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub size: Option<usize>,
    pub threshold_scale: Option<f64>,
    pub cycles: Option<u64>,
    pub seed: Option<u64>,
    pub neighborhood: Option<Neighborhood>,
    pub output_dir: Option<PathBuf>,
    pub write_log: Option<bool>,
    pub write_plot: Option<bool>,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub config_file: Option<PathBuf>,
    pub overrides: Overrides,
}

impl Cli {
    /// Parse arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);

        let command_name = match args.next() {
            Some(name) => name,
            None => return Err(Error::Usage("missing command".into())),
        };

        let mut cli = Cli {
            command: match command_name.as_str() {
                "run" => Command::Run {
                    dump_state: None,
                    dump_threshold: None,
                },
                "analyse" | "analyze" => Command::Analyse { json: false },
                "dump" => Command::Dump { kind: DumpKind::State },
                "help" | "-h" | "--help" => Command::Help,
                other => return Err(Error::Usage(format!("unknown command '{}'", other))),
            },
            config_file: None,
            overrides: Overrides::default(),
        };

        let mut help = false;
        while let Some(flag) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| Error::Usage(format!("{} needs a value", name)))
            };

            match (flag.as_str(), &mut cli.command) {
                ("-h" | "--help", _) => help = true,
                ("--size", _) => cli.overrides.size = Some(parse_value(&flag, &value(&flag)?)?),
                ("-q" | "--threshold-scale", _) => {
                    cli.overrides.threshold_scale = Some(parse_value(&flag, &value(&flag)?)?)
                }
                ("--cycles", _) => cli.overrides.cycles = Some(parse_value(&flag, &value(&flag)?)?),
                ("--seed", _) => cli.overrides.seed = Some(parse_value(&flag, &value(&flag)?)?),
                ("--neighborhood", _) => {
                    let v = value(&flag)?;
                    cli.overrides.neighborhood = Some(v.parse().map_err(Error::Usage)?);
                }
                ("--output-dir", _) => cli.overrides.output_dir = Some(PathBuf::from(value(&flag)?)),
                ("--config", _) => cli.config_file = Some(PathBuf::from(value(&flag)?)),

                ("--plot", Command::Run { .. }) => cli.overrides.write_plot = Some(true),
                ("--no-log", Command::Run { .. }) => cli.overrides.write_log = Some(false),
                ("--dump-state", Command::Run { dump_state, .. }) => {
                    *dump_state = Some(PathBuf::from(value(&flag)?))
                }
                ("--dump-threshold", Command::Run { dump_threshold, .. }) => {
                    *dump_threshold = Some(PathBuf::from(value(&flag)?))
                }
                ("--json", Command::Analyse { json }) => *json = true,
                ("--kind", Command::Dump { kind }) => {
                    *kind = match value(&flag)?.as_str() {
                        "state" => DumpKind::State,
                        "threshold" => DumpKind::Threshold,
                        other => {
                            return Err(Error::Usage(format!(
                                "unknown dump kind '{}' (expected state or threshold)",
                                other
                            )))
                        }
                    }
                }
                (other, _) => {
                    return Err(Error::Usage(format!(
                        "unexpected argument '{}' for '{}'",
                        other, command_name
                    )))
                }
            }
        }

        if help {
            cli.command = Command::Help;
        }
        Ok(cli)
    }

    /// Layer the JSON file and the flags over `base`.
    ///
    /// `analyse` and `dump` never write the data log.
    pub fn resolve(&self, mut base: SimConfig) -> Result<SimConfig> {
        if let Some(path) = &self.config_file {
            base.merge_json_file(path)?;
        }

        let o = &self.overrides;
        if let Some(v) = o.size {
            base.size = v;
        }
        if let Some(v) = o.threshold_scale {
            base.threshold_scale = v;
        }
        if let Some(v) = o.cycles {
            base.cycles = v;
        }
        if let Some(v) = o.seed {
            base.seed = Some(v);
        }
        if let Some(v) = o.neighborhood {
            base.neighborhood = v;
        }
        if let Some(v) = &o.output_dir {
            base.output_dir = v.clone();
        }
        if let Some(v) = o.write_log {
            base.write_log = v;
        }
        if let Some(v) = o.write_plot {
            base.write_plot = v;
        }

        if matches!(self.command, Command::Analyse { .. } | Command::Dump { .. }) {
            base.write_log = false;
            base.write_plot = false;
        }

        base.validate()?;
        Ok(base)
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| Error::Usage(format!("invalid value '{}' for {}: {}", value, flag, e)))
}

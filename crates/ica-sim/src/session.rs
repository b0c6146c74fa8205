//! One configured lattice plus its data log.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use ica_lattice::{write_state_pgm, write_threshold_pgm, Automaton};
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::output::{file_stem, plot_script, DataLog, OutputPaths};
use crate::report::{CycleRecord, Report};
use crate::Result;

/// Drives an [`Automaton`] cycle by cycle, recording statistics.
#[derive(Debug)]
pub struct Session {
    config: SimConfig,
    automaton: Automaton,
    paths: OutputPaths,
    log: Option<DataLog<BufWriter<File>>>,
    history: Vec<CycleRecord>,
}

impl Session {
    /// Validate `config`, build the lattice and open the data log.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let automaton = match config.seed {
            Some(seed) => {
                let mut automaton = Automaton::new(seed);
                automaton.create_seeded(config.size, config.threshold_scale, seed)?;
                automaton
            }
            None => {
                let mut automaton = Automaton::from_entropy();
                automaton.create(config.size, config.threshold_scale)?;
                automaton
            }
        };

        let stem = file_stem(config.size, config.threshold_scale, automaton.seed());
        let paths = OutputPaths::new(&config.output_dir, stem);

        let log = if config.write_log {
            fs::create_dir_all(&config.output_dir)?;
            info!(path = %paths.data.display(), "writing data log");
            Some(DataLog::create(&paths.data)?)
        } else {
            None
        };

        Ok(Self {
            config,
            automaton,
            paths,
            log,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn automaton_mut(&mut self) -> &mut Automaton {
        &mut self.automaton
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Records taken so far, oldest first.
    pub fn history(&self) -> &[CycleRecord] {
        &self.history
    }

    /// Run `cycles` cycles, recording statistics before each one and once
    /// more after the last.
    ///
    /// `observer` sees every record as it is taken; returning
    /// `ControlFlow::Break` stops the session at that cycle boundary.
    /// Returns the number of cycles actually run.
    pub fn run<F>(&mut self, cycles: u64, mut observer: F) -> Result<u64>
    where
        F: FnMut(&CycleRecord) -> ControlFlow<()>,
    {
        let neighborhood = self.config.neighborhood;
        let mut completed = 0;

        for _ in 0..cycles {
            let record = self.record()?;
            if observer(&record).is_break() {
                info!(cycle = record.cycle, "session stopped by observer");
                self.flush()?;
                return Ok(completed);
            }
            self.automaton.run(neighborhood, 1, 0)?;
            completed += 1;
        }

        let record = self.record()?;
        // Stopping after the last record changes nothing.
        let _ = observer(&record);
        self.flush()?;

        debug!(completed, total = self.automaton.cycle(), "session run finished");
        Ok(completed)
    }

    /// Run the configured number of cycles without an observer.
    pub fn run_configured(&mut self) -> Result<u64> {
        self.run(self.config.cycles, |_| ControlFlow::Continue(()))
    }

    /// Update statistics and summarize the lattice.
    pub fn analyse(&mut self) -> Result<Report> {
        Report::analyse(&mut self.automaton, self.config.neighborhood)
    }

    /// Write the gnuplot script next to the data log.
    pub fn write_plot_script(&self) -> Result<PathBuf> {
        let data_file = self
            .paths
            .data
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = plot_script(
            &self.paths.stem,
            &data_file,
            self.config.size,
            self.config.threshold_scale,
            self.automaton.seed(),
        );

        fs::create_dir_all(&self.config.output_dir)?;
        fs::write(&self.paths.plot, script)?;
        info!(path = %self.paths.plot.display(), "wrote plot script");
        Ok(self.paths.plot.clone())
    }

    /// Write the state grid as PGM.
    pub fn write_state_dump(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write_state_pgm(self.automaton.lattice()?, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Write the threshold grid as PGM.
    pub fn write_threshold_dump(&self, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        write_threshold_pgm(self.automaton.lattice()?, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Flush the data log.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(log) = self.log.as_mut() {
            log.flush()?;
        }
        Ok(())
    }

    fn record(&mut self) -> Result<CycleRecord> {
        let stats = self.automaton.update_stats()?;
        let record = CycleRecord::new(self.automaton.cycle(), &stats);
        if let Some(log) = self.log.as_mut() {
            log.record(&record)?;
        }
        self.history.push(record);
        Ok(record)
    }
}

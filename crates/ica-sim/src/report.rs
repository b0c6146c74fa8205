//! Per-cycle records and the analysis report.

use std::fmt;

use ica_lattice::{Automaton, Neighborhood, Statistics};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Title printed at the top of reports.
pub const TITLE: &str = "ICA";

/// Statistics taken at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u64,
    pub avg_state: f64,
    pub avg_threshold: f64,
    pub cluster_count: usize,
}

impl CycleRecord {
    pub fn new(cycle: u64, stats: &Statistics) -> Self {
        Self {
            cycle,
            avg_state: stats.avg_state,
            avg_threshold: stats.avg_threshold,
            cluster_count: stats.cluster_count,
        }
    }

    /// Header matching [`table_row`](Self::table_row).
    pub fn table_header() -> String {
        format!("{:>6} {:>9} {:>9} {:>9}", "Cycle", "AvgState", "AvgThres", "Clusters")
    }

    /// Fixed-width row shared by the console table and the data log.
    pub fn table_row(&self) -> String {
        format!(
            "{:6} {:9.4} {:9.4} {:9}",
            self.cycle, self.avg_state, self.avg_threshold, self.cluster_count
        )
    }
}

/// Summary of one lattice at its current cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub size: usize,
    pub threshold_scale: f64,
    pub seed: u64,
    pub neighborhood: Neighborhood,
    pub cycle: u64,
    pub positive_percent: f64,
    pub negative_percent: f64,
    pub avg_state: f64,
    pub avg_threshold: f64,
    pub cluster_count: usize,
}

impl Report {
    /// Recompute statistics and summarize.
    pub fn analyse(automaton: &mut Automaton, neighborhood: Neighborhood) -> Result<Self> {
        let stats = automaton.update_stats()?;
        let (size, threshold_scale) = automaton
            .size()
            .zip(automaton.threshold_scale())
            .ok_or(Error::Lattice(ica_lattice::Error::NoLattice))?;

        Ok(Self {
            title: TITLE.to_string(),
            size,
            threshold_scale,
            seed: automaton.seed(),
            neighborhood,
            cycle: automaton.cycle(),
            positive_percent: stats.positive_percent(),
            negative_percent: stats.negative_percent(),
            avg_state: stats.avg_state,
            avg_threshold: stats.avg_threshold,
            cluster_count: stats.cluster_count,
        })
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type: {}", self.title)?;
        writeln!(f, "L={}  q={}", self.size, self.threshold_scale)?;
        writeln!(f, "Seed = {}", self.seed)?;
        writeln!(f, "Neighborhood = {}", self.neighborhood)?;
        writeln!(f, "Cycle = {}", self.cycle)?;
        writeln!(f, "+1 Cells % = {}", self.positive_percent)?;
        writeln!(f, "-1 Cells % = {}", self.negative_percent)?;
        writeln!(f, "Average state = {}", self.avg_state)?;
        writeln!(f, "Average Threshold = {}", self.avg_threshold)?;
        write!(f, "Number of positive clusters = {}", self.cluster_count)
    }
}

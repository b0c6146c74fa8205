//! Data log and plot script files.
//!
//! Every run writes files that share one stem,
//! `ICA-L<size>-q<int>_<milli>_seed<seed>`:
//!
//! - `<stem>.dat`: whitespace-separated table, one row per recorded cycle
//! - `<stem>.plt`: gnuplot script rendering three `<stem>-<plot>.png` charts

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::report::CycleRecord;
use crate::Result;

/// Common file-name prefix for one lattice.
///
/// `q` is written as its integer part and its first three decimals, so
/// `q = 1.5` becomes `q1_500`.
pub fn file_stem(size: usize, threshold_scale: f64, seed: u64) -> String {
    let milli = (threshold_scale * 1000.0).round() as u64;
    format!(
        "ICA-L{}-q{}_{:03}_seed{}",
        size,
        milli / 1000,
        milli % 1000,
        seed
    )
}

/// Paths of the data log and plot script for one stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub stem: String,
    pub data: PathBuf,
    pub plot: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, stem: String) -> Self {
        Self {
            data: dir.join(format!("{}.dat", stem)),
            plot: dir.join(format!("{}.plt", stem)),
            stem,
        }
    }
}

/// Writer for the `.dat` table.
#[derive(Debug)]
pub struct DataLog<W: Write> {
    out: W,
    rows: usize,
}

impl DataLog<BufWriter<File>> {
    /// Create (truncating) the log file and write its header.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> DataLog<W> {
    /// Wrap a writer and emit the header line.
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(
            out,
            "{:>6} \"{:>9}\" \"{:>9}\" {:>9}",
            "Cycle", "Average State", "Average Threshold", "Clusters"
        )?;
        Ok(Self { out, rows: 0 })
    }

    /// Append one row.
    pub fn record(&mut self, record: &CycleRecord) -> Result<()> {
        writeln!(self.out, "{}", record.table_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// gnuplot script charting a data log.
///
/// Produces three images: mean state and mean threshold against cycle,
/// clusters against mean threshold, clusters against mean state.
pub fn plot_script(stem: &str, data_file: &str, size: usize, threshold_scale: f64, seed: u64) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_plot_script(&mut s, stem, data_file, size, threshold_scale, seed);
    s
}

fn write_plot_script(
    s: &mut String,
    stem: &str,
    data: &str,
    size: usize,
    threshold_scale: f64,
    seed: u64,
) -> std::fmt::Result {
    writeln!(s, "set key autotitle columnhead")?;
    writeln!(s, "set key outside bmargin left bottom height 2 width - 0 Left reverse horizontal")?;
    writeln!(s, "set autoscale y")?;
    writeln!(s, "set autoscale x")?;
    writeln!(s, "set term pngcairo enhanced font \"Times New Roman-Bold, 12\" size (16*38),(9*38)")?;
    writeln!(s, "set termoption dashed")?;
    writeln!(s, "set style line 1 lc rgb '#000000' lt 1 lw 1 pt 1 pi -1 ps 1.5")?;
    writeln!(s, "set title \"L={}  q={}  seed={}\"", size, threshold_scale, seed)?;

    writeln!(s, "set ylabel \"Average value\"")?;
    writeln!(s, "set xlabel \"Cycle\"")?;
    writeln!(s, "set output \"{}-AvgStateAvgThresVsCycle.png\"", stem)?;
    writeln!(
        s,
        "plot \"{d}\" using 1:2 with lines ls 1, \"{d}\" using 1:3 with lines ls 1 lt 3",
        d = data
    )?;

    writeln!(s, "set ylabel \"Num. of Clusters\"")?;
    writeln!(s, "set xlabel \"Average Threshold\"")?;
    writeln!(s, "unset key")?;
    writeln!(s, "set output \"{}-ClusterVsAvgThres.png\"", stem)?;
    writeln!(s, "plot \"{}\" using 3:4 lc rgb '#000000'", data)?;

    writeln!(s, "set ylabel \"Num. of Clusters\"")?;
    writeln!(s, "set xlabel \"Average State\"")?;
    writeln!(s, "unset key")?;
    writeln!(s, "set output \"{}-ClusterVsAvgState.png\"", stem)?;
    writeln!(s, "plot \"{}\" using 2:4 lc rgb '#000000'", data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cycle: u64, avg_state: f64, avg_threshold: f64, clusters: usize) -> CycleRecord {
        CycleRecord {
            cycle,
            avg_state,
            avg_threshold,
            cluster_count: clusters,
        }
    }

    #[test]
    fn stem_encodes_q_in_thousandths() {
        assert_eq!(file_stem(64, 1.0, 7), "ICA-L64-q1_000_seed7");
        assert_eq!(file_stem(10, 1.5, 3), "ICA-L10-q1_500_seed3");
        assert_eq!(file_stem(10, 0.25, 3), "ICA-L10-q0_250_seed3");
        assert_eq!(file_stem(10, 12.3456, 0), "ICA-L10-q12_346_seed0");
    }

    #[test]
    fn output_paths_share_stem() {
        let paths = OutputPaths::new(Path::new("out"), "ICA-L4-q1_000_seed1".into());
        assert_eq!(paths.data, PathBuf::from("out/ICA-L4-q1_000_seed1.dat"));
        assert_eq!(paths.plot, PathBuf::from("out/ICA-L4-q1_000_seed1.plt"));
    }

    #[test]
    fn data_log_layout() {
        let mut log = DataLog::new(Vec::new()).unwrap();
        log.record(&record(0, 0.02, -0.0125, 17)).unwrap();
        log.record(&record(1, -0.5, 1.25, 3)).unwrap();
        assert_eq!(log.rows(), 2);

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], " Cycle \"Average State\" \"Average Threshold\"  Clusters");
        assert_eq!(lines[1], "     0    0.0200   -0.0125        17");
        assert_eq!(lines[2], "     1   -0.5000    1.2500         3");
    }

    #[test]
    fn data_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.dat");

        let mut log = DataLog::create(&path).unwrap();
        log.record(&record(5, 1.0, 0.0, 1)).unwrap();
        log.flush().unwrap();
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("     5"));
    }

    #[test]
    fn plot_script_references_data_and_images() {
        let script = plot_script("ICA-L8-q1_000_seed2", "ICA-L8-q1_000_seed2.dat", 8, 1.0, 2);

        assert!(script.contains("set title \"L=8  q=1  seed=2\""));
        assert_eq!(script.matches("set output").count(), 3);
        assert!(script.contains("set output \"ICA-L8-q1_000_seed2-ClusterVsAvgThres.png\""));
        assert!(script.contains("plot \"ICA-L8-q1_000_seed2.dat\" using 2:4"));
        assert!(script.contains("using 1:3 with lines ls 1 lt 3"));
    }
}

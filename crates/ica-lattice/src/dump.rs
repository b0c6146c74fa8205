//! Plain-text PGM (`P2`) dumps of the full bordered grid.
//!
//! Each dump is one header line `P2 <width> <height> <maxval>` followed by
//! one line per grid row of space-separated integer codes. Any PGM viewer
//! can open the output directly.

use std::io::{self, Write};

use crate::Lattice;

/// Largest code in a threshold dump.
pub const THRESHOLD_MAXVAL: u8 = 255;

/// State code: `1` for an active cell, `0` otherwise (inactive or border).
pub fn state_code(state: i8) -> u8 {
    u8::from(state == 1)
}

/// Threshold rescaled from `[-q, q]` onto `[0, 255]`, clamped.
///
/// A non-finite intermediate (e.g. `q = 0`) saturates to the nearest bound,
/// and NaN maps to 0.
pub fn threshold_code(threshold: f64, threshold_scale: f64) -> u8 {
    let scaled = f64::from(THRESHOLD_MAXVAL) * (threshold + threshold_scale)
        / (2.0 * threshold_scale);
    // Float-to-int `as` truncates toward zero and saturates.
    (scaled as i64).clamp(0, i64::from(THRESHOLD_MAXVAL)) as u8
}

/// Write the state grid.
pub fn write_state_pgm<W: Write>(lattice: &Lattice, out: &mut W) -> io::Result<()> {
    write_pgm(lattice, out, 1, |cell| state_code(cell.state))
}

/// Write the threshold grid.
pub fn write_threshold_pgm<W: Write>(lattice: &Lattice, out: &mut W) -> io::Result<()> {
    let q = lattice.threshold_scale();
    write_pgm(lattice, out, THRESHOLD_MAXVAL, |cell| {
        threshold_code(cell.threshold, q)
    })
}

/// State grid as a string.
pub fn state_pgm(lattice: &Lattice) -> String {
    render(|buf| write_state_pgm(lattice, buf))
}

/// Threshold grid as a string.
pub fn threshold_pgm(lattice: &Lattice) -> String {
    render(|buf| write_threshold_pgm(lattice, buf))
}

fn write_pgm<W, F>(lattice: &Lattice, out: &mut W, maxval: u8, code: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&crate::Cell) -> u8,
{
    let side = lattice.stride();
    writeln!(out, "P2 {} {} {}", side, side, maxval)?;

    for row in lattice.rows() {
        let line = row
            .iter()
            .map(|cell| code(cell).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn render<F>(write: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
{
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail, and every code is ASCII.
    let _ = write(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

//! Asynchronous single-site updates.
//!
//! A step picks one interior cell at random and compares its neighbor sum
//! against its threshold:
//!
//! - `sum > threshold` → state `+1`, threshold raised by `ΔQ`
//! - otherwise        → state `-1`, threshold lowered by `ΔQ`
//!
//! with `ΔQ = q · k / 1000` for `k` uniform in `[0, 999]`. Thresholds are not
//! clamped; their drift is what the statistics track.
//!
//! A cycle is `L * L` steps.

use rand::Rng;

use crate::{Lattice, Neighborhood, THRESHOLD_RESOLUTION};

/// What a call to [`run`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Single-cell updates performed
    pub steps: u64,
    /// Full cycles consumed
    pub cycles: u64,
}

/// Apply one update to a uniformly chosen interior cell.
///
/// Draw order: column, row, then `ΔQ`.
pub fn step<R: Rng + ?Sized>(lattice: &mut Lattice, rng: &mut R, neighborhood: Neighborhood) {
    let size = lattice.size();
    let col = rng.gen_range(1..=size);
    let row = rng.gen_range(1..=size);
    let k = rng.gen_range(0..THRESHOLD_RESOLUTION);
    let delta_q = f64::from(k) * lattice.threshold_scale() / f64::from(THRESHOLD_RESOLUTION);

    let sum = f64::from(neighborhood.sum(lattice, row, col));
    let cell = lattice.cell_mut(row, col);

    if sum > cell.threshold {
        cell.state = 1;
        cell.threshold += delta_q;
    } else {
        cell.state = -1;
        cell.threshold -= delta_q;
    }
}

/// Run `steps` individual updates, then `cycles` full cycles of `L * L`.
///
/// The loop drains the explicit step count first; each remaining cycle then
/// refills it with `L * L`.
pub fn run<R: Rng + ?Sized>(
    lattice: &mut Lattice,
    rng: &mut R,
    neighborhood: Neighborhood,
    mut cycles: u64,
    mut steps: u64,
) -> RunSummary {
    let cycle_len = lattice.area() as u64;
    let mut summary = RunSummary::default();

    while cycles > 0 || steps > 0 {
        while steps > 0 {
            step(lattice, rng, neighborhood);
            steps -= 1;
            summary.steps += 1;
        }
        if cycles > 0 {
            cycles -= 1;
            steps = cycle_len;
            summary.cycles += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(size: usize, q: f64, seed: u64) -> (Lattice, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut lattice = Lattice::zeroed(size, q).unwrap();
        lattice.populate(&mut rng);
        (lattice, rng)
    }

    #[test]
    fn steps_only() {
        let (mut lattice, mut rng) = seeded(6, 1.0, 1);
        let summary = run(&mut lattice, &mut rng, Neighborhood::VonNeumann, 0, 17);
        assert_eq!(summary, RunSummary { steps: 17, cycles: 0 });
    }

    #[test]
    fn one_cycle_is_area_steps() {
        let (mut lattice, mut rng) = seeded(6, 1.0, 1);
        let summary = run(&mut lattice, &mut rng, Neighborhood::Moore, 1, 0);
        assert_eq!(summary, RunSummary { steps: 36, cycles: 1 });
    }

    #[test]
    fn steps_drain_before_cycles() {
        let (mut lattice, mut rng) = seeded(5, 1.0, 2);
        let summary = run(&mut lattice, &mut rng, Neighborhood::VonNeumann, 3, 4);
        assert_eq!(summary, RunSummary { steps: 4 + 3 * 25, cycles: 3 });
    }

    #[test]
    fn empty_run_is_noop() {
        let (mut lattice, mut rng) = seeded(5, 1.0, 2);
        let before = lattice.clone();
        let summary = run(&mut lattice, &mut rng, Neighborhood::VonNeumann, 0, 0);
        assert_eq!(summary, RunSummary::default());
        assert_eq!(lattice, before);
    }

    #[test]
    fn step_count_matches_separate_calls() {
        // run(0, n) is n calls to step with the same draws
        let (mut a, mut rng_a) = seeded(8, 1.5, 9);
        let (mut b, mut rng_b) = seeded(8, 1.5, 9);

        run(&mut a, &mut rng_a, Neighborhood::Moore, 0, 50);
        for _ in 0..50 {
            step(&mut b, &mut rng_b, Neighborhood::Moore);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn updates_keep_states_binary_and_border_zero() {
        for hood in [Neighborhood::VonNeumann, Neighborhood::Moore] {
            let (mut lattice, mut rng) = seeded(10, 2.0, 5);
            run(&mut lattice, &mut rng, hood, 20, 0);

            for row in 0..lattice.stride() {
                for col in 0..lattice.stride() {
                    let cell = lattice.cell(row, col);
                    if lattice.is_border(row, col) {
                        assert_eq!(cell.state, 0);
                        assert_eq!(cell.threshold, 0.0);
                    } else {
                        assert!(cell.state == 1 || cell.state == -1);
                        assert!(cell.threshold.is_finite());
                    }
                }
            }
        }
    }

    #[test]
    fn single_cell_follows_threshold_sign() {
        // L = 1: the neighbor sum is always 0, so the cell turns on exactly
        // when its threshold is negative, and then climbs back toward zero.
        let mut lattice = Lattice::filled(1, 1.0, 1).unwrap();
        lattice.set(0, 0, 1, -0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(4);

        step(&mut lattice, &mut rng, Neighborhood::VonNeumann);
        let cell = *lattice.get(0, 0).unwrap();
        assert_eq!(cell.state, 1);
        assert!(cell.threshold >= -0.5 && cell.threshold < 0.5);

        lattice.set(0, 0, 1, 0.0).unwrap();
        step(&mut lattice, &mut rng, Neighborhood::VonNeumann);
        let cell = *lattice.get(0, 0).unwrap();
        assert_eq!(cell.state, -1);
        assert!(cell.threshold <= 0.0 && cell.threshold > -1.0);
    }

    #[test]
    fn zero_scale_freezes_thresholds() {
        let (mut lattice, mut rng) = seeded(6, 0.0, 8);
        run(&mut lattice, &mut rng, Neighborhood::VonNeumann, 5, 0);
        assert!(lattice.interior().all(|c| c.threshold == 0.0));
    }
}

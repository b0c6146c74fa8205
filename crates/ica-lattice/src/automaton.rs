//! Owned simulation handle.
//!
//! An [`Automaton`] bundles one lattice with the single seedable generator
//! that every random draw goes through, the seed that built the lattice, the
//! completed-cycle counter and the last statistics snapshot. Independent
//! automata share nothing.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

use crate::lattice::validate_params;
use crate::stats::Statistics;
use crate::updater::{self, RunSummary};
use crate::{Error, Lattice, Neighborhood, Result};

/// Lattice plus generator, seed, cycle counter and cached statistics.
#[derive(Debug)]
pub struct Automaton {
    rng: StdRng,
    seed: u64,
    lattice: Option<Lattice>,
    cycle: u64,
    stats: Option<Statistics>,
}

impl Automaton {
    /// An automaton with no lattice whose generator starts from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            lattice: None,
            cycle: 0,
            stats: None,
        }
    }

    /// An automaton with no lattice and an OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Build a fresh lattice, drawing its seed from the generator.
    ///
    /// The generator is reseeded with the drawn seed, so
    /// `create_seeded(size, q, self.seed())` reproduces the same lattice.
    pub fn create(&mut self, size: usize, threshold_scale: f64) -> Result<()> {
        validate_params(size, threshold_scale)?;
        let seed = self.rng.gen();
        self.create_seeded(size, threshold_scale, seed)
    }

    /// Build a fresh lattice from a caller-supplied seed.
    ///
    /// On failure the previous lattice, generator and seed are left as they
    /// were.
    pub fn create_seeded(&mut self, size: usize, threshold_scale: f64, seed: u64) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut lattice = Lattice::zeroed(size, threshold_scale)?;
        lattice.populate(&mut rng);

        info!(size, q = threshold_scale, seed, "created lattice");

        self.rng = rng;
        self.seed = seed;
        self.lattice = Some(lattice);
        self.cycle = 0;
        self.stats = None;
        Ok(())
    }

    /// Negate state and threshold of interior cell `(x, y)`.
    pub fn invert_cell(&mut self, x: usize, y: usize) -> Result<()> {
        let lattice = self.lattice_mut()?;
        let before = *lattice.get(x, y)?;
        lattice.invert(x, y)?;
        debug!(
            x,
            y,
            state = before.state,
            threshold = before.threshold,
            "inverted cell"
        );
        Ok(())
    }

    /// Overwrite interior cell `(x, y)`.
    pub fn set_cell(&mut self, x: usize, y: usize, state: i8, threshold: f64) -> Result<()> {
        self.lattice_mut()?.set(x, y, state, threshold)
    }

    /// Reseed the generator; the lattice is untouched.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.seed = seed;
        debug!(seed, "reseeded generator");
    }

    /// Run `steps` single updates then `cycles` full cycles.
    pub fn run(&mut self, neighborhood: Neighborhood, cycles: u64, steps: u64) -> Result<RunSummary> {
        let lattice = self.lattice.as_mut().ok_or(Error::NoLattice)?;
        let summary = updater::run(lattice, &mut self.rng, neighborhood, cycles, steps);
        self.cycle += summary.cycles;
        debug!(
            %neighborhood,
            steps = summary.steps,
            cycles = summary.cycles,
            total_cycles = self.cycle,
            "run complete"
        );
        Ok(summary)
    }

    /// [`run`](Self::run) with the 4-neighbor rule.
    pub fn run_von_neumann(&mut self, cycles: u64, steps: u64) -> Result<RunSummary> {
        self.run(Neighborhood::VonNeumann, cycles, steps)
    }

    /// [`run`](Self::run) with the 8-neighbor rule.
    pub fn run_moore(&mut self, cycles: u64, steps: u64) -> Result<RunSummary> {
        self.run(Neighborhood::Moore, cycles, steps)
    }

    /// Recompute and cache the statistics snapshot.
    pub fn update_stats(&mut self) -> Result<Statistics> {
        let stats = Statistics::compute(self.lattice()?)?;
        self.stats = Some(stats);
        Ok(stats)
    }

    /// Release the lattice. The generator and seed are kept.
    pub fn destroy(&mut self) {
        if self.lattice.take().is_some() {
            info!("lattice destroyed");
        }
        self.stats = None;
        self.cycle = 0;
    }

    /// Whether a lattice currently exists.
    pub fn has_lattice(&self) -> bool {
        self.lattice.is_some()
    }

    /// The current lattice.
    pub fn lattice(&self) -> Result<&Lattice> {
        self.lattice.as_ref().ok_or(Error::NoLattice)
    }

    fn lattice_mut(&mut self) -> Result<&mut Lattice> {
        self.lattice.as_mut().ok_or(Error::NoLattice)
    }

    /// Interior side length of the current lattice.
    pub fn size(&self) -> Option<usize> {
        self.lattice.as_ref().map(Lattice::size)
    }

    /// Threshold scale of the current lattice.
    pub fn threshold_scale(&self) -> Option<f64> {
        self.lattice.as_ref().map(Lattice::threshold_scale)
    }

    /// Seed of the current lattice, or of the last [`set_seed`](Self::set_seed).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Full cycles run since the lattice was created.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Last computed snapshot; `None` until [`update_stats`](Self::update_stats).
    pub fn stats(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    /// Last computed mean state.
    pub fn avg_state(&self) -> Option<f64> {
        self.stats.map(|s| s.avg_state)
    }

    /// Last computed mean threshold.
    pub fn avg_threshold(&self) -> Option<f64> {
        self.stats.map(|s| s.avg_threshold)
    }

    /// Last computed cluster count.
    pub fn cluster_count(&self) -> Option<usize> {
        self.stats.map(|s| s.cluster_count)
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_lattice() {
        let mut ica = Automaton::new(1);
        assert!(!ica.has_lattice());
        assert_eq!(ica.size(), None);
        assert_eq!(ica.run_von_neumann(1, 0), Err(Error::NoLattice));
        assert_eq!(ica.update_stats(), Err(Error::NoLattice));
        assert_eq!(ica.invert_cell(0, 0), Err(Error::NoLattice));
    }

    #[test]
    fn create_records_parameters() {
        let mut ica = Automaton::new(1);
        ica.create(10, 1.5).unwrap();

        assert_eq!(ica.size(), Some(10));
        assert_eq!(ica.threshold_scale(), Some(1.5));
        assert_eq!(ica.cycle(), 0);
        assert!(ica.stats().is_none());
    }

    #[test]
    fn created_lattice_is_reproducible_from_its_seed() {
        let mut a = Automaton::new(99);
        a.create(12, 2.0).unwrap();

        let mut b = Automaton::new(0);
        b.create_seeded(12, 2.0, a.seed()).unwrap();

        assert_eq!(a.lattice().unwrap(), b.lattice().unwrap());

        // Generators continue identically too
        a.run_moore(2, 0).unwrap();
        b.run_moore(2, 0).unwrap();
        assert_eq!(a.lattice().unwrap(), b.lattice().unwrap());
    }

    #[test]
    fn successive_creates_draw_new_seeds() {
        let mut ica = Automaton::new(5);
        ica.create(4, 1.0).unwrap();
        let first = ica.seed();
        ica.create(4, 1.0).unwrap();
        assert_ne!(first, ica.seed());
    }

    #[test]
    fn create_resets_cycle_and_stats() {
        let mut ica = Automaton::new(3);
        ica.create(6, 1.0).unwrap();
        ica.run_von_neumann(4, 0).unwrap();
        ica.update_stats().unwrap();
        assert_eq!(ica.cycle(), 4);

        ica.create_seeded(6, 1.0, 8).unwrap();
        assert_eq!(ica.cycle(), 0);
        assert_eq!(ica.avg_state(), None);
        assert_eq!(ica.cluster_count(), None);
    }

    #[test]
    fn failed_create_keeps_previous_lattice() {
        let mut ica = Automaton::new(3);
        ica.create_seeded(6, 1.0, 42).unwrap();
        let before = ica.lattice().unwrap().clone();

        assert_eq!(ica.create(0, 1.0), Err(Error::InvalidSize(0)));
        assert!(matches!(
            ica.create_seeded(6, f64::INFINITY, 1),
            Err(Error::InvalidThresholdScale(_))
        ));

        assert_eq!(ica.lattice().unwrap(), &before);
        assert_eq!(ica.seed(), 42);
    }

    #[test]
    fn run_advances_cycle_counter_by_full_cycles() {
        let mut ica = Automaton::new(3);
        ica.create(5, 1.0).unwrap();

        let summary = ica.run_von_neumann(0, 7).unwrap();
        assert_eq!(summary, RunSummary { steps: 7, cycles: 0 });
        assert_eq!(ica.cycle(), 0);

        let summary = ica.run_moore(2, 3).unwrap();
        assert_eq!(summary, RunSummary { steps: 53, cycles: 2 });
        assert_eq!(ica.cycle(), 2);
    }

    #[test]
    fn stats_served_until_recomputed() {
        let mut ica = Automaton::new(3);
        ica.create(8, 1.0).unwrap();
        let stats = ica.update_stats().unwrap();
        assert_eq!(ica.stats(), Some(&stats));

        ica.run_von_neumann(3, 0).unwrap();
        assert_eq!(ica.avg_state(), Some(stats.avg_state));
        assert_eq!(ica.avg_threshold(), Some(stats.avg_threshold));
    }

    #[test]
    fn set_seed_leaves_lattice_alone() {
        let mut ica = Automaton::new(3);
        ica.create(6, 1.0).unwrap();
        let before = ica.lattice().unwrap().clone();

        ica.set_seed(1234);
        assert_eq!(ica.seed(), 1234);
        assert_eq!(ica.lattice().unwrap(), &before);
    }

    #[test]
    fn set_seed_makes_runs_repeatable() {
        let mut a = Automaton::new(1);
        a.create_seeded(6, 1.0, 10).unwrap();
        let mut b = Automaton::new(2);
        b.create_seeded(6, 1.0, 10).unwrap();

        a.set_seed(77);
        b.set_seed(77);
        a.run_von_neumann(3, 0).unwrap();
        b.run_von_neumann(3, 0).unwrap();
        assert_eq!(a.lattice().unwrap(), b.lattice().unwrap());
    }

    #[test]
    fn invert_cell_checks_bounds() {
        let mut ica = Automaton::new(3);
        ica.create(4, 1.0).unwrap();
        assert_eq!(
            ica.invert_cell(0, 4),
            Err(Error::CoordinateOutOfRange { x: 0, y: 4, size: 4 })
        );
    }

    #[test]
    fn destroy_releases_lattice() {
        let mut ica = Automaton::new(3);
        ica.create(4, 1.0).unwrap();
        ica.update_stats().unwrap();
        ica.destroy();

        assert!(!ica.has_lattice());
        assert!(ica.stats().is_none());
        assert_eq!(ica.lattice().unwrap_err(), Error::NoLattice);

        // Destroying twice is harmless
        ica.destroy();
    }

    #[test]
    fn independent_automata_coexist() {
        let mut a = Automaton::new(1);
        let mut b = Automaton::new(1);
        a.create_seeded(6, 1.0, 5).unwrap();
        b.create_seeded(9, 2.0, 6).unwrap();

        a.run_moore(1, 0).unwrap();
        assert_eq!(b.cycle(), 0);
        assert_eq!(b.size(), Some(9));
    }
}

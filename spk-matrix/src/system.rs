use log::info;
use rand::Rng;
use spk::gen::{Conditioning, SpikeScale, EXACT_RANGE};
use spk::{Result, Vector};
use crate::{solve_spike, BandedMatrix};

/// A system `a · x = f` ready to be solved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearSystem {
    pub a: BandedMatrix,
    pub f: Vector,
}

impl LinearSystem {
    pub fn new(a: BandedMatrix, f: Vector) -> Result<Self> {
        a.band(crate::Band::B).check_size(&f)?;
        Ok(Self { a, f })
    }

    pub fn size(&self) -> usize {
        self.a.size()
    }

    pub fn solve(self) -> Result<Vector> {
        solve_spike(self.a, self.f)
    }

    /// A random system together with its exact solution.
    /// The solution is integral in `10 .. 20` and `f = a · x`.
    pub fn rand<G>(size: usize, k: usize, cond: Conditioning, scale: SpikeScale, rng: &mut G) -> Result<(Self, Vector)>
    where G: Rng + ?Sized {
        let a = BandedMatrix::rand(size, k, cond, scale, rng)?;
        let (min, max) = EXACT_RANGE;
        let x = Vector::rand_int(size, min, max, rng)?;
        let f = a.multiply(&x)?;
        Ok((Self { a, f }, x))
    }
}

/// Solves every system independently. The results keep the input order.
pub fn solve_batch(systems: Vec<LinearSystem>) -> Vec<Result<Vector>> {
    if crate::config::is_multithread_enabled() {
        solve_batch_m(systems)
    } else {
        solve_batch_s(systems)
    }
}

fn solve_batch_s(systems: Vec<LinearSystem>) -> Vec<Result<Vector>> {
    info!("solve batch: {} systems", systems.len());
    systems.into_iter().map(|s| s.solve()).collect()
}

fn solve_batch_m(systems: Vec<LinearSystem>) -> Vec<Result<Vector>> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "multithread")] {
            use rayon::prelude::*;

            info!("solve batch (multithread, {} threads): {} systems", rayon::current_num_threads(), systems.len());
            systems.into_par_iter().map(|s| s.solve()).collect()
        } else {
            solve_batch_s(systems)
        }
    }
}

//! Direct O(n) solver for [`BandedMatrix`] systems.
//!
//! The matrix is split into a left tridiagonal zone (rows `1 .. k`), a right
//! one (rows `l + 1 ..= n`) and the coupling rows `k`, `k + 1`, `l`.
//! Stages 1–2 sweep the outer zones towards the coupling rows, stages 3–5
//! resolve `x[k]` and `x[l]` there, stages 6–7 remove the spike columns from
//! the outer zones, and stages 8–9 back-substitute outwards from `l`.

use log::{debug, trace};
use num_traits::Zero;
use spk::{ensure, Error, Result, Vector};
use crate::BandedMatrix;

/// Owns the bands and the right-hand side while they are eliminated.
pub struct SpikeSolver {
    n: usize,
    k: usize,
    l: usize,
    a: Vector,
    b: Vector,
    c: Vector,
    p: Vector,
    q: Vector,
    f: Vector,
}

pub fn solve_spike(a: BandedMatrix, f: Vector) -> Result<Vector> {
    SpikeSolver::new(a, f)?.solve()
}

impl BandedMatrix {
    /// Solves `self · x = f`, consuming both.
    pub fn solve(self, f: Vector) -> Result<Vector> {
        solve_spike(self, f)
    }
}

impl SpikeSolver {
    pub fn new(mat: BandedMatrix, f: Vector) -> Result<Self> {
        mat.band(crate::Band::B).check_size(&f)?;
        ensure!(mat.k() >= 1, Error::InvalidArgument(
            "k = 0 leaves no spike column to eliminate; solving requires k >= 1".into()
        ));

        let n = mat.size();
        let (k, a, b, c, p, q) = mat.into_bands();

        Ok(Self { n, k, l: k + 2, a, b, c, p, q, f })
    }

    pub fn solve(mut self) -> Result<Vector> {
        debug!("solve spike system: n = {}, k = {}, l = {}", self.n, self.k, self.l);

        self.stage1()?;
        self.stage2()?;
        self.stage3()?;
        self.stage4()?;
        self.stage5();
        self.stage6();
        self.stage7();

        Ok(self.back_substitute())
    }

    /// `1 / b[i]`, or an error if `b[i]` is zero.
    fn inv_pivot(&self, stage: usize, i: usize) -> Result<f64> {
        let d = self.b[i];
        ensure!(!d.is_zero(), Error::SingularPivot { stage, row: i });
        Ok(1.0 / d)
    }

    // Left sweep over rows 1 .. k, eliminating the sub-diagonal below.
    fn stage1(&mut self) -> Result<()> {
        let k = self.k;

        for i in 1..k {
            let r = self.inv_pivot(1, i)?;
            self.b[i] = 1.0;
            self.c[i] *= r;
            self.p[i] *= r;
            self.q[i] *= r;
            self.f[i] *= r;

            let r = self.a[i + 1];
            self.a[i + 1] = 0.0;
            self.b[i + 1] -= r * self.c[i];
            self.q[i + 1] -= r * self.q[i];
            self.f[i + 1] -= r * self.f[i];

            // row k - 1 sees column k as its super-diagonal.
            if i + 2 == k {
                self.c[i + 1] -= r * self.p[i];
            } else {
                self.p[i + 1] -= r * self.p[i];
            }
        }

        trace!("stage 1 done");
        Ok(())
    }

    // Right sweep over rows n ..= l + 1, eliminating the super-diagonal above.
    fn stage2(&mut self) -> Result<()> {
        let (n, l) = (self.n, self.l);

        for i in (l + 1 ..= n).rev() {
            let r = self.inv_pivot(2, i)?;
            self.a[i] *= r;
            self.p[i] *= r;
            self.q[i] *= r;
            self.f[i] *= r;

            let r = self.c[i - 1];
            self.c[i - 1] = 0.0;
            self.b[i - 1] -= r * self.a[i];
            self.p[i - 1] -= r * self.p[i];
            self.f[i - 1] -= r * self.f[i];

            // row l + 1 sees column l as its sub-diagonal.
            if i == l + 2 {
                self.a[i - 1] -= r * self.q[i];
            } else {
                self.q[i - 1] -= r * self.q[i];
            }
        }

        trace!("stage 2 done");
        Ok(())
    }

    // Normalize row k + 1 and clear its column from rows k and l.
    fn stage3(&mut self) -> Result<()> {
        let (k, l) = (self.k, self.l);

        let r = self.inv_pivot(3, k + 1)?;
        self.b[k + 1] = 1.0;
        self.a[k + 1] *= r;
        self.c[k + 1] *= r;
        self.f[k + 1] *= r;

        let r = self.c[k];
        self.c[k] = 0.0;
        self.b[k] -= r * self.a[k + 1];
        self.q[k] -= r * self.c[k + 1];
        self.f[k] -= r * self.f[k + 1];

        let r = self.a[l];
        self.a[l] = 0.0;
        self.b[l] -= r * self.c[k + 1];
        self.p[l] -= r * self.a[k + 1];
        self.f[l] -= r * self.f[k + 1];

        trace!("stage 3 done");
        Ok(())
    }

    // Solve the remaining 2×2 block of rows k and l.
    fn stage4(&mut self) -> Result<()> {
        let (k, l) = (self.k, self.l);

        let r = self.inv_pivot(4, k)?;
        self.b[k] = 1.0;
        self.q[k] *= r;
        self.f[k] *= r;

        let r = self.p[l];
        self.p[l] = 0.0;
        self.b[l] -= r * self.q[k];
        self.f[l] -= r * self.f[k];

        let r = self.inv_pivot(4, l)?;
        self.b[l] = 1.0;
        self.f[l] *= r;

        let r = self.q[k];
        self.q[k] = 0.0;
        self.f[k] -= r * self.f[l];

        trace!("stage 4 done: x[k] = {}, x[l] = {}", self.f[k], self.f[l]);
        Ok(())
    }

    // Feed x[k] back into row k + 1.
    fn stage5(&mut self) {
        let k = self.k;

        let r = self.a[k + 1];
        self.a[k + 1] = 0.0;
        self.f[k + 1] -= r * self.f[k];

        trace!("stage 5 done");
    }

    // Clear the spike columns on the right of l.
    fn stage6(&mut self) {
        let (n, k, l) = (self.n, self.k, self.l);
        let (xk, xl) = (self.f[k], self.f[l]);

        for i in l + 1 ..= n {
            let r = self.p[i];
            self.p[i] = 0.0;
            self.f[i] -= r * xk;

            if i != l + 1 {
                let r = self.q[i];
                self.q[i] = 0.0;
                self.f[i] -= r * xl;
            }
        }

        trace!("stage 6 done");
    }

    // Clear the spike columns on the left of k.
    fn stage7(&mut self) {
        let (k, l) = (self.k, self.l);
        let (xk, xl) = (self.f[k], self.f[l]);

        for i in 1..k {
            if i + 1 != k {
                let r = self.p[i];
                self.p[i] = 0.0;
                self.f[i] -= r * xk;
            }

            let r = self.q[i];
            self.q[i] = 0.0;
            self.f[i] -= r * xl;
        }

        trace!("stage 7 done");
    }

    // Stages 8 and 9: upward from l, then downward from l.
    fn back_substitute(self) -> Vector {
        let (n, l) = (self.n, self.l);
        let mut x = self.f;

        for i in (1..l).rev() {
            x[i] -= self.c[i] * x[i + 1];
        }

        for i in l + 1 ..= n {
            x[i] -= self.a[i] * x[i - 1];
        }

        trace!("stages 8-9 done");
        x
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use nalgebra::DVector;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use spk::gen::{Conditioning, SpikeScale, EXACT_RANGE};
    use super::*;
    use crate::band::tests::{sample, vec};
    use crate::Band;

    fn max_err(x: &Vector, y: &Vector) -> f64 {
        (x - y).norm()
    }

    // strictly diagonally dominant, so every pivot stays away from zero.
    fn dominant<G: Rng>(n: usize, k: usize, rng: &mut G) -> BandedMatrix {
        let mut a = BandedMatrix::rand(n, k, Conditioning::Good, SpikeScale::Little, rng).unwrap();
        a.band_mut(Band::B).iter_mut().for_each(|b| *b += 120.0);
        a
    }

    fn exact<G: Rng>(n: usize, rng: &mut G) -> Vector {
        let (min, max) = EXACT_RANGE;
        Vector::rand_int(n, min, max, rng).unwrap()
    }

    #[test]
    fn sample_system() {
        let a = sample();
        let x0 = vec(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let f = a.multiply(&x0).unwrap();

        let x = a.solve(f).unwrap();
        assert!(max_err(&x, &x0) < 1e-9);
    }

    #[test]
    fn all_shapes() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in 4..=24 {
            for k in 1..=n-3 {
                let a = dominant(n, k, &mut rng);
                let x0 = exact(n, &mut rng);
                let f = a.multiply(&x0).unwrap();

                let x = a.solve(f).unwrap();
                assert!(max_err(&x, &x0) < 1e-10, "n = {n}, k = {k}");
            }
        }
    }

    #[test]
    fn k_extremes() {
        let mut rng = StdRng::seed_from_u64(4);
        let n = 64;
        for k in [1, 2, n - 4, n - 3] {
            let a = dominant(n, k, &mut rng);
            let x0 = exact(n, &mut rng);
            let f = &a * &x0;

            let x = solve_spike(a, f).unwrap();
            assert!(max_err(&x, &x0) < 1e-10, "k = {k}");
        }
    }

    #[test]
    fn large() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 4096;
        let a = dominant(n, 5, &mut rng);
        let x0 = exact(n, &mut rng);
        let f = a.multiply(&x0).unwrap();

        let x = a.solve(f).unwrap();
        assert!(max_err(&x, &x0) < 1e-10);
    }

    #[test]
    fn compare_with_lu() {
        let mut rng = StdRng::seed_from_u64(6);
        let n = 32;
        let a = dominant(n, 5, &mut rng);
        let f = Vector::rand_uniform(n, -10.0, 10.0, &mut rng).unwrap();

        let dense = a.to_dense();
        let y = dense.lu().solve(&DVector::from_column_slice(f.as_slice())).unwrap();

        let x = a.solve(f).unwrap();
        for i in 0..n {
            assert!((x[i + 1] - y[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn reproducible() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = BandedMatrix::rand(100, 5, Conditioning::Bad, SpikeScale::Big, &mut rng).unwrap();
        let f = a.multiply(&exact(100, &mut rng)).unwrap();

        let x1 = a.clone().solve(f.clone());
        let x2 = a.solve(f);

        let bits = |x: &Vector| x.iter().map(|v| v.to_bits()).collect_vec();
        match (x1, x2) {
            (Ok(x1), Ok(x2)) => assert_eq!(bits(&x1), bits(&x2)),
            (r1, r2) => assert_eq!(r1, r2)
        }
    }

    #[test]
    fn k_zero() {
        let a = BandedMatrix::new(6, 0).unwrap();
        let f = Vector::new(6).unwrap();
        assert!(matches!(a.solve(f), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn size_mismatch() {
        let a = sample();
        let f = Vector::new(5).unwrap();
        assert_eq!(a.solve(f), Err(Error::DimensionMismatch { expected: 8, found: 5 }));
    }

    #[test]
    fn zero_pivot_left() {
        let mut a = sample();
        a.band_mut(Band::B)[1] = 0.0;
        let f = Vector::new(8).unwrap();
        assert_eq!(a.solve(f), Err(Error::SingularPivot { stage: 1, row: 1 }));
    }

    #[test]
    fn zero_pivot_right() {
        let mut a = sample();
        a.band_mut(Band::B)[8] = 0.0;
        let f = Vector::new(8).unwrap();
        assert_eq!(a.solve(f), Err(Error::SingularPivot { stage: 2, row: 8 }));
    }

    #[test]
    fn zero_pivot_center() {
        // k = 1: stages 1 and 2 never touch b[2].
        let mut a = BandedMatrix::new(4, 1).unwrap();
        a.band_mut(Band::B).iter_mut().for_each(|b| *b = 1.0);
        a.band_mut(Band::B)[2] = 0.0;

        let f = Vector::new(4).unwrap();
        assert_eq!(a.solve(f), Err(Error::SingularPivot { stage: 3, row: 2 }));
    }

    #[test]
    fn identity() {
        let mut a = BandedMatrix::new(9, 3).unwrap();
        a.band_mut(Band::B).iter_mut().for_each(|b| *b = 1.0);

        let f = vec(&[1.0, -2.0, 3.0, -4.0, 5.0, -6.0, 7.0, -8.0, 9.0]);
        assert_eq!(a.solve(f.clone()), Ok(f));
    }
}

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use auto_impl_ops::auto_ops;
use delegate::delegate;
use derive_more::Display;
use itertools::Itertools;
use log::trace;
use nalgebra::DMatrix;
use rand::Rng;
use spk::gen::{Conditioning, SpikeScale, BAND_RANGE};
use spk::util::format;
use spk::{ensure, Error, Result, Vector};

/// One of the five stored diagonals / columns of a [`BandedMatrix`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Band {
    #[display("a")] A,
    #[display("b")] B,
    #[display("c")] C,
    #[display("p")] P,
    #[display("q")] Q,
}

impl Band {
    pub const ALL: [Band; 5] = [Band::A, Band::B, Band::C, Band::P, Band::Q];
}

/// A square matrix whose row `i` may be nonzero only in the columns
/// `i - 1`, `i`, `i + 1`, `k` and `l = k + 2`.
///
/// Row `i` is stored across five parallel vectors:
///
/// | band | column  |
/// |------|---------|
/// | `a`  | `i - 1` |
/// | `b`  | `i`     |
/// | `c`  | `i + 1` |
/// | `p`  | `k`     |
/// | `q`  | `l`     |
///
/// Indices are 1-based. When `k` or `l` falls on `i - 1`, `i` or `i + 1`,
/// the tridiagonal band owns the position and the spike value stored for
/// that row is ignored everywhere.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBands", into = "RawBands"))]
pub struct BandedMatrix {
    k: usize,
    a: Vector,
    b: Vector,
    c: Vector,
    p: Vector,
    q: Vector,
}

impl BandedMatrix {
    /// The zero matrix of the given shape.
    pub fn new(size: usize, k: usize) -> Result<Self> {
        Self::validate(size, k)?;
        let z = Vector::new(size)?;
        Ok(Self {
            k,
            a: z.clone(),
            b: z.clone(),
            c: z.clone(),
            p: z.clone(),
            q: z,
        })
    }

    pub fn from_bands(k: usize, a: Vector, b: Vector, c: Vector, p: Vector, q: Vector) -> Result<Self> {
        let size = b.size();
        for v in [&a, &c, &p, &q] {
            b.check_size(v)?;
        }
        Self::validate(size, k)?;
        Ok(Self { k, a, b, c, p, q })
    }

    /// Random bands as used by the accuracy experiments: `a`, `c` integral
    /// in `20 .. 40`, `b` according to `cond`, `p`, `q` according to `scale`.
    pub fn rand<G>(size: usize, k: usize, cond: Conditioning, scale: SpikeScale, rng: &mut G) -> Result<Self>
    where G: Rng + ?Sized {
        Self::validate(size, k)?;

        let (min, max) = BAND_RANGE;
        let a = Vector::rand_int(size, min, max, rng)?;
        let b = Vector::rand_conditioned(size, min, max, cond, rng)?;
        let c = Vector::rand_int(size, min, max, rng)?;
        let p = Vector::rand_spike(size, scale, rng)?;
        let q = Vector::rand_spike(size, scale, rng)?;

        trace!("rand matrix: size = {size}, k = {k}, cond = {cond}, scale = {scale}");

        Ok(Self { k, a, b, c, p, q })
    }

    /// `size > 0` and `0 <= k <= size - 3`, so that `l = k + 2 < size`.
    pub fn validate(size: usize, k: usize) -> Result<()> {
        ensure!(size > 0, Error::InvalidArgument(
            "matrix size must be greater than zero".into()
        ));
        ensure!(size >= 3 && k <= size - 3, Error::InvalidArgument(
            format!("k = {k} is out of range 0..={} for size = {size}", size as isize - 3)
        ));
        Ok(())
    }

    delegate! {
        to self.b {
            pub fn size(&self) -> usize;
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn l(&self) -> usize {
        self.k + 2
    }

    pub fn band(&self, band: Band) -> &Vector {
        match band {
            Band::A => &self.a,
            Band::B => &self.b,
            Band::C => &self.c,
            Band::P => &self.p,
            Band::Q => &self.q,
        }
    }

    pub fn band_mut(&mut self, band: Band) -> &mut Vector {
        match band {
            Band::A => &mut self.a,
            Band::B => &mut self.b,
            Band::C => &mut self.c,
            Band::P => &mut self.p,
            Band::Q => &mut self.q,
        }
    }

    /// `(k, a, b, c, p, q)`
    pub fn into_bands(self) -> (usize, Vector, Vector, Vector, Vector, Vector) {
        (self.k, self.a, self.b, self.c, self.p, self.q)
    }

    /// The band owning the position `(i, j)`, or `None` for a structural
    /// zero. Checked in the order `i`, `i - 1`, `i + 1`, `k`, `l`.
    pub fn owner(&self, i: usize, j: usize) -> Option<Band> {
        let n = self.size();
        if j == 0 || j > n || i == 0 || i > n {
            None
        } else if j == i {
            Some(Band::B)
        } else if j + 1 == i {
            Some(Band::A)
        } else if j == i + 1 {
            Some(Band::C)
        } else if j == self.k {
            Some(Band::P)
        } else if j == self.l() {
            Some(Band::Q)
        } else {
            None
        }
    }

    /// The nonzero pattern of row `i`: each owning band with its column.
    pub fn row_support(&self, i: usize) -> impl Iterator<Item = (Band, usize)> + '_ {
        let cands = [
            (Band::B, i),
            (Band::A, i - 1),
            (Band::C, i + 1),
            (Band::P, self.k),
            (Band::Q, self.l()),
        ];
        cands.into_iter().filter(move |&(band, j)|
            self.owner(i, j) == Some(band)
        )
    }

    /// The dense entry at `(i, j)`.
    pub fn entry(&self, i: usize, j: usize) -> Result<f64> {
        let n = self.size();
        for index in [i, j] {
            ensure!(1 <= index && index <= n, Error::IndexOutOfBounds { index, size: n });
        }
        Ok(self._entry(i, j))
    }

    pub(crate) fn _entry(&self, i: usize, j: usize) -> f64 {
        match self.owner(i, j) {
            Some(band) => self.band(band)[i],
            None => 0.0
        }
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.size();
        DMatrix::from_fn(n, n, |r, c| self._entry(r + 1, c + 1))
    }

    pub fn is_compatible(&self, other: &BandedMatrix) -> bool {
        self.size() == other.size() && self.k == other.k
    }

    pub fn try_add(&self, other: &BandedMatrix) -> Result<BandedMatrix> {
        self.check_compatible(other)?;
        Ok(self.zip_bands(other, |x, y| x + y))
    }

    pub fn try_sub(&self, other: &BandedMatrix) -> Result<BandedMatrix> {
        self.check_compatible(other)?;
        Ok(self.zip_bands(other, |x, y| x - y))
    }

    fn check_compatible(&self, other: &BandedMatrix) -> Result<()> {
        ensure!(self.is_compatible(other), Error::IncompatibleMatrices {
            lhs: (self.size(), self.k),
            rhs: (other.size(), other.k)
        });
        Ok(())
    }

    fn zip_bands<F>(&self, other: &BandedMatrix, f: F) -> BandedMatrix
    where F: Fn(&Vector, &Vector) -> Vector {
        BandedMatrix {
            k: self.k,
            a: f(&self.a, &other.a),
            b: f(&self.b, &other.b),
            c: f(&self.c, &other.c),
            p: f(&self.p, &other.p),
            q: f(&self.q, &other.q),
        }
    }

    /// `A·x`, touching only the structural columns of each row.
    pub fn multiply(&self, x: &Vector) -> Result<Vector> {
        self.b.check_size(x)?;
        Ok(self._multiply(x))
    }

    fn _multiply(&self, x: &Vector) -> Vector {
        let mut y = x.clone();
        for i in 1..=self.size() {
            y[i] = self.row_support(i).map(|(band, j)|
                self.band(band)[i] * x[j]
            ).sum();
        }
        y
    }

    /// Every entry of every row, structural zeros included.
    pub fn display_dense(&self) -> String {
        let n = self.size();
        (1..=n).map(|i| self.display_row(i)).join("\n\n")
    }

    /// Like [`Self::display_dense`] with `f[i]` appended to row `i`.
    pub fn display_augmented(&self, f: &Vector) -> Result<String> {
        self.b.check_size(f)?;
        let n = self.size();
        let res = (1..=n).map(|i|
            format!("{}{:>9}{}", self.display_row(i), "|", format::entry(f[i]))
        ).join("\n\n");
        Ok(res)
    }

    fn display_row(&self, i: usize) -> String {
        let n = self.size();
        (1..=n).map(|j| format::entry(self._entry(i, j))).join("")
    }

    pub fn display_bands(&self) -> String {
        Band::ALL.iter().map(|&band|
            format!("{band}: {}", format::bracket(self.band(band).iter()))
        ).join("\n")
    }
}

impl std::fmt::Display for BandedMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_dense())
    }
}

impl Neg for BandedMatrix {
    type Output = Self;
    fn neg(self) -> Self::Output {
        let BandedMatrix { k, a, b, c, p, q } = self;
        BandedMatrix { k, a: -a, b: -b, c: -c, p: -p, q: -q }
    }
}

impl Neg for &BandedMatrix {
    type Output = BandedMatrix;
    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        #[auto_ops]
        impl<'a, 'b> $trait<&'b BandedMatrix> for &'a BandedMatrix {
            type Output = BandedMatrix;
            fn $method(self, rhs: &'b BandedMatrix) -> Self::Output {
                assert!(self.is_compatible(rhs), "matrices must have the same size and k");
                self.zip_bands(rhs, |x, y| x $op y)
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);

#[auto_ops(val_val, val_ref, ref_val)]
impl<'a, 'b> Mul<&'b Vector> for &'a BandedMatrix {
    type Output = Vector;
    fn mul(self, rhs: &'b Vector) -> Self::Output {
        assert_eq!(self.size(), rhs.size(), "matrix and vector sizes must agree");
        self._multiply(rhs)
    }
}

#[cfg(feature = "serde")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct RawBands {
    k: usize,
    a: Vector,
    b: Vector,
    c: Vector,
    p: Vector,
    q: Vector,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBands> for BandedMatrix {
    type Error = Error;
    fn try_from(r: RawBands) -> Result<Self> {
        Self::from_bands(r.k, r.a, r.b, r.c, r.p, r.q)
    }
}

#[cfg(feature = "serde")]
impl From<BandedMatrix> for RawBands {
    fn from(m: BandedMatrix) -> Self {
        let (k, a, b, c, p, q) = m.into_bands();
        RawBands { k, a, b, c, p, q }
    }
}

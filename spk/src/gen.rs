//! Random test data for spike-banded systems.
//!
//! Every generator takes the random source explicitly, so that runs can be
//! reproduced with a seeded `StdRng`.

use std::str::FromStr;
use derive_more::Display;
use log::trace;
use rand::Rng;
use crate::{ensure, Error, Result, Vector};

/// Range of the tridiagonal bands.
pub const BAND_RANGE: (f64, f64) = (20.0, 40.0);

/// Range of the exact solutions used by the experiments.
pub const EXACT_RANGE: (f64, f64) = (10.0, 20.0);

/// How the main diagonal is drawn.
///
/// `Good` uses the full range, `Bad` shifts and compresses it to half its
/// width, which weakens the diagonal against the off-diagonal bands.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Conditioning {
    #[default]
    #[display("good")]
    Good,

    #[display("bad")]
    Bad
}

/// Magnitude of the spike columns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpikeScale {
    #[default]
    #[display("little")]
    Little,

    #[display("big")]
    Big
}

impl SpikeScale {
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Little => (1.0, 10.0),
            Self::Big    => (1.0, 1000.0)
        }
    }
}

impl FromStr for Conditioning {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "bad"  => Ok(Self::Bad),
            _      => Err(Error::Parse(format!("unknown conditioning: '{s}'")))
        }
    }
}

impl FromStr for SpikeScale {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "little" => Ok(Self::Little),
            "big"    => Ok(Self::Big),
            _        => Err(Error::Parse(format!("unknown spike scale: '{s}'")))
        }
    }
}

impl Vector {
    /// Integer-valued entries `min + u` with `u` uniform in `0 .. (max - min)`.
    pub fn rand_int<G>(size: usize, min: f64, max: f64, rng: &mut G) -> Result<Vector>
    where G: Rng + ?Sized {
        ensure!(min <= max, Error::InvalidArgument(
            format!("empty range: {min} .. {max}")
        ));
        let span = (max - min) as u64;
        Self::fill_with(size, || min + uniform_below(span, rng))
    }

    /// Integer-valued entries drawn according to `cond`.
    pub fn rand_conditioned<G>(size: usize, min: f64, max: f64, cond: Conditioning, rng: &mut G) -> Result<Vector>
    where G: Rng + ?Sized {
        trace!("rand vector: size = {size}, range = {min} .. {max}, cond = {cond}");

        match cond {
            Conditioning::Good => Self::rand_int(size, min, max, rng),
            Conditioning::Bad  => {
                ensure!(min <= max, Error::InvalidArgument(
                    format!("empty range: {min} .. {max}")
                ));
                let span = (max - min) as u64 / 2;
                Self::fill_with(size, || min / 2.0 + uniform_below(span, rng))
            }
        }
    }

    /// Real entries uniform in the closed range of `scale`.
    pub fn rand_spike<G>(size: usize, scale: SpikeScale, rng: &mut G) -> Result<Vector>
    where G: Rng + ?Sized {
        let (lo, hi) = scale.range();
        Self::rand_uniform(size, lo, hi, rng)
    }

    /// Real entries uniform in `lo ..= hi`.
    pub fn rand_uniform<G>(size: usize, lo: f64, hi: f64, rng: &mut G) -> Result<Vector>
    where G: Rng + ?Sized {
        ensure!(lo <= hi, Error::InvalidArgument(
            format!("empty range: {lo} ..= {hi}")
        ));
        Self::fill_with(size, || rng.gen_range(lo ..= hi))
    }

    fn fill_with<F>(size: usize, mut f: F) -> Result<Vector>
    where F: FnMut() -> f64 {
        let mut v = Vector::new(size)?;
        v.iter_mut().for_each(|a| *a = f());
        Ok(v)
    }
}

fn uniform_below<G>(span: u64, rng: &mut G) -> f64
where G: Rng + ?Sized {
    if span == 0 {
        0.0
    } else {
        rng.gen_range(0 .. span) as f64
    }
}

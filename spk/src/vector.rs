use std::fmt::Display;
use std::ops::{Add, AddAssign, Index, IndexMut, Neg, Sub, SubAssign};
use std::str::FromStr;
use auto_impl_ops::auto_ops;
use delegate::delegate;
use itertools::Itertools;
use num_traits::Zero;
use crate::{ensure, Error, Result};

/// Dense real vector of a fixed positive size.
///
/// Entries are addressed 1-based: `v[1] ..= v[v.size()]`.
/// Storage is a plain 0-based `Vec<f64>`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct Vector {
    elements: Vec<f64>
}

impl Vector {
    pub fn new(size: usize) -> Result<Self> {
        ensure!(size > 0, Error::InvalidArgument(
            "vector size must be greater than zero".into()
        ));
        let elements = vec![0.0; size];
        Ok(Self { elements })
    }

    pub fn from_vec(elements: Vec<f64>) -> Result<Self> {
        ensure!(!elements.is_empty(), Error::InvalidArgument(
            "vector size must be greater than zero".into()
        ));
        Ok(Self { elements })
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, i: usize) -> Result<f64> {
        let j = self.offset(i)?;
        Ok(self.elements[j])
    }

    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        let j = self.offset(i)?;
        self.elements[j] = value;
        Ok(())
    }

    fn offset(&self, i: usize) -> Result<usize> {
        let size = self.size();
        ensure!(1 <= i && i <= size, Error::IndexOutOfBounds { index: i, size });
        Ok(i - 1)
    }

    delegate! {
        to self.elements {
            pub fn iter(&self) -> std::slice::Iter<'_, f64>;
            pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, f64>;
            pub fn as_slice(&self) -> &[f64];
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.elements
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|a| a.is_zero())
    }

    pub fn try_add(&self, other: &Vector) -> Result<Vector> {
        self.check_size(other)?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    pub fn try_sub(&self, other: &Vector) -> Result<Vector> {
        self.check_size(other)?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.check_size(other)?;
        let res = self.iter().zip(other.iter()).map(|(a, b)| a * b).sum();
        Ok(res)
    }

    /// The max-norm `max_i |v[i]|`.
    pub fn norm(&self) -> f64 {
        self.iter().fold(0.0, |m, a| f64::max(m, a.abs()))
    }

    pub fn check_size(&self, other: &Vector) -> Result<()> {
        ensure!(self.size() == other.size(), Error::DimensionMismatch {
            expected: self.size(),
            found: other.size()
        });
        Ok(())
    }

    fn zip_with<F>(&self, other: &Vector, f: F) -> Vector
    where F: Fn(f64, f64) -> f64 {
        let elements = self.iter().zip(other.iter()).map(|(a, b)| f(*a, *b)).collect();
        Vector { elements }
    }
}

impl TryFrom<Vec<f64>> for Vector {
    type Error = Error;
    fn try_from(value: Vec<f64>) -> Result<Self> {
        Self::from_vec(value)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        value.into_vec()
    }
}

impl Index<usize> for Vector {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        assert!(1 <= i && i <= self.size(), "index {i} out of bounds 1..={}", self.size());
        &self.elements[i - 1]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        assert!(1 <= i && i <= self.size(), "index {i} out of bounds 1..={}", self.size());
        &mut self.elements[i - 1]
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(mut self) -> Self::Output {
        self.iter_mut().for_each(|a| *a = -*a);
        self
    }
}

impl Neg for &Vector {
    type Output = Vector;
    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        #[auto_ops]
        impl<'a, 'b> $trait<&'b Vector> for &'a Vector {
            type Output = Vector;
            fn $method(self, rhs: &'b Vector) -> Self::Output {
                assert_eq!(self.size(), rhs.size(), "vectors must have the same size");
                self.zip_with(rhs, |a, b| a $op b)
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);

impl Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.iter().join(" "))
    }
}

impl FromStr for Vector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let elements = s.split_whitespace().map(|e|
            e.parse::<f64>().map_err(|_|
                Error::Parse(format!("invalid number: '{e}'"))
            )
        ).collect::<Result<Vec<_>>>()?;

        ensure!(!elements.is_empty(), Error::Parse("empty vector".into()));

        Ok(Self { elements })
    }
}

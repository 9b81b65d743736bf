//! Plain-text layout of matrices and vectors.
//!
//! A matrix is written as `size` lines of `size` space-separated numbers,
//! one line per row at absolute column positions. The spike column `k` is
//! not recoverable from the text, so it is passed in when reading.
//! A vector is a single line of space-separated numbers.

use std::io::Read;
use itertools::Itertools;
use log::{info, warn};
use spk::{ensure, Error, Result, Vector};
use crate::BandedMatrix;

pub fn write_matrix(a: &BandedMatrix) -> String {
    let n = a.size();
    (1..=n).map(|i|
        (1..=n).map(|j| a._entry(i, j)).join(" ") + "\n"
    ).join("")
}

/// Parses the row-per-line layout. Values at the spike columns of rows
/// where `k` or `l` fall inside the tridiagonal band are read into the band.
pub fn read_matrix(text: &str, k: usize) -> Result<BandedMatrix> {
    let rows = text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.parse::<Vector>())
        .collect::<Result<Vec<_>>>()?;

    ensure!(!rows.is_empty(), Error::Parse("empty matrix".into()));

    let n = rows.len();
    let mut a = BandedMatrix::new(n, k)?;

    for (i, row) in (1..=n).zip(rows.iter()) {
        ensure!(row.size() == n, Error::Parse(
            format!("row {i} has {} entries, expected {n}", row.size())
        ));

        for j in 1..=n {
            let v = row[j];
            match a.owner(i, j) {
                Some(band) => a.band_mut(band)[i] = v,
                None if v != 0.0 => warn!("ignoring nonzero entry {v} at ({i}, {j})"),
                None => ()
            }
        }
    }

    Ok(a)
}

pub fn save_matrix(a: &BandedMatrix, path: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
    info!("save matrix (size = {}, k = {}): {path}", a.size(), a.k());
    std::fs::write(path, write_matrix(a))?;
    Ok(())
}

/// `path = "-"` reads from the standard input.
pub fn load_matrix(path: &str, k: usize) -> std::result::Result<BandedMatrix, Box<dyn std::error::Error>> {
    let text = read_input(path)?;
    let a = read_matrix(&text, k)?;
    info!("load matrix (size = {}, k = {k}): {path}", a.size());
    Ok(a)
}

pub fn save_vector(v: &Vector, path: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
    info!("save vector (size = {}): {path}", v.size());
    std::fs::write(path, format!("{v}\n"))?;
    Ok(())
}

/// `path = "-"` reads from the standard input.
pub fn load_vector(path: &str) -> std::result::Result<Vector, Box<dyn std::error::Error>> {
    let text = read_input(path)?;
    let v = text.parse::<Vector>()?;
    info!("load vector (size = {}): {path}", v.size());
    Ok(v)
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use spk::gen::{Conditioning, SpikeScale};
    use super::*;
    use crate::band::tests::{sample, vec};
    use crate::Band;

    fn tmp_path(name: &str) -> String {
        let dir = std::env::temp_dir();
        let file = format!("spk-layout-{}-{name}", std::process::id());
        dir.join(file).to_string_lossy().into_owned()
    }

    #[test]
    fn write() {
        let a = BandedMatrix::new(4, 1).unwrap();
        assert_eq!(write_matrix(&a), "0 0 0 0\n0 0 0 0\n0 0 0 0\n0 0 0 0\n");

        let s = write_matrix(&sample());
        let first = s.lines().next().unwrap();
        assert_eq!(first, "10 1 0 0 1 0 2 0");
        assert_eq!(s.lines().count(), 8);
    }

    #[test]
    fn read_write() {
        let mut rng = StdRng::seed_from_u64(20);
        let a = BandedMatrix::rand(12, 4, Conditioning::Bad, SpikeScale::Big, &mut rng).unwrap();
        let s = write_matrix(&a);
        let b = read_matrix(&s, 4).unwrap();

        assert_eq!(a.to_dense(), b.to_dense());
        assert_eq!(write_matrix(&b), s);
    }

    #[test]
    fn read_tie_break() {
        // k = 1, l = 3: column 1 of rows 1, 2 and column 3 of rows 2, 3, 4
        // belong to the tridiagonal band.
        let s = "5 7 9 0\n1 5 2 0\n4 1 5 2\n3 0 1 5\n";
        let a = read_matrix(s, 1).unwrap();

        assert_eq!(a.band(Band::B)[1], 5.0);
        assert_eq!(a.band(Band::P)[1], 0.0);
        assert_eq!(a.band(Band::Q)[1], 9.0);
        assert_eq!(a.band(Band::P)[4], 3.0);
        assert_eq!(a.band(Band::C)[2], 2.0);
        assert_eq!(a.band(Band::Q)[2], 0.0);
        assert_eq!(write_matrix(&a), s);
    }

    #[test]
    fn read_ignores_structural_zero() {
        let s = "1 0 0 0 4\n0 1 0 0 0\n0 0 1 0 0\n0 0 0 1 0\n0 0 0 0 1\n";
        let a = read_matrix(s, 0).unwrap();
        assert_eq!(a.entry(1, 5), Ok(0.0));
    }

    #[test]
    fn read_invalid() {
        assert!(matches!(read_matrix("", 0), Err(Error::Parse(_))));
        assert!(matches!(read_matrix("1 0 0\n0 1\n0 0 1\n", 0), Err(Error::Parse(_))));
        assert!(matches!(read_matrix("1 0 0\n0 x 0\n0 0 1\n", 0), Err(Error::Parse(_))));
        assert!(matches!(read_matrix("1 0 0\n0 1 0\n0 0 1\n", 1), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn save_load() {
        let a = sample();
        let f = vec(&[31.0, 46.0, 73.0, 72.0, 98.0, 109.0, 167.0, 183.0]);

        let (pa, pf) = (tmp_path("a.txt"), tmp_path("f.txt"));
        save_matrix(&a, &pa).unwrap();
        save_vector(&f, &pf).unwrap();

        let b = load_matrix(&pa, 5).unwrap();
        let g = load_vector(&pf).unwrap();

        assert_eq!(a.to_dense(), b.to_dense());
        assert_eq!(f, g);

        std::fs::remove_file(pa).unwrap();
        std::fs::remove_file(pf).unwrap();
    }

    #[test]
    fn load_missing() {
        assert!(load_matrix(&tmp_path("missing.txt"), 0).is_err());
        assert!(load_vector(&tmp_path("missing.txt")).is_err());
    }
}

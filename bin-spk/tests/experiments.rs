use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spk::gen::{Conditioning, SpikeScale};
use spk::util::format;
use spk_matrix::{solve_batch, Band, LinearSystem};

const MODES: [(Conditioning, SpikeScale); 4] = [
    (Conditioning::Good, SpikeScale::Little),
    (Conditioning::Good, SpikeScale::Big),
    (Conditioning::Bad,  SpikeScale::Little),
    (Conditioning::Bad,  SpikeScale::Big),
];

fn init_logger() {
    use spk::util::log::init_logger;
    let _ = init_logger(log::LevelFilter::Info);
}

fn errors(sizes: &[usize], k: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut systems = vec![];
    let mut exact = vec![];

    for &n in sizes {
        for (cond, scale) in MODES {
            let (s, x) = LinearSystem::rand(n, k, cond, scale, &mut rng).unwrap();
            systems.push(s);
            exact.push(x);
        }
    }

    // a zero pivot shows up as an infinite error.
    let errs = solve_batch(systems).into_iter().zip(exact.iter()).map(|(res, x)|
        res.map(|y| (&y - x).norm()).unwrap_or(f64::INFINITY)
    ).collect_vec();

    errs.chunks(MODES.len()).map(|row| row.to_vec()).collect()
}

fn print_table(sizes: &[usize], errs: &[Vec<f64>]) {
    let cols = MODES.iter().map(|(c, s)| format!("{c}/{s}")).collect_vec();
    let table = format::table("size", sizes, &cols, |n, col| {
        let i = sizes.iter().position(|m| m == n).unwrap();
        let j = cols.iter().position(|c| c == col).unwrap();
        format!("{:12.5e}", errs[i][j])
    });
    println!("{table}");
}

#[test]
fn small_sizes() {
    let sizes = [8, 16, 32, 64];
    let errs = errors(&sizes, 5, 1);

    for row in errs {
        for (e, (cond, _)) in row.into_iter().zip(MODES) {
            if cond == Conditioning::Bad {
                assert!(e < 1e-6, "error = {e}");
            }
        }
    }
}

#[test]
fn all_k() {
    let n = 40;
    let mut rng = StdRng::seed_from_u64(2);

    // shifted diagonal: every row is strictly dominant.
    for k in 1..=n-3 {
        let (mut s, x) = LinearSystem::rand(n, k, Conditioning::Good, SpikeScale::Little, &mut rng).unwrap();
        s.a.band_mut(Band::B).iter_mut().for_each(|b| *b += 120.0);
        s.f = s.a.multiply(&x).unwrap();

        let y = s.solve().unwrap();
        assert!((&y - &x).norm() < 1e-10, "k = {k}");
    }
}

// run test by:
// cargo test -r -- --exact [NAME] --nocapture --include-ignored

#[test]
#[ignore]
fn full_sweep() {
    init_logger();

    let sizes = std::iter::successors(Some(8usize), |n| Some(n * 2))
        .take_while(|&n| n <= 4096)
        .collect_vec();

    let errs = errors(&sizes, 5, 42);
    print_table(&sizes, &errs);

    for row in errs.iter() {
        for (e, (cond, _)) in row.iter().zip(MODES) {
            if cond == Conditioning::Bad {
                assert!(e.is_finite());
            }
        }
    }
}

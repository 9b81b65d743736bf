use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::app::err::*;

pub fn measure<F, Res>(proc: F) -> (Res, std::time::Duration)
where F: FnOnce() -> Res {
    let start = std::time::Instant::now();
    let res = proc();
    let time = start.elapsed();
    (res, time)
}

pub fn guard_panic<F, R>(f: F) -> Result<R, Box<dyn std::error::Error>>
where F: FnOnce() -> Result<R, Box<dyn std::error::Error>> + std::panic::UnwindSafe {
    std::panic::catch_unwind(|| {
        f()
    }).unwrap_or_else(|e| {
        let info = match e.downcast::<String>() {
            Ok(v) => *v,
            Err(e) => match e.downcast::<&str>() {
                Ok(v) => v.to_string(),
                _ => "Unknown Source of Error".to_owned()
            }
        };
        err!("panic: {info}")
    })
}

/// `min, 2·min, 4·min, …` up to `max`.
pub fn doubling_sizes(min: usize, max: usize) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    ensure!(min > 0, "min-size must be positive.");
    ensure!(min <= max, "min-size ({min}) exceeds max-size ({max}).");

    let sizes = std::iter::successors(Some(min), |n| n.checked_mul(2))
        .take_while(|&n| n <= max)
        .collect();
    Ok(sizes)
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None    => StdRng::from_entropy()
    }
}

pub fn disable_multithread(single_thread: bool) {
    if single_thread {
        spk_matrix::config::set_multithread_enabled(false);
    }
}

pub fn csv_writer(path: &str) -> Result<csv::Writer<std::fs::File>, Box<dyn std::error::Error>> {
    use std::fs::OpenOptions;

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let wtr = csv::Writer::from_writer(file);

    Ok(wtr)
}

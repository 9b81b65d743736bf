use itertools::Itertools;
use log::{error, info};
use serde::Deserialize;
use spk::gen::{Conditioning, SpikeScale};
use spk::util::format;
use spk::Vector;
use spk_matrix::{solve_batch, LinearSystem};
use crate::app::utils::*;

/// Accuracy of the solver over doubling sizes, for one generation mode.
#[derive(Clone, Debug, clap::Args)]
pub struct Args {
    #[arg(short, long, default_value = "5")]
    pub k: usize,

    #[arg(short, long, default_value = "good")]
    pub cond: Conditioning,

    #[arg(short, long, default_value = "little")]
    pub scale: SpikeScale,

    #[arg(long, default_value = "8")]
    pub min_size: usize,

    #[arg(long, default_value = "4096")]
    pub max_size: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub single_thread: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            k: 5,
            cond: Conditioning::Good,
            scale: SpikeScale::Little,
            min_size: 8,
            max_size: 4096,
            seed: None,
            output: None,
            single_thread: false,
            log: 0
        }
    }
}

/// Like [`Args`], over all four (conditioning, scale) combinations.
#[derive(Clone, Debug, clap::Args)]
pub struct AllArgs {
    #[arg(short, long, default_value = "5")]
    pub k: usize,

    #[arg(long, default_value = "8")]
    pub min_size: usize,

    #[arg(long, default_value = "4096")]
    pub max_size: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub single_thread: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

impl Default for AllArgs {
    fn default() -> Self {
        Self {
            k: 5,
            min_size: 8,
            max_size: 4096,
            seed: None,
            output: None,
            single_thread: false,
            log: 0
        }
    }
}

/// One column of an accuracy table.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub name: String,
    pub k: usize,

    #[serde(default)]
    pub cond: Conditioning,

    #[serde(default)]
    pub scale: SpikeScale,
}

impl Config {
    pub fn new(k: usize, cond: Conditioning, scale: SpikeScale) -> Self {
        let name = format!("{cond}/{scale}");
        Config { name, k, cond, scale }
    }
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    disable_multithread(args.single_thread);

    let sizes = doubling_sizes(args.min_size, args.max_size)?;
    let configs = [Config::new(args.k, args.cond, args.scale)];

    run(&sizes, &configs, args.seed, args.output.as_deref())
}

pub fn dispatch_all(args: &AllArgs) -> Result<String, Box<dyn std::error::Error>> {
    disable_multithread(args.single_thread);

    let sizes = doubling_sizes(args.min_size, args.max_size)?;
    let configs = [Conditioning::Good, Conditioning::Bad].into_iter().flat_map(|cond|
        [SpikeScale::Little, SpikeScale::Big].into_iter().map(move |scale|
            Config::new(args.k, cond, scale)
        )
    ).collect_vec();

    run(&sizes, &configs, args.seed, args.output.as_deref())
}

fn run(sizes: &[usize], configs: &[Config], seed: Option<u64>, output: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let errors = measure_errors(sizes, configs, seed);

    if let Some(path) = output {
        write_csv(path, sizes, configs, &errors)?;
        info!("result saved to: {path}");
    }

    let cols = configs.iter().map(|c| c.name.as_str()).collect_vec();
    let table = format::table("size", sizes, &cols, |n, name| {
        let i = sizes.iter().position(|m| m == n).unwrap_or(0);
        let j = cols.iter().position(|c| c == name).unwrap_or(0);
        cell(&errors[i][j])
    });

    Ok(table)
}

/// `‖x_exact − x‖∞` for every size and config, in row-major order.
///
/// Each system is drawn from one shared random source, so a fixed seed gives
/// the same table whether the solves run in parallel or not.
pub fn measure_errors(sizes: &[usize], configs: &[Config], seed: Option<u64>) -> Vec<Vec<spk::Result<f64>>> {
    let mut rng = make_rng(seed);
    let mut slots = vec![];
    let mut systems = vec![];
    let mut exact: Vec<Vector> = vec![];

    for &n in sizes {
        for c in configs {
            match LinearSystem::rand(n, c.k, c.cond, c.scale, &mut rng) {
                Ok((s, x)) => {
                    slots.push(Ok(systems.len()));
                    systems.push(s);
                    exact.push(x);
                },
                Err(e) => {
                    error!("size = {n}, {}: {e}", c.name);
                    slots.push(Err(e))
                }
            }
        }
    }

    let solved = solve_batch(systems).into_iter().zip(exact.iter()).map(|(res, x)|
        res.map(|y| (&y - x).norm())
    ).collect_vec();

    let cells = slots.into_iter().map(|s|
        s.and_then(|i| solved[i].clone())
    ).collect_vec();

    let ncols = configs.len().max(1);
    cells.chunks(ncols).map(|row| row.to_vec()).collect()
}

pub fn cell(res: &spk::Result<f64>) -> String {
    match res {
        Ok(e) => format::sci(*e),
        Err(_) => "!".to_string()
    }
}

pub fn write_csv(path: &str, sizes: &[usize], configs: &[Config], errors: &[Vec<spk::Result<f64>>]) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv_writer(path)?;

    let head = [
        vec!["size".to_string()],
        configs.iter().map(|c| c.name.clone()).collect()
    ].concat();

    wtr.write_record(head)?;

    for (n, row) in sizes.iter().zip(errors.iter()) {
        let record = [
            vec![n.to_string()],
            row.iter().map(cell).collect()
        ].concat();
        wtr.write_record(record)?;
    }

    wtr.flush()?;
    Ok(())
}

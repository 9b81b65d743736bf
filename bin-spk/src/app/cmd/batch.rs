use serde::Deserialize;
use super::sweep::{measure_errors, write_csv, Config};
use crate::app::err::*;
use crate::app::utils::*;

/// Runs the accuracy sweep described by a JSON file and writes a CSV table.
#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args {
    pub input: String,
    pub output: String,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub single_thread: bool,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

#[derive(Deserialize, Debug)]
struct InputData {
    sizes: Vec<usize>,
    configs: Vec<Config>,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    disable_multithread(args.single_thread);

    let json_str = std::fs::read_to_string(&args.input)?;
    let InputData { sizes, configs } = serde_json::from_str(&json_str)?;

    ensure!(!sizes.is_empty(), "no sizes given in: {}", args.input);
    ensure!(!configs.is_empty(), "no configs given in: {}", args.input);

    let errors = measure_errors(&sizes, &configs, args.seed);
    write_csv(&args.output, &sizes, &configs, &errors)?;

    let msg = format!("result saved to: {}", &args.output);
    Ok(msg)
}

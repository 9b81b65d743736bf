use log::info;
use clap::{Parser, Subcommand};

use super::cmd::{batch, gen, solve, sweep};
use super::utils::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Cmd
}

#[derive(Subcommand, Debug)]
#[clap(rename_all="lower")]
pub enum Cmd {
    Sweep(sweep::Args),
    All(sweep::AllArgs),
    Gen(gen::Args),
    Solve(solve::Args),
    Batch(batch::Args),
}

impl CliArgs {
    fn log_level(&self) -> log::LevelFilter {
        let level = match &self.command {
            Cmd::Sweep(args) => args.log,
            Cmd::All(args)   => args.log,
            Cmd::Gen(args)   => args.log,
            Cmd::Solve(args) => args.log,
            Cmd::Batch(args) => args.log,
        };
        spk::util::log::level_filter(level)
    }
}

pub struct App {
    pub args: CliArgs
}

impl App {
    pub fn new() -> Self {
        let args = CliArgs::parse();
        App { args }
    }

    pub fn run(&self) -> Result<String, Box<dyn std::error::Error>> {
        self.init_logger()?;

        info!("args: {:?}", self.args);
        info!("multithread: {}", spk_matrix::config::is_multithread_enabled());

        let (res, time) = measure(||
            self.dispatch()
        );

        info!("time: {:?}", time);

        res
    }

    fn init_logger(&self) -> Result<(), Box<dyn std::error::Error>> {
        let l = self.args.log_level();
        spk::util::log::init_logger(l)?;
        Ok(())
    }

    fn dispatch(&self) -> Result<String, Box<dyn std::error::Error>> {
        guard_panic(||
            match &self.args.command {
                Cmd::Sweep(args) => sweep::dispatch(args),
                Cmd::All(args)   => sweep::dispatch_all(args),
                Cmd::Gen(args)   => gen::dispatch(args),
                Cmd::Solve(args) => solve::dispatch(args),
                Cmd::Batch(args) => batch::dispatch(args),
            }
        )
    }
}

use log::info;
use spk::util::format;
use spk_matrix::layout::{load_matrix, load_vector, save_vector};
use crate::app::err::*;

/// Solves a system stored in the text layout.
#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args {
    pub matrix: String,
    pub rhs: String,

    #[arg(short, long)]
    pub k: usize,

    #[arg(short, long)]
    pub print: bool,

    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(short = 'x', long)]
    pub exact: Option<String>,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    App::new(args.clone()).run()
}

struct App {
    args: Args,
    buff: String,
}

impl App {
    fn new(args: Args) -> Self {
        let buff = String::with_capacity(1024);
        App { args, buff }
    }

    fn run(&mut self) -> Result<String, Box<dyn std::error::Error>> {
        ensure!(
            self.args.matrix != "-" || self.args.rhs != "-",
            "matrix and rhs cannot both be read from stdin."
        );

        let a = load_matrix(&self.args.matrix, self.args.k)?;
        let f = load_vector(&self.args.rhs)?;

        if self.args.print {
            let s = a.display_augmented(&f)?;
            self.out(&s);
            self.out("");
        }

        let x = a.solve(f)?;

        if let Some(path) = &self.args.exact {
            let x0 = load_vector(path)?;
            let e = x0.try_sub(&x)?.norm();
            info!("error: {e}");
            self.out(&format!("error: {}", format::sci(e)));
        }

        if let Some(path) = &self.args.output {
            save_vector(&x, path)?;
            self.out(&format!("solution saved to: {path}"));
        } else {
            self.out(&x.to_string());
        }

        Ok(self.flush())
    }

    fn out(&mut self, str: &str) {
        self.buff.push_str(str);
        self.buff.push('\n');
    }

    fn flush(&mut self) -> String {
        let res = std::mem::take(&mut self.buff);
        res.trim().to_string()
    }
}

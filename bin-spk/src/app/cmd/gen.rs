use log::info;
use spk::gen::{Conditioning, SpikeScale};
use spk_matrix::layout::{save_matrix, save_vector};
use spk_matrix::LinearSystem;
use crate::app::utils::*;

/// Writes a random system `A · x = f` in the text layout.
#[derive(Clone, Default, Debug, clap::Args)]
pub struct Args {
    pub size: usize,
    pub k: usize,

    #[arg(short, long)]
    pub matrix: String,

    #[arg(short, long)]
    pub rhs: String,

    #[arg(short = 'x', long)]
    pub exact: Option<String>,

    #[arg(short, long, default_value = "good")]
    pub cond: Conditioning,

    #[arg(short, long, default_value = "little")]
    pub scale: SpikeScale,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "0")]
    pub log: u8,
}

pub fn dispatch(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let mut rng = make_rng(args.seed);
    let (sys, x) = LinearSystem::rand(args.size, args.k, args.cond, args.scale, &mut rng)?;

    info!("generated: size = {}, k = {}, cond = {}, scale = {}", args.size, args.k, args.cond, args.scale);

    save_matrix(&sys.a, &args.matrix)?;
    save_vector(&sys.f, &args.rhs)?;

    let mut saved = vec![args.matrix.as_str(), args.rhs.as_str()];

    if let Some(path) = &args.exact {
        save_vector(&x, path)?;
        saved.push(path);
    }

    let msg = format!("saved to: {}", saved.join(", "));
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use spk_matrix::layout::{load_matrix, load_vector};
    use super::*;

    fn tmp_path(name: &str) -> String {
        let file = format!("spks-gen-{}-{name}", std::process::id());
        std::env::temp_dir().join(file).to_string_lossy().into_owned()
    }

    #[test]
    fn gen() {
        let args = Args {
            size: 10,
            k: 3,
            matrix: tmp_path("a.txt"),
            rhs: tmp_path("f.txt"),
            exact: Some(tmp_path("x.txt")),
            seed: Some(1),
            ..Default::default()
        };
        let res = dispatch(&args);
        assert!(res.is_ok());

        let a = load_matrix(&args.matrix, 3).unwrap();
        let f = load_vector(&args.rhs).unwrap();
        let x = load_vector(args.exact.as_ref().unwrap()).unwrap();

        assert_eq!(a.size(), 10);
        assert_eq!(a.multiply(&x), Ok(f));

        for p in [&args.matrix, &args.rhs, args.exact.as_ref().unwrap()] {
            std::fs::remove_file(p).unwrap();
        }
    }

    #[test]
    fn gen_invalid_k() {
        let args = Args {
            size: 10,
            k: 8,
            matrix: tmp_path("b.txt"),
            rhs: tmp_path("g.txt"),
            ..Default::default()
        };
        assert!(dispatch(&args).is_err());
    }
}

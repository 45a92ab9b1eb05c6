use std::error::Error;

use clap::Parser;
use eigendecomp::{load_dmat, Eigen, Order, Output, Settings};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File containing the matrix to decompose, one row per line
    #[arg(value_parser)]
    infile: String,

    /// Writes the output in JSON format for use by other programs
    #[arg(short, long, value_parser, default_value_t = false)]
    json: bool,

    /// Load [Settings] from a JSON file
    #[arg(short, long, value_parser)]
    config: Option<String>,

    /// Sort the eigenvalues of a symmetric matrix in descending order
    #[arg(short, long, value_parser, default_value_t = false)]
    descending: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cfg = Args::parse();
    let mut settings = match &cfg.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if cfg.descending {
        settings.order = Order::Descending;
    }
    let a = load_dmat(&cfg.infile)?;
    let eigen = Eigen::with_settings(&a, &settings)?;
    let got = Output::new(&eigen, &a);
    if cfg.json {
        let data = serde_json::to_string_pretty(&got)?;
        println!("{data}");
    } else {
        print!("{got}");
    }
    Ok(())
}

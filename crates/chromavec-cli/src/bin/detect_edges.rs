//! Canny-style edge detection using colour gradients.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use chromavec_cli::{init_logging, run_filter};
use chromavec_filter::colour_canny_edge_detect;

#[derive(Parser)]
#[command(name = "detect-edges", version, about = "Canny-style edge detector")]
struct Cli {
    /// Canny detector lower and upper thresholds
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["LOW", "HIGH"],
        default_values_t = [10.0, 20.0]
    )]
    thresholds: Vec<f32>,

    /// Gaussian filter sigma
    #[arg(short, long, default_value_t = 1.5)]
    sigma: f64,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Input image
    image: PathBuf,

    /// Output edge map
    edges: PathBuf,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (low, high) = (cli.thresholds[0], cli.thresholds[1]);
    info!(
        "edge detector: thresholds [{low}, {high}], sigma {}",
        cli.sigma
    );

    run_filter(&cli.image, &cli.edges, "edge detection", |img| {
        colour_canny_edge_detect(img, low, high, cli.sigma)
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

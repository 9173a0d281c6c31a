//! Filter images using vector order-statistic filters.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, value_parser};
use log::info;

use chromavec_cli::{init_logging, run_filter};
use chromavec_filter::{
    GradientImage, GradientMode, colour_vector_gradient_filter, minimum_vector_dispersion_filter,
    vector_median_filter, vector_range_filter,
};

#[derive(Parser)]
#[command(
    name = "apply-filter",
    version,
    about = "Filter images using vector-order statistic filters"
)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Vector Median Filter
    VectorMedian {
        /// Input image
        input: PathBuf,
        /// Output image
        output: PathBuf,
        /// Size of the NxN filter window
        #[arg(short, long, default_value_t = 5, value_parser = value_parser!(u32).range(3..))]
        window: u32,
    },
    /// Vector Range Filter
    VectorRange {
        /// Input image
        input: PathBuf,
        /// Output edge map
        output: PathBuf,
        /// Size of the NxN filter window
        #[arg(short, long, default_value_t = 5, value_parser = value_parser!(u32).range(3..))]
        window: u32,
    },
    /// Minimum Vector Dispersion Filter
    Mvdf {
        /// Input image
        input: PathBuf,
        /// Output edge map
        output: PathBuf,
        /// Size of the NxN filter window
        #[arg(short, long, default_value_t = 5, value_parser = value_parser!(u32).range(3..))]
        window: u32,
        /// Controls the sensitivity to edges
        #[arg(short, default_value_t = 4, value_parser = value_parser!(u32).range(1..))]
        k: u32,
        /// Controls the amount of pre-smoothing
        #[arg(short, default_value_t = 3, value_parser = value_parser!(u32).range(1..))]
        l: u32,
    },
    /// Vector Colour Gradient Filter
    VectorGradient {
        /// Input image
        input: PathBuf,
        /// Output image
        output: PathBuf,
        /// Gaussian pre-filter sigma
        #[arg(short, long, default_value_t = 0.0)]
        sigma: f64,
        /// Only output the gradient magnitudes
        #[arg(short = 'm', long)]
        only_magnitude: bool,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::VectorMedian {
            input,
            output,
            window,
        } => run_filter(&input, &output, "vector median", |img| {
            vector_median_filter(img, window)
        }),
        Command::VectorRange {
            input,
            output,
            window,
        } => run_filter(&input, &output, "vector range", |img| {
            vector_range_filter(img, window)
        }),
        Command::Mvdf {
            input,
            output,
            window,
            k,
            l,
        } => {
            info!("w: {window} k: {k} l: {l}");
            run_filter(&input, &output, "minimum vector dispersion", |img| {
                minimum_vector_dispersion_filter(img, k, l, window)
            })
        }
        Command::VectorGradient {
            input,
            output,
            sigma,
            only_magnitude,
        } => {
            info!("sigma: {sigma}");
            let mode = if only_magnitude {
                GradientMode::MagnitudeOnly
            } else {
                GradientMode::ToHsv
            };
            run_filter(&input, &output, "vector colour gradient", |img| {
                Ok(match colour_vector_gradient_filter(img, sigma, mode)? {
                    GradientImage::Magnitude(raster) | GradientImage::Hsv(raster) => raster,
                    // The CLI never requests the raw polar output
                    GradientImage::Direct(_) => unreachable!(),
                })
            })
        }
    }
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

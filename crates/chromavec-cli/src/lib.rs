//! Shared plumbing for the chromavec command-line tools
//!
//! Both binaries read one image, run one core operation, time it, and
//! write one output file. The helpers here keep that flow and the
//! logging setup in one place. Nothing is written on failure: the
//! output format is resolved and the filter has succeeded before the
//! output file is created.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use chromavec_core::Raster;
use chromavec_filter::FilterResult;
use chromavec_io::ImageFormat;
use log::info;

/// Initialise the log facade.
///
/// Verbose mode shows `info` and below; otherwise only warnings and
/// errors reach the terminal. `RUST_LOG` still overrides either way.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Read the input image, run a filter over it, and write the result.
///
/// The elapsed filter time is logged at `info` level.
pub fn run_filter<F>(input: &Path, output: &Path, name: &str, filter: F) -> Result<()>
where
    F: FnOnce(&Raster<u8>) -> FilterResult<Raster<u8>>,
{
    info!("filter: {name}");

    let format = ImageFormat::from_path(output);
    if format == ImageFormat::Unknown {
        bail!(
            "cannot determine an output format from {:?} (use .png, .pgm, .ppm or .pnm)",
            output
        );
    }

    let img = chromavec_io::read_image(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let start = Instant::now();
    let result = filter(&img).context("filtering failed")?;
    info!("{name} finished in {:.3?}", start.elapsed());

    chromavec_io::write_image(&result, output, format)
        .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

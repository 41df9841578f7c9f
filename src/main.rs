mod cli;

use anyhow::{Context, bail};
use clap::Parser;
use cli::Cli;

use exr_converter_rs::logger;

use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_with_level(if cli.verbose { "debug" } else { "info" });

    let (direction, args) = cli.command.split();
    let config = args.config(cli.verbose);

    info!(
        "{} to {} (EXR compression {}, TIFF compression {})",
        direction.source(),
        direction.destination(),
        config.exr_compression,
        config.tiff_compression
    );

    if let Some(directory) = &args.dir {
        let report = direction
            .convert_directory(directory, &config)
            .with_context(|| format!("cannot convert directory {}", directory.display()))?;

        for (path, reason) in &report.skipped {
            info!("Skipped {}: {}", path.display(), reason);
        }
        if !report.failed.is_empty() {
            bail!(
                "{} of {} files failed to convert",
                report.failed.len(),
                report.total()
            );
        }
        return Ok(());
    }

    let Some(input) = &args.input else {
        bail!("no input file given");
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| direction.default_output(input));

    let report = direction
        .convert_file(input, &output, &config)
        .with_context(|| format!("cannot convert {}", input.display()))?;

    if !report.dropped_planes.is_empty() {
        warn!(
            "Dropped {} incompatible planes: {:?}",
            report.dropped_planes.len(),
            report.dropped_planes
        );
    }
    info!(
        "Wrote {} ({} planes, {})",
        output.display(),
        report.planes_written,
        report.output_type
    );

    Ok(())
}

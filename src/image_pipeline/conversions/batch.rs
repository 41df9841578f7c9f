//! Directory conversion
//!
//! Converts every file in one directory (non-recursive) whose name ends with
//! one of the source format's extensions. Outputs are written next to their
//! inputs with the destination extension substituted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    container::{ContainerReader, ContainerWriter},
    conversions::{pipeline::ConversionPipeline, types::BatchReport},
};

impl<R: ContainerReader, W: ContainerWriter> ConversionPipeline<R, W> {
    /// Source files in `directory`, sorted by name, paired with their destinations.
    pub fn batch_targets(&self, directory: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
        let entries = fs::read_dir(directory).map_err(|e| {
            ConversionError::SourceUnreadable(format!("{}: {}", directory.display(), e))
        })?;

        Ok(self.collect_targets(directory, entries.map(|entry| entry.map(|entry| entry.path()))))
    }

    /// Keeps the listed paths that are source files. Entries the directory
    /// listing failed to yield are logged and left out.
    pub(crate) fn collect_targets<I>(&self, directory: &Path, entries: I) -> Vec<(PathBuf, PathBuf)>
    where
        I: IntoIterator<Item = io::Result<PathBuf>>,
    {
        let source = self.source_format();
        let output_extension = self.destination_format().output_extension();

        let mut targets = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", directory.display(), e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let Some(extension) = source.matching_extension(&path) else {
                continue;
            };
            let Some(stem) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(extension))
            else {
                continue;
            };

            let destination = directory.join(format!("{}{}", stem, output_extension));
            targets.push((path, destination));
        }

        targets.sort();
        targets
    }

    /// Converts every matching file in `directory`.
    ///
    /// Per-file failures are logged and collected in the report; only a
    /// directory that cannot be listed is an error.
    #[instrument(skip(self, directory), fields(directory = %directory.as_ref().display()))]
    pub fn convert_directory<P: AsRef<Path>>(&self, directory: P) -> Result<BatchReport> {
        let targets = self.batch_targets(directory.as_ref())?;
        info!(
            "Found {} {} files to convert",
            targets.len(),
            self.source_format()
        );

        let mut report = BatchReport::default();
        for (source, destination) in targets {
            match self.convert_file(&source, &destination) {
                Ok(_) => report.converted.push(destination),
                Err(e) if e.is_skippable() => {
                    warn!("Skipping {}: {}", source.display(), e);
                    report.skipped.push((source, e.to_string()));
                }
                Err(e) => {
                    warn!("Failed to convert {}: {}", source.display(), e);
                    report.failed.push((source, e.to_string()));
                }
            }
        }

        info!(
            converted = report.converted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Batch conversion complete"
        );
        Ok(report)
    }
}

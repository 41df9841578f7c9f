use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    container::{ContainerReader, ContainerWriter, ImageContainer},
    conversions::types::{ConversionConfig, ConversionReport, ConversionWarning},
    pixel::{ContainerFormat, resolve_output_type},
    plane::{Plane, PlaneCandidate, select_compatible},
    side_channel::HeaderSideChannel,
};

/// Decodes one container, selects and coerces its planes, and encodes them
/// into another container.
pub struct ConversionPipeline<R: ContainerReader, W: ContainerWriter> {
    reader: R,
    writer: W,
    config: ConversionConfig,
}

impl<R: ContainerReader + Default, W: ContainerWriter + Default> ConversionPipeline<R, W> {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            reader: R::default(),
            writer: W::default(),
            config,
        }
    }
}

impl<R: ContainerReader, W: ContainerWriter> ConversionPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ConversionConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    pub fn source_format(&self) -> ContainerFormat {
        self.reader.format()
    }

    pub fn destination_format(&self) -> ContainerFormat {
        self.writer.format()
    }

    /// Header for each accepted plane, in accepted order.
    fn lookup_headers(&self, decoded: &ImageContainer, accepted: &[usize]) -> Result<Vec<Option<String>>> {
        let source = self.source_format();
        let destination = self.destination_format();

        if source != ContainerFormat::Exr {
            return Ok(accepted
                .iter()
                .map(|&index| decoded.planes[index].attached_header.clone())
                .collect());
        }

        let Some(key) = destination.side_channel_key() else {
            return Ok(vec![None; accepted.len()]);
        };

        match HeaderSideChannel::from_attributes(&decoded.attributes, key)? {
            Some(side_channel) => {
                let origins: Vec<usize> = accepted
                    .iter()
                    .map(|&index| decoded.planes[index].origin_index)
                    .collect();
                let headers = side_channel.align(decoded.planes.len(), &origins)?;
                Ok(headers.into_iter().map(Some).collect())
            }
            None => {
                debug!("No {} attribute, writing default headers", key);
                Ok(vec![None; accepted.len()])
            }
        }
    }

    /// Builds the destination container, attaching headers the way the destination carries them.
    fn assemble(&self, planes: Vec<Plane>, headers: Vec<Option<String>>) -> ImageContainer {
        let source_key = self.source_format().side_channel_key();

        match (self.destination_format(), source_key) {
            (ContainerFormat::Exr, Some(key)) => {
                let side_channel =
                    HeaderSideChannel::new(headers.into_iter().map(Option::unwrap_or_default).collect());
                ImageContainer::new(planes).with_attribute(key, side_channel.encode())
            }
            _ => {
                let planes = planes
                    .into_iter()
                    .zip(headers)
                    .map(|(plane, header)| plane.with_header(header))
                    .collect();
                ImageContainer::new(planes)
            }
        }
    }

    #[instrument(
        skip(self, input_data, output),
        fields(
            input_size = input_data.len(),
            source = %self.source_format(),
            destination = %self.destination_format()
        )
    )]
    pub fn convert(&self, input_data: &[u8], output: &mut dyn Write) -> Result<ConversionReport> {
        info!(
            "Starting {} to {} conversion",
            self.source_format(),
            self.destination_format()
        );

        let decoded = {
            let _span = tracing::info_span!("open_source").entered();
            self.reader.read_container(input_data)?
        };

        let selection = {
            let _span = tracing::info_span!("select_compatible_planes", candidates = decoded.planes.len()).entered();
            let candidates: Vec<PlaneCandidate> = decoded.planes.iter().map(PlaneCandidate::from).collect();
            select_compatible(&candidates, self.config.output_pixel_type)?
        };

        let resolution = {
            let _span = tracing::info_span!("resolve_output_type", requested = %selection.resolved_type).entered();
            resolve_output_type(self.destination_format(), selection.resolved_type)?
        };

        let mut warnings = Vec::new();
        if let Some(substitution) = resolution.substitution {
            if self.config.verbose {
                warn!("{}", substitution);
                warnings.push(ConversionWarning::PrecisionSubstitution(substitution));
            } else {
                debug!("{}", substitution);
            }
        }

        let headers = {
            let _span = tracing::info_span!("header_lookup").entered();
            self.lookup_headers(&decoded, &selection.accepted)?
        };
        let metadata_carried = headers.iter().any(Option::is_some);

        let planes: Vec<Plane> = {
            let _span = tracing::info_span!("coerce_planes", output_type = %resolution.output_type).entered();
            selection
                .accepted
                .iter()
                .map(|&index| decoded.planes[index].coerced(resolution.output_type))
                .collect()
        };

        let planes_written = planes.len();
        let container = {
            let _span = tracing::info_span!("assemble_container").entered();
            self.assemble(planes, headers)
        };

        {
            let _span = tracing::info_span!("write_destination").entered();
            self.writer.write_container(&container, output, &self.config)?;
        }

        info!(
            planes = planes_written,
            dropped = selection.dropped.len(),
            width = selection.shape.0,
            height = selection.shape.1,
            output_type = %resolution.output_type,
            "Conversion complete"
        );

        Ok(ConversionReport {
            planes_written,
            dropped_planes: selection.dropped,
            output_type: resolution.output_type,
            substitution: resolution.substitution,
            warnings,
            metadata_carried,
        })
    }

    /// Converts `input_path` into `output_path`.
    ///
    /// The destination is encoded completely in memory before the file is
    /// created, so a failed conversion leaves no output behind.
    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<ConversionReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            fs::read(input_path).map_err(|e| {
                ConversionError::SourceUnreadable(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut encoded = Vec::new();
        let report = self.convert(&input_data, &mut encoded)?;

        {
            let _span = tracing::info_span!("write_output_file", bytes = encoded.len()).entered();
            write_output_file(output_path, &encoded)?;
        }

        Ok(report)
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ConversionConfig) {
        self.config = config;
    }
}

fn write_output_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |e: std::io::Error| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e));

    let mut file = File::create(path).map_err(write_error)?;

    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(remove_error) = fs::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), remove_error);
        }
        return Err(write_error(e));
    }

    Ok(())
}

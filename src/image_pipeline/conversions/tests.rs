#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};
    use std::sync::{Arc, Mutex};

    use half::f16;

    use crate::image_pipeline::common::error::{ConversionError, Result};
    use crate::image_pipeline::container::{ContainerReader, ContainerWriter, ImageContainer};
    use crate::image_pipeline::conversions::{ConversionConfig, ConversionPipeline, ConversionWarning};
    use crate::image_pipeline::pixel::{ContainerFormat, PixelBuffer, PixelType};
    use crate::image_pipeline::plane::Plane;
    use crate::image_pipeline::side_channel::{self, FITS_HEADERS_KEY};

    struct MockReader {
        format: ContainerFormat,
        should_fail: bool,
        container: ImageContainer,
    }

    impl ContainerReader for MockReader {
        fn format(&self) -> ContainerFormat {
            self.format
        }

        fn read_container(&self, data: &[u8]) -> Result<ImageContainer> {
            if self.should_fail || data == b"corrupt" {
                return Err(ConversionError::DecodeError("Mock decode error".to_string()));
            }
            if data == b"empty" {
                return Ok(ImageContainer::default());
            }
            Ok(self.container.clone())
        }
    }

    struct MockWriter {
        format: ContainerFormat,
        should_fail: bool,
        written: Arc<Mutex<Vec<ImageContainer>>>,
    }

    impl ContainerWriter for MockWriter {
        fn format(&self) -> ContainerFormat {
            self.format
        }

        fn write_container(&self, container: &ImageContainer, output: &mut dyn Write, _config: &ConversionConfig) -> Result<()> {
            if self.should_fail {
                return Err(ConversionError::EncodeError("Mock encode error".to_string()));
            }
            self.written.lock().unwrap().push(container.clone());
            output.write_all(b"mock output")?;
            Ok(())
        }
    }

    fn plane(width: usize, height: usize, samples: PixelBuffer, index: usize) -> Plane {
        Plane::new(width, height, samples, index, index.to_string()).unwrap()
    }

    fn float_plane(size: usize, index: usize) -> Plane {
        plane(size, size, PixelBuffer::Float32(vec![index as f32; size * size]), index)
    }

    fn pipeline(
        source: ContainerFormat,
        destination: ContainerFormat,
        container: ImageContainer,
        config: ConversionConfig,
    ) -> (ConversionPipeline<MockReader, MockWriter>, Arc<Mutex<Vec<ImageContainer>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let reader = MockReader { format: source, should_fail: false, container };
        let writer = MockWriter { format: destination, should_fail: false, written: written.clone() };
        (ConversionPipeline::with_custom(reader, writer, config), written)
    }

    #[test]
    fn test_successful_conversion() {
        let container = ImageContainer::new(vec![float_plane(4, 0), float_plane(4, 1)]);
        let (pipeline, written) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            container,
            ConversionConfig::default(),
        );

        let mut output = Cursor::new(Vec::new());
        let report = pipeline.convert(b"fake exr data", &mut output).unwrap();

        assert_eq!(report.planes_written, 2);
        assert_eq!(report.output_type, PixelType::Float32);
        assert!(report.dropped_planes.is_empty());
        assert!(!report.metadata_carried);
        assert_eq!(written.lock().unwrap()[0].planes.len(), 2);
        assert_eq!(output.into_inner(), b"mock output");
    }

    #[test]
    fn test_reader_failure() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let reader = MockReader {
            format: ContainerFormat::Exr,
            should_fail: true,
            container: ImageContainer::default(),
        };
        let writer = MockWriter { format: ContainerFormat::Fits, should_fail: false, written: written.clone() };
        let pipeline = ConversionPipeline::with_custom(reader, writer, ConversionConfig::default());

        let result = pipeline.convert(b"fake exr data", &mut Cursor::new(Vec::new()));

        assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure() {
        let reader = MockReader {
            format: ContainerFormat::Exr,
            should_fail: false,
            container: ImageContainer::new(vec![float_plane(4, 0)]),
        };
        let writer = MockWriter {
            format: ContainerFormat::Fits,
            should_fail: true,
            written: Arc::new(Mutex::new(Vec::new())),
        };
        let pipeline = ConversionPipeline::with_custom(reader, writer, ConversionConfig::default());

        let result = pipeline.convert(b"fake exr data", &mut Cursor::new(Vec::new()));

        assert!(matches!(result.unwrap_err(), ConversionError::EncodeError(_)));
    }

    #[test]
    fn test_incompatible_planes_dropped() {
        let container = ImageContainer::new(vec![float_plane(4, 0), float_plane(4, 1), float_plane(8, 2)]);
        let (pipeline, written) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            container,
            ConversionConfig::default(),
        );

        let report = pipeline.convert(b"fake fits data", &mut Cursor::new(Vec::new())).unwrap();

        assert_eq!(report.planes_written, 2);
        assert_eq!(report.dropped_planes, vec![2]);
        let written = written.lock().unwrap();
        let shapes: Vec<_> = written[0].planes.iter().map(Plane::shape).collect();
        assert_eq!(shapes, vec![(4, 4), (4, 4)]);
    }

    #[test]
    fn test_native_type_mismatch_dropped_even_when_requested() {
        let mixed = ImageContainer::new(vec![
            float_plane(2, 0),
            plane(2, 2, PixelBuffer::Float16(vec![f16::ONE; 4]), 1),
        ]);

        let (pipeline_default, _) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            mixed.clone(),
            ConversionConfig::default(),
        );
        let report = pipeline_default.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(report.planes_written, 1);
        assert_eq!(report.dropped_planes, vec![1]);

        let as_float = ConversionConfig::builder()
            .output_pixel_type(Some(PixelType::Float32))
            .build();
        let (pipeline_float, _) = pipeline(ContainerFormat::Fits, ContainerFormat::Exr, mixed.clone(), as_float);
        let report = pipeline_float.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(report.planes_written, 1);
        assert_eq!(report.dropped_planes, vec![1]);

        // the first plane is always kept; later ones only when already of the requested type
        let as_half = ConversionConfig::builder()
            .output_pixel_type(Some(PixelType::Float16))
            .build();
        let (pipeline_half, written) = pipeline(ContainerFormat::Fits, ContainerFormat::Exr, mixed, as_half);
        let report = pipeline_half.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(report.planes_written, 2);
        assert!(report.dropped_planes.is_empty());
        let written = written.lock().unwrap();
        assert_eq!(written[0].planes[0].samples, PixelBuffer::Float16(vec![f16::ZERO; 4]));
        assert_eq!(written[0].planes[1].samples, PixelBuffer::Float16(vec![f16::ONE; 4]));
    }

    #[test]
    fn test_half_substitution_warns_only_when_verbose() {
        let half_planes = ImageContainer::new(vec![
            plane(2, 2, PixelBuffer::Float16(vec![f16::from_f32(0.5); 4]), 0),
            plane(2, 2, PixelBuffer::Float16(vec![f16::from_f32(1.5); 4]), 1),
        ]);

        for verbose in [false, true] {
            let config = ConversionConfig::builder().verbose(verbose).build();
            let (pipeline, written) = pipeline(ContainerFormat::Exr, ContainerFormat::Fits, half_planes.clone(), config);

            let report = pipeline.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();

            let substitution = report.substitution.unwrap();
            assert_eq!(substitution.requested, PixelType::Float16);
            assert_eq!(report.output_type, PixelType::Float32);
            assert_eq!(report.warnings.len(), usize::from(verbose));
            if verbose {
                assert_eq!(report.warnings[0], ConversionWarning::PrecisionSubstitution(substitution));
            }
            assert_eq!(
                written.lock().unwrap()[0].planes[0].samples,
                PixelBuffer::Float32(vec![0.5; 4])
            );
        }
    }

    #[test]
    fn test_empty_source_is_no_image_data() {
        let (pipeline, written) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            ImageContainer::default(),
            ConversionConfig::default(),
        );

        let err = pipeline.convert(b"empty", &mut Cursor::new(Vec::new())).unwrap_err();

        assert!(matches!(err, ConversionError::NoImageData(_)));
        assert!(err.is_skippable());
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_output_type_never_reaches_writer() {
        let container = ImageContainer::new(vec![plane(2, 2, PixelBuffer::Int32(vec![1, 2, 3, 4]), 0)]);
        let (pipeline, written) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            container,
            ConversionConfig::default(),
        );

        let err = pipeline.convert(b"data", &mut Cursor::new(Vec::new())).unwrap_err();

        assert!(matches!(err, ConversionError::UnsupportedEncoding(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_foreign_headers_become_side_channel() {
        let container = ImageContainer::new(vec![
            float_plane(2, 0).with_header(Some("OBJECT  = 'M31'".to_string())),
            float_plane(2, 1).with_header(None),
        ]);
        let (pipeline, written) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            container,
            ConversionConfig::default(),
        );

        let report = pipeline.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();

        assert!(report.metadata_carried);
        let written = written.lock().unwrap();
        let blob = &written[0].attributes[FITS_HEADERS_KEY];
        assert_eq!(
            side_channel::decode(blob).unwrap(),
            vec!["OBJECT  = 'M31'".to_string(), String::new()]
        );
    }

    #[test]
    fn test_side_channel_aligns_by_origin() {
        let headers = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        let container = ImageContainer::new(vec![float_plane(4, 0), float_plane(8, 1), float_plane(4, 2)])
            .with_attribute(FITS_HEADERS_KEY, side_channel::encode(&headers));
        let (pipeline, written) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            container,
            ConversionConfig::default(),
        );

        pipeline.convert(b"data", &mut Cursor::new(Vec::new())).unwrap();

        let written = written.lock().unwrap();
        let attached: Vec<_> = written[0]
            .planes
            .iter()
            .map(|p| p.attached_header.clone().unwrap())
            .collect();
        assert_eq!(attached, vec!["first".to_string(), "third".to_string()]);
    }

    #[test]
    fn test_malformed_side_channel_fails() {
        let container = ImageContainer::new(vec![float_plane(4, 0)]).with_attribute(FITS_HEADERS_KEY, "{not json");
        let (pipeline, written) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            container,
            ConversionConfig::default(),
        );

        let err = pipeline.convert(b"data", &mut Cursor::new(Vec::new())).unwrap_err();

        assert!(matches!(err, ConversionError::MalformedSideChannel(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_conversion_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.exr");
        let destination = dir.path().join("out.fits");
        std::fs::write(&source, b"empty").unwrap();

        let (pipeline, _) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            ImageContainer::default(),
            ConversionConfig::default(),
        );

        let err = pipeline.convert_file(&source, &destination).unwrap_err();

        assert!(matches!(err, ConversionError::NoImageData(_)));
        assert!(!destination.exists());
    }

    #[test]
    fn test_missing_source_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            ImageContainer::default(),
            ConversionConfig::default(),
        );

        let err = pipeline
            .convert_file(dir.path().join("missing.exr"), dir.path().join("out.fits"))
            .unwrap_err();

        assert!(matches!(err, ConversionError::SourceUnreadable(_)));
    }

    #[test]
    fn test_batch_collects_failures() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.exr"), b"good").unwrap();
        std::fs::write(dir.path().join("b.exr"), b"corrupt").unwrap();
        std::fs::write(dir.path().join("c.exr"), b"good").unwrap();
        std::fs::write(dir.path().join("d.exr"), b"empty").unwrap();
        std::fs::write(dir.path().join("e.EXR"), b"good").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"good").unwrap();

        let (pipeline, written) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            ImageContainer::new(vec![float_plane(2, 0)]),
            ConversionConfig::default(),
        );

        let report = pipeline.convert_directory(dir.path()).unwrap();

        assert_eq!(
            report.converted,
            vec![dir.path().join("a.fits"), dir.path().join("c.fits")]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.path().join("b.exr"));
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].0, dir.path().join("d.exr"));
        assert_eq!(report.total(), 4);
        assert_eq!(written.lock().unwrap().len(), 2);
        assert!(!dir.path().join("b.fits").exists());
        assert!(!dir.path().join("e.fits").exists());
    }

    #[test]
    fn test_batch_skips_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fits"), b"good").unwrap();
        std::fs::write(dir.path().join("b.fits"), b"good").unwrap();

        let (pipeline, _) = pipeline(
            ContainerFormat::Fits,
            ContainerFormat::Exr,
            ImageContainer::default(),
            ConversionConfig::default(),
        );

        let entries = vec![
            Ok(dir.path().join("b.fits")),
            Err(std::io::Error::other("entry vanished during listing")),
            Ok(dir.path().join("a.fits")),
        ];
        let targets = pipeline.collect_targets(dir.path(), entries);

        assert_eq!(
            targets,
            vec![
                (dir.path().join("a.fits"), dir.path().join("a.exr")),
                (dir.path().join("b.fits"), dir.path().join("b.exr")),
            ]
        );
    }

    #[test]
    fn test_batch_on_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, _) = pipeline(
            ContainerFormat::Exr,
            ContainerFormat::Fits,
            ImageContainer::default(),
            ConversionConfig::default(),
        );

        let err = pipeline.convert_directory(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConversionError::SourceUnreadable(_)));
    }
}

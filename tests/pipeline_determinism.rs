use row_parallel_imaging::codec::{self, ImageFormat};
use row_parallel_imaging::fixtures::{self, ImageSize};
use row_parallel_imaging::{ImageProcessor, PipelineKind, PixelTransform, Rgb};

#[test]
fn both_pipelines_write_identical_files_for_one_and_eight_threads() {
    let dir = tempfile::tempdir().unwrap();
    let size = ImageSize::new(97, 61);
    let input = fixtures::fixture_path(dir.path(), size);
    codec::save(&fixtures::generate_fixture(size).unwrap(), &input, ImageFormat::Png).unwrap();

    for kind in PipelineKind::ALL {
        let processor = ImageProcessor::new(kind.build(50, 30, Rgb::new(187, 38, 73)));
        let single = dir.path().join(format!("{kind}_t1.png"));
        let eight = dir.path().join(format!("{kind}_t8.png"));

        processor.process_image(&input, &single, 1).unwrap();
        processor.process_image(&input, &eight, 8).unwrap();

        let single_bytes = std::fs::read(&single).unwrap();
        let eight_bytes = std::fs::read(&eight).unwrap();
        assert_eq!(single_bytes, eight_bytes, "{kind} output depends on thread count");
    }
}

#[test]
fn shift_blur_then_invert_contrast_on_same_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let size = ImageSize::new(40, 33);
    let input = fixtures::fixture_path(dir.path(), size);
    codec::save(&fixtures::generate_fixture(size).unwrap(), &input, ImageFormat::Png).unwrap();
    let source = codec::load(&input).unwrap();

    let shift_blur = PipelineKind::ShiftBlur.build(3, -2, Rgb::new(255, 0, 0));
    let invert_contrast = PipelineKind::InvertContrast.build(0, 0, Rgb::BLACK);

    for threads in [2, 3, 8, 64] {
        assert_eq!(shift_blur.apply(&source, threads), shift_blur.apply(&source, 1));
        assert_eq!(invert_contrast.apply(&source, threads), invert_contrast.apply(&source, 1));
    }
}

mod common;

use common::synthetic_image::{add_gaussian_noise, transpose_u8, RuledGrid};
use tilegrid::diagnostics::{PipelineTrace, TraceSink};
use tilegrid::image::ImageU8;
use tilegrid::period::PeriodEstimate;
use tilegrid::{detect_grid, DetectError, GridDetector, UNDETECTED_TILE, UNDETERMINED_OFFSET};

#[test]
fn moderate_noise_keeps_exact_recovery() {
    let _ = env_logger::builder().is_test(true).try_init();
    for seed in [1u64, 2, 3] {
        let mut pixels = RuledGrid::square(512, 512, 45, 10).render();
        add_gaussian_noise(&mut pixels, 40.0, seed);
        let result = detect_grid(&ImageU8::gray(512, 512, &pixels)).unwrap();
        assert_eq!(result.into_tuple(), (10, 45, 10, 45), "seed {seed}");
    }
}

#[test]
fn saturating_noise_reports_sentinels() {
    let _ = env_logger::builder().is_test(true).try_init();
    for seed in [11u64, 12] {
        let mut pixels = RuledGrid::square(512, 512, 45, 10).render();
        add_gaussian_noise(&mut pixels, 1000.0, seed);
        let result = detect_grid(&ImageU8::gray(512, 512, &pixels)).unwrap();
        assert_eq!(
            result.into_tuple(),
            (UNDETERMINED_OFFSET, UNDETECTED_TILE, UNDETERMINED_OFFSET, UNDETECTED_TILE),
            "seed {seed}"
        );
    }
}

#[test]
fn uniform_image_is_not_an_error() {
    for value in [0u8, 128, 255] {
        let pixels = vec![value; 320 * 240];
        let report = GridDetector::default()
            .process_with_diagnostics(&ImageU8::gray(320, 240, &pixels))
            .unwrap();
        assert_eq!(report.grid.into_tuple(), (-1, 0, -1, 0));
        let gradient = report.trace.gradient.as_ref().unwrap();
        assert!(gradient.data.iter().all(|&v| v == 0.0));
        assert!(report.trace.x.period.as_ref().unwrap().peaks.is_empty());
    }
}

#[test]
fn transposed_image_swaps_axes() {
    let grid = RuledGrid::square(640, 480, 40, 5)
        .with_tiles(40, 30)
        .with_offsets(5, 7);
    let pixels = grid.render();
    let transposed = transpose_u8(&pixels, 640, 480);

    let a = detect_grid(&ImageU8::gray(640, 480, &pixels)).unwrap();
    let b = detect_grid(&ImageU8::gray(480, 640, &transposed)).unwrap();
    assert_eq!((a.tile_x, a.offset_x), (b.tile_y, b.offset_y));
    assert_eq!((a.tile_y, a.offset_y), (b.tile_x, b.offset_x));
    assert_eq!((b.width, b.height), (480, 640));
}

#[test]
fn repeated_runs_are_identical() {
    let pixels = RuledGrid::square(400, 300, 25, 12).render();
    let image = ImageU8::gray(400, 300, &pixels);
    let detector = GridDetector::default();
    let first = detector.process_with_diagnostics(&image).unwrap();
    let second = detector.process_with_diagnostics(&image).unwrap();
    assert_eq!(first.grid, second.grid);
    assert_eq!(first.trace.input, second.trace.input);
    assert_eq!(first.trace.x.spectrum, second.trace.x.spectrum);
    assert_eq!(first.trace.y.period, second.trace.y.period);
    assert_eq!(first.trace.x.offset, second.trace.x.offset);
    assert_eq!(
        first.trace.gradient.as_ref().map(|g| &g.data),
        second.trace.gradient.as_ref().map(|g| &g.data)
    );
}

#[test]
fn traces_do_not_change_results() {
    #[derive(Default)]
    struct PeriodsOnly(Vec<PeriodEstimate>);

    impl TraceSink for PeriodsOnly {
        fn period(&mut self, estimate: &PeriodEstimate) {
            self.0.push(estimate.clone());
        }
    }

    let pixels = RuledGrid::square(512, 512, 45, 10).render();
    let image = ImageU8::gray(512, 512, &pixels);
    let detector = GridDetector::default();

    let plain = detector.detect(&image).unwrap();
    let mut periods = PeriodsOnly::default();
    let custom = detector.detect_traced(&image, &mut periods).unwrap();
    let mut trace = PipelineTrace::default();
    let traced = detector.detect_traced(&image, &mut trace).unwrap();

    assert_eq!(plain, custom);
    assert_eq!(plain, traced);
    assert_eq!(periods.0.len(), 2);
    assert_eq!(periods.0[0].tile, 45);
    assert!(periods.0[0].dominant_cluster().unwrap().len() >= 3);
    assert_eq!(trace.input.padded_size, 4096);
    assert!(trace.timings.total_ms >= 0.0);
}

#[test]
fn invalid_buffers_are_rejected() {
    let detector = GridDetector::default();
    let empty: [u8; 0] = [];
    assert_eq!(
        detector.detect(&ImageU8::gray(0, 0, &empty)),
        Err(DetectError::EmptyImage {
            width: 0,
            height: 0
        })
    );

    let line = [1u8, 2, 3, 4];
    assert_eq!(
        detector.detect(&ImageU8::gray(4, 1, &line)),
        Err(DetectError::TooSmall {
            width: 4,
            height: 1
        })
    );

    let short = vec![0u8; 10 * 10 * 3 - 1];
    assert_eq!(
        detector.detect(&ImageU8::rgb(10, 10, &short)),
        Err(DetectError::BufferTooShort {
            expected: 300,
            actual: 299
        })
    );

    assert_eq!(
        ImageU8::from_raw(10, 10, 2, &short).unwrap_err(),
        DetectError::UnsupportedChannels(2)
    );
}

#[test]
fn tiny_images_do_not_panic() {
    let pixels = [10u8, 200, 10, 200];
    let result = detect_grid(&ImageU8::gray(2, 2, &pixels)).unwrap();
    assert_eq!(result.tile_x, UNDETECTED_TILE);
    assert_eq!(result.tile_y, UNDETECTED_TILE);
}

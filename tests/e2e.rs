mod common;

use common::synthetic_image::{gray_to_rgb, with_stride, Checkerboard, RuledGrid};
use tilegrid::image::{ImageU8, PixelFormat};
use tilegrid::offset::{OffsetSource, Polarity};
use tilegrid::period::PeriodOptions;
use tilegrid::spectrum::SpectrumOptions;
use tilegrid::{detect_grid, GridDetector, GridParams, GridResult};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn detect(grid: &RuledGrid) -> GridResult {
    let pixels = grid.render();
    let image = ImageU8::gray(grid.width, grid.height, &pixels);
    detect_grid(&image).expect("valid image")
}

fn assert_offsets_in_range(result: &GridResult) {
    for (tile, offset) in [
        (result.tile_x, result.offset_x),
        (result.tile_y, result.offset_y),
    ] {
        if tile > 0 && offset >= 0 {
            assert!((offset as u32) < tile, "offset {offset} outside [0, {tile})");
        }
    }
}

#[test]
fn square_grid_with_45px_tiles() {
    init_logger();
    let result = detect(&RuledGrid::square(512, 512, 45, 10));
    assert_eq!(result.into_tuple(), (10, 45, 10, 45));
    assert_eq!((result.width, result.height), (512, 512));
}

#[test]
fn rectangular_images_with_distinct_axes() {
    init_logger();
    let cases = [
        (640, 480, (40, 30), (5, 7)),
        (480, 360, (32, 24), (7, 20)),
        (400, 300, (25, 25), (12, 4)),
    ];
    for (w, h, (tx, ty), (ox, oy)) in cases {
        let grid = RuledGrid::square(w, h, tx, 0)
            .with_tiles(tx, ty)
            .with_offsets(ox, oy);
        let result = detect(&grid);
        assert_eq!(
            (result.tile_x, result.tile_y, result.offset_x, result.offset_y),
            (tx as u32, ty as u32, ox as i32, oy as i32),
            "{w}x{h} tiles {tx}/{ty} offsets {ox}/{oy}"
        );
        assert_offsets_in_range(&result);
    }
}

#[test]
fn small_tiles_and_offsets() {
    init_logger();
    for (size, tile, offset) in [(512, 32, 0), (512, 20, 3), (512, 64, 17), (300, 16, 5)] {
        let h = if size == 300 { 200 } else { size };
        let result = detect(&RuledGrid::square(size, h, tile, offset));
        assert_eq!(
            result.into_tuple(),
            (offset as i32, tile as u32, offset as i32, tile as u32),
            "{size}x{h} tile {tile} offset {offset}"
        );
    }
}

#[test]
fn bright_lines_on_dark_fill() {
    init_logger();
    let grid = RuledGrid::square(512, 512, 45, 10).with_colors(60, 230);
    let pixels = grid.render();
    let image = ImageU8::gray(512, 512, &pixels);
    let report = GridDetector::default()
        .process_with_diagnostics(&image)
        .unwrap();
    assert_eq!(report.grid.into_tuple(), (10, 45, 10, 45));
    let offset_x = report.trace.x.offset.as_ref().unwrap();
    assert_eq!(offset_x.polarity, Some(Polarity::BrightLines));
}

#[test]
fn dark_lines_report_dark_polarity() {
    let pixels = RuledGrid::square(512, 512, 45, 10).render();
    let report = GridDetector::default()
        .process_with_diagnostics(&ImageU8::gray(512, 512, &pixels))
        .unwrap();
    for axis in [&report.trace.x, &report.trace.y] {
        let offset = axis.offset.as_ref().unwrap();
        assert_eq!(offset.polarity, Some(Polarity::DarkLines));
        assert_eq!(offset.source, Some(OffsetSource::Intensity));
    }
}

#[test]
fn checkerboard_with_45px_squares() {
    init_logger();
    let board = Checkerboard::square(512, 512, 45, 10);
    let pixels = board.render();
    let report = GridDetector::default()
        .process_with_diagnostics(&ImageU8::gray(512, 512, &pixels))
        .unwrap();
    assert_eq!(report.grid.into_tuple(), (10, 45, 10, 45));
    for axis in [&report.trace.x, &report.trace.y] {
        let offset = axis.offset.as_ref().unwrap();
        assert_eq!(offset.source, Some(OffsetSource::Edges));
        assert!(offset.polarity.is_none());
    }
}

#[test]
fn rectangular_checkerboard() {
    init_logger();
    let board = Checkerboard::square(640, 480, 40, 5)
        .with_tiles(40, 30)
        .with_offsets(5, 7);
    let pixels = board.render();
    let result = detect_grid(&ImageU8::gray(640, 480, &pixels)).unwrap();
    assert_eq!(result.into_tuple(), (5, 40, 7, 30));
}

#[test]
fn large_tiles() {
    init_logger();
    for (size, tile, offset) in [(512, 100, 20), (512, 128, 0), (1024, 200, 33)] {
        let result = detect(&RuledGrid::square(size, size, tile, offset));
        assert_eq!(
            result.into_tuple(),
            (offset as i32, tile as u32, offset as i32, tile as u32),
            "{size}px tile {tile} offset {offset}"
        );
    }
}

#[test]
fn smallest_tiles() {
    init_logger();
    let result = detect(&RuledGrid::square(512, 512, 10, 3));
    assert_eq!(result.into_tuple(), (3, 10, 3, 10));

    // Only three harmonics below Nyquist: two agreeing gaps.
    let grid = RuledGrid::square(256, 256, 8, 3);
    assert_eq!(detect(&grid).into_tuple(), (-1, 0, -1, 0));

    let pixels = grid.render();
    let relaxed = GridDetector::new(GridParams {
        period: PeriodOptions {
            min_cluster_size: 2,
            ..Default::default()
        },
        ..Default::default()
    });
    let result = relaxed.detect(&ImageU8::gray(256, 256, &pixels)).unwrap();
    assert_eq!(result.into_tuple(), (3, 8, 3, 8));
}

#[test]
fn vertical_lines_only() {
    init_logger();
    let mut grid = RuledGrid::square(400, 256, 32, 9);
    grid.tile_y = None;
    let result = detect(&grid);
    assert_eq!(result.into_tuple(), (9, 32, -1, 0));
    assert!(result.horizontal_lines().is_empty());
    assert_eq!(result.vertical_lines()[..3], [9, 41, 73]);
}

#[test]
fn rgb_and_strided_inputs_match_gray() {
    init_logger();
    let grid = RuledGrid::square(480, 360, 32, 7)
        .with_tiles(32, 24)
        .with_offsets(7, 20);
    let gray = grid.render();
    let expected = detect_grid(&ImageU8::gray(480, 360, &gray)).unwrap();

    let rgb = gray_to_rgb(&gray);
    let from_rgb = detect_grid(&ImageU8::rgb(480, 360, &rgb)).unwrap();
    assert_eq!(from_rgb, expected);

    let raw = ImageU8::from_raw(480, 360, 3, &rgb).unwrap();
    assert_eq!(raw.format, PixelFormat::Rgb);
    assert_eq!(detect_grid(&raw).unwrap(), expected);

    let padded = with_stride(&gray, 480, 360, 512, 255);
    let strided = ImageU8 {
        w: 480,
        h: 360,
        stride: 512,
        format: PixelFormat::Gray,
        data: &padded,
    };
    assert_eq!(detect_grid(&strided).unwrap(), expected);
}

#[test]
fn hann_window_keeps_the_tile_size() {
    init_logger();
    let pixels = RuledGrid::square(512, 512, 45, 10).render();
    let detector = GridDetector::new(GridParams {
        spectrum: SpectrumOptions {
            windowing: true,
            ..Default::default()
        },
        ..Default::default()
    });
    let result = detector.detect(&ImageU8::gray(512, 512, &pixels)).unwrap();
    assert_eq!(result.into_tuple(), (10, 45, 10, 45));
}

#[test]
fn grid_lines_cover_the_image() {
    let result = detect(&RuledGrid::square(640, 480, 40, 5).with_tiles(40, 30).with_offsets(5, 7));
    assert!(result.is_complete());
    let xs = result.vertical_lines();
    let ys = result.horizontal_lines();
    assert_eq!(xs.len(), 16);
    assert_eq!(ys.len(), 16);
    assert_eq!((xs[0], xs[15]), (5, 605));
    assert_eq!((ys[0], ys[15]), (7, 457));
}

use std::env;
use std::path::Path;
use tilegrid::config::grid::{self, OutputFormat};
use tilegrid::diagnostics::{AxisTrace, DetectionReport};
use tilegrid::image::io::{load_image, save_grayscale_f32, write_json_file};
use tilegrid::types::Axis;
use tilegrid::GridDetector;

fn main() {
    let _ = env_logger::try_init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "grid_demo".to_string());
    let config = grid::parse_cli(&program)?;

    let owned = load_image(&config.input_path)?;
    let image = owned.as_view();

    let detector = GridDetector::new(config.grid_params);
    let report = detector
        .process_with_diagnostics(&image)
        .map_err(|e| format!("Detection failed for {}: {e}", config.input_path.display()))?;

    if config.output.format.includes_text() {
        print_text_summary(&report);
    }

    if config.output.format.includes_json() {
        if let Some(path) = &config.output.json_out {
            write_json_file(path, &report)?;
            if !config.output.format.includes_text() {
                println!("JSON report written to {}", path.display());
            } else {
                println!("\nJSON report written to {}", path.display());
            }
        } else {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| format!("Failed to serialize JSON: {e}"))?;
            if config.output.format == OutputFormat::Both {
                println!("\nJSON report:\n{json}");
            } else {
                println!("{json}");
            }
        }
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &report)?;
        if config.output.format.includes_text() {
            println!("Debug artifacts written to {}", dir.display());
        } else {
            eprintln!("Debug artifacts written to {}", dir.display());
        }
    }

    Ok(())
}

fn print_text_summary(report: &DetectionReport) {
    let grid = &report.grid;
    let trace = &report.trace;
    println!("Detection summary");
    println!(
        "  input: {}x{} channels={} padded={}",
        trace.input.width, trace.input.height, trace.input.channels, trace.input.padded_size
    );
    println!("  tile: {} x {}", format_tile(grid.tile_x), format_tile(grid.tile_y));
    println!(
        "  offset: ({}, {})",
        format_offset(grid.offset_x),
        format_offset(grid.offset_y)
    );

    for axis in [Axis::X, Axis::Y] {
        print_axis(axis, trace.axis(axis));
    }

    if grid.is_complete() {
        println!("\nGrid lines");
        println!("  vertical (x): {}", join_positions(&grid.vertical_lines()));
        println!("  horizontal (y): {}", join_positions(&grid.horizontal_lines()));
    }

    print!("\nTimings (ms):");
    for stage in &trace.timings.stages {
        print!(" {}={:.3}", stage.label, stage.elapsed_ms);
    }
    println!(" total={:.3}", trace.timings.total_ms);
}

fn print_axis(axis: Axis, trace: &AxisTrace) {
    println!("\nAxis {}", axis.label());
    match &trace.period {
        Some(period) => {
            let freqs: Vec<String> = period
                .peaks
                .iter()
                .take(8)
                .map(|p| format!("{:.4}", p.frequency))
                .collect();
            println!(
                "  peaks={} [{}{}]",
                period.peaks.len(),
                freqs.join(", "),
                if period.peaks.len() > freqs.len() { ", ..." } else { "" }
            );
            println!(
                "  candidates={} clusters={} max_filter_window={}",
                period.candidates.len(),
                period.clusters.len(),
                period.max_filter_window
            );
            match period.dominant_cluster() {
                Some(c) => println!("  dominant cluster: size={} mean={:.3}", c.len(), c.mean),
                None => println!("  dominant cluster: -"),
            }
        }
        None => println!("  period: not evaluated"),
    }
    match &trace.offset {
        Some(offset) => println!(
            "  offset={} source={} polarity={} prominence={}",
            format_offset(offset.offset),
            offset
                .source
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| "-".to_string()),
            offset
                .polarity
                .map(|p| format!("{p:?}"))
                .unwrap_or_else(|| "-".to_string()),
            format_opt(offset.prominence)
        ),
        None => println!("  offset: not evaluated"),
    }
}

fn format_tile(tile: u32) -> String {
    if tile == 0 {
        "-".to_string()
    } else {
        tile.to_string()
    }
}

fn format_offset(offset: i32) -> String {
    if offset < 0 {
        "-".to_string()
    } else {
        offset.to_string()
    }
}

fn format_opt(val: Option<f64>) -> String {
    val.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn join_positions(positions: &[usize]) -> String {
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn save_debug_artifacts(dir: &Path, report: &DetectionReport) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create debug dir {}: {e}", dir.display()))?;

    write_json_file(&dir.join("report.json"), report)?;

    if let Some(field) = &report.trace.gradient {
        save_grayscale_f32(field, &dir.join("gradient.png"))?;
    }

    for axis in [Axis::X, Axis::Y] {
        let trace = report.trace.axis(axis);
        let label = axis.label();
        if let Some(spectrum) = &trace.spectrum {
            write_json_file(&dir.join(format!("spectrum_{label}.json")), spectrum)?;
        }
        if let Some(period) = &trace.period {
            write_json_file(&dir.join(format!("period_{label}.json")), period)?;
        }
        if let Some(offset) = &trace.offset {
            write_json_file(&dir.join(format!("offset_{label}.json")), offset)?;
        }
    }
    Ok(())
}

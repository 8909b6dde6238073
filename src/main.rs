// This binary is an example runner for the `cube_vision` library: it scans a
// single face snapshot with a centered sampling lattice and prints the report.
// The library entry point is `src/lib.rs`.

use std::env;

use cube_vision::core_modules::utils::image_helper::image_helper;
use cube_vision::pipeline::{ScanConfig, ScanPipeline};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: cube_vision <face_snapshot.png> [preview_output.png]");
        return Ok(());
    }

    let (width, height, frame) = image_helper::load_rgba(&args[1])?;
    let config = ScanConfig::centered(width, height);
    let mut pipeline = ScanPipeline::new(config);

    let report = pipeline.scan_face(&frame);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(preview_path) = args.get(2) {
        image_helper::save_face_preview(preview_path, &report.face_scan().face, 40)?;
        println!("Preview saved to {preview_path}");
    }

    Ok(())
}

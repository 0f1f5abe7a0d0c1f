// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders every plate to an SVG file.
//!
//! Usage: `plates_demo [OUT_DIR]` (defaults to `plates_out`). Set `RUST_LOG=debug` to see the
//! join and lifecycle logs.

mod datasets;
mod plates;
mod svg;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use plates_charts::{PlateError, PlateRunner, RenderOutcome};
use plates_core::{DatasetProvider, PointerEvent};
use plates_text::HeuristicTextMeasurer;

use crate::plates::DemoPlate;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("plates_out"), PathBuf::from);
    fs::create_dir_all(&out_dir)?;

    let provider = datasets::provider();
    for plate in plates::all() {
        let name = plate.name;
        let Some(frames) = render_plate(plate, &provider)? else {
            log::warn!("{name}: nothing to draw");
            continue;
        };
        write(&out_dir, name, &frames.rest)?;
        write(&out_dir, &format!("{name}-hover"), &frames.hover)?;
    }
    Ok(())
}

/// The plate at rest, and with its first item hovered.
#[derive(Debug)]
struct Frames {
    rest: String,
    hover: String,
}

fn render_plate(
    plate: DemoPlate,
    provider: &dyn DatasetProvider,
) -> Result<Option<Frames>, PlateError> {
    let mut runner = PlateRunner::new(plate.spec, HeuristicTextMeasurer);
    runner.resize(plate.viewport)?;
    let token = runner.mount();
    let dataset = runner.spec().dataset.clone();
    runner.deliver(token, provider.load(&dataset))?;

    let Some(RenderOutcome::Rendered(summary)) = runner.last_outcome() else {
        return Ok(None);
    };
    let view = summary.frame.view;
    if summary.skipped > 0 {
        log::info!("{}: skipped {} malformed records", plate.name, summary.skipped);
    }
    let rest = svg::to_svg_string(runner.scene(), view);

    runner.pointer(PointerEvent::Enter(0))?;
    let hover = svg::to_svg_string(runner.scene(), view);
    runner.unmount();
    Ok(Some(Frames { rest, hover }))
}

fn write(out_dir: &Path, name: &str, svg: &str) -> std::io::Result<()> {
    let path = out_dir.join(format!("{name}.svg"));
    fs::write(&path, svg)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plate_renders_from_the_bundled_datasets() {
        let provider = datasets::provider();
        for plate in plates::all() {
            let name = plate.name;
            let frames = render_plate(plate, &provider)
                .unwrap()
                .unwrap_or_else(|| panic!("{name} rendered nothing"));
            assert!(frames.rest.contains("<path") || frames.rest.contains("<rect"), "{name}");
            assert!(frames.rest.contains(r#"class="title""#), "{name}");
            assert_ne!(frames.rest, frames.hover, "{name}: hover changed nothing");
        }
    }
}

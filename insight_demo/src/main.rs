// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the esports insight dashboard to SVG files.
//!
//! Usage: `insight_demo [config.toml] [output-dir]`
//!
//! Without a configuration file the data is read from `./data`. Every chart is written
//! once after the first load and once more after the viewership page is narrowed to three
//! games with a bubble hovered, so the second set shows the settled transition and a tooltip.

mod svg;

use std::error::Error;
use std::path::{Path, PathBuf};

use insight_charts::HitShape;
use insight_dashboard::{
    ChartSnapshot, Dashboard, DashboardConfig, FileStore, MemoryStore, Section, SessionStore,
};
use log::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => DashboardConfig::load(&path)?,
        None => DashboardConfig::default(),
    };
    let out_dir = args
        .next()
        .map_or_else(|| PathBuf::from("target/insight_demo"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    match config.session_file.clone() {
        Some(path) => runtime.block_on(run(&config, FileStore::new(path), &out_dir)),
        None => runtime.block_on(run(&config, MemoryStore::new(), &out_dir)),
    }
}

async fn run<S: SessionStore>(
    config: &DashboardConfig,
    store: S,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut dashboard = Dashboard::new(config, store);
    if !dashboard.reload(config).await {
        warn!("initial load was superseded");
    }
    dashboard.select(Section::Overview)?;

    dashboard.render_active(0.0)?;
    write_all(&dashboard.snapshots(1_000.0), out_dir, "initial")?;

    let viewership = dashboard.viewership_mut();
    viewership.set_top_n(3);
    viewership.render(1_000.0)?;
    viewership.engagement_mut().settle(2_000.0);
    let bubble = viewership
        .engagement()
        .hit_regions()
        .iter()
        .find_map(|region| match region.shape {
            HitShape::Circle { center, .. } => Some(center),
            _ => None,
        });
    if let Some(center) = bubble {
        viewership.engagement_mut().pointer_move(center);
        info!("hovering {:?}", viewership.engagement().hovered());
    }
    dashboard.select(Section::Viewership)?;
    write_all(&dashboard.snapshots(2_000.0), out_dir, "top3")?;

    Ok(())
}

fn write_all(
    snapshots: &[ChartSnapshot],
    out_dir: &Path,
    stage: &str,
) -> Result<(), std::io::Error> {
    for snapshot in snapshots {
        let path = out_dir.join(format!("{}_{stage}.svg", snapshot.name));
        std::fs::write(&path, svg::snapshot_to_svg(snapshot))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

//! `sketch run`

use anyhow::{Context, Result};
use sketch_animation::Easing;
use sketch_runtime::{
    Callbacks, ConfigOverrides, HeadlessRunConfig, HeadlessRuntime, SketchConfig,
};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, info};

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub frames: u32,
    pub tick_ms: f64,
    pub width: f32,
    pub height: f32,
    pub dpr: Option<f32>,
    pub timer: bool,
}

/// Counters shared with the sketch's callbacks
#[derive(Default)]
struct Stats {
    updates: Cell<u64>,
    draws: Cell<u64>,
    resizes: Cell<u64>,
    progress: Cell<f64>,
}

/// Optional easing demo read from the config's extra options:
/// `easing = "ease-out"` and `duration = 1200`.
fn easing_from(config: &SketchConfig) -> Result<Option<(Easing, f64)>> {
    let Some(name) = config.extra("easing").and_then(|v| v.as_str()) else {
        return Ok(None);
    };
    let easing: Easing = name.parse()?;
    let duration = config
        .extra("duration")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(1000.0);
    Ok(Some((easing, duration.max(1.0))))
}

pub fn cmd_run(args: RunArgs) -> Result<()> {
    let overrides = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ConfigOverrides::from_toml_str(&source)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => ConfigOverrides::new(),
    };

    let resolved = SketchConfig::default().merge(overrides.clone())?;
    let easing = easing_from(&resolved)?;
    debug!(?resolved, "resolved config");

    let mut runtime = HeadlessRuntime::new(HeadlessRunConfig {
        width: args.width,
        height: args.height,
        device_pixel_ratio: args.dpr,
        frames: args.frames,
        tick_ms: args.tick_ms,
        timer_frames: args.timer,
    })?;

    let stats = Rc::new(Stats::default());
    let (on_update, on_draw, on_resize) = (stats.clone(), stats.clone(), stats.clone());
    let callbacks = Callbacks::new()
        .on_update(move |sketch| {
            on_update.updates.set(on_update.updates.get() + 1);
            if let Some((easing, duration)) = easing {
                on_update
                    .progress
                    .set(easing.apply(sketch.millis() % duration / duration));
            }
        })
        .on_draw(move |_| on_draw.draws.set(on_draw.draws.get() + 1))
        .on_resize(move |_| on_resize.resizes.set(on_resize.resizes.get() + 1));

    let id = runtime.create(overrides, callbacks)?;
    let summary = runtime.run()?;

    let sketch = runtime
        .registry()
        .get(id)
        .context("context disappeared during the run")?;
    info!(
        platform = "headless",
        native_frames = runtime.registry().has_native_frames(),
        "run complete"
    );

    println!("surface:   {} {}x{}", sketch.kind(), sketch.width(), sketch.height());
    println!("pumps:     {}", summary.pumps);
    println!("ticks:     {}", summary.ticks);
    println!("updates:   {}", stats.updates.get());
    println!("draws:     {}", stats.draws.get());
    println!("resizes:   {}", stats.resizes.get());
    println!("millis:    {}", sketch.millis());
    if let Some((easing, _)) = easing {
        println!("progress:  {:.4} ({easing})", stats.progress.get());
    }

    Ok(())
}

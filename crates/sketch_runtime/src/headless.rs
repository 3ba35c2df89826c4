//! Deterministic headless execution

use crate::config::ConfigOverrides;
use crate::context::{Callbacks, ContextId};
use crate::registry::ContextRegistry;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sketch_platform::headless::{HeadlessPlatform, ManualClock};
use tracing::info;

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessRunConfig {
    /// Viewport inner width
    pub width: f32,
    /// Viewport inner height
    pub height: f32,
    /// Device pixel ratio reported by the viewport
    pub device_pixel_ratio: Option<f32>,
    /// Number of pumps to execute.
    pub frames: u32,
    /// Logical milliseconds between pumps.
    pub tick_ms: f64,
    /// Drive frames through the timer emulation instead of the native source
    pub timer_frames: bool,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: None,
            frames: 60,
            tick_ms: 16.0,
            timer_frames: false,
        }
    }
}

impl HeadlessRunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.height <= 0.0 {
            bail!("headless viewport must be non-empty");
        }
        if self.frames == 0 {
            bail!("headless frames must be > 0");
        }
        if !(self.tick_ms.is_finite() && self.tick_ms > 0.0) {
            bail!("headless tick_ms must be > 0");
        }
        Ok(())
    }
}

/// What a headless run did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub pumps: u32,
    pub ticks: usize,
    pub elapsed_ms: f64,
    pub contexts: usize,
}

/// Registry on a headless platform with a clock it advances itself
pub struct HeadlessRuntime {
    registry: ContextRegistry<HeadlessPlatform>,
    clock: ManualClock,
    config: HeadlessRunConfig,
}

impl HeadlessRuntime {
    pub fn new(config: HeadlessRunConfig) -> Result<Self> {
        config.validate()?;

        let platform = if config.timer_frames {
            HeadlessPlatform::without_native_frames()
        } else {
            HeadlessPlatform::new()
        };
        let platform = platform.with_viewport(config.width, config.height);
        platform
            .headless_viewport()
            .set_device_pixel_ratio(config.device_pixel_ratio);
        let clock = platform.manual_clock().clone();

        Ok(Self {
            registry: ContextRegistry::new(platform),
            clock,
            config,
        })
    }

    pub fn config(&self) -> &HeadlessRunConfig {
        &self.config
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn registry(&self) -> &ContextRegistry<HeadlessPlatform> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ContextRegistry<HeadlessPlatform> {
        &mut self.registry
    }

    pub fn create(&mut self, overrides: ConfigOverrides, callbacks: Callbacks) -> Result<ContextId> {
        self.registry
            .create(overrides, callbacks)
            .context("failed to create headless context")
    }

    /// Advance the clock one tick and pump. Returns the context ticks run.
    pub fn step(&mut self) -> usize {
        self.clock.advance(self.config.tick_ms);
        self.registry.pump()
    }

    /// Run the configured number of pumps.
    pub fn run(&mut self) -> Result<RunSummary> {
        if self.registry.is_empty() {
            bail!("nothing to run: no contexts were created");
        }

        let start = self.clock.now();
        let mut summary = RunSummary::default();
        for _ in 0..self.config.frames {
            summary.ticks += self.step();
            summary.pumps += 1;
        }
        summary.elapsed_ms = self.clock.now() - start;
        summary.contexts = self.registry.len();

        info!(
            pumps = summary.pumps,
            ticks = summary.ticks,
            elapsed_ms = summary.elapsed_ms,
            contexts = summary.contexts,
            "headless run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_config() {
        for config in [
            HeadlessRunConfig {
                frames: 0,
                ..Default::default()
            },
            HeadlessRunConfig {
                tick_ms: 0.0,
                ..Default::default()
            },
            HeadlessRunConfig {
                width: 0.0,
                ..Default::default()
            },
        ] {
            assert!(HeadlessRuntime::new(config).is_err());
        }
    }

    #[test]
    fn test_run_requires_a_context() {
        let mut runtime = HeadlessRuntime::new(HeadlessRunConfig::default()).unwrap();
        assert!(runtime.run().is_err());
    }

    #[test]
    fn test_run_summary() {
        let mut runtime = HeadlessRuntime::new(HeadlessRunConfig {
            frames: 10,
            ..Default::default()
        })
        .unwrap();
        runtime.create(ConfigOverrides::new(), Callbacks::new()).unwrap();
        let summary = runtime.run().unwrap();
        assert_eq!(summary.pumps, 10);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.elapsed_ms, 160.0);
        assert_eq!(summary.contexts, 1);
    }
}

//! Context configuration
//!
//! A [`SketchConfig`] is built once per context by merging the caller's
//! [`ConfigOverrides`] over the defaults and is never mutated afterwards.
//! Options the runtime does not know are carried verbatim in `extra` so
//! collaborators can read their own settings back.
//!
//! ```toml
//! fullscreen = false
//! width = 640
//! height = 360
//! retina = true
//! type = "canvas"
//! interval = 2
//!
//! # not a runtime option, kept in `extra`
//! particles = 120
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use sketch_platform::{ContainerId, SurfaceKind};
use std::collections::BTreeMap;

/// Resolved options of one context
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Track the viewport's inner size
    pub fullscreen: bool,
    /// Start running as soon as the context is created
    pub autostart: bool,
    /// Clear canvas surfaces between update and draw
    pub autoclear: bool,
    /// Stop on window blur, restart on focus
    pub autopause: bool,
    /// Render every `interval`-th frame
    pub interval: u32,
    /// Scale canvas backing stores by the device pixel ratio
    pub retina: bool,
    #[serde(rename = "type")]
    pub kind: SurfaceKind,
    /// Logical size when not fullscreen; 0 keeps the surface's own size
    pub width: f32,
    pub height: f32,
    /// Element the surface attaches to; the page body when unset
    pub container: Option<ContainerId>,
    /// Unrecognized options, passed through untouched
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            autostart: true,
            autoclear: true,
            autopause: true,
            interval: 1,
            retina: false,
            kind: SurfaceKind::Canvas,
            width: 0.0,
            height: 0.0,
            container: None,
            extra: BTreeMap::new(),
        }
    }
}

impl SketchConfig {
    /// Apply `overrides` on top of this config and validate the result.
    pub fn merge(&self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut merged = self.clone();
        let ConfigOverrides {
            fullscreen,
            autostart,
            autoclear,
            autopause,
            interval,
            retina,
            kind,
            width,
            height,
            container,
            extra,
        } = overrides;

        if let Some(v) = fullscreen {
            merged.fullscreen = v;
        }
        if let Some(v) = autostart {
            merged.autostart = v;
        }
        if let Some(v) = autoclear {
            merged.autoclear = v;
        }
        if let Some(v) = autopause {
            merged.autopause = v;
        }
        if let Some(v) = interval {
            merged.interval = v;
        }
        if let Some(v) = retina {
            merged.retina = v;
        }
        if let Some(v) = kind {
            merged.kind = v;
        }
        if let Some(v) = width {
            merged.width = v;
        }
        if let Some(v) = height {
            merged.height = v;
        }
        if container.is_some() {
            merged.container = container;
        }
        merged.extra.extend(extra);

        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval < 1 {
            return Err(ConfigError::Invalid {
                option: "interval",
                reason: format!("must be at least 1, got {}", self.interval),
            });
        }
        for (option, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    option,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    /// An unrecognized option by name
    pub fn extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

/// Caller-supplied options; unset fields keep their defaults
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub fullscreen: Option<bool>,
    pub autostart: Option<bool>,
    pub autoclear: Option<bool>,
    pub autopause: Option<bool>,
    pub interval: Option<u32>,
    pub retina: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<SurfaceKind>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub container: Option<ContainerId>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `sketch.toml` document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn fullscreen(mut self, value: bool) -> Self {
        self.fullscreen = Some(value);
        self
    }

    pub fn autostart(mut self, value: bool) -> Self {
        self.autostart = Some(value);
        self
    }

    pub fn autoclear(mut self, value: bool) -> Self {
        self.autoclear = Some(value);
        self
    }

    pub fn autopause(mut self, value: bool) -> Self {
        self.autopause = Some(value);
        self
    }

    pub fn interval(mut self, value: u32) -> Self {
        self.interval = Some(value);
        self
    }

    pub fn retina(mut self, value: bool) -> Self {
        self.retina = Some(value);
        self
    }

    pub fn kind(mut self, value: SurfaceKind) -> Self {
        self.kind = Some(value);
        self
    }

    /// Fixed logical size; also turns fullscreen off
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.fullscreen = Some(false);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn container(mut self, value: ContainerId) -> Self {
        self.container = Some(value);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SketchConfig::default();
        assert!(config.fullscreen);
        assert!(config.autostart);
        assert!(config.autoclear);
        assert!(config.autopause);
        assert!(!config.retina);
        assert_eq!(config.interval, 1);
        assert_eq!(config.kind, SurfaceKind::Canvas);
        assert_eq!(config.container, None);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_merge_keeps_unset_defaults() {
        let config = SketchConfig::default()
            .merge(ConfigOverrides::new().autostart(false).interval(3))
            .unwrap();
        assert!(!config.autostart);
        assert_eq!(config.interval, 3);
        assert!(config.fullscreen);
        assert!(config.autoclear);
    }

    #[test]
    fn test_merge_does_not_touch_base() {
        let base = SketchConfig::default();
        let _ = base.merge(ConfigOverrides::new().retina(true)).unwrap();
        assert!(!base.retina);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = SketchConfig::default()
            .merge(ConfigOverrides::new().interval(0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { option: "interval", .. }));
    }

    #[test]
    fn test_negative_size_rejected() {
        let err = SketchConfig::default()
            .merge(ConfigOverrides::new().size(-1.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { option: "width", .. }));
    }

    #[test]
    fn test_toml_with_passthrough() {
        let overrides = ConfigOverrides::from_toml_str(
            r##"
            fullscreen = false
            width = 640
            height = 360
            type = "webgl"
            particles = 120
            palette = ["#fff", "#000"]
            "##,
        )
        .unwrap();

        assert_eq!(overrides.fullscreen, Some(false));
        assert_eq!(overrides.kind, Some(SurfaceKind::WebGl));
        assert_eq!(overrides.width, Some(640.0));

        let config = SketchConfig::default().merge(overrides).unwrap();
        assert_eq!(config.extra("particles"), Some(&serde_json::json!(120)));
        assert_eq!(
            config.extra("palette"),
            Some(&serde_json::json!(["#fff", "#000"]))
        );
        assert_eq!(config.extra("width"), None);
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ConfigOverrides::from_toml_str("interval = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}

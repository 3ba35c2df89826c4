//! Drawing surface abstraction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of drawing surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// 2D canvas; the only kind that is cleared and DPR-scaled
    #[default]
    Canvas,
    /// WebGL-style GPU context
    WebGl,
    /// Plain element; sizes are applied to its style
    Dom,
}

impl SurfaceKind {
    pub fn is_2d(self) -> bool {
        self == SurfaceKind::Canvas
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfaceKind::Canvas => "canvas",
            SurfaceKind::WebGl => "webgl",
            SurfaceKind::Dom => "dom",
        })
    }
}

/// Host identity of a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

/// Host identity of a surface's parent container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

/// Bounding rectangle relative to the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A drawing surface owned by one animation context
///
/// Implemented by each host backend. Sizes are in surface pixels: the backing
/// size is the pixel store, the display size is what the page lays out.
pub trait Surface {
    fn id(&self) -> SurfaceId;

    fn kind(&self) -> SurfaceKind;

    /// Current placement on the page
    fn bounding_rect(&self) -> Rect;

    fn backing_size(&self) -> (f32, f32);

    fn set_backing_size(&mut self, width: f32, height: f32);

    /// Layout size, set separately from the backing store for DPR scaling
    fn set_display_size(&mut self, width: f32, height: f32);

    /// Absolute drawing scale (not cumulative)
    fn set_scale(&mut self, ratio: f32);

    /// Clear the whole backing store
    fn clear(&mut self);

    fn attach(&mut self, container: ContainerId);

    fn detach(&mut self);

    fn container(&self) -> Option<ContainerId>;
}

//! Pan/zoom transform for the timeline's time axis

use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor
pub const MIN_SCALE: f64 = 1.0;

/// Largest allowed zoom factor
pub const MAX_SCALE: f64 = 32.0;

/// 1-D affine transform `x -> x * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        scale: 1.0,
        translate: 0.0,
    };

    /// Create a transform, clamping the scale into `[MIN_SCALE, MAX_SCALE]`
    pub fn new(scale: f64, translate: f64) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MIN_SCALE
        };
        let translate = if translate.is_finite() { translate } else { 0.0 };
        Self { scale, translate }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, x: f64) -> f64 {
        x * self.scale + self.translate
    }

    pub fn invert(&self, x: f64) -> f64 {
        (x - self.translate) / self.scale
    }

    /// Zoom by `factor` keeping the point under `anchor` fixed
    pub fn zoom_at(&self, factor: f64, anchor: f64) -> Self {
        let target = Self::new(self.scale * factor, 0.0).scale;
        let origin = self.invert(anchor);
        Self::new(target, anchor - origin * target)
    }

    pub fn pan(&self, dx: f64) -> Self {
        Self::new(self.scale, self.translate + dx)
    }

    /// Keep the zoomed content covering `[0, extent]`
    pub fn constrained(&self, extent: f64) -> Self {
        if extent <= 0.0 {
            return *self;
        }
        let min_translate = extent - extent * self.scale;
        Self::new(self.scale, self.translate.clamp(min_translate, 0.0))
    }
}

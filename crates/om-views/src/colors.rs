//! Color utilities for views

use egui::Color32;
use om_core::MedalType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    Viridis,
    Plasma,
}

/// Fill color for a medal band
pub fn medal_color(medal_type: MedalType) -> Color32 {
    match medal_type {
        MedalType::Gold => Color32::from_rgb(212, 175, 55),
        MedalType::Silver => Color32::from_rgb(168, 169, 173),
        MedalType::Bronze => Color32::from_rgb(176, 114, 64),
    }
}

/// Viridis color map
pub fn viridis_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);

    // Simplified viridis colormap
    if t < 0.25 {
        let s = t * 4.0;
        Color32::from_rgb(
            (68.0 * (1.0 - s) + 53.0 * s) as u8,
            (1.0 * (1.0 - s) + 91.0 * s) as u8,
            (84.0 * (1.0 - s) + 125.0 * s) as u8,
        )
    } else if t < 0.5 {
        let s = (t - 0.25) * 4.0;
        Color32::from_rgb(
            (53.0 * (1.0 - s) + 42.0 * s) as u8,
            (91.0 * (1.0 - s) + 117.0 * s) as u8,
            (125.0 * (1.0 - s) + 142.0 * s) as u8,
        )
    } else if t < 0.75 {
        let s = (t - 0.5) * 4.0;
        Color32::from_rgb(
            (42.0 * (1.0 - s) + 86.0 * s) as u8,
            (117.0 * (1.0 - s) + 163.0 * s) as u8,
            (142.0 * (1.0 - s) + 92.0 * s) as u8,
        )
    } else {
        let s = (t - 0.75) * 4.0;
        Color32::from_rgb(
            (86.0 * (1.0 - s) + 253.0 * s) as u8,
            (163.0 * (1.0 - s) + 231.0 * s) as u8,
            (92.0 * (1.0 - s) + 36.0 * s) as u8,
        )
    }
}

/// Plasma color map
pub fn plasma_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);

    if t < 0.5 {
        let s = t * 2.0;
        Color32::from_rgb(
            (13.0 + 240.0 * s) as u8,
            (8.0 + 57.0 * s) as u8,
            (135.0 + 13.0 * s) as u8,
        )
    } else {
        let s = (t - 0.5) * 2.0;
        Color32::from_rgb(
            253,
            (65.0 + 186.0 * s) as u8,
            (148.0 * (1.0 - s) + 36.0 * s) as u8,
        )
    }
}

/// Sequential scale mapping a numeric domain onto a color map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialScale {
    min: f64,
    max: f64,
    scheme: ColorScheme,
}

impl SequentialScale {
    pub fn new(domain: (u32, u32), scheme: ColorScheme) -> Self {
        Self {
            min: domain.0 as f64,
            max: domain.1 as f64,
            scheme,
        }
    }

    /// Position of `value` in the domain, 0.5 for a degenerate domain
    pub fn normalize(&self, value: f64) -> f32 {
        if self.max > self.min {
            (((value - self.min) / (self.max - self.min)) as f32).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }

    pub fn color(&self, value: f64) -> Color32 {
        let t = self.normalize(value);
        match self.scheme {
            ColorScheme::Viridis => viridis_color(t),
            ColorScheme::Plasma => plasma_color(t),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-object color and transparency policy.

/// Highest alpha ever sent to the viewer.
///
/// The viewer sorts translucent objects back to front; an object reported as
/// fully opaque drops out of that pass and breaks the ordering.
pub const MAX_TRANSMITTED_ALPHA: f64 = 0.99;

/// Alpha used for context ("parent") entries.
pub const PARENT_ALPHA: f64 = 0.25;

/// Caller-supplied color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpec {
    /// RGB, 0-255 per channel.
    Rgb([u8; 3]),
    /// RGB plus alpha; the alpha wins over any separate alpha value.
    Rgba([u8; 3], f64),
}

/// Display options for one `show_object` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ObjectOptions {
    /// Explicit color.
    pub color: Option<ColorSpec>,
    /// Explicit alpha, ignored when `color` is RGBA.
    pub alpha: Option<f64>,
}

impl ObjectOptions {
    /// Options with an RGB color.
    pub fn rgb(rgb: [u8; 3]) -> Self {
        Self {
            color: Some(ColorSpec::Rgb(rgb)),
            alpha: None,
        }
    }

    /// Options with an RGBA color.
    pub fn rgba(rgb: [u8; 3], alpha: f64) -> Self {
        Self {
            color: Some(ColorSpec::Rgba(rgb, alpha)),
            alpha: None,
        }
    }

    /// Options carrying only an alpha.
    pub fn alpha(alpha: f64) -> Self {
        Self {
            color: None,
            alpha: Some(alpha),
        }
    }

    /// Set the alpha.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }
}

/// Resolve color and alpha for an entry.
///
/// Precedence: RGBA quad, then RGB (or the default color) with the explicit
/// alpha, then the default color at alpha 1.0. Alpha is clamped into `[0, 1]`;
/// NaN counts as opaque.
pub fn resolve_color(options: Option<&ObjectOptions>, default_color: [u8; 3]) -> ([u8; 3], f64) {
    let (rgb, alpha) = match options {
        Some(ObjectOptions {
            color: Some(ColorSpec::Rgba(rgb, a)),
            ..
        }) => (*rgb, *a),
        Some(ObjectOptions {
            color: Some(ColorSpec::Rgb(rgb)),
            alpha,
        }) => (*rgb, alpha.unwrap_or(1.0)),
        Some(ObjectOptions { color: None, alpha }) => (default_color, alpha.unwrap_or(1.0)),
        None => (default_color, 1.0),
    };
    let alpha = if alpha.is_nan() {
        1.0
    } else {
        alpha.clamp(0.0, 1.0)
    };
    (rgb, alpha)
}

/// Alpha as sent to the viewer.
pub fn transmitted_alpha(alpha: f64) -> f64 {
    alpha.min(MAX_TRANSMITTED_ALPHA)
}

/// `#rrggbb` form used by the viewer's shape tree.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

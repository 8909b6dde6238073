// THEORY:
// The `color_space` module maps averaged camera pixels into CIE L*a*b*, the
// coordinate system the classifier measures distances in. Raw sRGB distances
// are a poor proxy for what a human sees (the green axis is far more sensitive
// than blue, and gamma encoding warps everything), so all similarity judgments
// happen in a perceptually uniform space instead.
//
// Key architectural principles:
// 1.  **Fixed-Parameter Transform**: The conversion is fully analytic, pinned to
//     the CIE 1931 2-degree observer and the D65 illuminant. No platform color
//     management is involved, so results are identical on every machine.
// 2.  **Pure and Total**: `srgb_to_lab` is a pure function of its input pixel.
//     Inputs are 8-bit channels, always in range by construction, so there are
//     no error conditions anywhere in this module.
// 3.  **Distance as the Primitive**: `Lab::distance` (the classic Delta E 76,
//     plain Euclidean distance in Lab) is the single similarity metric the rest
//     of the engine builds on.

use crate::core_modules::pixel::pixel::Pixel;
use serde::{Deserialize, Serialize};

/// D65 reference white point in XYZ. Source: CIE 15:2004 Colorimetry.
const D65_WHITE_POINT: [f64; 3] = [0.95047, 1.0, 1.08883];

/// Threshold between the linear and power-law segments of the sRGB gamma curve.
const SRGB_GAMMA_THRESHOLD: f64 = 0.04045;

/// Threshold between the linear and cube-root segments of the Lab transfer
/// curve (216/24389).
const LAB_EPSILON: f64 = 0.008856;

/// A point in the CIE L*a*b* color space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    /// Lightness, 0.0 (black) to 100.0 (diffuse white).
    pub l: f64,
    /// The green-red chroma axis.
    pub a: f64,
    /// The blue-yellow chroma axis.
    pub b: f64,
}

impl Lab {
    /// Euclidean distance between two Lab points (Delta E 76).
    /// Symmetric and non-negative for all input pairs.
    pub fn distance(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// Converts an 8-bit sRGB pixel into CIE L*a*b* under the D65 illuminant.
///
/// The path is the textbook one: per-channel gamma expansion, a fixed 3x3
/// linear combination into XYZ, white-point normalization, the piecewise
/// cube-root transfer function, and the final L*/a*/b* linear formulas.
pub fn srgb_to_lab(pixel: &Pixel) -> Lab {
    let (r, g, b) = pixel.normalized();

    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    // sRGB D65 reference primaries, CIE 1931 2-degree observer.
    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_transfer(x / D65_WHITE_POINT[0]);
    let fy = lab_transfer(y / D65_WHITE_POINT[1]);
    let fz = lab_transfer(z / D65_WHITE_POINT[2]);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Gamma-expands one normalized sRGB channel into linear light.
fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= SRGB_GAMMA_THRESHOLD {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// The piecewise Lab transfer curve: cube root above the epsilon, the classic
/// `7.787 t + 16/116` linear segment below. The two branches meet at the
/// epsilon, so the curve is continuous.
fn lab_transfer(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

// THEORY:
// The `classifier` module turns a Lab coordinate into one of the six sticker
// colors. It is deliberately the simplest classifier that works here: a
// nearest-centroid lookup against a fixed six-entry reference table.
//
// Key architectural principles:
// 1.  **Fixed Reference Table**: Each label has exactly one centroid, the Lab
//     image of a canonical sRGB anchor. The table is built once in the
//     constructor and never changes for the lifetime of the `Classifier`,
//     mirroring how `SmartPixel` pre-computes its comparison values up front.
// 2.  **Total Classification**: Every real-valued Lab input maps to a label.
//     There is no reject class and no failure mode; a terrible sample still
//     gets its nearest label, and the caller can inspect the distance to
//     decide how much to trust it.
// 3.  **Deterministic Tie-Breaking**: Distances are compared with strict
//     `<` in table order, so an exact tie goes to the first-encountered
//     centroid. Arbitrary, but stable across runs.
//
// The anchor values are heuristic placeholders pending real calibration data,
// chosen near the printed sticker colors of a standard speed cube.

use crate::core_modules::color_space::{Lab, srgb_to_lab};
use crate::core_modules::pixel::pixel::Pixel;
use serde::{Deserialize, Serialize};

pub type DeltaE = f64;

/// The number of sticker colors on the cube.
pub const LABEL_COUNT: usize = 6;

/// One of the six fixed sticker colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorLabel {
    White,
    Yellow,
    Red,
    Orange,
    Blue,
    Green,
}

impl ColorLabel {
    /// All six labels, in reference-table (tie-break) order.
    pub const ALL: [ColorLabel; LABEL_COUNT] = [
        ColorLabel::White,
        ColorLabel::Yellow,
        ColorLabel::Red,
        ColorLabel::Orange,
        ColorLabel::Blue,
        ColorLabel::Green,
    ];

    /// The position of this label in `ALL`, usable as a dense array index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The canonical sRGB anchor this label's centroid is derived from.
    pub fn reference_rgb(&self) -> Pixel {
        match self {
            ColorLabel::White => Pixel::new(255, 255, 255, 255),
            ColorLabel::Yellow => Pixel::new(255, 213, 0, 255),
            ColorLabel::Red => Pixel::new(196, 30, 58, 255),
            ColorLabel::Orange => Pixel::new(255, 88, 0, 255),
            ColorLabel::Blue => Pixel::new(0, 70, 173, 255),
            ColorLabel::Green => Pixel::new(0, 155, 72, 255),
        }
    }

    /// Single-letter code used in the facelet export.
    pub fn code(&self) -> char {
        match self {
            ColorLabel::White => 'W',
            ColorLabel::Yellow => 'Y',
            ColorLabel::Red => 'R',
            ColorLabel::Orange => 'O',
            ColorLabel::Blue => 'B',
            ColorLabel::Green => 'G',
        }
    }
}

/// Classifies Lab coordinates against the six fixed reference centroids.
pub struct Classifier {
    /// The reference centroid table, one entry per label, in tie-break order.
    centroids: [(ColorLabel, Lab); LABEL_COUNT],
}

impl Classifier {
    pub fn new() -> Self {
        let centroids =
            ColorLabel::ALL.map(|label| (label, srgb_to_lab(&label.reference_rgb())));
        Self { centroids }
    }

    /// Returns the label of the minimum-distance centroid.
    pub fn classify(&self, lab: &Lab) -> ColorLabel {
        self.classify_with_distance(lab).0
    }

    /// Returns the winning label together with its Delta E, so callers can
    /// judge how trustworthy the read was.
    pub fn classify_with_distance(&self, lab: &Lab) -> (ColorLabel, DeltaE) {
        let (mut best_label, first_centroid) = self.centroids[0];
        let mut best_distance = first_centroid.distance(lab);

        for (label, centroid) in &self.centroids[1..] {
            let distance = centroid.distance(lab);
            if distance < best_distance {
                best_distance = distance;
                best_label = *label;
            }
        }

        (best_label, best_distance)
    }

    /// The fixed centroid for a label.
    pub fn centroid(&self, label: ColorLabel) -> &Lab {
        &self.centroids[label.index()].1
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

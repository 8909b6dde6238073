// THEORY:
// The `pipeline` module is the top-level API for scanning a single face. It
// encapsulates the whole data path (sample, convert, classify, assemble) into
// one call per snapshot, keeping the user-facing surface small.
//
// The path is strictly single-threaded and run-to-completion: one frame in,
// one report out, no suspension and no shared mutable state. Every stage is a
// pure function of its inputs, so the pipeline object only exists to hold the
// tuning configuration, the pre-built centroid table, and the last scan for
// inspection.

use crate::core_modules::classifier::{Classifier, ColorLabel, DeltaE};
use crate::core_modules::color_space::{Lab, srgb_to_lab};
use crate::core_modules::face::{CELL_COUNT, Face, GRID_DIM};
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::sampler::sampler::{SampleRegion, region_mean};
use serde::{Deserialize, Serialize};

/// Default side length of the square sample window, in pixels.
pub const DEFAULT_SAMPLE_WINDOW: u32 = 10;
/// Default Delta E above which a single cell read is flagged as noisy.
pub const DEFAULT_NOISE_THRESHOLD: DeltaE = 25.0;

/// Configuration for the ScanPipeline, allowing for tunable behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// The x coordinate of the top-left cell center of the sampling lattice.
    pub face_origin_x: u32,
    /// The y coordinate of the top-left cell center of the sampling lattice.
    pub face_origin_y: u32,
    /// The distance in pixels between neighboring cell centers.
    pub cell_stride: u32,
    /// The side length of the square window averaged around each cell center.
    pub sample_window: u32,
    /// The per-cell Delta E above which a read is reported as noisy. The
    /// classification itself is unaffected; the flag is advisory.
    pub noise_threshold: DeltaE,
}

impl ScanConfig {
    /// Places the sampling lattice in the middle of the frame, the way the
    /// snapshot view frames a face for the user.
    pub fn centered(image_width: u32, image_height: u32) -> Self {
        let cell_stride = image_width.min(image_height) / 4;
        Self {
            image_width,
            image_height,
            face_origin_x: image_width / 2 - cell_stride,
            face_origin_y: image_height / 2 - cell_stride,
            cell_stride,
            sample_window: DEFAULT_SAMPLE_WINDOW,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
        }
    }
}

/// One cell's evidence trail from sample to label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellReading {
    /// The row of this cell in the face grid.
    pub row: usize,
    /// The column of this cell in the face grid.
    pub col: usize,
    /// The channel-wise mean of the sampled window.
    pub mean_rgb: Pixel,
    /// The mean converted into Lab coordinates.
    pub lab: Lab,
    /// The winning label.
    pub label: ColorLabel,
    /// The Delta E between the sample and the winning centroid.
    pub delta_e: DeltaE,
}

/// The full evidence for one scanned face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceScan {
    /// The assembled 3x3 face.
    pub face: Face,
    /// The nine per-cell readings, row-major.
    pub readings: Vec<CellReading>,
    /// The largest per-cell Delta E of the scan.
    pub worst_delta_e: DeltaE,
}

/// The primary output of the scan pipeline for a single snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanReport {
    /// Every cell landed within the configured Delta E threshold.
    CleanRead(FaceScan),
    /// At least one cell was far from its winning centroid. The face is still
    /// fully classified; the caller decides whether to ask for a rescan.
    NoisyRead(FaceScan),
}

impl ScanReport {
    pub fn face_scan(&self) -> &FaceScan {
        match self {
            ScanReport::CleanRead(scan) | ScanReport::NoisyRead(scan) => scan,
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, ScanReport::CleanRead(_))
    }
}

/// The main, top-level struct for scanning one face per snapshot.
pub struct ScanPipeline {
    config: ScanConfig,
    classifier: Classifier,
    last_scan: Option<FaceScan>,
}

impl ScanPipeline {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            classifier: Classifier::new(),
            last_scan: None,
        }
    }

    /// Scans one face out of a captured RGBA frame.
    ///
    /// Nine independent windows are sampled, one per grid cell; each mean is
    /// converted to Lab and classified against the fixed centroid table. The
    /// scan is retained for inspection via `last_scan`.
    pub fn scan_face(&mut self, frame_buffer: &[u8]) -> ScanReport {
        let mut cells = [ColorLabel::White; CELL_COUNT];
        let mut readings = Vec::with_capacity(CELL_COUNT);
        let mut worst_delta_e: DeltaE = 0.0;

        for index in 0..CELL_COUNT {
            let row = index / GRID_DIM;
            let col = index % GRID_DIM;

            let region = self.cell_region(row, col);
            let mean_rgb = region_mean(
                frame_buffer,
                self.config.image_width,
                self.config.image_height,
                &region,
            );
            let lab = srgb_to_lab(&mean_rgb);
            let (label, delta_e) = self.classifier.classify_with_distance(&lab);

            worst_delta_e = worst_delta_e.max(delta_e);
            cells[index] = label;
            readings.push(CellReading {
                row,
                col,
                mean_rgb,
                lab,
                label,
                delta_e,
            });
        }

        let scan = FaceScan {
            face: Face::new(cells),
            readings,
            worst_delta_e,
        };
        self.last_scan = Some(scan.clone());

        if worst_delta_e <= self.config.noise_threshold {
            ScanReport::CleanRead(scan)
        } else {
            ScanReport::NoisyRead(scan)
        }
    }

    /// The sample window centered on one cell of the lattice.
    fn cell_region(&self, row: usize, col: usize) -> SampleRegion {
        let center_x = self.config.face_origin_x + col as u32 * self.config.cell_stride;
        let center_y = self.config.face_origin_y + row as u32 * self.config.cell_stride;
        let half_window = self.config.sample_window / 2;

        SampleRegion {
            x: center_x.saturating_sub(half_window),
            y: center_y.saturating_sub(half_window),
            width: self.config.sample_window,
            height: self.config.sample_window,
        }
    }

    pub fn last_scan(&self) -> Option<&FaceScan> {
        self.last_scan.as_ref()
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Paints a flat RGBA frame as a 3x3 checkerboard of solid blocks, one
    /// block per face cell.
    fn face_frame(block_size: u32, labels: &[ColorLabel; CELL_COUNT]) -> Vec<u8> {
        let side = block_size * GRID_DIM as u32;
        let mut frame = vec![0u8; (side * side * 4) as usize];

        for pixel_y in 0..side {
            let row = (pixel_y / block_size) as usize;
            for pixel_x in 0..side {
                let col = (pixel_x / block_size) as usize;
                let rgb = labels[row * GRID_DIM + col].reference_rgb();

                let byte_index = ((pixel_y * side + pixel_x) * 4) as usize;
                frame[byte_index] = rgb.red;
                frame[byte_index + 1] = rgb.green;
                frame[byte_index + 2] = rgb.blue;
                frame[byte_index + 3] = 255;
            }
        }
        frame
    }

    fn block_config(block_size: u32) -> ScanConfig {
        let side = block_size * GRID_DIM as u32;
        ScanConfig {
            image_width: side,
            image_height: side,
            face_origin_x: block_size / 2,
            face_origin_y: block_size / 2,
            cell_stride: block_size,
            sample_window: DEFAULT_SAMPLE_WINDOW,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
        }
    }

    #[test]
    fn clean_frame_reads_every_cell_exactly() {
        let labels = [
            ColorLabel::White,
            ColorLabel::Yellow,
            ColorLabel::Red,
            ColorLabel::Orange,
            ColorLabel::Blue,
            ColorLabel::Green,
            ColorLabel::Green,
            ColorLabel::Blue,
            ColorLabel::Orange,
        ];
        let frame = face_frame(30, &labels);
        let mut pipeline = ScanPipeline::new(block_config(30));

        let report = pipeline.scan_face(&frame);
        assert!(report.is_clean());

        let scan = report.face_scan();
        assert_eq!(scan.face.cells(), &labels);
        assert_eq!(scan.readings.len(), CELL_COUNT);
        assert!(scan.worst_delta_e < 1e-9);
    }

    #[test]
    fn readings_are_row_major_and_consistent() {
        let labels = [ColorLabel::Red; CELL_COUNT];
        let frame = face_frame(30, &labels);
        let mut pipeline = ScanPipeline::new(block_config(30));

        let report = pipeline.scan_face(&frame);
        for (index, reading) in report.face_scan().readings.iter().enumerate() {
            assert_eq!(reading.row, index / GRID_DIM);
            assert_eq!(reading.col, index % GRID_DIM);
            assert_eq!(reading.label, ColorLabel::Red);
            assert_eq!(reading.mean_rgb, ColorLabel::Red.reference_rgb());
        }
    }

    #[test]
    fn off_palette_frame_is_reported_noisy_but_still_classified() {
        // A mid-gray face sits far from every centroid.
        let mut pipeline = ScanPipeline::new(block_config(30));
        let side = 90u32;
        let mut frame = vec![0u8; (side * side * 4) as usize];
        for pixel in frame.chunks_mut(4) {
            pixel.copy_from_slice(&[128, 128, 128, 255]);
        }

        let report = pipeline.scan_face(&frame);
        assert!(!report.is_clean());
        assert_eq!(report.face_scan().readings.len(), CELL_COUNT);
    }

    #[test]
    fn last_scan_is_retained() {
        let labels = [ColorLabel::Blue; CELL_COUNT];
        let frame = face_frame(30, &labels);
        let mut pipeline = ScanPipeline::new(block_config(30));

        assert!(pipeline.last_scan().is_none());
        pipeline.scan_face(&frame);
        let retained = pipeline.last_scan().expect("scan retained");
        assert_eq!(retained.face.cells(), &labels);
    }

    #[test]
    fn centered_config_fits_inside_the_frame() {
        let config = ScanConfig::centered(640, 480);
        assert_eq!(config.cell_stride, 120);

        // The outermost cell centers stay inside the image.
        let far_x = config.face_origin_x + 2 * config.cell_stride;
        let far_y = config.face_origin_y + 2 * config.cell_stride;
        assert!(far_x < config.image_width);
        assert!(far_y < config.image_height);
    }
}

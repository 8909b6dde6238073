// THEORY:
// The `cube_state` module is the aggregation layer of the engine. Scanning is
// inherently incremental (the user shows the camera one face at a time, in any
// order, possibly redoing a bad read), so something has to own the partial
// picture between snapshots and decide when it adds up to a whole cube. That
// owner is `CubeState`.
//
// Key architectural principles:
// 1.  **Incremental Assembly**: Faces arrive one at a time and in any order.
//     Recording a face that was already recorded replaces the earlier scan,
//     which is exactly the redo gesture the snapshot flow exposes.
// 2.  **Completeness Before Export**: Downstream consumers (the solver
//     boundary) only ever see a complete cube. The 54-character facelet
//     export returns nothing until all six faces are in.
// 3.  **Plausibility as a Hint**: A physically valid cube carries exactly nine
//     stickers of each color. `is_plausible` surfaces that tally as a cheap
//     sanity signal for the UI; it is advisory, never an error.

use crate::core_modules::classifier::LABEL_COUNT;
use crate::core_modules::face::{CELL_COUNT, Face};
use serde::{Deserialize, Serialize};

/// The number of faces on the cube.
pub const FACE_COUNT: usize = 6;

/// The six fixed face identifiers, in URFDLB export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceId {
    Up,
    Right,
    Front,
    Down,
    Left,
    Back,
}

impl FaceId {
    /// All six face identifiers, in export order.
    pub const ALL: [FaceId; FACE_COUNT] = [
        FaceId::Up,
        FaceId::Right,
        FaceId::Front,
        FaceId::Down,
        FaceId::Left,
        FaceId::Back,
    ];

    /// The position of this face in `ALL`, usable as a dense array index.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Single-letter face code (URFDLB).
    pub fn code(&self) -> char {
        match self {
            FaceId::Up => 'U',
            FaceId::Right => 'R',
            FaceId::Front => 'F',
            FaceId::Down => 'D',
            FaceId::Left => 'L',
            FaceId::Back => 'B',
        }
    }
}

/// The incrementally assembled cube: at most one scanned face per identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubeState {
    faces: [Option<Face>; FACE_COUNT],
}

impl CubeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scanned face, replacing any earlier scan of the same face.
    pub fn record_face(&mut self, id: FaceId, face: Face) {
        self.faces[id.index()] = Some(face);
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces[id.index()].as_ref()
    }

    /// The number of faces recorded so far.
    pub fn recorded_count(&self) -> usize {
        self.faces.iter().filter(|face| face.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.recorded_count() == FACE_COUNT
    }

    /// The faces still waiting for a scan, in export order.
    pub fn missing_faces(&self) -> Vec<FaceId> {
        FaceId::ALL
            .into_iter()
            .filter(|id| self.faces[id.index()].is_none())
            .collect()
    }

    /// Sticker tally across every recorded face, indexed by
    /// `ColorLabel::index`.
    pub fn color_counts(&self) -> [usize; LABEL_COUNT] {
        let mut totals = [0usize; LABEL_COUNT];
        for face in self.faces.iter().flatten() {
            for (label_index, count) in face.counts().into_iter().enumerate() {
                totals[label_index] += count;
            }
        }
        totals
    }

    /// Whether the recorded cube could be a physically valid one: complete,
    /// with exactly nine stickers of each color.
    pub fn is_plausible(&self) -> bool {
        self.is_complete()
            && self
                .color_counts()
                .into_iter()
                .all(|count| count == CELL_COUNT)
    }

    /// The 54-character facelet export for the solver boundary: faces in
    /// URFDLB order, cells row-major, one label code per sticker. `None`
    /// until the cube is complete.
    pub fn facelet_string(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }

        let mut facelets = String::with_capacity(FACE_COUNT * CELL_COUNT);
        for id in FaceId::ALL {
            let face = self.faces[id.index()].as_ref()?;
            for label in face.cells() {
                facelets.push(label.code());
            }
        }
        Some(facelets)
    }

    /// Discards every recorded face.
    pub fn reset(&mut self) {
        self.faces = [None; FACE_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::classifier::ColorLabel;

    fn solid(label: ColorLabel) -> Face {
        Face::new([label; CELL_COUNT])
    }

    #[test]
    fn starts_empty() {
        let cube = CubeState::new();
        assert_eq!(cube.recorded_count(), 0);
        assert!(!cube.is_complete());
        assert_eq!(cube.missing_faces(), FaceId::ALL.to_vec());
        assert_eq!(cube.facelet_string(), None);
    }

    #[test]
    fn faces_accumulate_one_at_a_time() {
        let mut cube = CubeState::new();
        for (scanned, (id, label)) in FaceId::ALL.into_iter().zip(ColorLabel::ALL).enumerate() {
            cube.record_face(id, solid(label));
            assert_eq!(cube.recorded_count(), scanned + 1);
        }
        assert!(cube.is_complete());
        assert!(cube.missing_faces().is_empty());
    }

    #[test]
    fn missing_faces_tracks_the_gap() {
        let mut cube = CubeState::new();
        for id in [FaceId::Up, FaceId::Right, FaceId::Down, FaceId::Left, FaceId::Back] {
            cube.record_face(id, solid(ColorLabel::White));
        }
        assert_eq!(cube.missing_faces(), vec![FaceId::Front]);
    }

    #[test]
    fn rescanning_a_face_replaces_the_earlier_read() {
        let mut cube = CubeState::new();
        cube.record_face(FaceId::Front, solid(ColorLabel::Red));
        cube.record_face(FaceId::Front, solid(ColorLabel::Orange));

        assert_eq!(cube.recorded_count(), 1);
        assert_eq!(cube.face(FaceId::Front), Some(&solid(ColorLabel::Orange)));
    }

    #[test]
    fn plausible_cube_has_nine_of_each_color() {
        let mut cube = CubeState::new();
        for (id, label) in FaceId::ALL.into_iter().zip(ColorLabel::ALL) {
            cube.record_face(id, solid(label));
        }
        assert!(cube.is_plausible());
        assert!(cube.color_counts().into_iter().all(|c| c == CELL_COUNT));
    }

    #[test]
    fn duplicate_colors_are_implausible() {
        let mut cube = CubeState::new();
        for id in FaceId::ALL {
            cube.record_face(id, solid(ColorLabel::White));
        }
        assert!(cube.is_complete());
        assert!(!cube.is_plausible());
    }

    #[test]
    fn facelet_string_follows_urfdlb_order() {
        let mut cube = CubeState::new();
        for (id, label) in FaceId::ALL.into_iter().zip(ColorLabel::ALL) {
            cube.record_face(id, solid(label));
        }

        let facelets = cube.facelet_string().expect("complete cube");
        assert_eq!(facelets.len(), FACE_COUNT * CELL_COUNT);
        assert_eq!(
            facelets,
            "WWWWWWWWWYYYYYYYYYRRRRRRRRROOOOOOOOOBBBBBBBBBGGGGGGGGG"
        );
    }

    #[test]
    fn reset_discards_everything() {
        let mut cube = CubeState::new();
        cube.record_face(FaceId::Up, solid(ColorLabel::Blue));
        cube.reset();
        assert_eq!(cube.recorded_count(), 0);
    }
}

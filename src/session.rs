// THEORY:
// The `session` module wraps the synchronous scan path in an actor so the
// snapshot flow can drive it from async UI code. Scanning is on-demand (the
// user triggers one snapshot at a time, in any order), so a single task owns
// both the `ScanPipeline` and the accumulating `CubeState` and serializes
// every request against them.
//
// Key architectural principles:
// 1.  **Single Owner**: All mutable state lives inside the spawned task.
//     Callers hold only a cheap message handle, so there is no lock anywhere
//     near the scan path.
// 2.  **Request/Reply**: Each snapshot travels with its own oneshot reply
//     channel. The caller awaits exactly the report for its own frame.
// 3.  **Channel-Level Errors Only**: The classification path itself cannot
//     fail; the only errors a caller can see are a closed channel on send or
//     receive, reported as plain static strings.

use crate::core_modules::cube_state::{CubeState, FaceId};
use crate::pipeline::{ScanConfig, ScanPipeline, ScanReport};
use tokio::sync::{mpsc, oneshot};

const MESSAGE_QUEUE_DEPTH: usize = 16;

/// Message type for the scan session actor.
enum SessionMessage {
    Snapshot {
        face_id: FaceId,
        frame: Vec<u8>,
        reply: oneshot::Sender<ScanReport>,
    },
    State(oneshot::Sender<CubeState>),
    Reset,
    Shutdown,
}

/// Handle to a spawned scan session owning one pipeline and one cube state.
pub struct ScanSession {
    messages: mpsc::Sender<SessionMessage>,
}

impl ScanSession {
    /// Spawns the session actor and returns its handle.
    pub fn spawn(config: ScanConfig) -> Self {
        let (messages, mut inbox) = mpsc::channel::<SessionMessage>(MESSAGE_QUEUE_DEPTH);

        tokio::spawn(async move {
            let mut pipeline = ScanPipeline::new(config);
            let mut cube = CubeState::new();

            while let Some(message) = inbox.recv().await {
                match message {
                    SessionMessage::Snapshot {
                        face_id,
                        frame,
                        reply,
                    } => {
                        let report = pipeline.scan_face(&frame);
                        cube.record_face(face_id, report.face_scan().face);
                        let _ = reply.send(report);
                    }
                    SessionMessage::State(reply) => {
                        let _ = reply.send(cube.clone());
                    }
                    SessionMessage::Reset => cube.reset(),
                    SessionMessage::Shutdown => break,
                }
            }
        });

        Self { messages }
    }

    /// Scans one snapshot and records the resulting face into the session's
    /// cube state. Rescanning a face replaces its earlier read.
    pub async fn scan_face(
        &self,
        face_id: FaceId,
        frame: Vec<u8>,
    ) -> Result<ScanReport, &'static str> {
        let (reply, response) = oneshot::channel();
        self.messages
            .send(SessionMessage::Snapshot {
                face_id,
                frame,
                reply,
            })
            .await
            .map_err(|_| "Failed to send snapshot to scan session")?;

        response
            .await
            .map_err(|_| "Failed to receive scan report from session")
    }

    /// A snapshot of the aggregate cube state recorded so far.
    pub async fn cube_state(&self) -> Result<CubeState, &'static str> {
        let (reply, response) = oneshot::channel();
        self.messages
            .send(SessionMessage::State(reply))
            .await
            .map_err(|_| "Failed to send state request to scan session")?;

        response
            .await
            .map_err(|_| "Failed to receive cube state from session")
    }

    /// Discards every face recorded so far.
    pub async fn reset(&self) -> Result<(), &'static str> {
        self.messages
            .send(SessionMessage::Reset)
            .await
            .map_err(|_| "Failed to send reset to scan session")
    }

    /// Shuts the actor down cleanly.
    pub async fn shutdown(&self) {
        let _ = self.messages.send(SessionMessage::Shutdown).await;
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // Best effort shutdown on drop
        let _ = self.messages.try_send(SessionMessage::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::classifier::ColorLabel;
    use crate::core_modules::face::GRID_DIM;
    use crate::pipeline::{DEFAULT_NOISE_THRESHOLD, DEFAULT_SAMPLE_WINDOW};

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

    fn solid_frame(side: u32, label: ColorLabel) -> Vec<u8> {
        let rgb = label.reference_rgb();
        let mut frame = Vec::with_capacity((side * side * 4) as usize);
        for _ in 0..(side * side) {
            frame.extend_from_slice(&[rgb.red, rgb.green, rgb.blue, 255]);
        }
        frame
    }

    #[tokio::test]
    async fn session_accumulates_a_full_cube() {
        let session = ScanSession::spawn(block_config(30));

        for (face_id, label) in FaceId::ALL.into_iter().zip(ColorLabel::ALL) {
            let report = session
                .scan_face(face_id, solid_frame(90, label))
                .await
                .expect("scan succeeds");
            assert!(report.is_clean());
            assert_eq!(report.face_scan().face.center(), label);
        }

        let cube = session.cube_state().await.expect("state succeeds");
        assert!(cube.is_complete());
        assert!(cube.is_plausible());

        session.shutdown().await;
    }

    #[tokio::test]
    async fn reset_clears_recorded_faces() {
        let session = ScanSession::spawn(block_config(30));

        session
            .scan_face(FaceId::Up, solid_frame(90, ColorLabel::White))
            .await
            .expect("scan succeeds");
        session.reset().await.expect("reset succeeds");

        let cube = session.cube_state().await.expect("state succeeds");
        assert_eq!(cube.recorded_count(), 0);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn rescans_replace_earlier_reads() {
        let session = ScanSession::spawn(block_config(30));

        session
            .scan_face(FaceId::Front, solid_frame(90, ColorLabel::Red))
            .await
            .expect("scan succeeds");
        session
            .scan_face(FaceId::Front, solid_frame(90, ColorLabel::Orange))
            .await
            .expect("scan succeeds");

        let cube = session.cube_state().await.expect("state succeeds");
        assert_eq!(cube.recorded_count(), 1);
        assert_eq!(
            cube.face(FaceId::Front).map(|face| face.center()),
            Some(ColorLabel::Orange)
        );

        session.shutdown().await;
    }
}

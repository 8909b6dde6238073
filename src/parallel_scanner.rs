// THEORY:
// The `parallel_scanner` module exists for the one place the engine touches
// more than a single frame at a time: re-scanning a set of stored snapshots in
// one call, e.g. all six faces after the sampling lattice or the centroid
// anchors change. Each worker owns its own `ScanPipeline`, tasks are dealt
// round-robin by a dispatcher task, and results come back over per-task
// oneshot channels. The per-frame scan path stays exactly the synchronous,
// run-to-completion function it is everywhere else; only the orchestration
// around it is concurrent.

use crate::core_modules::cube_state::{CubeState, FACE_COUNT, FaceId};
use crate::pipeline::{ScanConfig, ScanPipeline, ScanReport};
use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};

/// Upper bound on the number of worker tasks; one per face is the most this
/// workload can keep busy.
const MAX_WORKER_POOL_SIZE: usize = FACE_COUNT;

struct FaceTask {
    face_id: FaceId,
    frame: Vec<u8>,
    result_sender: oneshot::Sender<(FaceId, ScanReport)>,
}

/// A pool of workers that scans stored snapshots concurrently and aggregates
/// the results into a cube state.
pub struct BatchScanner {
    task_sender: mpsc::UnboundedSender<FaceTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl BatchScanner {
    pub fn new(config: ScanConfig) -> Self {
        let worker_count = num_cpus::get().clamp(1, MAX_WORKER_POOL_SIZE);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<FaceTask>();

        // A single dispatcher deals incoming tasks to the workers round-robin.
        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<FaceTask>())
            .unzip();

        tokio::spawn(async move {
            let mut worker_index = 0;
            while let Some(task) = task_receiver.recv().await {
                let _ = worker_senders[worker_index].send(task);
                worker_index = (worker_index + 1) % worker_count;
            }
        });

        let mut workers = Vec::with_capacity(worker_count);
        for mut worker_receiver in worker_receivers {
            let worker_config = config.clone();

            workers.push(tokio::spawn(async move {
                let mut pipeline = ScanPipeline::new(worker_config);

                while let Some(task) = worker_receiver.recv().await {
                    let report = pipeline.scan_face(&task.frame);
                    let _ = task.result_sender.send((task.face_id, report));
                }
            }));
        }

        Self {
            task_sender,
            workers,
        }
    }

    /// The number of worker tasks in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Scans every snapshot and aggregates the faces into one cube state.
    ///
    /// Results are folded in submission order, so a later snapshot of the
    /// same face replaces an earlier one, matching the incremental-replace
    /// rule of `CubeState::record_face`.
    pub async fn scan_all(
        &self,
        snapshots: Vec<(FaceId, Vec<u8>)>,
    ) -> Result<(CubeState, Vec<(FaceId, ScanReport)>), &'static str> {
        let mut receivers = Vec::with_capacity(snapshots.len());
        for (face_id, frame) in snapshots {
            let (result_sender, result_receiver) = oneshot::channel();
            self.task_sender
                .send(FaceTask {
                    face_id,
                    frame,
                    result_sender,
                })
                .map_err(|_| "Failed to send task to worker pool")?;
            receivers.push(result_receiver);
        }

        let mut cube = CubeState::new();
        let mut reports = Vec::with_capacity(receivers.len());
        for result in join_all(receivers).await {
            let (face_id, report) =
                result.map_err(|_| "Failed to receive result from worker")?;
            cube.record_face(face_id, report.face_scan().face);
            reports.push((face_id, report));
        }

        Ok((cube, reports))
    }
}

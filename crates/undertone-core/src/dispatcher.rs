//! Pipeline dispatcher
//!
//! Sequences exactly two request/response round trips per image: estimate the
//! filter, then apply it. The apply request is never sent before the estimate
//! result has been captured, so at most one request per tag is ever in
//! flight. Each run gets a fresh generation stamp and results from older
//! generations are discarded rather than misapplied to the current image.

use crate::config::EstimatorConfig;
use crate::models::PixelBuffer;
use crate::protocol::{WorkOutcome, WorkRequest, WorkResult};
use crate::worker::WorkerHandle;

/// Progress of the current pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    AwaitingEstimate,
    AwaitingApplication,
    Done,
    /// Terminal and fatal; no retry. The next `run` starts a fresh generation.
    Error,
}

/// State machine driving one image pipeline at a time over a worker.
pub struct PipelineDispatcher {
    worker: WorkerHandle,
    state: PipelineState,
    generation: u64,
}

impl PipelineDispatcher {
    /// Create a dispatcher with its own freshly spawned worker.
    pub fn new(config: EstimatorConfig) -> Self {
        Self::with_worker(WorkerHandle::spawn(config))
    }

    pub(crate) fn with_worker(worker: WorkerHandle) -> Self {
        Self {
            worker,
            state: PipelineState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the full estimate-then-apply pipeline for one image.
    ///
    /// Suspends at each round trip until the matching result arrives. Any
    /// failure, unexpected tag, or `Unknown` result is fatal for this run.
    pub async fn run(&mut self, buffer: PixelBuffer) -> Result<PixelBuffer, String> {
        self.generation += 1;
        let generation = self.generation;

        self.state = PipelineState::AwaitingEstimate;
        log::debug!("Pipeline generation {} estimating", generation);
        // The worker consumes its copy; ours is held back for the apply phase.
        let estimate = WorkRequest::EstimateFilter {
            generation,
            buffer: buffer.clone(),
        };
        if self.worker.requests.send(estimate).is_err() {
            return Err(self.fail("Worker stopped before the estimate request could be sent"));
        }

        let filter = match self.next_result(generation).await? {
            WorkResult::EstimateFilter {
                outcome: WorkOutcome::Success { payload },
                ..
            } => payload,
            WorkResult::EstimateFilter {
                outcome: WorkOutcome::Failure { reason },
                ..
            } => return Err(self.fail(&format!("Filter estimation failed: {}", reason))),
            other => {
                return Err(self.fail(&format!(
                    "Unexpected {} result while awaiting estimate",
                    other.tag()
                )))
            }
        };

        self.state = PipelineState::AwaitingApplication;
        log::debug!("Pipeline generation {} applying", generation);
        let payload = match serde_json::to_string(&filter) {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(&format!("Failed to serialize filter: {}", e))),
        };
        let apply = WorkRequest::ApplyFilter {
            generation,
            buffer,
            filter: payload,
        };
        if self.worker.requests.send(apply).is_err() {
            return Err(self.fail("Worker stopped before the apply request could be sent"));
        }

        let corrected = match self.next_result(generation).await? {
            WorkResult::ApplyFilter {
                outcome: WorkOutcome::Success { payload },
                ..
            } => payload,
            WorkResult::ApplyFilter {
                outcome: WorkOutcome::Failure { reason },
                ..
            } => return Err(self.fail(&format!("Filter application failed: {}", reason))),
            other => {
                return Err(self.fail(&format!(
                    "Unexpected {} result while awaiting application",
                    other.tag()
                )))
            }
        };

        self.state = PipelineState::Done;
        Ok(corrected)
    }

    /// Receive the next result for the given generation, discarding stale
    /// ones. Results without a generation (`Unknown`) pass through for the
    /// caller to treat as fatal.
    async fn next_result(&mut self, generation: u64) -> Result<WorkResult, String> {
        loop {
            let Some(result) = self.worker.results.recv().await else {
                return Err(self.fail("Worker stopped without responding"));
            };
            match result.generation() {
                Some(stale) if stale != generation => {
                    log::debug!(
                        "Discarding stale {} result from generation {}",
                        result.tag(),
                        stale
                    );
                }
                _ => return Ok(result),
            }
        }
    }

    fn fail(&mut self, message: &str) -> String {
        self.state = PipelineState::Error;
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterDescriptor;
    use tokio::sync::mpsc;

    /// Hand-built worker handle whose results are scripted by the test.
    /// The returned sender must be kept alive for the channel to stay open.
    fn scripted_worker(
        results: Vec<WorkResult>,
    ) -> (
        WorkerHandle,
        mpsc::UnboundedReceiver<WorkRequest>,
        mpsc::UnboundedSender<WorkResult>,
    ) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        for result in results {
            result_tx.send(result).unwrap();
        }
        (
            WorkerHandle {
                requests: request_tx,
                results: result_rx,
            },
            request_rx,
            result_tx,
        )
    }

    #[tokio::test]
    async fn happy_path_reaches_done() {
        let mut dispatcher = PipelineDispatcher::new(EstimatorConfig::default());
        assert_eq!(dispatcher.state(), PipelineState::Idle);

        let buffer = PixelBuffer::filled(8, 8, [30, 100, 180, 255]);
        let corrected = dispatcher.run(buffer.clone()).await.unwrap();

        assert_eq!(dispatcher.state(), PipelineState::Done);
        assert_eq!(corrected.width, buffer.width);
        assert_eq!(corrected.height, buffer.height);
        for pixel in corrected.data.chunks_exact(4) {
            assert_eq!(pixel[3], 255, "alpha must survive the pipeline");
        }
    }

    #[tokio::test]
    async fn estimate_failure_is_fatal() {
        let mut dispatcher = PipelineDispatcher::new(EstimatorConfig::default());
        let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();

        let result = dispatcher.run(empty).await;
        assert!(result.is_err());
        assert_eq!(dispatcher.state(), PipelineState::Error);
    }

    #[tokio::test]
    async fn unknown_result_is_fatal_and_not_retried() {
        let (worker, request_rx, _result_tx) = scripted_worker(vec![WorkResult::Unknown {
            message: "Unknown requested work type".to_string(),
        }]);
        let mut dispatcher = PipelineDispatcher::with_worker(worker);

        let result = dispatcher.run(PixelBuffer::filled(1, 1, [0, 0, 0, 255])).await;
        assert!(result.is_err());
        assert_eq!(dispatcher.state(), PipelineState::Error);

        // Exactly one request went out: no retry after the fatal result.
        let mut request_rx = request_rx;
        let first = request_rx.try_recv();
        assert!(first.is_ok(), "the estimate request should have been sent");
        assert!(
            request_rx.try_recv().is_err(),
            "no further requests may follow a fatal result"
        );
    }

    #[tokio::test]
    async fn stale_generation_results_are_discarded() {
        let expected = PixelBuffer::filled(2, 2, [9, 9, 9, 9]);
        let (worker, _request_rx, _result_tx) = scripted_worker(vec![
            // Leftover from an abandoned earlier run; must be skipped.
            WorkResult::EstimateFilter {
                generation: 99,
                outcome: WorkOutcome::Failure {
                    reason: "stale".to_string(),
                },
            },
            WorkResult::EstimateFilter {
                generation: 1,
                outcome: WorkOutcome::Success {
                    payload: FilterDescriptor::identity(),
                },
            },
            WorkResult::ApplyFilter {
                generation: 99,
                outcome: WorkOutcome::Failure {
                    reason: "stale".to_string(),
                },
            },
            WorkResult::ApplyFilter {
                generation: 1,
                outcome: WorkOutcome::Success {
                    payload: expected.clone(),
                },
            },
        ]);
        let mut dispatcher = PipelineDispatcher::with_worker(worker);

        let corrected = dispatcher
            .run(PixelBuffer::filled(2, 2, [1, 2, 3, 255]))
            .await
            .unwrap();
        assert_eq!(corrected, expected);
        assert_eq!(dispatcher.state(), PipelineState::Done);
    }

    #[tokio::test]
    async fn mismatched_tag_is_fatal() {
        // An apply result while awaiting the estimate is unrecoverable.
        let (worker, _request_rx, _result_tx) = scripted_worker(vec![WorkResult::ApplyFilter {
            generation: 1,
            outcome: WorkOutcome::Success {
                payload: PixelBuffer::filled(1, 1, [0, 0, 0, 0]),
            },
        }]);
        let mut dispatcher = PipelineDispatcher::with_worker(worker);

        let result = dispatcher.run(PixelBuffer::filled(1, 1, [5, 5, 5, 255])).await;
        assert!(result.is_err());
        assert_eq!(dispatcher.state(), PipelineState::Error);
    }

    #[tokio::test]
    async fn generations_increase_per_run() {
        let mut dispatcher = PipelineDispatcher::new(EstimatorConfig::default());
        let buffer = PixelBuffer::filled(4, 4, [60, 120, 200, 255]);

        dispatcher.run(buffer.clone()).await.unwrap();
        dispatcher.run(buffer).await.unwrap();
        assert_eq!(dispatcher.generation, 2);
        assert_eq!(dispatcher.state(), PipelineState::Done);
    }
}

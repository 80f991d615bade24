//! Worker runtime
//!
//! A message loop running off the orchestrating thread. Requests are
//! processed strictly one at a time in arrival order; every request produces
//! exactly one result, and bad input becomes a `Failure` or `Unknown` result
//! rather than killing the loop.

use tokio::sync::mpsc;

use crate::applicator::apply_filter;
use crate::config::EstimatorConfig;
use crate::decoders::decode_image_from_bytes;
use crate::estimator::estimate_filter;
use crate::models::FilterDescriptor;
use crate::protocol::{WorkOutcome, WorkRequest, WorkResult};

/// Channel endpoints for talking to a spawned worker.
pub struct WorkerHandle {
    pub(crate) requests: mpsc::UnboundedSender<WorkRequest>,
    pub(crate) results: mpsc::UnboundedReceiver<WorkResult>,
}

impl WorkerHandle {
    /// Spawn the worker loop on the current tokio runtime.
    ///
    /// Dropping the handle closes the request channel, which ends the loop.
    pub fn spawn(config: EstimatorConfig) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkRequest>();
        let (result_tx, result_rx) = mpsc::unbounded_channel::<WorkResult>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Worker received {} request", request.tag());
                // Estimation and application are CPU-bound; run them on the
                // blocking pool so the executor thread stays responsive.
                // Awaiting the task before the next recv keeps requests
                // strictly one at a time in arrival order.
                let config = config.clone();
                let task = tokio::task::spawn_blocking(move || handle_request(request, &config));
                let result = match task.await {
                    Ok(result) => result,
                    Err(e) => {
                        log::error!("Worker task aborted: {}", e);
                        break;
                    }
                };
                if result_tx.send(result).is_err() {
                    // Receiver side is gone; nothing left to report to.
                    break;
                }
            }
        });

        Self {
            requests: request_tx,
            results: result_rx,
        }
    }
}

/// Process a single request, dispatching by tag.
pub fn handle_request(request: WorkRequest, config: &EstimatorConfig) -> WorkResult {
    match request {
        WorkRequest::DecodeImage { generation, bytes } => {
            let outcome = match decode_image_from_bytes(&bytes) {
                Ok(buffer) => WorkOutcome::Success { payload: buffer },
                Err(reason) => WorkOutcome::Failure { reason },
            };
            WorkResult::DecodeImage {
                generation,
                outcome,
            }
        }
        WorkRequest::EstimateFilter { generation, buffer } => {
            let outcome = match estimate_filter(&buffer, config) {
                Ok(filter) => WorkOutcome::Success { payload: filter },
                Err(reason) => WorkOutcome::Failure { reason },
            };
            WorkResult::EstimateFilter {
                generation,
                outcome,
            }
        }
        WorkRequest::ApplyFilter {
            generation,
            buffer,
            filter,
        } => {
            // The filter arrives as a JSON string; a payload that fails to
            // parse is a Failure result, never an unhandled fault.
            let outcome = match serde_json::from_str::<FilterDescriptor>(&filter) {
                Ok(filter) => WorkOutcome::Success {
                    payload: apply_filter(&buffer, &filter),
                },
                Err(e) => WorkOutcome::Failure {
                    reason: format!("Malformed filter payload: {}", e),
                },
            };
            WorkResult::ApplyFilter {
                generation,
                outcome,
            }
        }
        WorkRequest::Unknown => WorkResult::Unknown {
            message: "Unknown requested work type".to_string(),
        },
    }
}

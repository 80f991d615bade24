//! Worker request/result protocol
//!
//! Tagged, JSON-serializable message pairs exchanged with the worker runtime.
//! Requests and results are correlated by tag plus a generation stamp; the
//! stamp lets the dispatcher discard results from an abandoned pipeline run.

use serde::{Deserialize, Serialize};

use crate::models::{FilterDescriptor, PixelBuffer};

/// Work submitted to the worker runtime.
///
/// Buffers move with their request; the sender keeps nothing to read or
/// mutate afterwards. The filter for `ApplyFilter` travels pre-serialized as
/// a JSON string and is parsed on the worker side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum WorkRequest {
    DecodeImage {
        generation: u64,
        bytes: Vec<u8>,
    },
    EstimateFilter {
        generation: u64,
        buffer: PixelBuffer,
    },
    ApplyFilter {
        generation: u64,
        buffer: PixelBuffer,
        filter: String,
    },
    /// Catch-all for unrecognized tags arriving over the wire.
    #[serde(other)]
    Unknown,
}

impl WorkRequest {
    pub fn tag(&self) -> &'static str {
        match self {
            WorkRequest::DecodeImage { .. } => "DecodeImage",
            WorkRequest::EstimateFilter { .. } => "EstimateFilter",
            WorkRequest::ApplyFilter { .. } => "ApplyFilter",
            WorkRequest::Unknown => "Unknown",
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            WorkRequest::DecodeImage { generation, .. }
            | WorkRequest::EstimateFilter { generation, .. }
            | WorkRequest::ApplyFilter { generation, .. } => Some(*generation),
            WorkRequest::Unknown => None,
        }
    }
}

/// Success-or-failure payload shared by all result tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum WorkOutcome<T> {
    Success { payload: T },
    Failure { reason: String },
}

/// Result posted back by the worker runtime, one per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum WorkResult {
    DecodeImage {
        generation: u64,
        #[serde(flatten)]
        outcome: WorkOutcome<PixelBuffer>,
    },
    EstimateFilter {
        generation: u64,
        #[serde(flatten)]
        outcome: WorkOutcome<FilterDescriptor>,
    },
    ApplyFilter {
        generation: u64,
        #[serde(flatten)]
        outcome: WorkOutcome<PixelBuffer>,
    },
    /// Response to an unrecognized request tag.
    Unknown { message: String },
}

impl WorkResult {
    pub fn tag(&self) -> &'static str {
        match self {
            WorkResult::DecodeImage { .. } => "DecodeImage",
            WorkResult::EstimateFilter { .. } => "EstimateFilter",
            WorkResult::ApplyFilter { .. } => "ApplyFilter",
            WorkResult::Unknown { .. } => "Unknown",
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            WorkResult::DecodeImage { generation, .. }
            | WorkResult::EstimateFilter { generation, .. }
            | WorkResult::ApplyFilter { generation, .. } => Some(*generation),
            WorkResult::Unknown { .. } => None,
        }
    }
}

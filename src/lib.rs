// bleep: abuse detection and masking for citizen complaints
//
// This is the library root. The span engine (spans, severity) is pure and
// synchronous; the detectors (toxicity, phrases) are async and fail open;
// pipeline ties them together.

pub mod config;
pub mod output;
pub mod phrases;
pub mod pipeline;
pub mod severity;
pub mod signal;
pub mod spans;
pub mod status;
pub mod text;
pub mod toxicity;

#[cfg(feature = "web")]
pub mod web;

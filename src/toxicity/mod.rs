// Toxicity scoring — trait-based abstraction for swappable providers.
//
// The ToxicityScorer trait defines the interface. Hugging Face hosted
// inference is the default backend; Perspective and a local ONNX model are
// alternatives selected with BLEEP_SCORER.

pub mod huggingface;
pub mod perspective;
pub mod rate_limiter;
pub mod traits;

#[cfg(feature = "onnx")]
pub mod download;
#[cfg(feature = "onnx")]
pub mod onnx;

// Moderation pipelines.
//
// `moderation` is the per-request orchestrator used by the HTTP service and
// the `check` command. `batch` runs it over a JSONL file.

pub mod batch;
pub mod moderation;

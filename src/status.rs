// System status display — which detectors are live, and the active policy.

use colored::Colorize;

use crate::config::{Config, ScorerBackend};

/// Display system status to the terminal.
pub fn show(config: &Config) {
    println!("Environment: {}", config.app_env);

    let scorer = match config.scorer_backend {
        ScorerBackend::HuggingFace => format!("huggingface ({})", config.hf_model_url),
        ScorerBackend::Perspective => "perspective".to_string(),
        #[cfg(feature = "onnx")]
        ScorerBackend::Onnx => format!("onnx ({})", config.model_dir.display()),
        #[cfg(not(feature = "onnx"))]
        ScorerBackend::Onnx => "onnx".to_string(),
        ScorerBackend::Disabled => "disabled".to_string(),
    };
    println!("Toxicity scorer: {scorer}");
    report(config.require_scorer());

    println!(
        "Phrase extractor: groq ({}, {})",
        config.groq_model, config.groq_api_url
    );
    report(config.require_extractor());

    println!("Toxicity threshold: {}", config.toxicity_threshold);
    println!(
        "Detector timeout: {}s",
        config.detector_timeout.as_secs_f64()
    );
}

fn report(check: anyhow::Result<()>) {
    match check {
        Ok(()) => println!("  {}", "ready".green()),
        Err(e) => {
            for line in e.to_string().lines() {
                println!("  {}", line.yellow());
            }
        }
    }
}

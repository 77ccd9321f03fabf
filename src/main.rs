use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use bleep::config::{Config, ScorerBackend};
use bleep::phrases::groq::GroqExtractor;
use bleep::phrases::traits::PhraseExtractor;
use bleep::pipeline::moderation::{ModerationRequest, Moderator};
use bleep::toxicity::huggingface::HuggingFaceScorer;
use bleep::toxicity::perspective::PerspectiveScorer;
use bleep::toxicity::traits::ToxicityScorer;

/// bleep: abuse detection and masking for citizen complaints.
///
/// Finds abusive words in English, Hindi, Hinglish and Odia complaint text,
/// masks them, and rates the overall severity.
#[derive(Parser)]
#[command(name = "bleep", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the moderation HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8001)
        #[arg(long, default_value = "8001")]
        port: u16,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Moderate a single text and print the result
    Check {
        /// Text to moderate (omit with --stdin)
        text: Option<String>,

        /// Read the text from standard input
        #[arg(long, conflicts_with = "text")]
        stdin: bool,

        /// Print the raw JSON result instead of the formatted report
        #[arg(long)]
        json: bool,
    },

    /// Moderate a JSONL file of requests
    Batch {
        /// Input file, one {"text": ...} object per line
        #[arg(long)]
        input: PathBuf,

        /// Output file for JSONL results (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of texts to moderate in parallel (default: 4)
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Show configured detectors and moderation policy
    Status,

    /// Download the ONNX toxicity model
    #[cfg(feature = "onnx")]
    DownloadModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;

    // Set up structured logging. Logs go to stderr so `check --json` and
    // `batch` output stay clean on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "bleep={}",
                    config.log_level.to_lowercase()
                ))
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let moderator = build_moderator(&config)?;
            bleep::web::run_server(moderator, port, &bind).await?;
        }

        Commands::Check { text, stdin, json } => {
            let text = match (text, stdin) {
                (Some(text), _) => text,
                (None, true) => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read text from stdin")?;
                    buf
                }
                (None, false) => anyhow::bail!("Pass the text to check, or use --stdin."),
            };

            let moderator = build_moderator(&config)?;
            let result = moderator.moderate(&ModerationRequest::new(text)).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                bleep::output::terminal::display_result(&result);
            }
        }

        Commands::Batch {
            input,
            output,
            concurrency,
        } => {
            let moderator = build_moderator(&config)?;
            let summary =
                bleep::pipeline::batch::run(&moderator, &input, output.as_deref(), concurrency)
                    .await?;
            if output.is_some() {
                bleep::output::terminal::display_batch_summary(&summary);
            }
        }

        Commands::Status => {
            bleep::status::show(&config);
        }

        #[cfg(feature = "onnx")]
        Commands::DownloadModel => {
            println!("Downloading ONNX toxicity model...");
            println!("  Destination: {}", config.model_dir.display());
            bleep::toxicity::download::download_model(&config.model_dir).await?;
            println!("\nModel downloaded. Set BLEEP_SCORER=onnx to use it.");
        }
    }

    Ok(())
}

/// Wire up the configured detectors. Missing credentials leave a detector out
/// (with a warning) rather than failing startup.
fn build_moderator(config: &Config) -> Result<Moderator> {
    let scorer = create_scorer(config)?;
    let extractor = create_extractor(config)?;

    if scorer.is_none() && extractor.is_none() {
        warn!("No detectors configured, every text will pass unflagged");
    }

    Ok(Moderator::new(scorer, extractor, config.policy()))
}

fn create_scorer(config: &Config) -> Result<Option<Arc<dyn ToxicityScorer>>> {
    if config.scorer_backend == ScorerBackend::Disabled {
        info!("Toxicity scoring disabled");
        return Ok(None);
    }

    if let Err(e) = config.require_scorer() {
        warn!("{e}");
        return Ok(None);
    }

    let scorer: Arc<dyn ToxicityScorer> = match config.scorer_backend {
        ScorerBackend::HuggingFace => {
            info!("Using Hugging Face toxicity scorer");
            Arc::new(HuggingFaceScorer::new(
                config.hf_api_key.clone(),
                config.hf_model_url.clone(),
                config.detector_timeout,
            )?)
        }
        ScorerBackend::Perspective => {
            info!("Using Perspective API toxicity scorer");
            Arc::new(PerspectiveScorer::new(
                config.perspective_api_key.clone(),
                config.detector_timeout,
            )?)
        }
        #[cfg(feature = "onnx")]
        ScorerBackend::Onnx => {
            info!("Using local ONNX toxicity scorer");
            Arc::new(bleep::toxicity::onnx::OnnxToxicityScorer::load(
                &config.model_dir,
            )?)
        }
        // require_scorer() already rejected these
        _ => return Ok(None),
    };

    Ok(Some(scorer))
}

fn create_extractor(config: &Config) -> Result<Option<Arc<dyn PhraseExtractor>>> {
    if let Err(e) = config.require_extractor() {
        warn!("{e}");
        return Ok(None);
    }

    info!(model = %config.groq_model, "Using Groq phrase extractor");
    let extractor = GroqExtractor::new(
        config.groq_api_key.clone(),
        config.groq_api_url.clone(),
        config.groq_model.clone(),
        config.detector_timeout,
    )?;
    Ok(Some(Arc::new(extractor)))
}

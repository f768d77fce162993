//! Command-line creative analysis.
//!
//! ```text
//! adready-analyzer <file> [--content-type <mime>] [--headline <s>]
//!                  [--primary-text <s>] [--description <s>] [--with-frames]
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info};

use adready_analyzer::{init_tracing, AnalysisError, AnalyzerConfig, CreativeAnalyzer};
use adready_media::check_declared_length;
use adready_models::AdCopy;

/// Score one ad creative for launch readiness.
#[derive(Debug, Parser)]
#[command(name = "adready-analyzer")]
#[command(about = "Analyze an ad image or video and print the readiness scorecard as JSON")]
#[command(version)]
struct Args {
    /// Image or video file to analyze
    file: PathBuf,

    /// MIME type of the file; inferred from the extension when omitted
    #[arg(long)]
    content_type: Option<String>,

    /// Ad headline
    #[arg(long)]
    headline: Option<String>,

    /// Ad primary text
    #[arg(long)]
    primary_text: Option<String>,

    /// Ad description
    #[arg(long)]
    description: Option<String>,

    /// Keep base64 frame and thumbnail data in the output
    #[arg(long, default_value_t = false)]
    with_frames: bool,
}

impl Args {
    fn ad_copy(&self) -> Option<AdCopy> {
        AdCopy {
            headline: self.headline.clone(),
            primary_text: self.primary_text.clone(),
            description: self.description.clone(),
        }
        .normalized()
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => return None,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = AnalyzerConfig::from_env();
    info!("Analyzer config: {:?}", config);

    let content_type = match args.content_type.as_deref() {
        Some(ct) => ct.to_string(),
        None => content_type_for(&args.file)
            .with_context(|| format!("cannot infer content type of {}, pass --content-type", args.file.display()))?
            .to_string(),
    };

    let declared_len = tokio::fs::metadata(&args.file)
        .await
        .with_context(|| format!("failed to stat {}", args.file.display()))?
        .len();
    if let Err(e) = check_declared_length(&content_type, declared_len) {
        let e = AnalysisError::from(e);
        print_error(&e);
        bail!("rejected {} ({}): {}", args.file.display(), e.kind().as_str(), e);
    }

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let analyzer = CreativeAnalyzer::from_config(config)?;
    let ad_copy = args.ad_copy();

    let mut result = match analyzer.analyze(bytes, &content_type, ad_copy).await {
        Ok(result) => result,
        Err(e) => {
            print_error(&e);
            bail!("analysis failed ({}): {}", e.kind().as_str(), e);
        }
    };

    if !args.with_frames {
        for frame in &mut result.extracted_frames {
            frame.image_base64.clear();
        }
        result.thumbnail = None;
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    info!(
        overall_score = result.overall_score(),
        verdict = result.verdict().as_str(),
        "Analysis written"
    );
    Ok(())
}

fn print_error(e: &AnalysisError) {
    println!(
        "{}",
        serde_json::json!({"error": e.kind(), "message": e.user_message(), "detail": e.to_string()})
    );
}

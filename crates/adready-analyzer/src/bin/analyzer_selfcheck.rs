use std::path::Path;

use adready_analyzer::metrics::init_metrics;
use adready_analyzer::{AnalyzerConfig, CreativeAnalyzer};
use adready_media::{check_ffmpeg, check_ffprobe, Workspace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let analyzer = CreativeAnalyzer::from_config(AnalyzerConfig::from_env())?;
    let config = analyzer.config();

    let work_dir = config
        .work_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    println!("analyzer-selfcheck: starting with work_dir={}", work_dir.display());

    if std::env::var("METRICS_ENABLED").map(|v| v == "true").unwrap_or(false) {
        let handle = init_metrics()?;
        println!("analyzer-selfcheck: prometheus recorder installed ({} bytes rendered)", handle.render().len());
    }

    ensure_workdir(&work_dir).await?;

    if !analyzer.transcoder_available() {
        anyhow::bail!("ffmpeg/ffprobe not found on PATH");
    }
    let ffmpeg = check_ffmpeg().map_err(|e| anyhow::anyhow!("{}", e))?;
    let ffprobe = check_ffprobe().map_err(|e| anyhow::anyhow!("{}", e))?;
    println!("analyzer-selfcheck: ffmpeg={} ffprobe={}", ffmpeg.display(), ffprobe.display());

    report_oracle("reasoning", analyzer.has_reasoning(), &config.gemini_model);
    report_oracle("transcription", analyzer.has_transcriber(), &config.transcription_model);

    if !analyzer.has_reasoning() {
        anyhow::bail!("missing required env var GEMINI_API_KEY");
    }

    println!("analyzer-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir(path: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(path).await?;
    let workspace = Workspace::create(Some(path))?;
    workspace.stage_source(b"selfcheck", "bin").await?;
    workspace.close()?;
    Ok(())
}

fn report_oracle(name: &str, configured: bool, model: &str) {
    if configured {
        println!("analyzer-selfcheck: {} oracle configured (model {})", name, model);
    } else {
        println!("analyzer-selfcheck: {} oracle not configured", name);
    }
}

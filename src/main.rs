use clap::Parser;
use std::path::PathBuf;

use audio_cutter_lib::{shell, EngineConfig, Session};

/// Interactive audio cutter
#[derive(Parser, Debug)]
#[command(name = "audio-cutter")]
#[command(about = "Trim audio files interactively: cut, remove, undo, redo, export", long_about = None)]
struct Args {
    /// Audio file to open on start
    file: Option<PathBuf>,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter support
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("audio_cutter=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let session = Session::new(config);

    println!("🎵 Audio Cutter");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Type 'help' for commands.");

    if let Some(file) = &args.file {
        match session.load_file(file).await {
            Ok(duration) => println!("Loaded {} ({:.2}s)", file.display(), duration),
            Err(e) => eprintln!("❌ {}", e),
        }
    }

    let stdin = std::io::stdin();
    shell::run(&session, stdin.lock(), std::io::stdout()).await?;

    Ok(())
}

// src/bin/audio_cut.rs

use clap::Parser;
use std::path::PathBuf;

use audio_cutter_lib::shell::{self, Command};
use audio_cutter_lib::{EngineConfig, Session};

/// Command-line tool for scripted audio edits
#[derive(Parser, Debug)]
#[command(name = "audio-cut")]
#[command(about = "Apply a list of edit steps to an audio file and export the result", long_about = None)]
struct Args {
    /// Input audio file (MP3, FLAC, WAV, OGG, etc.)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory to write the result into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Edit step, repeatable and applied in order (e.g. "select 2 4", "cut", "undo")
    #[arg(short, long = "step")]
    steps: Vec<String>,

    /// Export format label (defaults to the configured one)
    #[arg(short, long)]
    format: Option<String>,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show detailed information
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("audio_cutter=warn")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let session = Session::new(config);

    println!("🎵 Audio Cut");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Step 1: Load
    let start_time = std::time::Instant::now();
    let duration = session.load_file(&args.input).await?;
    println!("\n📊 Input File: {}", args.input.display());
    println!("   Duration: {:.2} seconds ({:.2} minutes)", duration, duration / 60.0);

    if args.verbose {
        if let Some(info) = session.info() {
            println!("   Sample Rate: {} Hz", info.sample_rate);
            println!("   Channels: {}", info.channels);
            println!("   Format: {}", info.format);
        }
        let accurate = session.with_engine(|engine| {
            engine.current().map(|a| a.is_sample_accurate()).unwrap_or(false)
        });
        if !accurate {
            println!("   ⚠️  Edits use a byte-rate approximation for this format");
        }
    }

    // Step 2: Apply steps in order; any failure aborts
    println!("\n✂️  Editing...");
    for step in &args.steps {
        let command: Command = step.parse()?;
        if matches!(command, Command::Load(_) | Command::Export { .. } | Command::Quit) {
            anyhow::bail!("'{}' is not allowed as an edit step", step);
        }
        let text = shell::execute(&session, command).await?;
        println!("   {:<16} {}", step, text);
    }

    // Step 3: Export
    println!("\n💾 Exporting...");
    let export = session.export(args.format.as_deref())?;
    let path = export.save(&args.output)?;

    println!("\n✅ Done! Output saved to: {}", path.display());
    if args.verbose {
        println!("   MIME type: {}", export.mime_type);
        println!("   Size: {} bytes", export.bytes().len());
    }
    println!("   Total time: {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(())
}

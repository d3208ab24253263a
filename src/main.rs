use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use voice_chat::{
    create_router, AppState, AudioSourceConfig, ChatClient, Config, Conversation, FileSource,
    Recorder, ReplyStore, Role,
};

#[derive(Parser)]
#[command(name = "voice-chat")]
#[command(about = "Record, encode and send voice prompts to a multimodal chat service")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/voice-chat")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,

    /// Send a prompt, optionally with a mono 44.1kHz WAV recording
    Send {
        /// Text prompt
        #[arg(short, long, default_value = "")]
        message: String,

        /// Recording to replay through the capture pipeline
        #[arg(short, long)]
        audio: Option<PathBuf>,

        /// Replay the recording at real-time speed
        #[arg(long)]
        realtime: bool,
    },

    /// Re-encode a mono 44.1kHz WAV file through the capture pipeline
    Encode {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Write the base64 payload instead of the WAV bytes
        #[arg(long)]
        base64: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Loaded config: {}", cfg.service.name);

    match args.command {
        Command::Serve => serve(cfg).await,
        Command::Send {
            message,
            audio,
            realtime,
        } => send(cfg, message, audio, realtime).await,
        Command::Encode {
            input,
            output,
            base64,
        } => encode(cfg, input, output, base64).await,
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let chat = ChatClient::from_env(cfg.chat.clone())?;
    let replies = ReplyStore::new(&cfg.storage.uploads_path, &cfg.storage.url_prefix);
    let app = create_router(AppState::new(&cfg.service.name, chat, replies));

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}

/// Replay `path` through a recorder and return the encoded session
async fn record_file(cfg: &Config, path: &Path, realtime: bool) -> Result<voice_chat::Recording> {
    let source_config = AudioSourceConfig {
        block_size: cfg.audio.block_size,
        ..AudioSourceConfig::default()
    };
    let source = FileSource::new(path.display().to_string(), source_config).with_realtime(realtime);

    let mut recorder = Recorder::new();
    recorder.start(Box::new(source)).await?;
    recorder.capture_to_end().await?;

    Ok(recorder.stop().await?)
}

async fn send(cfg: Config, message: String, audio: Option<PathBuf>, realtime: bool) -> Result<()> {
    let chat = ChatClient::from_env(cfg.chat.clone())?;
    let replies = ReplyStore::new(&cfg.storage.uploads_path, &cfg.storage.url_prefix);

    let recording = match &audio {
        Some(path) => Some(record_file(&cfg, path, realtime).await?),
        None => None,
    };

    let mut conversation = Conversation::new();
    conversation
        .exchange(
            &chat,
            &replies,
            &message,
            recording.as_ref().map(|r| &r.audio),
            audio.map(|p| p.display().to_string()),
        )
        .await?;

    for msg in conversation.messages() {
        let who = match msg.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        match &msg.audio {
            Some(audio) => println!("{}: {} [{}]", who, msg.content, audio),
            None => println!("{}: {}", who, msg.content),
        }
    }

    Ok(())
}

async fn encode(cfg: Config, input: PathBuf, output: PathBuf, base64: bool) -> Result<()> {
    let recording = record_file(&cfg, &input, false).await?;

    if base64 {
        tokio::fs::write(&output, recording.audio.to_base64()).await?;
    } else {
        tokio::fs::write(&output, recording.audio.as_bytes()).await?;
    }

    info!(
        "Wrote {} ({} samples, {:.1}s)",
        output.display(),
        recording.audio.sample_count(),
        recording.audio.duration().as_secs_f64()
    );

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use communisync::session::Difficulty;
use communisync::{
    assistant, create_router, AppState, ChatRole, Config, FeedbackReport, InterviewSession,
    InterviewStats, MediaBackendFactory, RecorderConfig, SessionConfig,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[derive(Parser)]
#[command(name = "communisync", version, about = "AI interview coaching service")]
struct Cli {
    /// Config file (any format supported by the config crate, extension optional)
    #[arg(long, global = true, default_value = "config/communisync")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run an interview in the terminal
    Interview {
        #[arg(long)]
        role: String,
        #[arg(long)]
        topic: String,
        #[arg(long, default_value = "beginner")]
        difficulty: Difficulty,
    },
    /// Print a feedback report
    Feedback {
        /// JSON statistics record; the default record is shown when omitted
        #[arg(long)]
        stats: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("CommuniSync v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Serve { port } => serve(cfg, port).await,
        Command::Interview {
            role,
            topic,
            difficulty,
        } => {
            let setup = SessionConfig::new(role, topic).with_difficulty(difficulty);
            interview(cfg, setup).await
        }
        Command::Feedback { stats } => feedback(stats.as_deref()),
    }
}

async fn serve(cfg: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);

    let app = create_router(AppState::from_config(&cfg));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

async fn interview(cfg: Config, setup: SessionConfig) -> Result<()> {
    let session = InterviewSession::new(
        Arc::from(MediaBackendFactory::create(cfg.media.source)),
        assistant::from_config(&cfg.assistant),
    )
    .with_scorer(Arc::new(communisync::CannedScorer::new(
        cfg.session.performance_min..cfg.session.performance_max,
    )))
    .with_recorder_config(RecorderConfig::new(cfg.recording.chunk_duration()));

    let snapshot = session.start(setup).await?;
    for message in &snapshot.messages {
        println!("assistant> {}", message.content);
    }
    println!("(commands: /video, /audio, /record, /stop, /save, /end)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/end" => break,
            "/video" => println!("{:?}", session.toggle_video().await?),
            "/audio" => println!("{:?}", session.toggle_audio().await?),
            "/record" => match session.start_recording().await {
                Ok(()) => println!("recording..."),
                Err(e) => println!("{}", e),
            },
            "/stop" => match session.stop_recording().await {
                Ok(chunks) => println!("recording stopped ({} chunk(s))", chunks.len()),
                Err(e) => println!("{}", e),
            },
            "/save" => match session.save_recording().await {
                Ok(recording) => {
                    let path = recording.write_to(Path::new(&cfg.recording.output_dir))?;
                    println!("saved {} bytes to {}", recording.size_bytes, path.display());
                }
                Err(e) => println!("{}", e),
            },
            _ => {
                // The terminal waits for each reply to keep the dialogue readable
                if let Some(turn) = session.send_message(&line).await? {
                    turn.settled().await;
                    if let Some(reply) = session
                        .messages()
                        .await
                        .iter()
                        .rev()
                        .find(|m| m.role == ChatRole::Assistant)
                    {
                        println!("assistant> {}", reply.content);
                    }
                }
            }
        }
    }

    if let Some(stats) = session.end().await {
        println!("{}", FeedbackReport::render(Some(&stats)));
        println!("Duration: {}s", stats.duration);
    }
    Ok(())
}

fn feedback(stats_path: Option<&str>) -> Result<()> {
    let stats = match stats_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path))?;
            let stats: InterviewStats =
                serde_json::from_str(&raw).with_context(|| format!("Invalid stats in {}", path))?;
            Some(stats)
        }
        None => None,
    };

    println!("{}", FeedbackReport::render(stats.as_ref()));
    Ok(())
}

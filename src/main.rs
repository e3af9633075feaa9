use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use streamo::{
    create_router, AnimationTicker, AppState, CaptureDeviceFactory, CommandPlayback, Config,
    FrameCycle, NatsRecognitionService, RecognitionController,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "streamo")]
#[command(about = "Internet radio player with live song recognition")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/streamo")]
    config: String,

    /// Override the stream URL
    #[arg(long)]
    stream_url: Option<String>,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Start playing immediately
    #[arg(long)]
    autoplay: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    streamo::logging::init_logging(args.verbose)?;

    let mut cfg = Config::load(&args.config)?;
    if let Some(url) = args.stream_url {
        cfg.stream.url = url;
    }
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Stream: {}", cfg.stream.url);
    info!("Recognizer: {} ({}.*)", cfg.recognition.nats_url, cfg.recognition.subject_prefix);

    let capture = CaptureDeviceFactory::create(cfg.capture_source()?)?;
    let playback = Box::new(CommandPlayback::new(
        cfg.stream.player.clone(),
        cfg.stream.player_args.clone(),
    ));
    let recognition = Arc::new(
        NatsRecognitionService::connect(
            &cfg.recognition.nats_url,
            &cfg.recognition.subject_prefix,
            cfg.recognition.sample_rate,
            cfg.recognition.channels,
        )
        .await
        .context("Failed to connect to the recognition service")?,
    );

    let controller = Arc::new(RecognitionController::new(
        cfg.controller_options(),
        playback,
        capture,
        recognition,
    ));

    let animation = Arc::new(AnimationTicker::spawn(
        FrameCycle::new(cfg.animation.frame_count),
        cfg.animation.fps,
        controller.watch_state(),
    ));

    if args.autoplay {
        controller.start().await?;
    }

    let state = AppState::new(Arc::clone(&controller)).with_animation(animation);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;

    controller.shutdown().await;

    Ok(())
}

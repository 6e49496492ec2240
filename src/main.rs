use anyhow::Context;
use parley::capture::SpeechCapture;
use parley::provider::{AnthropicProvider, ProviderConfig};
use parley::session::{Session, SessionCommand, SessionWorker};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley");

    let capture = build_capture();

    let mut provider_config = ProviderConfig::default();
    if let Ok(model) = std::env::var("PARLEY_MODEL") {
        provider_config = provider_config.with_model(model);
    }
    let provider =
        AnthropicProvider::new(provider_config).context("failed to initialize model provider")?;

    let session = Session::new(capture, Box::new(provider));
    let (handle, join) = SessionWorker::spawn(session);

    let result = parley::ui::run(handle.clone());

    // Window closed; stop the worker before exiting
    let _ = handle.send_command(SessionCommand::Shutdown);
    if join.join().is_err() {
        warn!("session worker panicked during shutdown");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {e}"))
}

#[cfg(feature = "audio-io")]
fn build_capture() -> Box<dyn SpeechCapture + Send> {
    let mut config = parley::capture::CaptureConfig::default();
    if let Ok(path) = std::env::var("PARLEY_WHISPER_MODEL") {
        config = config.with_model_path(path);
    }
    Box::new(parley::capture::MicrophoneCapture::new(config))
}

#[cfg(not(feature = "audio-io"))]
fn build_capture() -> Box<dyn SpeechCapture + Send> {
    warn!("built without audio-io; voice capture is disabled");
    Box::new(parley::capture::DisabledCapture)
}

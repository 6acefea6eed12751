//! Snooze command-line client.

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use clap::Parser;
    use snooze_player::config::ClientConfig;
    use snooze_player::infrastructure::platform::FileStorageProvider;
    use snooze_player::infrastructure::{HtmlStoryRenderer, HttpStoryApi, TextStoryRenderer};
    use snooze_player::ports::outbound::StoryRenderer;
    use snooze_player::runner::{self, Cli};
    use snooze_player::SessionContext;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snooze_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, storage = %config.storage_path.display(), "Starting snooze");

    let api = Arc::new(HttpStoryApi::new(config.api_url, config.request_timeout));
    let storage = FileStorageProvider::at_path(config.storage_path);
    let mut ctx = SessionContext::new(api, storage);

    let renderer: &dyn StoryRenderer = if cli.html {
        &HtmlStoryRenderer
    } else {
        &TextStoryRenderer
    };

    let output = runner::run(&mut ctx, cli.command, renderer).await?;
    println!("{output}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("snooze-player has no command-line front end in the browser");
}

use std::sync::Arc;
use ignite_lobby::playback::source::GeminiSource;
use ignite_lobby::server;
use ignite_lobby::state::server_state::ServerState;
use ignite_lobby::utils::catalog::Catalog;
use ignite_lobby::utils::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load immutable globals (zero contention)
    let config = Arc::new(Config::from_env());
    setup_logging(&config)?;

    let catalog = Arc::new(Catalog::load());
    let state = Arc::new(ServerState::new());

    if config.gemini_api_key.is_none() {
        log::warn!("No GEMINI_API_KEY/API_KEY set, every match will abort deployment");
    }
    let source = Arc::new(GeminiSource::from_config(&config)?);

    let app_state = server::build_app_state(state, catalog, config, source);
    server::start_servers(app_state).await?;

    Ok(())
}

fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Utc::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(config.log_level)
        .level_for("hyper", log::LevelFilter::Info)
        .level_for("reqwest", log::LevelFilter::Info)
        .chain(std::io::stdout())
        .chain(fern::log_file(&config.log_file)?)
        .apply()?;
    Ok(())
}

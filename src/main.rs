use kinoteatr::{config::Config, flow::Flow, session::SessionStore, tg, tmdb::TmdbClient};
use dotenvy::dotenv;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // без токенов и прокси не стартуем
    let cfg = Config::from_env()?;
    info!(config = ?cfg, "starting");

    let tmdb = TmdbClient::from_config(&cfg)?;
    let bot = Bot::new(cfg.bot_token.clone());
    let flow = Flow::new(tmdb, SessionStore::new());

    tg::run(bot, flow).await;
    Ok(())
}

use crate::config::Config;
use crate::config::state::JsonStateFile;
use crate::core::bot::Bot;
use crate::core::router::Router;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::sheets::GoogleSheets;
use crate::transport::TelegramTransport;
use crate::transport::telegram::PLACEHOLDER_TOKEN;
use crate::ui::messages::{info, warning};

/// Read a secret from the environment, falling back to `placeholder`.
fn secret(var: &str, placeholder: &str) -> String {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => {
            tracing::warn!(var, "secret not set, using placeholder");
            placeholder.to_string()
        }
    }
}

/// Handle the `run` command: start the polling loop.
pub fn handle(cfg: &Config) -> AppResult<()> {
    // .env is optional
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let telegram_token = secret(&cfg.telegram_token_env, PLACEHOLDER_TOKEN);
    let sheets_token = secret(&cfg.sheets_token_env, "");
    if sheets_token.is_empty() {
        warning(format!(
            "{} is not set: every sheet update will fail until it is.",
            cfg.sheets_token_env
        ));
    }

    let transport = TelegramTransport::new(&cfg.telegram_api_url, &telegram_token, cfg.poll_timeout_secs)?;
    let me = transport.verify()?;

    let backend = GoogleSheets::new(&cfg.sheets_api_url, &sheets_token, cfg.worksheet_index)?;
    let router = Router::new(backend, JsonStateFile::new(&cfg.state_file), cfg.admins());

    let audit = match DbPool::open_initialized(&cfg.database) {
        Ok(pool) => Some(pool),
        Err(e) => {
            warning(format!("Audit log disabled: {}", e));
            None
        }
    };

    info(format!(
        "Bot @{} is running. Press Ctrl+C to stop.",
        me.username.as_deref().unwrap_or("unknown")
    ));

    Bot::new(transport, router, audit).run()
}

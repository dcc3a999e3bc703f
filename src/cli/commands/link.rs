use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::state::{JsonStateFile, SheetIdStore};
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::link::extract_sheet_id;

/// Handle the `link` command: set the active sheet without going through chat.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Link { link } = cmd {
        let sheet_id = extract_sheet_id(link)
            .ok_or_else(|| AppError::InvalidArgument(format!("Invalid Google Sheet link: {}", link)))?;

        let mut store = JsonStateFile::new(&cfg.state_file);
        store.save(&sheet_id)?;
        success(format!("Google Sheet linked: {}", sheet_id));

        match DbPool::open_initialized(&cfg.database) {
            Ok(pool) => {
                if let Err(e) = log::ttlog(&pool.conn, "link", &sheet_id, "linked from CLI") {
                    warning(format!("Failed to write internal log: {}", e));
                }
            }
            Err(e) => warning(format!("Failed to open audit database: {}", e)),
        }
    }

    Ok(())
}

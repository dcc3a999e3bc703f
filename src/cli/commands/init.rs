use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the empty state file
///  - the audit database
pub fn handle(dir: &Path, is_test: bool) -> AppResult<()> {
    println!("⚙️  Initializing mealsheet…");

    let cfg = Config::init_all(dir, is_test)?;

    println!("📄 Config file : {}", Config::config_file(dir).display());
    println!("🔗 State file  : {}", cfg.state_file);
    println!("🗄️  Database    : {}", cfg.database);

    let pool = DbPool::open_initialized(&cfg.database)?;

    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "",
        &format!("Initialized in {}", dir.display()),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    if cfg.admin_ids.is_empty() {
        warning("No admin_ids configured: nobody can use /update until you add one.");
    }

    success("mealsheet initialization completed!");
    Ok(())
}

use crate::config::Config;
use crate::config::state::{JsonStateFile, SheetIdStore};
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};

/// Handle the `status` command
pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = JsonStateFile::new(&cfg.state_file);

    match store.load()? {
        Some(id) => {
            info(format!("Active sheet: {}", id));
            info(format!(
                "Link: https://docs.google.com/spreadsheets/d/{}/edit (worksheet #{})",
                id,
                cfg.worksheet_index + 1
            ));
        }
        None => warning("No Google Sheet linked. Use `mealsheet link <url>` or /update <url>."),
    }

    if cfg.admin_ids.is_empty() {
        warning("No admin_ids configured.");
    } else {
        info(format!("Admins: {:?}", cfg.admin_ids));
    }

    Ok(())
}

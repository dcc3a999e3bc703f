//! Message classification and dispatch.

use crate::config::state::SheetIdStore;
use crate::core::resolver::Resolver;
use crate::errors::{AppError, AppResult};
use crate::models::meal_entry::MealEntry;
use crate::models::message::{Classified, InboundMessage};
use crate::models::outcome::Outcome;
use crate::sheets::{CellValue, SheetsBackend};
use crate::utils::date;
use crate::utils::link::extract_sheet_id;
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

const ADMIN_COMMAND: &str = "/update";

static MEAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)meal\s+([0-9]+)").expect("valid meal regex"));

/// Classify a raw message text.
pub fn classify(text: &str) -> Classified {
    let mut tokens = text.split_whitespace();

    if let Some(first) = tokens.next()
        && first.starts_with('/')
    {
        // "/update@my_bot" is how groups address a specific bot
        let command = first.split('@').next().unwrap_or(first);
        if command == ADMIN_COMMAND {
            return Classified::AdminCommand(tokens.next().map(str::to_string));
        }
        return Classified::Ignored;
    }

    MEAL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(Classified::DataMessage)
        .unwrap_or(Classified::Ignored)
}

/// Routes messages to the admin or data handler.
///
/// Handling takes `&mut self`, so at most one resolve-or-create sequence
/// runs against the grid at any time.
pub struct Router<B: SheetsBackend, S: SheetIdStore> {
    backend: B,
    store: S,
    admins: HashSet<i64>,
    clock: fn() -> NaiveDate,
}

impl<B: SheetsBackend, S: SheetIdStore> Router<B, S> {
    pub fn new(backend: B, store: S, admins: HashSet<i64>) -> Self {
        Self {
            backend,
            store,
            admins,
            clock: date::today,
        }
    }

    /// Replace the source of "today" (tests pin the date).
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Classify and handle one message. `None` means the message is ignored.
    pub fn handle(&mut self, msg: &InboundMessage) -> Option<Outcome> {
        let outcome = match classify(&msg.text) {
            Classified::Ignored => return None,
            Classified::AdminCommand(arg) => {
                match self.handle_admin_command(msg.sender_id, arg.as_deref()) {
                    Ok(id) => Outcome::SheetLinked(id),
                    Err(e) => Outcome::Rejected(e),
                }
            }
            Classified::DataMessage(value) => {
                match self.handle_data_message(msg.sender_id, &msg.sender_name, value) {
                    Ok(entry) => Outcome::Recorded(entry),
                    Err(e) => Outcome::Rejected(e),
                }
            }
        };

        if let Outcome::Rejected(e) = &outcome {
            tracing::warn!(sender = msg.sender_id, error = %e, "message rejected");
        }
        Some(outcome)
    }

    /// Authorize `sender_id`, then persist the id found in `link`.
    pub fn handle_admin_command(&mut self, sender_id: i64, link: Option<&str>) -> AppResult<String> {
        if !self.admins.contains(&sender_id) {
            return Err(AppError::Unauthorized);
        }

        let link = link.ok_or_else(|| {
            AppError::InvalidArgument("Usage: /update <Google Sheet link>".to_string())
        })?;

        let sheet_id = extract_sheet_id(link)
            .ok_or_else(|| AppError::InvalidArgument("Invalid Google Sheet link.".to_string()))?;

        self.store.save(&sheet_id)?;
        tracing::info!(sender = sender_id, sheet = %sheet_id, "active sheet updated");
        Ok(sheet_id)
    }

    /// Record `value` for today under the sender's column.
    ///
    /// A row or column created before a later failure stays in the grid.
    pub fn handle_data_message(
        &mut self,
        sender_id: i64,
        sender_name: &str,
        value: u64,
    ) -> AppResult<MealEntry> {
        let sheet_id = self.store.load()?.ok_or(AppError::NotConfigured)?;
        let entry = MealEntry::new((self.clock)(), sender_name, value);

        let mut grid = self.backend.open_by_id(&sheet_id)?;
        let row = Resolver::find_or_create_row(&mut grid, &entry.date_label)?;
        let col = Resolver::find_or_create_column(&mut grid, &entry.user_label)?;
        Resolver::write_cell(&mut grid, row, col, &CellValue::Number(entry.value))?;

        tracing::info!(
            sender = sender_id,
            user = %entry.user_label,
            date = %entry.date_label,
            value,
            row,
            col,
            "meal recorded"
        );
        Ok(entry)
    }
}

use crate::db::log::{LogEntry, entries};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::colors_enabled;
use ansi_term::Colour;

const MAX_OP_WIDTH: usize = 60;

/// ANSI colour for an audit operation
fn color_for_operation(op: &str) -> Colour {
    match op {
        "meal" => Colour::Green,
        "link" => Colour::Blue,
        "refused" => Colour::Red,
        "invalid" | "not_configured" => Colour::Yellow,
        "backend_error" | "error" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

/// One log line, op column padded to `op_w`. With `colour` on, only the
/// operation word is painted.
pub fn format_line(
    e: &LogEntry,
    id_w: usize,
    date_w: usize,
    op_w: usize,
    colour: bool,
) -> String {
    let mut visible = op_target(e);
    if visible.chars().count() > MAX_OP_WIDTH {
        visible = visible.chars().take(MAX_OP_WIDTH - 3).collect::<String>() + "...";
    }
    let pad = " ".repeat(op_w.saturating_sub(visible.chars().count()));

    let painted = match visible.strip_prefix(e.operation.as_str()) {
        Some(rest) if colour && !e.operation.is_empty() => Some(format!(
            "{}{}",
            color_for_operation(&e.operation).paint(e.operation.as_str()),
            rest
        )),
        _ => None,
    };
    let op_column = painted.unwrap_or(visible);

    format!(
        "{:>id_w$}: {:<date_w$} | {}{} => {}",
        e.id,
        e.date,
        op_column,
        pad,
        e.message,
        id_w = id_w,
        date_w = date_w
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let rows = entries(&pool.conn)?;

        if rows.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = rows.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = rows.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = rows
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);
        let colour = colors_enabled();

        println!("📜 Internal log:\n");

        for e in &rows {
            println!("{}", format_line(e, id_w, date_w, op_w, colour));
        }

        Ok(())
    }
}

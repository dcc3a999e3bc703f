use crate::errors::AppError;
use crate::models::meal_entry::MealEntry;

/// Result of handling one non-ignored message.
#[derive(Debug)]
pub enum Outcome {
    Recorded(MealEntry),
    SheetLinked(String),
    Rejected(AppError),
}

impl Outcome {
    /// Text sent back to the sender
    pub fn reply_text(&self) -> String {
        match self {
            Outcome::Recorded(e) => {
                format!("✅ Meal entry recorded for {}: {}", e.user_label, e.value)
            }
            Outcome::SheetLinked(id) => {
                format!("✅ Google Sheet link updated successfully! Now writing to {}.", id)
            }
            Outcome::Rejected(AppError::Unauthorized) => format!("❌ {}", AppError::Unauthorized),
            Outcome::Rejected(AppError::BackendUnavailable(detail)) => {
                format!("⚠️ Could not update the Google Sheet: {}", detail)
            }
            Outcome::Rejected(e) => format!("⚠️ {}", e),
        }
    }

    /// (operation, target, message) triple for the audit log
    pub fn audit(&self) -> (&'static str, String, String) {
        match self {
            Outcome::Recorded(e) => (
                "meal",
                format!("{} {}", e.date_label, e.user_label),
                format!("value {}", e.value),
            ),
            Outcome::SheetLinked(id) => ("link", id.clone(), "active sheet changed".to_string()),
            Outcome::Rejected(err) => (err.audit_tag(), String::new(), err.to_string()),
        }
    }
}

use chrono::NaiveDate;

/// One `meal <n>` report, ready to be written into the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealEntry {
    pub date_label: String,
    pub user_label: String,
    pub value: u64,
}

impl MealEntry {
    pub fn new(date: NaiveDate, sender_name: &str, value: u64) -> Self {
        Self {
            date_label: date.format("%Y-%m-%d").to_string(),
            user_label: sender_name.to_lowercase(),
            value,
        }
    }
}

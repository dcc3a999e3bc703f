use chrono::NaiveDate;

/// Today's calendar date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

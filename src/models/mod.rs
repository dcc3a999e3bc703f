pub mod meal_entry;
pub mod message;
pub mod outcome;

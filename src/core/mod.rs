pub mod bot;
pub mod log;
pub mod resolver;
pub mod router;

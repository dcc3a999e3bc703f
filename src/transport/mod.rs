//! Chat transport interface.

use crate::errors::AppResult;
use crate::models::message::InboundMessage;

pub mod telegram;

pub use telegram::TelegramTransport;

pub trait ChatTransport {
    /// Block until the next batch of text messages is available (possibly empty).
    fn poll(&mut self) -> AppResult<Vec<InboundMessage>>;

    /// Send `text` back to the chat `to` came from.
    fn reply(&mut self, to: &InboundMessage, text: &str) -> AppResult<()>;
}

/// A text message received from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub message_id: i64,
    pub sender_id: i64,
    /// Sender's display (first) name as shown by the chat platform
    pub sender_name: String,
    pub text: String,
}

/// What an inbound message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// `/update <link>`; the link is absent when the command had no argument
    AdminCommand(Option<String>),
    /// `meal <n>`
    DataMessage(u64),
    Ignored,
}

//! Telegram Bot API over long polling.

use super::ChatTransport;
use crate::errors::{AppError, AppResult};
use crate::models::message::InboundMessage;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

/// Used when no token is configured; Telegram rejects it on the first call.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_TELEGRAM_BOT_TOKEN";

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    #[serde(default)]
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    message_id: i64,
    chat: Chat,
    #[serde(default)]
    from: Option<User>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    first_name: String,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl Update {
    /// Text messages with a known sender; everything else is dropped.
    fn into_inbound(self) -> Option<InboundMessage> {
        let msg = self.message?;
        let from = msg.from?;
        let text = msg.text?;
        Some(InboundMessage {
            chat_id: msg.chat.id,
            message_id: msg.message_id,
            sender_id: from.id,
            sender_name: from.first_name,
            text,
        })
    }
}

pub struct TelegramTransport {
    client: Client,
    api_base: Url,
    poll_timeout_secs: u64,
    offset: i64,
}

impl TelegramTransport {
    pub fn new(api_url: &str, token: &str, poll_timeout_secs: u64) -> AppResult<Self> {
        let api_base = Url::parse(&format!("{}/bot{}/", api_url.trim_end_matches('/'), token))
            .map_err(|e| AppError::Config(format!("invalid telegram_api_url '{}': {}", api_url, e)))?;

        // The HTTP timeout must outlive the long-poll window
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()?;

        Ok(Self {
            client,
            api_base,
            poll_timeout_secs,
            offset: 0,
        })
    }

    fn method_url(&self, method: &str) -> AppResult<Url> {
        self.api_base
            .join(method)
            .map_err(|e| AppError::Transport(e.to_string()))
    }

    fn call<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> AppResult<T> {
        let resp: ApiResponse<T> = self
            .client
            .post(self.method_url(method)?)
            .json(&body)
            .send()?
            .json()?;

        if !resp.ok {
            return Err(AppError::Transport(format!(
                "{} failed: {}",
                method,
                resp.description.unwrap_or_else(|| "unknown error".into())
            )));
        }
        resp.result
            .ok_or_else(|| AppError::Transport(format!("{} returned no result", method)))
    }

    /// Check the token against the API; fails fast on a bad or placeholder token.
    pub fn verify(&self) -> AppResult<BotInfo> {
        let info: BotInfo = self.call("getMe", json!({}))?;
        tracing::info!(bot_id = info.id, username = ?info.username, "telegram token verified");
        Ok(info)
    }
}

impl ChatTransport for TelegramTransport {
    fn poll(&mut self) -> AppResult<Vec<InboundMessage>> {
        let updates: Vec<Update> = self.call(
            "getUpdates",
            json!({
                "offset": self.offset,
                "timeout": self.poll_timeout_secs,
                "allowed_updates": ["message"],
            }),
        )?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.offset = last + 1;
        }

        let messages: Vec<InboundMessage> =
            updates.into_iter().filter_map(Update::into_inbound).collect();
        tracing::debug!(count = messages.len(), offset = self.offset, "polled updates");
        Ok(messages)
    }

    fn reply(&mut self, to: &InboundMessage, text: &str) -> AppResult<()> {
        let _: serde_json::Value = self.call(
            "sendMessage",
            json!({
                "chat_id": to.chat_id,
                "text": text,
                "reply_parameters": { "message_id": to.message_id },
            }),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn method_urls_include_token() {
        let t = TelegramTransport::new("https://api.telegram.org/", "123:abc", 30).unwrap();
        assert_eq!(
            t.method_url("getUpdates").unwrap().as_str(),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn updates_are_filtered_to_text_messages() {
        let raw = r#"{
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 5},
                  "from": {"id": 7, "first_name": "Alice", "is_bot": false}, "text": "meal 3"}},
                {"update_id": 11, "message": {"message_id": 2, "chat": {"id": 5},
                  "from": {"id": 7, "first_name": "Alice"}, "sticker": {}}},
                {"update_id": 12, "edited_message": {}}
            ]
        }"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(resp.ok);
        let msgs: Vec<InboundMessage> = resp
            .result
            .unwrap()
            .into_iter()
            .filter_map(Update::into_inbound)
            .collect();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].sender_name, "Alice");
        assert_eq!(msgs[0].sender_id, 7);
        assert_eq!(msgs[0].text, "meal 3");
    }

    #[test]
    fn error_response_carries_description() {
        let raw = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let resp: ApiResponse<BotInfo> = serde_json::from_str(raw).unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn poll_advances_the_offset() {
        let mut server = mockito::Server::new();
        let first = server
            .mock("POST", "/botTEST/getUpdates")
            .match_body(Matcher::Json(json!({
                "offset": 0,
                "timeout": 30,
                "allowed_updates": ["message"],
            })))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok": true, "result": [
                    {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 5},
                      "from": {"id": 7, "first_name": "Alice"}, "text": "meal 3"}},
                    {"update_id": 11, "message": {"message_id": 2, "chat": {"id": 6},
                      "from": {"id": 8, "first_name": "Bob"}, "text": "meal 5"}}
                ]}"#,
            )
            .create();
        let second = server
            .mock("POST", "/botTEST/getUpdates")
            .match_body(Matcher::PartialJson(json!({ "offset": 12 })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": []}"#)
            .create();

        let mut t = TelegramTransport::new(&server.url(), "TEST", 30).unwrap();
        let msgs = t.poll().unwrap();
        assert_eq!(msgs.len(), 2);
        assert_eq!((msgs[1].chat_id, msgs[1].sender_name.as_str()), (6, "Bob"));
        assert_eq!(t.offset, 12);

        assert!(t.poll().unwrap().is_empty());
        assert_eq!(t.offset, 12);
        first.assert();
        second.assert();
    }

    #[test]
    fn reply_quotes_the_original_message() {
        let mut server = mockito::Server::new();
        let send = server
            .mock("POST", "/botTEST/sendMessage")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "chat_id": 5,
                "text": "hi",
                "reply_parameters": { "message_id": 1 },
            })))
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true, "result": {"message_id": 2}}"#)
            .create();

        let mut t = TelegramTransport::new(&server.url(), "TEST", 30).unwrap();
        let to = InboundMessage {
            chat_id: 5,
            message_id: 1,
            sender_id: 7,
            sender_name: "Alice".into(),
            text: "meal 3".into(),
        };
        t.reply(&to, "hi").unwrap();
        send.assert();
    }

    #[test]
    fn rejected_token_fails_verify() {
        let mut server = mockito::Server::new();
        let _me = server
            .mock("POST", "/botTEST/getMe")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#)
            .create();

        let t = TelegramTransport::new(&server.url(), "TEST", 30).unwrap();
        let err = t.verify().unwrap_err();
        assert!(matches!(&err, AppError::Transport(m) if m == "getMe failed: Unauthorized"));
    }
}

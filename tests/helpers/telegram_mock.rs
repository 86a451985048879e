//! Mock Telegram API server
//!
//! A wiremock server answering the Bot API methods the handlers call, so a
//! real `Bot` can be pointed at it and the sent messages inspected.

use serde_json::{json, Value};
use teloxide::types::{CallbackQuery, Message};
use teloxide::Bot;
use url::Url;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "12345:test_token";

pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Start a server with sendMessage and answerCallbackQuery mounted
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let mock = Self { server };
        mock.mock_send_message().await;
        mock.mock_answer_callback_query().await;
        mock
    }

    /// Bot whose requests go to this server
    pub fn bot(&self) -> Bot {
        let url = Url::parse(&self.server.uri()).expect("mock server uri is a valid url");
        Bot::new(TEST_TOKEN).set_api_url(url)
    }

    async fn mock_send_message(&self) {
        let body = json!({
            "ok": true,
            "result": {
                "message_id": 123,
                "from": {
                    "id": 12345,
                    "is_bot": true,
                    "first_name": "EventHubBot",
                    "username": "event_hub_bot"
                },
                "chat": {
                    "id": 42,
                    "type": "private",
                    "first_name": "Test"
                },
                "date": 1704067200,
                "text": "ok"
            }
        });

        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    async fn mock_answer_callback_query(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)^/bot[^/]+/answercallbackquery$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
            .mount(&self.server)
            .await;
    }

    /// Texts of every sendMessage call, in order
    pub async fn sent_texts(&self) -> Vec<String> {
        let requests = self.server.received_requests().await.unwrap_or_default();
        requests
            .iter()
            .filter(|r| r.url.path().to_lowercase().ends_with("/sendmessage"))
            .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
            .filter_map(|body| body.get("text").and_then(Value::as_str).map(str::to_string))
            .collect()
    }

    /// Callback payloads of the inline buttons in the last sent message
    pub async fn last_keyboard(&self) -> Vec<String> {
        let requests = self.server.received_requests().await.unwrap_or_default();
        let Some(body) = requests
            .iter()
            .rev()
            .find(|r| r.url.path().to_lowercase().ends_with("/sendmessage"))
            .and_then(|r| serde_json::from_slice::<Value>(&r.body).ok())
        else {
            return Vec::new();
        };

        body.pointer("/reply_markup/inline_keyboard")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .filter_map(Value::as_array)
                    .flatten()
                    .filter_map(|button| button.get("callback_data").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Text message sent by the given user in their private chat
pub fn text_message(from: i64, text: &str) -> Message {
    serde_json::from_value(json!({
        "message_id": 1,
        "date": 1704067200,
        "chat": {
            "id": from,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": from,
            "is_bot": false,
            "first_name": "Test"
        },
        "text": text
    }))
    .expect("valid message")
}

/// Callback query from a private chat with the given user
pub fn callback_query(from: i64, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "cbq-1",
        "from": {
            "id": from,
            "is_bot": false,
            "first_name": "Test"
        },
        "chat_instance": "instance-1",
        "data": data
    }))
    .expect("valid callback query")
}

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    ChatRequest, ChatResponse, ErrorBody, HistoryResponse, Message, SessionId, SessionsResponse,
};

/// The remote chat backend as the widget consumes it.
///
/// Browser futures are not `Send`, hence `?Send`.
#[async_trait(?Send)]
pub trait ChatApi {
    /// `GET /api/chat/sessions`
    async fn list_sessions(&self) -> Result<Vec<SessionId>, ApiError>;

    /// `GET /api/chat/history/{session_id}`; a missing `history` field is an
    /// empty history.
    async fn fetch_history(&self, session_id: &SessionId) -> Result<Vec<Message>, ApiError>;

    /// `POST /api/chat`, returning the bot's reply text.
    async fn send_message(&self, session_id: &SessionId, message: &str) -> Result<String, ApiError>;
}

/// `ChatApi` over `window.fetch`. No retry, timeout or auth.
#[derive(Clone, Debug, Default)]
pub struct HttpChatApi {
    config: ApiConfig,
}

impl HttpChatApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let opts = web_sys::RequestInit::new();
        opts.set_method("GET");
        let request = web_sys::Request::new_with_str_and_init(url.as_str(), &opts)?;
        self.execute(request).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;

        let headers = web_sys::Headers::new()?;
        headers.set("Content-Type", "application/json")?;

        let opts = web_sys::RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(headers.as_ref());
        opts.set_body(&JsValue::from_str(&payload));

        let request = web_sys::Request::new_with_str_and_init(url.as_str(), &opts)?;
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: web_sys::Request) -> Result<T, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Network("window not available".to_string()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: web_sys::Response = resp_value.dyn_into()?;

        if !resp.ok() {
            let status = resp.status();
            let text = JsFuture::from(resp.text()?).await?;
            log::debug!("{} {} -> HTTP {}", request.method(), request.url(), status);
            return Err(error_from_body(status, text.as_string()));
        }

        let json = JsFuture::from(resp.json()?).await?;
        Ok(serde_wasm_bindgen::from_value(json)?)
    }
}

/// Builds the error for a non-2xx response. The body counts only when it is
/// a JSON `ErrorBody`; anything else leaves it out.
pub(crate) fn error_from_body(status: u16, raw: Option<String>) -> ApiError {
    let body = raw.and_then(|raw| serde_json::from_str::<ErrorBody>(&raw).ok());
    ApiError::Status { status, body }
}

#[async_trait(?Send)]
impl ChatApi for HttpChatApi {
    async fn list_sessions(&self) -> Result<Vec<SessionId>, ApiError> {
        let resp: SessionsResponse = self.get_json(self.config.sessions_url()).await?;
        Ok(resp.session_ids)
    }

    async fn fetch_history(&self, session_id: &SessionId) -> Result<Vec<Message>, ApiError> {
        let resp: HistoryResponse = self.get_json(self.config.history_url(session_id)).await?;
        Ok(resp.history)
    }

    async fn send_message(&self, session_id: &SessionId, message: &str) -> Result<String, ApiError> {
        let body = ChatRequest { message, session_id };
        let resp: ChatResponse = self.post_json(self.config.chat_url(), &body).await?;
        Ok(resp.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_from_structured_body() {
        let raw = r#"{"error":"rate_limited","details":{"retry_after":5}}"#.to_string();
        let err = error_from_body(429, Some(raw));
        assert_eq!(
            err,
            ApiError::Status {
                status: 429,
                body: Some(ErrorBody {
                    error: Some("rate_limited".to_string()),
                    details: Some(json!({"retry_after": 5})),
                }),
            }
        );
        let text = err.transcript_text();
        assert!(text.contains("rate_limited"));
        assert!(text.contains(r#"{"retry_after":5}"#));
    }

    #[test]
    fn test_error_from_non_json_body() {
        let err = error_from_body(502, Some("<html>Bad Gateway</html>".to_string()));
        assert_eq!(err, ApiError::Status { status: 502, body: None });
        assert!(err.transcript_text().contains(crate::error::UNKNOWN_ERROR_TEXT));
    }

    #[test]
    fn test_error_from_empty_body() {
        assert_eq!(
            error_from_body(500, Some(String::new())),
            ApiError::Status { status: 500, body: None }
        );
        assert_eq!(error_from_body(500, None), ApiError::Status { status: 500, body: None });
    }

    #[test]
    fn test_error_body_without_error_field() {
        let err = error_from_body(400, Some(r#"{"details":{"field":"message"}}"#.to_string()));
        let text = err.transcript_text();
        assert!(text.contains(crate::error::UNKNOWN_ERROR_TEXT));
        assert!(text.contains(r#"{"field":"message"}"#));
    }
}

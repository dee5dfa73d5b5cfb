//! Minimal JSON-over-HTTP transport for browser calls.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): every call fails with a transport error since these
//! endpoints are only meaningful in the browser.

#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)]

/// HTTP verbs used against the hosted backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Raw reply: status plus the undecoded body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send a request with the given headers and optional JSON body.
///
/// # Errors
///
/// Returns a transport error string when the request cannot be sent or the
/// body cannot be read. Non-2xx statuses are not errors here.
pub async fn send(
    method: Method,
    url: &str,
    headers: &[(&str, String)],
    body: Option<&serde_json::Value>,
) -> Result<HttpReply, String> {
    #[cfg(feature = "hydrate")]
    {
        let mut builder = match method {
            Method::Get => gloo_net::http::Request::get(url),
            Method::Post => gloo_net::http::Request::post(url),
        };
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let resp = match body {
            Some(json) => builder.json(json).map_err(|e| e.to_string())?.send().await,
            None => builder.send().await,
        }
        .map_err(|e| e.to_string())?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| e.to_string())?;
        Ok(HttpReply { status, body })
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (method, url, headers, body);
        Err("not available on server".to_owned())
    }
}

/// Something that can carry a JSON request to the backend.
///
/// The browser implementation is `BrowserTransport`; tests substitute a
/// scripted one.
pub trait Transport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, String>;
}

/// `Transport` backed by [`send`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<HttpReply, String> {
        send(method, url, headers, body).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// Recognizes the common `{ "msg" | "message" | "error_description" | "error" }`
/// shapes and falls back to the raw body, then to the status line.
#[must_use]
pub fn error_message(reply: &HttpReply) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&reply.body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                if !text.trim().is_empty() {
                    return text.to_owned();
                }
            }
        }
    }
    let trimmed = reply.body.trim();
    if trimmed.is_empty() { format!("request failed: {}", reply.status) } else { trimmed.to_owned() }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

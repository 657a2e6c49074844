//! Recording transport for unit tests.

use std::collections::VecDeque;
use std::io;

use serde_json::Value;

use crate::http::{ApiRequest, RawResponse, Transport};
use crate::{Result, ZendeskApiError};

enum Reply {
    Response(RawResponse),
    Fail(String),
}

/// Replays queued replies in order and records every request it sees.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: VecDeque<Reply>,
    requests: Vec<ApiRequest>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, status: u16, body: Value) -> Self {
        self.reply_raw(status, &body.to_string())
    }

    pub(crate) fn reply_raw(mut self, status: u16, body: &str) -> Self {
        self.replies.push_back(Reply::Response(RawResponse {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: body.to_string(),
        }));
        self
    }

    /// Add a header to the most recently queued reply.
    pub(crate) fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Some(Reply::Response(resp)) = self.replies.back_mut() {
            resp.headers.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub(crate) fn fail_with(mut self, message: &str) -> Self {
        self.replies.push_back(Reply::Fail(message.to_string()));
        self
    }

    pub(crate) fn requests(&self) -> &[ApiRequest] {
        &self.requests
    }

    /// `"{METHOD} {endpoint}"` for each recorded request.
    pub(crate) fn request_lines(&self) -> Vec<String> {
        self.requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.endpoint))
            .collect()
    }
}

impl Transport for MockTransport {
    fn send(&mut self, request: &ApiRequest) -> Result<RawResponse> {
        self.requests.push(request.clone());
        match self.replies.pop_front() {
            Some(Reply::Response(resp)) => Ok(resp),
            Some(Reply::Fail(message)) => Err(ZendeskApiError::Io(io::Error::other(message))),
            None => Err(ZendeskApiError::Io(io::Error::other("no reply queued"))),
        }
    }
}

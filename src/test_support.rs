//! Scripted transport and fixtures shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::net::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::net::types::User;

/// Replies with queued responses in order and records every request sent.
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse { status, body: body.to_owned() }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(TransportError::Other(message.to_owned())));
        self
    }

    fn push(&self, reply: Result<HttpResponse, TransportError>) {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push_back(reply);
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.sent().pop()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_owned())))
    }
}

pub fn alice() -> User {
    User { id: 1, github_id: 2, username: "alice".to_owned(), email: None, avatar_url: None }
}

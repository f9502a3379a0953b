use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ArcStr;

/// What a mocked URL answers with.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A successful response with this body
    Body(ArcStr),
    /// A failed request with this error message
    Error(ArcStr),
}

impl MockResponse {
    pub fn body(body: impl Into<ArcStr>) -> Self {
        Self::Body(body.into())
    }

    pub fn error(message: impl Into<ArcStr>) -> Self {
        Self::Error(message.into())
    }
}

#[derive(Debug, Default)]
struct State {
    responses: HashMap<ArcStr, MockResponse>,
    requests: HashMap<ArcStr, usize>,
}

/// Mock implementation of the Net actor for testing purposes.
///
/// Answers GET requests from a URL-keyed table and counts how many times each
/// URL was requested, so tests can assert on fetch behavior.
#[derive(Debug, Clone)]
pub struct Mock {
    state: Arc<Mutex<State>>,
}

impl Mock {
    pub fn new(responses: HashMap<ArcStr, MockResponse>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                responses,
                requests: HashMap::new(),
            })),
        }
    }

    pub async fn get(&self, url: ArcStr) -> anyhow::Result<ArcStr> {
        let mut state = self.state.lock().await;
        *state.requests.entry(url.clone()).or_default() += 1;
        match state.responses.get(&url) {
            Some(MockResponse::Body(body)) => Ok(body.clone()),
            Some(MockResponse::Error(message)) => {
                Err(anyhow::anyhow!("GET request failed for URL: {url}: {message}"))
            }
            None => Err(anyhow::anyhow!(
                "GET request not found in mock responses: {url}"
            )),
        }
    }

    pub async fn request_count(&self, url: &str) -> usize {
        let state = self.state.lock().await;
        state.requests.get(url).copied().unwrap_or(0)
    }
}

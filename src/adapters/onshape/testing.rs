//! In-memory [`Transport`] with scripted replies
//!
//! Replies are registered per URL pattern; a request matches the longest
//! pattern that equals or ends its URL. Several replies for one pattern are
//! served in order, and the last one repeats. Unmatched requests get a 404.

use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::domain::{ApiError, ExporterError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Reply {
    Response(ApiResponse),
    ConnectionError(String),
}

#[derive(Debug)]
struct Route {
    pattern: String,
    replies: VecDeque<Reply>,
}

/// Transport double that records every request
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedTransport {
    /// Creates a transport with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for URLs ending with `pattern`
    pub fn respond(&self, pattern: &str, response: ApiResponse) {
        self.push(pattern, Reply::Response(response));
    }

    /// Queues a connection failure for URLs ending with `pattern`
    pub fn fail(&self, pattern: &str, message: &str) {
        self.push(pattern, Reply::ConnectionError(message.to_string()));
    }

    fn push(&self, pattern: &str, reply: Reply) {
        let mut routes = lock(&self.routes);
        match routes.iter_mut().find(|r| r.pattern == pattern) {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                pattern: pattern.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        lock(&self.requests).clone()
    }

    /// Number of requests whose URL ends with `pattern`
    pub fn count(&self, pattern: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|r| r.url.ends_with(pattern))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = request.url.clone();
        lock(&self.requests).push(request);

        let mut routes = lock(&self.routes);
        let route = routes
            .iter_mut()
            .filter(|r| url == r.pattern || url.ends_with(&r.pattern))
            .max_by_key(|r| r.pattern.len());

        let reply = match route {
            Some(route) if route.replies.len() > 1 => route.replies.pop_front(),
            Some(route) => route.replies.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::ConnectionError(message)) => {
                Err(ExporterError::Api(ApiError::ConnectionFailed(message)))
            }
            None => Ok(ApiResponse::new(404, format!("no scripted reply for {url}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_repeat_last() {
        let transport = ScriptedTransport::new();
        transport.respond("/a", ApiResponse::new(200, "1"));
        transport.respond("/a", ApiResponse::new(200, "2"));

        let mut bodies = Vec::new();
        for _ in 0..3 {
            bodies.push(transport.send(ApiRequest::get("/x/a")).await.unwrap().body);
        }

        assert_eq!(bodies, vec![b"1".to_vec(), b"2".to_vec(), b"2".to_vec()]);
        assert_eq!(transport.count("/a"), 3);
    }

    #[tokio::test]
    async fn test_longest_pattern_wins_and_unmatched_is_404() {
        let transport = ScriptedTransport::new();
        transport.respond("/b", ApiResponse::new(200, "short"));
        transport.respond("/long/b", ApiResponse::new(200, "long"));

        let response = transport.send(ApiRequest::get("/very/long/b")).await.unwrap();
        assert_eq!(response.body, b"long");

        let response = transport.send(ApiRequest::get("/c")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let transport = ScriptedTransport::new();
        transport.fail("/down", "refused");

        let result = transport.send(ApiRequest::get("/down")).await;
        assert!(matches!(
            result,
            Err(ExporterError::Api(ApiError::ConnectionFailed(_)))
        ));
    }
}

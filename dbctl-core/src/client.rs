//! Database client capability and a scripted mock for testing
//!
//! The connection manager only sequences calls into a client; it never
//! sees wire protocols or pools.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

/// One result row: column name to JSON value, in SELECT-list order
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Trait for the underlying database client (testable)
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn connect(&mut self) -> Result<(), Self::Error>;

    async fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Execute a raw SQL statement and return all rows
    async fn query_raw(&self, sql: &str) -> Result<Vec<RawRow>, Self::Error>;
}

/// Error returned by [`MockClient`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

impl MockError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Debug, Default)]
struct MockScript {
    connect_error: Option<MockError>,
    query_error: Option<MockError>,
    disconnect_error: Option<MockError>,
    rows: Option<Vec<RawRow>>,
    queries: Vec<String>,
}

/// Call counters shared between a [`MockClient`] and the test holding it
#[derive(Debug, Default)]
pub struct MockCalls {
    pub connect: AtomicUsize,
    pub disconnect: AtomicUsize,
    pub query: AtomicUsize,
}

impl MockCalls {
    pub fn connects(&self) -> usize {
        self.connect.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnect.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.query.load(Ordering::SeqCst)
    }
}

/// Mock database client for testing
///
/// Succeeds by default and answers every query with `[{"ok": 1}]`.
#[derive(Debug, Default)]
pub struct MockClient {
    script: Mutex<MockScript>,
    calls: Arc<MockCalls>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connect(self, msg: impl Into<String>) -> Self {
        self.script.lock().unwrap().connect_error = Some(MockError::new(msg));
        self
    }

    pub fn fail_query(self, msg: impl Into<String>) -> Self {
        self.script.lock().unwrap().query_error = Some(MockError::new(msg));
        self
    }

    pub fn fail_disconnect(self, msg: impl Into<String>) -> Self {
        self.script.lock().unwrap().disconnect_error = Some(MockError::new(msg));
        self
    }

    pub fn with_rows(self, rows: Vec<RawRow>) -> Self {
        self.script.lock().unwrap().rows = Some(rows);
        self
    }

    /// Handle to the call counters, valid after the client is moved
    pub fn calls(&self) -> Arc<MockCalls> {
        Arc::clone(&self.calls)
    }

    /// SQL text of every query issued so far
    pub fn queries(&self) -> Vec<String> {
        self.script.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    type Error = MockError;

    async fn connect(&mut self) -> Result<(), MockError> {
        self.calls.connect.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().connect_error.clone();
        match scripted {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn disconnect(&mut self) -> Result<(), MockError> {
        self.calls.disconnect.fetch_add(1, Ordering::SeqCst);
        let scripted = self.script.lock().unwrap().disconnect_error.clone();
        match scripted {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn query_raw(&self, sql: &str) -> Result<Vec<RawRow>, MockError> {
        self.calls.query.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        script.queries.push(sql.to_string());
        if let Some(err) = script.query_error.clone() {
            return Err(err);
        }
        Ok(script.rows.clone().unwrap_or_else(|| {
            let mut row = RawRow::new();
            row.insert("ok".to_string(), serde_json::json!(1));
            vec![row]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_client_succeeds_by_default() {
        let mut mock = MockClient::new();
        let calls = mock.calls();

        mock.connect().await.unwrap();
        let rows = mock.query_raw("SELECT 1 as ok").await.unwrap();
        mock.disconnect().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["ok"], serde_json::json!(1));
        assert_eq!(calls.connects(), 1);
        assert_eq!(calls.queries(), 1);
        assert_eq!(calls.disconnects(), 1);
        assert_eq!(mock.queries(), vec!["SELECT 1 as ok".to_string()]);
    }

    #[tokio::test]
    async fn mock_client_scripted_failures() {
        let mut mock = MockClient::new()
            .fail_connect("refused")
            .fail_query("syntax")
            .fail_disconnect("gone");

        assert_eq!(mock.connect().await, Err(MockError::new("refused")));
        assert_eq!(mock.query_raw("SELECT").await, Err(MockError::new("syntax")));
        assert_eq!(mock.disconnect().await, Err(MockError::new("gone")));
    }
}

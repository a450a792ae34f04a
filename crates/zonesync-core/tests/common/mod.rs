//! Test doubles and common utilities for engine contract tests
//!
//! `MockRemoteClient` behaves like a tiny provider: it stores rows, hands
//! out ids on create, removes rows on delete, and records every call.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zonesync_core::error::{Error, Result};
use zonesync_core::record::{DesiredRecord, RawRecord, RecordParams};
use zonesync_core::traits::{RemoteClient, ZoneSink};

/// One call seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `fetch_records(zone)`
    Fetch(String),
    /// `create_record(zone, params)`
    Create(String, RecordParams),
    /// `delete_record(zone, id)`
    Delete(String, String),
}

/// Failure to inject into a mock call
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    BadRequest,
    Unauthorized,
    Status(u16),
}

impl Failure {
    fn to_error(self) -> Error {
        match self {
            Failure::BadRequest => Error::BadRequest,
            Failure::Unauthorized => Error::Unauthorized,
            Failure::Status(status) => Error::request_failed(status, "injected"),
        }
    }
}

#[derive(Debug)]
struct MockState {
    rows: Vec<RawRecord>,
    next_id: u64,
    calls: Vec<Call>,
    fail_fetch: Option<Failure>,
    fail_create_at: Option<(usize, Failure)>,
    fail_delete: Option<Failure>,
    create_attempts: usize,
}

/// A provider double that tracks calls
///
/// Clones share state, so a test can keep one handle while the engine
/// owns another.
#[derive(Debug, Clone)]
pub struct MockRemoteClient {
    state: Arc<Mutex<MockState>>,
}

impl MockRemoteClient {
    /// Empty provider
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Provider preloaded with rows
    pub fn with_rows(rows: Vec<RawRecord>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                rows,
                next_id: 1000,
                calls: Vec::new(),
                fail_fetch: None,
                fail_create_at: None,
                fail_delete: None,
                create_attempts: 0,
            })),
        }
    }

    /// Make (or stop making) every fetch fail
    pub fn fail_fetch(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().fail_fetch = failure;
    }

    /// Fail the n-th create attempt from now on (0-based)
    pub fn fail_nth_create(&self, n: usize, failure: Failure) {
        let mut state = self.state.lock().unwrap();
        let at = state.create_attempts + n;
        state.fail_create_at = Some((at, failure));
    }

    /// Make every delete fail
    pub fn fail_deletes(&self, failure: Failure) {
        self.state.lock().unwrap().fail_delete = Some(failure);
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Number of fetch calls
    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Fetch(_)))
            .count()
    }

    /// Bodies of every create call
    pub fn creates(&self) -> Vec<RecordParams> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(_, params) => Some(params),
                _ => None,
            })
            .collect()
    }

    /// Ids of every delete call
    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Delete(_, id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Rows currently stored
    pub fn rows(&self) -> Vec<RawRecord> {
        self.state.lock().unwrap().rows.clone()
    }
}

#[async_trait]
impl RemoteClient for MockRemoteClient {
    async fn fetch_records(&self, zone: &str) -> Result<Vec<RawRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Fetch(zone.to_string()));

        if let Some(failure) = state.fail_fetch {
            return Err(failure.to_error());
        }
        Ok(state.rows.clone())
    }

    async fn create_record(&self, zone: &str, params: &RecordParams) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(zone.to_string(), params.clone()));

        let attempt = state.create_attempts;
        state.create_attempts += 1;
        if let Some((at, failure)) = state.fail_create_at
            && at == attempt
        {
            return Err(failure.to_error());
        }

        let id = state.next_id.to_string();
        state.next_id += 1;
        state.rows.push(RawRecord {
            id,
            source: params.source.clone(),
            record_type: params.record_type.as_str().to_string(),
            ttl: params.ttl,
            target: params.target.clone(),
        });
        Ok(())
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(Call::Delete(zone.to_string(), record_id.to_string()));

        if let Some(failure) = state.fail_delete {
            return Err(failure.to_error());
        }
        state.rows.retain(|row| row.id != record_id);
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "mock"
    }
}

/// A sink that accepts any name and keeps everything
pub struct VecSink {
    pub name: String,
    pub records: Vec<DesiredRecord>,
}

impl VecSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            records: Vec::new(),
        }
    }
}

impl ZoneSink for VecSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_record(&mut self, record: DesiredRecord, _lenient: bool) -> Result<()> {
        self.records.push(record);
        Ok(())
    }
}

/// Shorthand for a provider row
pub fn raw(id: &str, source: &str, record_type: &str, ttl: u32, target: &str) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        source: source.to_string(),
        record_type: record_type.to_string(),
        ttl,
        target: target.to_string(),
    }
}

/// The zone most tests run against
pub const ZONE: &str = "example.com.";

/// `ZONE` as the provider API sees it
pub const API_ZONE: &str = "example.com";

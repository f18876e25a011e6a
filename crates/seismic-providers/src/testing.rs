//! Deterministic stand-ins for the network and the timer.
//!
//! Used by this crate's tests and by downstream crates that want to drive
//! the pipeline without touching the network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::BoxFuture;
use crate::retry::Sleeper;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// A transport that replays a fixed sequence of results.
///
/// Once the script is exhausted every further call fails with a network
/// error, which makes unexpected extra requests visible in tests.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ProviderResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport answering with `responses` in order.
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self::from_results(responses.into_iter().map(Ok).collect())
    }

    /// Creates a transport replaying successes and failures in order.
    pub fn from_results(results: Vec<ProviderResult<HttpResponse>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Appends a response to the script.
    pub fn push(&self, response: HttpResponse) {
        lock(&self.script).push_back(Ok(response));
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get<'a>(&'a self, request: &'a HttpRequest) -> BoxFuture<'a, ProviderResult<HttpResponse>> {
        lock(&self.requests).push(request.clone());
        let next = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::network("no scripted response left")));
        Box::pin(async move { next })
    }
}

/// A sleeper that returns immediately and remembers what it was asked.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Durations requested so far, oldest first.
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        lock(&self.sleeps).push(duration);
        Box::pin(async {})
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

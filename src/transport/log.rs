//! Bounded log of recent exchanges with the game API, for diagnostics.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::DEFAULT_LOG_CAPACITY;

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A response arrived, successful or not.
    Response {
        status: u16,
    },
    /// The request failed before producing a response.
    Error {
        message: String,
    },
    /// The request was cancelled client-side. Never recorded - cancellations
    /// are noise, not real exchanges.
    Cancelled,
}

/// One request/response (or error) record.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub outcome: ExchangeOutcome,
}

impl Exchange {
    pub fn new(method: impl Into<String>, url: impl Into<String>, outcome: ExchangeOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            time: Utc::now(),
            method: method.into(),
            url: url.into(),
            outcome,
        }
    }

    /// The response status, if a response arrived.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            ExchangeOutcome::Response { status } => Some(status),
            _ => None,
        }
    }

    fn was_cancelled(&self) -> bool {
        matches!(self.outcome, ExchangeOutcome::Cancelled)
    }
}

/// Ring buffer of the most recent exchanges, oldest first.
#[derive(Debug)]
pub struct ExchangeLog {
    capacity: usize,
    exchanges: VecDeque<Exchange>,
}

impl ExchangeLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            exchanges: VecDeque::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Record an exchange, evicting the oldest entry once at capacity.
    /// Cancelled outcomes are dropped.
    pub fn record(&mut self, exchange: Exchange) {
        if exchange.was_cancelled() {
            return;
        }
        if self.exchanges.len() >= self.capacity {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(exchange);
    }

    /// The recorded exchanges, oldest first.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// A snapshot of the recorded exchanges, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Exchange> {
        self.exchanges.iter().cloned().collect()
    }
}

impl Default for ExchangeLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(url: &str) -> Exchange {
        Exchange::new("GET", url, ExchangeOutcome::Response { status: 200 })
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut log = ExchangeLog::with_capacity(3);
        for i in 0..4 {
            log.record(exchange(&format!("https://pd.eu.a.pvp.net/{i}")));
        }
        assert_eq!(log.len(), 3);
        let urls: Vec<_> = log.exchanges().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://pd.eu.a.pvp.net/1",
                "https://pd.eu.a.pvp.net/2",
                "https://pd.eu.a.pvp.net/3"
            ]
        );
    }

    #[test]
    fn test_cancelled_exchanges_never_recorded() {
        let mut log = ExchangeLog::with_capacity(3);
        log.record(exchange("https://pd.eu.a.pvp.net/a"));
        log.record(Exchange::new(
            "GET",
            "https://pd.eu.a.pvp.net/cancelled",
            ExchangeOutcome::Cancelled,
        ));
        assert_eq!(log.len(), 1);
        assert_eq!(log.exchanges().next().unwrap().url, "https://pd.eu.a.pvp.net/a");
    }

    #[test]
    fn test_status_code() {
        let ok = exchange("u");
        assert_eq!(ok.status_code(), Some(200));
        let err = Exchange::new(
            "GET",
            "u",
            ExchangeOutcome::Error {
                message: "connection reset".into(),
            },
        );
        assert_eq!(err.status_code(), None);
    }
}

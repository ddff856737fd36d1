use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Outstanding requests by transaction id, shared between the task that
/// writes requests and the task that correlates responses.
///
/// Keys are the bit patterns of the AMF Number ids; `f64` itself is
/// neither `Eq` nor `Hash`.
#[derive(Debug, Default)]
pub struct TransactionRegistry {
    inner: Mutex<HashMap<u64, String>>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        TransactionRegistry::default()
    }

    /// Record an outstanding request
    pub fn register(&self, transaction_id: f64, command_name: &str) {
        let mut inner = self.inner.lock().expect("transaction registry poisoned");
        inner.insert(transaction_id.to_bits(), command_name.to_string());
    }

    /// Atomically look up and remove the request a response answers
    pub fn correlate(&self, transaction_id: f64) -> Result<String> {
        let mut inner = self.inner.lock().expect("transaction registry poisoned");
        inner
            .remove(&transaction_id.to_bits())
            .ok_or_else(|| Error::no_transaction(format!("transaction {}", transaction_id)))
    }

    /// Drop an entry without correlating, for cancelled requests
    pub fn remove(&self, transaction_id: f64) -> Option<String> {
        let mut inner = self.inner.lock().expect("transaction registry poisoned");
        inner.remove(&transaction_id.to_bits())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("transaction registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

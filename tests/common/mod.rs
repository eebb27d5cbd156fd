//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use datalens::Row;
use datalens::ai::SemanticBackend;
use datalens::error::{DatalensError, Result};
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What the scripted backend does on every call.
pub enum Script {
    Reply(String),
    Fail(String),
    Hang,
}

/// In-memory stand-in for a language model.
pub struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Script::Reply(text.to_owned()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl SemanticBackend for ScriptedBackend {
    async fn complete(&self, _system: &str, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_owned());
        }
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail(message) => Err(DatalensError::Ai(message.clone())),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(String::new())
            }
        }
    }
}

pub fn table(values: Vec<Value>) -> Vec<Row> {
    serde_json::from_value(Value::Array(values)).expect("rows")
}

/// A tidy sales table: no missing values, no duplicates, past dates.
pub fn sales(n: usize) -> Vec<Row> {
    table(
        (0..n)
            .map(|i| {
                json!({
                    "order_id": format!("SO-{i:05}"),
                    "region": (["north", "south", "east", "west"][i % 4]),
                    "units": 1 + (i * 3) % 17,
                    "unit_price": format!("{}.99", 5 + (i * 7) % 11),
                    "ordered_on": format!("2023-{:02}-{:02}", 1 + i % 12, 1 + (i * 5) % 28),
                    "gift": (["yes", "no"][i % 2]),
                })
            })
            .collect(),
    )
}

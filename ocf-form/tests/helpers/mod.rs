//! Test helpers for ocf-form integration tests
//!
//! - RecordingProvider: scripted SuggestionProvider that records every query
//! - Form fill shortcuts and paused-clock helpers

#![allow(dead_code)]

use async_trait::async_trait;
use ocf_common::{FieldName, Suggestion};
use ocf_form::{FormController, ProviderError, SuggestionProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a RecordingProvider answers
#[derive(Debug, Clone)]
pub enum Reply {
    /// Same list for every query
    Fixed(Vec<Suggestion>),
    /// Always fails
    Fail,
    /// Waits, then answers with one suggestion named after the query
    Slow(Duration),
}

pub struct RecordingProvider {
    calls: Mutex<Vec<String>>,
    reply: Mutex<Reply>,
}

impl RecordingProvider {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(reply),
        })
    }

    pub fn returning(suggestions: Vec<Suggestion>) -> Arc<Self> {
        Self::new(Reply::Fixed(suggestions))
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Queries received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn query(&self, text: &str) -> Result<Vec<Suggestion>, ProviderError> {
        let call_index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(text.to_string());
            calls.len() as i64
        };
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Fixed(suggestions) => Ok(suggestions),
            Reply::Fail => Err(ProviderError::Unavailable("lookup service down".to_string())),
            Reply::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(vec![Suggestion::new(call_index, text)])
            }
        }
    }
}

pub fn fake_suggestions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(1, "PT Bank Nasional"),
        Suggestion::new(2, "PT Digital Solusi"),
    ]
}

pub fn controller_with(provider: &Arc<RecordingProvider>) -> FormController {
    FormController::new(provider.clone())
}

/// Advance the paused test clock
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Type a valid value into every mandatory field, plus `npwp` when non-empty
pub fn fill_all_valid_fields(controller: &FormController, npwp: &str) {
    controller.on_field_changed(FieldName::CompanyName, "PT Bank Nasional");
    controller.on_field_changed(FieldName::CompanyAddress, "Jl. Sudirman No. 1, Jakarta Pusat");
    controller.on_field_changed(FieldName::CityName, "Jakarta");
    controller.on_field_changed(FieldName::PhoneNumber, "08123456789");
    if !npwp.is_empty() {
        controller.on_field_changed(FieldName::Npwp, npwp);
    }
}

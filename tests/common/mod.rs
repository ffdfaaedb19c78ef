//! Scripted backends shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use nexusllm::{Backend, BackendProfile, LlmError, LlmResult, QualityClass, SpeedClass};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a scripted backend does when called.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Answer with the text after the delay.
    Reply { text: String, delay: Duration },
    /// Fail with an API error after the delay.
    Fail { delay: Duration },
    /// Never answer.
    Hang,
}

pub struct ScriptedBackend {
    name: String,
    behavior: Behavior,
    calls: AtomicUsize,
    last_params: Mutex<Option<(f32, u32)>>,
}

impl ScriptedBackend {
    pub fn new(name: &str, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            behavior,
            calls: AtomicUsize::new(0),
            last_params: Mutex::new(None),
        })
    }

    pub fn replying(name: &str, text: &str, delay_ms: u64) -> Arc<Self> {
        Self::new(name, Behavior::Reply {
            text: text.to_string(),
            delay: Duration::from_millis(delay_ms),
        })
    }

    pub fn failing(name: &str, delay_ms: u64) -> Arc<Self> {
        Self::new(name, Behavior::Fail { delay: Duration::from_millis(delay_ms) })
    }

    pub fn hanging(name: &str) -> Arc<Self> {
        Self::new(name, Behavior::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<(f32, u32)> {
        *self.last_params.lock().unwrap()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn complete(&self, _prompt: &str, temperature: f32, max_tokens: u32) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some((temperature, max_tokens));

        match &self.behavior {
            Behavior::Reply { text, delay } => {
                tokio::time::sleep(*delay).await;
                Ok(text.clone())
            }
            Behavior::Fail { delay } => {
                tokio::time::sleep(*delay).await;
                Err(LlmError::ApiError(format!("{} is unavailable", self.name)))
            }
            Behavior::Hang => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

pub fn profile(name: &str, cost: f64, speed: SpeedClass, quality: QualityClass) -> BackendProfile {
    BackendProfile::new(name, cost, speed, quality)
}

/// The dashboard's three backends.
pub fn builtin_profiles() -> Vec<BackendProfile> {
    vec![
        profile("ChatGPT", 0.002, SpeedClass::Medium, QualityClass::High),
        profile("Gemini", 0.0005, SpeedClass::Fast, QualityClass::Medium),
        profile("LLaMa", 0.0, SpeedClass::Slow, QualityClass::Medium),
    ]
}

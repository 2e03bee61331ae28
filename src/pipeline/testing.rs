//! Test doubles for the provider traits.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::llm::{LlmError, PromptSource, TextGenerator};
use crate::voice::{AudioUpload, Transcription, UsageStats, UsageWindow, VoiceError, VoiceService};

/// Answers `generate` from a script, in order, and records every prompt.
/// An exhausted script answers `EmptyResponse`.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub prompts: Mutex<Vec<String>>,
    pub hosted_prompt: Option<String>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(status: u16) -> Self {
        Self::new(vec![Err(LlmError::Upstream {
            status,
            body: "upstream failure".into(),
        })])
    }

    pub fn with_hosted_prompt(mut self, text: &str) -> Self {
        self.hosted_prompt = Some(text.to_string());
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _model: &ModelConfig) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

#[async_trait]
impl PromptSource for ScriptedGenerator {
    async fn fetch_prompt(&self, _prompt_id: &str) -> Result<String, LlmError> {
        self.hosted_prompt.clone().ok_or(LlmError::Upstream {
            status: 404,
            body: "no such prompt".into(),
        })
    }
}

/// Voice double: succeeds with canned data unless `fail` is set, and
/// records synthesized texts.
#[derive(Default)]
pub struct FakeVoice {
    pub fail: bool,
    pub synthesized: Mutex<Vec<String>>,
    pub usage: UsageStats,
}

impl FakeVoice {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), VoiceError> {
        if self.fail {
            Err(VoiceError::Upstream {
                status: 500,
                body: "voice failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VoiceService for FakeVoice {
    async fn transcribe(
        &self,
        audio: AudioUpload,
        language: &str,
    ) -> Result<Transcription, VoiceError> {
        self.check()?;
        Ok(Transcription {
            text: format!("{} bytes", audio.bytes.len()),
            language_code: Some(language.to_string()),
        })
    }

    async fn synthesize(&self, text: &str, _voice_id: &str) -> Result<Vec<u8>, VoiceError> {
        self.synthesized.lock().unwrap().push(text.to_string());
        self.check()?;
        Ok(b"ID3audio".to_vec())
    }

    async fn signed_url(&self, agent_id: &str) -> Result<String, VoiceError> {
        self.check()?;
        Ok(format!("wss://example.test/convai?agent_id={agent_id}&token=t"))
    }

    async fn usage(&self, _window: UsageWindow) -> Result<UsageStats, VoiceError> {
        self.check()?;
        Ok(self.usage.clone())
    }
}

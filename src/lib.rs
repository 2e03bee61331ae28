//! Language-practice backend.
//!
//! A small HTTP service that sits between a browser client and two hosted
//! providers: Gemini for text generation and ElevenLabs for speech.  It
//! builds prompts, normalizes model output into typed payloads, serves
//! fallbacks where the failure policy allows, and logs cost estimates.

pub mod api;
pub mod config;
pub mod conversation;
pub mod cost;
pub mod llm;
pub mod pipeline;
pub mod session;
pub mod voice;

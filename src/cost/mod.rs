//! Cost estimation for log visibility.
//!
//! Estimates are derived from string lengths and a static price sheet.  They
//! are logged after (Gemini) or before (ElevenLabs TTS) each provider call and
//! never consulted when deciding whether to make one.

pub mod estimate;
pub mod pricing;

pub use estimate::{estimate_tokens, log_cost, log_tts_cost, CostEstimate, TtsCost};

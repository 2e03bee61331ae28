//! Voice provider layer (ElevenLabs).
//!
//! * [`VoiceService`]: async trait: transcribe, synthesize, signed URL, usage.
//! * [`ElevenLabsClient`]: REST implementation.
//! * [`UsageStats`] / [`UsageWindow`]: character usage and its summary.

pub mod elevenlabs;
pub mod usage;

pub use elevenlabs::{AudioUpload, ElevenLabsClient, Transcription, VoiceError, VoiceService};
pub use usage::{UsageStats, UsageWindow, ALL_CATEGORY};

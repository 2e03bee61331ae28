//! Static provider price sheet (USD).
//!
//! Used only for log lines; nothing in the service gates on these numbers.

/// Gemini Flash input price per million tokens.
pub const GEMINI_INPUT_PER_MILLION: f64 = 0.075;

/// Gemini Flash input price per million tokens when served from the context
/// cache (90 % off).
pub const GEMINI_CACHED_INPUT_PER_MILLION: f64 = 0.0075;

/// Gemini Flash output price per million tokens.
pub const GEMINI_OUTPUT_PER_MILLION: f64 = 0.30;

/// ElevenLabs synthesis price per thousand characters.
pub const ELEVENLABS_PER_THOUSAND_CHARS: f64 = 0.18;

/// ElevenLabs monthly free-tier character allowance.
pub const ELEVENLABS_FREE_TIER_CHARS: u64 = 10_000;

/// Currency tag attached to every estimate.
pub const CURRENCY: &str = "USD";

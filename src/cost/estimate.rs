//! Token/character estimates and the cost lines derived from them.

use serde::Serialize;

use super::pricing::{
    CURRENCY, ELEVENLABS_PER_THOUSAND_CHARS, GEMINI_CACHED_INPUT_PER_MILLION,
    GEMINI_INPUT_PER_MILLION, GEMINI_OUTPUT_PER_MILLION,
};

// ---------------------------------------------------------------------------
// Token estimate
// ---------------------------------------------------------------------------

/// Rough token count: one token per four characters, rounded up.
///
/// Characters are Unicode scalar values, so Vietnamese diacritics count once.
///
/// ```
/// use lingo_coach::cost::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("abcd"), 1);
/// assert_eq!(estimate_tokens("abcde"), 2);
/// ```
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

// ---------------------------------------------------------------------------
// CostEstimate (Gemini)
// ---------------------------------------------------------------------------

/// Estimated cost of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub currency: &'static str,
}

impl CostEstimate {
    /// Price a call from its token counts.  `cached_input` selects the
    /// discounted context-cache input rate.
    pub fn gemini(input_tokens: u64, output_tokens: u64, cached_input: bool) -> Self {
        let input_rate = if cached_input {
            GEMINI_CACHED_INPUT_PER_MILLION
        } else {
            GEMINI_INPUT_PER_MILLION
        };

        let input_cost = input_tokens as f64 / 1_000_000.0 * input_rate;
        let output_cost = output_tokens as f64 / 1_000_000.0 * GEMINI_OUTPUT_PER_MILLION;

        Self {
            input_tokens,
            output_tokens,
            input_cost,
            output_cost,
            total_cost: input_cost + output_cost,
            currency: CURRENCY,
        }
    }

    /// Price a call from the prompt and reply text.
    pub fn for_texts(prompt: &str, reply: &str, cached_input: bool) -> Self {
        Self::gemini(estimate_tokens(prompt), estimate_tokens(reply), cached_input)
    }
}

// ---------------------------------------------------------------------------
// TtsCost (ElevenLabs)
// ---------------------------------------------------------------------------

/// Estimated cost of one synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsCost {
    pub characters: u64,
    pub cost: f64,
    pub currency: &'static str,
}

impl TtsCost {
    /// Price synthesising `text`.
    ///
    /// ```
    /// use lingo_coach::cost::TtsCost;
    ///
    /// let cost = TtsCost::estimate("");
    /// assert_eq!(cost.characters, 0);
    /// assert_eq!(cost.cost, 0.0);
    /// ```
    pub fn estimate(text: &str) -> Self {
        let characters = text.chars().count() as u64;
        Self {
            characters,
            cost: characters as f64 / 1000.0 * ELEVENLABS_PER_THOUSAND_CHARS,
            currency: CURRENCY,
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Emit a Gemini cost line for the named endpoint.
pub fn log_cost(api_name: &str, cost: &CostEstimate) {
    log::info!(
        "[{api_name}] cost estimate: input {} tokens -> ${:.6}, output {} tokens -> ${:.6}, total ${:.6} {}",
        cost.input_tokens,
        cost.input_cost,
        cost.output_tokens,
        cost.output_cost,
        cost.total_cost,
        cost.currency,
    );
}

/// Emit a synthesis cost line for the named endpoint.
pub fn log_tts_cost(api_name: &str, cost: &TtsCost) {
    log::info!(
        "[{api_name}] cost estimate: {} characters -> ${:.6} {}",
        cost.characters,
        cost.cost,
        cost.currency,
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcdefgh"), 2);
        assert_eq!(estimate_tokens("abcdefghi"), 3);
    }

    #[test]
    fn token_estimate_counts_characters_not_bytes() {
        // 4 characters, 9 bytes in UTF-8.
        assert_eq!(estimate_tokens("Hôm "), 1);
        assert_eq!(estimate_tokens("đi học"), 2);
    }

    #[test]
    fn token_estimate_is_monotone_over_prefixes() {
        let text = "Hôm nay tôi đi học và gặp bạn bè ở thư viện.";
        let mut previous = 0;
        for (idx, _) in text.char_indices().skip(1) {
            let current = estimate_tokens(&text[..idx]);
            assert!(current >= previous, "prefix {idx} decreased the estimate");
            previous = current;
        }
        assert!(estimate_tokens(text) >= previous);
    }

    #[test]
    fn gemini_cost_uses_flash_rates() {
        let cost = CostEstimate::gemini(1_000_000, 1_000_000, false);
        assert!(approx(cost.input_cost, 0.075));
        assert!(approx(cost.output_cost, 0.30));
        assert!(approx(cost.total_cost, 0.375));
        assert_eq!(cost.currency, "USD");
    }

    #[test]
    fn cached_input_is_discounted() {
        let full = CostEstimate::gemini(2_000_000, 0, false);
        let cached = CostEstimate::gemini(2_000_000, 0, true);
        assert!(approx(cached.input_cost, 0.015));
        assert!(cached.total_cost < full.total_cost);
    }

    #[test]
    fn for_texts_estimates_both_sides() {
        let cost = CostEstimate::for_texts("abcdefgh", "abc", false);
        assert_eq!(cost.input_tokens, 2);
        assert_eq!(cost.output_tokens, 1);
    }

    #[test]
    fn tts_cost_per_thousand_characters() {
        let text = "x".repeat(2000);
        let cost = TtsCost::estimate(&text);
        assert_eq!(cost.characters, 2000);
        assert!(approx(cost.cost, 0.36));
    }

    #[test]
    fn tts_cost_of_empty_text_is_zero() {
        let cost = TtsCost::estimate("");
        assert_eq!(cost.characters, 0);
        assert_eq!(cost.cost, 0.0);
    }

    #[test]
    fn tts_cost_serialises_field_names() {
        let json = serde_json::to_value(TtsCost::estimate("")).unwrap();
        assert_eq!(json["characters"], 0);
        assert_eq!(json["cost"], 0.0);
        assert_eq!(json["currency"], "USD");
    }
}

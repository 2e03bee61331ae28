//! Provider credentials read from the process environment.
//!
//! Credentials are deliberately kept out of [`AppConfig`](super::AppConfig)
//! so `settings.toml` can be saved without leaking secrets.  Empty variables
//! are treated as absent: every request that needs a missing credential fails
//! closed instead of calling the provider with a default.
//!
//! | Variable                          | Used by                        |
//! |-----------------------------------|--------------------------------|
//! | `GEMINI_API_KEY`                  | chat, feedback, analysis, diary |
//! | `GEMINI_PROMPT_ID`                | hosted chat system prompt      |
//! | `GOOGLE_CLOUD_PROJECT` / `_LOCATION` | Vertex AI deployment        |
//! | `ELEVENLABS_API_KEY`              | stt, tts, signed URL, usage    |
//! | `ELEVENLABS_AGENT_ID`             | signed URL                     |
//! | `ELEVENLABS_VOICE_ID`             | tts (optional)                 |

use std::fmt;

/// Project/location pair for the alternate (Vertex AI) deployment target.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexTarget {
    pub project: String,
    pub location: String,
}

/// Snapshot of every credential the service can use.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub gemini_api_key: Option<String>,
    pub gemini_prompt_id: Option<String>,
    pub vertex: Option<VertexTarget>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_agent_id: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup function (tests inject a
    /// map here instead of mutating the process environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let vertex = match (get("GOOGLE_CLOUD_PROJECT"), get("GOOGLE_CLOUD_LOCATION")) {
            (Some(project), Some(location)) => Some(VertexTarget { project, location }),
            _ => None,
        };

        Self {
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_prompt_id: get("GEMINI_PROMPT_ID"),
            vertex,
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_agent_id: get("ELEVENLABS_AGENT_ID")
                .or_else(|| get("NEXT_PUBLIC_ELEVENLABS_AGENT_ID")),
            elevenlabs_voice_id: get("ELEVENLABS_VOICE_ID"),
        }
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<set>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_prompt_id", &self.gemini_prompt_id)
            .field("vertex", &self.vertex)
            .field("elevenlabs_api_key", &redact(&self.elevenlabs_api_key))
            .field("elevenlabs_agent_id", &self.elevenlabs_agent_id)
            .field("elevenlabs_voice_id", &self.elevenlabs_voice_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_has_no_credentials() {
        let creds = Credentials::from_lookup(|_| None);
        assert_eq!(creds, Credentials::default());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let creds = Credentials::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "   "),
            ("ELEVENLABS_API_KEY", ""),
        ]));
        assert!(creds.gemini_api_key.is_none());
        assert!(creds.elevenlabs_api_key.is_none());
    }

    #[test]
    fn agent_id_falls_back_to_public_variable() {
        let creds = Credentials::from_lookup(lookup(&[(
            "NEXT_PUBLIC_ELEVENLABS_AGENT_ID",
            "agent-1",
        )]));
        assert_eq!(creds.elevenlabs_agent_id.as_deref(), Some("agent-1"));
    }

    #[test]
    fn vertex_requires_both_project_and_location() {
        let only_project =
            Credentials::from_lookup(lookup(&[("GOOGLE_CLOUD_PROJECT", "demo")]));
        assert!(only_project.vertex.is_none());

        let both = Credentials::from_lookup(lookup(&[
            ("GOOGLE_CLOUD_PROJECT", "demo"),
            ("GOOGLE_CLOUD_LOCATION", "us-central1"),
        ]));
        assert_eq!(
            both.vertex,
            Some(VertexTarget {
                project: "demo".into(),
                location: "us-central1".into()
            })
        );
    }

    #[test]
    fn debug_output_redacts_keys() {
        let creds = Credentials::from_lookup(lookup(&[("GEMINI_API_KEY", "secret-key")]));
        let dbg = format!("{creds:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<set>"));
    }
}

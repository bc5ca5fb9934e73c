use std::future::Future;
use std::pin::Pin;
use anyhow::{anyhow, bail, Context};
use reqwest::StatusCode;
use serde_json::{json, Value};
use crate::domain::loadout::Loadout;
use crate::playback::event::{EventKind, MatchEvent};
use crate::playback::prompt::build_prompt;
use crate::utils::config::Config;

pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Vec<MatchEvent>>> + Send + 'a>>;

/// External narrator producing the ordered event list for a loadout.
/// One request, one response.
pub trait EventSource: Send + Sync {
    fn generate<'a>(&'a self, loadout: &'a Loadout) -> SourceFuture<'a>;
}

/// Gemini `generateContent` client
pub struct GeminiSource {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiSource {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building http client")?;

        Ok(Self {
            client,
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn request(&self, loadout: &Loadout) -> anyhow::Result<Vec<MatchEvent>> {
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| anyhow!("no API key configured"))?;

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(&build_prompt(loadout)))
            .send()
            .await
            .context("sending generateContent")?;

        let status = resp.status();
        let body = resp.text().await.context("reading response body")?;
        if status != StatusCode::OK {
            bail!("generateContent http={}", status.as_u16());
        }

        let body: Value = serde_json::from_str(&body).context("response is not JSON")?;
        parse_events(&body)
    }
}

impl EventSource for GeminiSource {
    fn generate<'a>(&'a self, loadout: &'a Loadout) -> SourceFuture<'a> {
        Box::pin(self.request(loadout))
    }
}

/// Request payload asking for a JSON array of `{time, message, type}`
pub fn request_body(prompt: &str) -> Value {
    let kinds: Vec<&str> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "time": { "type": "STRING" },
                        "message": { "type": "STRING" },
                        "type": { "type": "STRING", "enum": kinds }
                    },
                    "required": ["time", "message", "type"]
                }
            }
        }
    })
}

/// Pull the model's text out of a generateContent response and parse it as events
pub fn parse_events(body: &Value) -> anyhow::Result<Vec<MatchEvent>> {
    let parts = body
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| anyhow!("response has no candidate content"))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.trim().is_empty() {
        bail!("candidate has no text");
    }

    serde_json::from_str(text.trim()).context("candidate text is not an event list")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_text(text: &str) -> Value {
        json!({
            "candidates": [
                { "content": { "role": "model", "parts": [ { "text": text } ] } }
            ]
        })
    }

    #[test]
    fn test_parse_events() {
        let body = response_with_text(
            r#"[{"time":"0:10","message":"Drop secured","type":"info"},
                {"time":"1:02","message":"Eliminated by zone","type":"zone"}]"#,
        );
        let events = parse_events(&body).unwrap();
        assert_eq!(events, vec![
            MatchEvent::new("0:10", "Drop secured", EventKind::Info),
            MatchEvent::new("1:02", "Eliminated by zone", EventKind::Zone),
        ]);
    }

    #[test]
    fn test_parse_split_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "[{\"time\":\"0:01\",\"message\":\"Landed\"," },
                { "text": "\"type\":\"info\"}]" }
            ]}}]
        });
        assert_eq!(parse_events(&body).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_events(&response_with_text("[]")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_events(&json!({})).is_err());
        assert!(parse_events(&response_with_text("")).is_err());
        assert!(parse_events(&response_with_text("the match was great")).is_err());
        assert!(parse_events(&response_with_text(r#"[{"time":"0:01"}]"#)).is_err());
    }

    #[test]
    fn test_request_body_schema() {
        let body = request_body("narrate");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "narrate");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let kinds = &body["generationConfig"]["responseSchema"]["items"]["properties"]["type"]["enum"];
        assert_eq!(kinds.as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_endpoint() {
        let config = Config {
            gemini_base_url: "http://localhost:9000/v1beta/".to_string(),
            ..Config::default()
        };
        let source = GeminiSource::from_config(&config).unwrap();
        assert_eq!(
            source.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails() {
        let catalog = crate::utils::catalog::Catalog::load();
        let session = crate::state::session::SessionState::new(uuid::Uuid::new_v4(), 0);
        let loadout = Loadout::resolve(&session, &catalog).unwrap();

        let source = GeminiSource::from_config(&Config::default()).unwrap();
        let err = source.generate(&loadout).await.unwrap_err();
        assert!(err.to_string().contains("no API key"));
    }
}

//! Google Cloud Text-to-Speech.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::{join_url, read_json, transport_error};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::TtsSettings;

pub const PROVIDER: &str = "google-tts";

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Where the bearer token for the TTS API comes from.
#[derive(Clone)]
pub enum GoogleCredentials {
    Static(String),
    ServiceAccount(Arc<dyn TokenProvider>),
    Missing,
}

impl GoogleCredentials {
    /// A static `GCLOUD_ACCESS_TOKEN` wins, then an inline service account, then
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    pub fn from_settings(settings: &TtsSettings) -> Result<Self, gcp_auth::Error> {
        if let Some(token) = &settings.access_token {
            return Ok(Self::Static(token.clone()));
        }

        if let (Some(email), Some(key)) = (&settings.client_email, &settings.private_key) {
            let key_json = json!({
                "type": "service_account",
                "project_id": settings.project_id,
                "client_email": email,
                "private_key": key,
                "token_uri": GOOGLE_TOKEN_URI,
            });
            let account = CustomServiceAccount::from_json(&key_json.to_string())?;
            return Ok(Self::ServiceAccount(Arc::new(account)));
        }

        match CustomServiceAccount::from_env()? {
            Some(account) => Ok(Self::ServiceAccount(Arc::new(account))),
            None => {
                warn!("No Google credentials configured, speech synthesis is disabled");
                Ok(Self::Missing)
            }
        }
    }

    async fn bearer_token(&self) -> AppResult<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::ServiceAccount(provider) => provider
                .token(&[CLOUD_PLATFORM_SCOPE])
                .await
                .map(|t| t.as_str().to_string())
                .map_err(|e| AppError::unavailable(PROVIDER, format!("token exchange failed: {}", e))),
            Self::Missing => Err(AppError::unavailable(
                PROVIDER,
                "no Google credentials configured",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub language_code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: Option<String>,
}

#[derive(Clone)]
pub struct TtsClient {
    http: Client,
    credentials: GoogleCredentials,
    base_url: String,
    project_id: Option<String>,
    default_voice: Voice,
}

impl TtsClient {
    pub fn new(http: Client, settings: &TtsSettings, credentials: GoogleCredentials) -> Self {
        Self {
            http,
            credentials,
            base_url: settings.base_url.clone(),
            project_id: settings.project_id.clone(),
            default_voice: Voice {
                language_code: settings.language_code.clone(),
                name: settings.voice_name.clone(),
            },
        }
    }

    /// Synthesizes `text` as MP3 with the configured voice.
    pub async fn synthesize(&self, text: &str) -> AppResult<Bytes> {
        self.synthesize_with(text, &self.default_voice).await
    }

    pub async fn synthesize_with(&self, text: &str, voice: &Voice) -> AppResult<Bytes> {
        let token = self.credentials.bearer_token().await?;

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceParams {
                language_code: &voice.language_code,
                name: &voice.name,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let mut builder = self
            .http
            .post(join_url(&self.base_url, "/v1/text:synthesize"))
            .bearer_auth(token)
            .json(&request);
        if let Some(project) = &self.project_id {
            builder = builder.header("X-Goog-User-Project", project);
        }

        let response = builder.send().await.map_err(transport_error(PROVIDER))?;
        let parsed: SynthesizeResponse = read_json(PROVIDER, response).await?;

        let encoded = parsed
            .audio_content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::contract(PROVIDER, "response has no audioContent"))?;
        let audio = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| AppError::contract(PROVIDER, format!("audioContent is not base64: {}", e)))?;

        info!("Synthesized {} bytes of speech with {}", audio.len(), voice.name);
        Ok(Bytes::from(audio))
    }
}

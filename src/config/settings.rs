use std::time::Duration;

use thiserror::Error;

use crate::config::env::{self, EnvKey};
use crate::jobs::poller::PollPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{key} is not a valid URL: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get_opt(key).ok_or(ConfigError::Missing(name))
}

fn checked_url(key: &'static str, value: String) -> Result<String, ConfigError> {
    url::Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { key, source })?;
    Ok(value.trim_end_matches('/').to_string())
}

fn base_url(key: EnvKey, default: &str) -> Result<String, ConfigError> {
    let name = key.as_str();
    checked_url(name, env::get_or(key, default))
}

fn optional_url(key: EnvKey) -> Result<Option<String>, ConfigError> {
    let name = key.as_str();
    env::get_opt(key).map(|v| checked_url(name, v)).transpose()
}

#[derive(Clone, Debug)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct DidSettings {
    pub api_key: String,
    pub base_url: String,
    pub voice_id: String,
}

#[derive(Clone, Debug)]
pub struct LipSyncSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct TwitterSettings {
    pub bearer_token: Option<String>,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct TtsSettings {
    pub access_token: Option<String>,
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub project_id: Option<String>,
    pub base_url: String,
    pub language_code: String,
    pub voice_name: String,
}

#[derive(Clone, Debug)]
pub struct StorageSettings {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub bucket: String,
    /// Custom endpoint for S3-compatible stores (MinIO, R2).
    pub endpoint: Option<String>,
    /// Base used to build object URLs; defaults to the virtual-hosted S3 URL.
    pub public_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub http_timeout: Duration,
    pub upload_limit_bytes: usize,
    pub openai: OpenAiSettings,
    pub did: DidSettings,
    pub lipsync: LipSyncSettings,
    pub twitter: TwitterSettings,
    pub tts: TtsSettings,
    pub storage: StorageSettings,
    pub poll: PollPolicy,
    pub posts_concurrency: usize,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            http_timeout: Duration::from_secs(env::get_parsed(EnvKey::HttpTimeoutSecs, 120)),
            upload_limit_bytes: env::get_parsed(EnvKey::UploadLimitBytes, 100 * 1024 * 1024),
            openai: OpenAiSettings {
                api_key: required(EnvKey::OpenAiApiKey)?,
                base_url: base_url(EnvKey::OpenAiBaseUrl, "https://api.openai.com")?,
                model: env::get_or(EnvKey::OpenAiModel, "gpt-3.5-turbo"),
            },
            did: DidSettings {
                api_key: required(EnvKey::DidApiKey)?,
                base_url: base_url(EnvKey::DidBaseUrl, "https://api.d-id.com")?,
                voice_id: env::get_or(EnvKey::DidVoiceId, "Sara"),
            },
            lipsync: LipSyncSettings {
                api_key: required(EnvKey::LipSyncApiKey)?,
                base_url: base_url(EnvKey::LipSyncBaseUrl, "https://api.sync.so")?,
                model: env::get_or(EnvKey::LipSyncModel, "lipsync-1.7.1"),
            },
            twitter: TwitterSettings {
                bearer_token: env::get_opt(EnvKey::TwitterBearerToken),
                base_url: base_url(EnvKey::TwitterBaseUrl, "https://api.twitter.com")?,
            },
            tts: TtsSettings {
                access_token: env::get_opt(EnvKey::GcloudAccessToken),
                client_email: env::get_opt(EnvKey::GoogleClientEmail),
                // Keys pasted into .env usually carry literal "\n" sequences.
                private_key: env::get_opt(EnvKey::GooglePrivateKey).map(|k| k.replace("\\n", "\n")),
                project_id: env::get_opt(EnvKey::GoogleProjectId),
                base_url: base_url(EnvKey::TtsBaseUrl, "https://texttospeech.googleapis.com")?,
                language_code: env::get_or(EnvKey::TtsLanguageCode, "en-GB"),
                voice_name: env::get_or(EnvKey::TtsVoiceName, "en-GB-Chirp3-HD-Aoede"),
            },
            storage: StorageSettings {
                access_key: required(EnvKey::AwsAccessKey)?,
                secret_key: required(EnvKey::AwsSecretKey)?,
                region: required(EnvKey::AwsRegion)?,
                bucket: required(EnvKey::AwsBucket)?,
                endpoint: optional_url(EnvKey::S3Endpoint)?,
                public_url: optional_url(EnvKey::S3PublicUrl)?,
            },
            poll: Self::poll_policy(),
            posts_concurrency: env::get_parsed(EnvKey::PostsConcurrency, 3usize).max(1),
        })
    }

    fn poll_policy() -> PollPolicy {
        let defaults = PollPolicy::default();

        let max_attempts = match env::get_parsed(EnvKey::PollMaxAttempts, 100u32) {
            0 => None,
            n => Some(n),
        };
        let deadline = match env::get_parsed(EnvKey::PollDeadlineSecs, 600u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        PollPolicy {
            interval: Duration::from_secs(env::get_parsed(
                EnvKey::PollIntervalSecs,
                defaults.interval.as_secs(),
            )),
            max_attempts,
            deadline,
            backoff_factor: env::get_parsed(EnvKey::PollBackoffFactor, defaults.backoff_factor)
                .max(1.0),
            max_interval: Duration::from_secs(env::get_parsed(
                EnvKey::PollMaxIntervalSecs,
                defaults.max_interval.as_secs(),
            )),
            transient_retries: env::get_parsed(
                EnvKey::PollTransientRetries,
                defaults.transient_retries,
            ),
        }
    }
}

#[cfg(test)]
impl AppConfig {
    /// Every provider pointed at `base_url` with a short poll budget.
    pub(crate) fn for_tests(base_url: &str) -> Self {
        Self {
            server_port: 0,
            http_timeout: Duration::from_secs(5),
            upload_limit_bytes: 1024 * 1024,
            openai: OpenAiSettings {
                api_key: "sk-test".into(),
                base_url: base_url.into(),
                model: "gpt-3.5-turbo".into(),
            },
            did: DidSettings {
                api_key: "dXNlcjpwYXNz".into(),
                base_url: base_url.into(),
                voice_id: "Sara".into(),
            },
            lipsync: LipSyncSettings {
                api_key: "sync-key".into(),
                base_url: base_url.into(),
                model: "lipsync-1.7.1".into(),
            },
            twitter: TwitterSettings {
                bearer_token: Some("tw-token".into()),
                base_url: base_url.into(),
            },
            tts: TtsSettings {
                access_token: Some("ya29.test".into()),
                client_email: None,
                private_key: None,
                project_id: None,
                base_url: base_url.into(),
                language_code: "en-GB".into(),
                voice_name: "en-GB-Chirp3-HD-Aoede".into(),
            },
            storage: StorageSettings {
                access_key: "AKIA".into(),
                secret_key: "secret".into(),
                region: "eu-west-2".into(),
                bucket: "influencer-media".into(),
                endpoint: None,
                public_url: None,
            },
            poll: PollPolicy::fixed(Duration::from_millis(10), 20),
            posts_concurrency: 3,
        }
    }
}

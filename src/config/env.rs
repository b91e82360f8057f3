use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    HttpTimeoutSecs,
    UploadLimitBytes,

    OpenAiApiKey,
    OpenAiBaseUrl,
    OpenAiModel,

    DidApiKey,
    DidBaseUrl,
    DidVoiceId,

    LipSyncApiKey,
    LipSyncBaseUrl,
    LipSyncModel,

    TwitterBearerToken,
    TwitterBaseUrl,

    GcloudAccessToken,
    GoogleClientEmail,
    GooglePrivateKey,
    GoogleProjectId,
    TtsBaseUrl,
    TtsLanguageCode,
    TtsVoiceName,

    AwsAccessKey,
    AwsSecretKey,
    AwsRegion,
    AwsBucket,
    S3Endpoint,
    S3PublicUrl,

    PollIntervalSecs,
    PollMaxAttempts,
    PollDeadlineSecs,
    PollBackoffFactor,
    PollMaxIntervalSecs,
    PollTransientRetries,
    PostsConcurrency,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::HttpTimeoutSecs => "HTTP_TIMEOUT_SECS",
            EnvKey::UploadLimitBytes => "UPLOAD_LIMIT_BYTES",
            EnvKey::OpenAiApiKey => "OPENAI_API_KEY",
            EnvKey::OpenAiBaseUrl => "OPENAI_BASE_URL",
            EnvKey::OpenAiModel => "OPENAI_MODEL",
            EnvKey::DidApiKey => "D_ID_API_KEY",
            EnvKey::DidBaseUrl => "D_ID_BASE_URL",
            EnvKey::DidVoiceId => "D_ID_VOICE_ID",
            EnvKey::LipSyncApiKey => "WAV2LIP_API_KEY",
            EnvKey::LipSyncBaseUrl => "LIPSYNC_BASE_URL",
            EnvKey::LipSyncModel => "LIPSYNC_MODEL",
            EnvKey::TwitterBearerToken => "TWITTER_BEARER_TOKEN",
            EnvKey::TwitterBaseUrl => "TWITTER_BASE_URL",
            EnvKey::GcloudAccessToken => "GCLOUD_ACCESS_TOKEN",
            EnvKey::GoogleClientEmail => "GOOGLE_CLIENT_EMAIL",
            EnvKey::GooglePrivateKey => "GOOGLE_PRIVATE_KEY",
            EnvKey::GoogleProjectId => "GOOGLE_PROJECT_ID",
            EnvKey::TtsBaseUrl => "TTS_BASE_URL",
            EnvKey::TtsLanguageCode => "TTS_LANGUAGE_CODE",
            EnvKey::TtsVoiceName => "TTS_VOICE_NAME",
            EnvKey::AwsAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::AwsSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::AwsRegion => "AWS_REGION",
            EnvKey::AwsBucket => "AWS_BUCKET_NAME",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3PublicUrl => "S3_PUBLIC_URL",
            EnvKey::PollIntervalSecs => "POLL_INTERVAL_SECS",
            EnvKey::PollMaxAttempts => "POLL_MAX_ATTEMPTS",
            EnvKey::PollDeadlineSecs => "POLL_DEADLINE_SECS",
            EnvKey::PollBackoffFactor => "POLL_BACKOFF_FACTOR",
            EnvKey::PollMaxIntervalSecs => "POLL_MAX_INTERVAL_SECS",
            EnvKey::PollTransientRetries => "POLL_TRANSIENT_RETRIES",
            EnvKey::PostsConcurrency => "POSTS_CONCURRENCY",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Unset and empty values are both treated as absent.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get_opt(key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

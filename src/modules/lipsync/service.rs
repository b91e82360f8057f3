use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::common::error::{AppError, AppResult};
use crate::common::upload::UploadedFile;
use crate::infrastructure::providers::lipsync::PROVIDER;
use crate::infrastructure::storage::speech_key;
use crate::jobs::poller::JobStatusSource;
use crate::jobs::status::JobStatusResponse;
use crate::modules::media::service::MediaService;
use crate::state::AppState;

const SPEECH_CONTENT_TYPE: &str = "audio/mpeg";

/// Where the soundtrack of a lip-sync job comes from.
#[derive(Debug)]
pub enum AudioSource {
    Script(String),
    Url(String),
    File(UploadedFile),
}

impl AudioSource {
    /// Supplied audio wins over a script; having neither is a validation error.
    pub fn pick(script: Option<String>, audio: Option<AudioSource>) -> AppResult<Self> {
        if let Some(audio) = audio {
            return Ok(audio);
        }
        match script.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
            Some(script) => Ok(AudioSource::Script(script)),
            None => Err(AppError::validation(
                "Either a script or an audio file is required",
            )),
        }
    }
}

pub struct LipSyncService;

impl LipSyncService {
    /// Turns the audio source into a URL the lip-sync provider can fetch.
    async fn audio_url(state: &AppState, audio: AudioSource) -> AppResult<String> {
        match audio {
            AudioSource::Url(url) => Ok(url),
            AudioSource::File(file) => Ok(MediaService::store(state, file).await?.url),
            AudioSource::Script(script) => {
                let speech = state.providers.tts.synthesize(&script).await?;
                let asset = state
                    .storage
                    .put_object(&speech_key(), speech, SPEECH_CONTENT_TYPE)
                    .await?;
                info!("Synthesized speech stored at {}", asset.url);
                Ok(asset.url)
            }
        }
    }

    /// Prepares the audio and submits the job; returns the job id.
    pub async fn start(state: AppState, video_url: &str, audio: AudioSource) -> AppResult<String> {
        let audio_url = Self::audio_url(&state, audio).await?;
        state.providers.lipsync.submit(video_url, &audio_url).await
    }

    pub async fn status(state: AppState, job_id: &str) -> AppResult<JobStatusResponse> {
        let snapshot = state.providers.lipsync.fetch_status(job_id).await?;
        JobStatusResponse::from_snapshot(PROVIDER, job_id, snapshot)
    }

    /// Full pipeline from a stored video: audio, submit, poll.
    pub async fn generate(
        state: AppState,
        video_url: &str,
        audio: AudioSource,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let job_id = Self::start(state.clone(), video_url, audio).await?;
        let video_url = state
            .poller
            .wait(&state.providers.lipsync, &job_id, cancel)
            .await?;

        info!("Lip-synced video ready: {}", video_url);
        Ok(video_url)
    }

    /// Full pipeline from an uploaded video.
    pub async fn generate_from_upload(
        state: AppState,
        video: UploadedFile,
        audio: AudioSource,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let video = MediaService::store(&state, video).await?;
        Self::generate(state, &video.url, audio, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::infrastructure::providers::tts::tests::audio_reply;
    use crate::infrastructure::storage::memory::MemoryStore;
    use crate::state::tests::state;

    #[test]
    fn audio_wins_over_script() {
        let picked = AudioSource::pick(
            Some("Hello".into()),
            Some(AudioSource::Url("https://s3/a.mp3".into())),
        )
        .unwrap();
        assert!(matches!(picked, AudioSource::Url(u) if u == "https://s3/a.mp3"));
    }

    #[test]
    fn blank_script_without_audio_is_rejected() {
        let err = AudioSource::pick(Some("   ".into()), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(AudioSource::pick(None, None).is_err());
    }

    #[tokio::test]
    async fn script_is_spoken_stored_and_submitted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text:synthesize"))
            .and(body_partial_json(json!({ "input": { "text": "Hello world" } })))
            .respond_with(audio_reply(b"ID3-speech"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "abc" })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::default());
        let job_id = LipSyncService::start(
            state(&server.uri(), store.clone()),
            "https://s3/v.mp4",
            AudioSource::Script("Hello world".into()),
        )
        .await
        .unwrap();

        assert_eq!(job_id, "abc");
        let keys = store.keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("audio/") && keys[0].ends_with(".mp3"));
        let (bytes, content_type) = store.get(&keys[0]).unwrap();
        assert_eq!(&bytes[..], b"ID3-speech");
        assert_eq!(content_type, "audio/mpeg");

        let submitted = &server.received_requests().await.unwrap()[1];
        let body: serde_json::Value = serde_json::from_slice(&submitted.body).unwrap();
        assert_eq!(body["input"][0]["url"], "https://s3/v.mp4");
        assert_eq!(body["input"][1]["url"], format!("memory://{}", keys[0]));
    }

    #[tokio::test]
    async fn audio_url_skips_speech_synthesis() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text:synthesize"))
            .respond_with(audio_reply(b"unused"))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .and(body_partial_json(json!({
                "input": [
                    { "type": "video", "url": "https://s3/v.mp4" },
                    { "type": "audio", "url": "https://s3/a.mp3" }
                ]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "abc" })))
            .expect(1)
            .mount(&server)
            .await;

        let job_id = LipSyncService::start(
            state(&server.uri(), Arc::default()),
            "https://s3/v.mp4",
            AudioSource::Url("https://s3/a.mp3".into()),
        )
        .await
        .unwrap();

        assert_eq!(job_id, "abc");
    }

    #[tokio::test]
    async fn failed_job_has_no_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "abc" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/generate/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "FAILED",
                "error": "No face found in video"
            })))
            .mount(&server)
            .await;

        let err = LipSyncService::generate(
            state(&server.uri(), Arc::default()),
            "https://s3/v.mp4",
            AudioSource::Url("https://s3/a.mp3".into()),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            AppError::ProviderJobFailed { provider: "sync", ref reason, .. } if reason == "No face found in video"
        ));
    }

    #[tokio::test]
    async fn never_finishing_job_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/generate"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "abc" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/generate/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "PROCESSING" })))
            .mount(&server)
            .await;

        let state = state(&server.uri(), Arc::default());
        let max = state.poller.policy().max_attempts.unwrap();
        let err = LipSyncService::generate(
            state,
            "https://s3/v.mp4",
            AudioSource::Url("https://s3/a.mp3".into()),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Timeout { attempts, .. } if attempts == max));
    }
}

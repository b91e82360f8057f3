use utoipa::OpenApi;

use crate::common::response::ErrorBody;
use crate::jobs::model::JobStatus;
use crate::jobs::status::JobStatusResponse;
use crate::modules::{influencer, lipsync, media, script, trends, video};

#[derive(OpenApi)]
#[openapi(
    info(title = "InfluencerGPT", description = "Generative marketing content API"),
    paths(
        trends::handler::discover_trends,
        script::handler::generate_script,
        video::handler::start_video,
        video::handler::video_status,
        video::handler::generate_video,
        lipsync::handler::start_lipsync,
        lipsync::handler::lipsync_status,
        lipsync::handler::generate_lipsync,
        lipsync::handler::upload_lipsync,
        media::handler::upload_media,
        influencer::handler::create_profile,
        influencer::handler::create_posts,
        influencer::handler::create_image,
    ),
    components(
        schemas(
            ErrorBody,
            JobStatus,
            JobStatusResponse,
            trends::dto::TrendsResponse,
            script::dto::ScriptResponse,
            video::dto::VideoRequest,
            video::dto::StartVideoResponse,
            video::dto::VideoResponse,
            lipsync::dto::LipSyncRequest,
            lipsync::dto::LipSyncUploadForm,
            lipsync::dto::LipSyncJobResponse,
            lipsync::dto::LipSyncResponse,
            media::dto::UploadForm,
            media::dto::UploadResponse,
            influencer::dto::ProfileRequest,
            influencer::dto::ProfileResponse,
            influencer::dto::PostsRequest,
            influencer::dto::PostsResponse,
            influencer::dto::ImageRequest,
            influencer::dto::ImageResponse,
        )
    ),
    tags(
        (name = "Content", description = "Trends and scripts"),
        (name = "Video", description = "Talking-head video generation"),
        (name = "Lip-sync", description = "Video-to-video lip-sync"),
        (name = "Media", description = "Object storage uploads"),
        (name = "Influencer", description = "Virtual influencer profiles, posts and images")
    )
)]
pub struct ApiDoc;

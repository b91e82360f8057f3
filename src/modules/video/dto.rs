use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    /// Text the avatar reads out.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Script is required"))]
    pub script: String,
    /// Publicly reachable image of the face to animate.
    #[serde(default)]
    #[validate(url(message = "sourceUrl must be a valid URL"))]
    pub source_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartVideoResponse {
    pub talk_id: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VideoStatusQuery {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "talkId is required"))]
    pub talk_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub video_url: String,
}

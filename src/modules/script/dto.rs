use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::not_blank;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScriptQuery {
    /// What the video should be about.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Topic is required"))]
    pub topic: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScriptResponse {
    pub script: String,
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::not_blank;

pub const MAX_POSTS: i64 = 10;
pub const DEFAULT_POST_TOPIC: &str = "a new tech gadget";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProfileRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Personality is required"))]
    pub personality: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Interests are required"))]
    pub interests: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub profile: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostsRequest {
    #[serde(default)]
    #[validate(range(min = 1, max = MAX_POSTS, message = "numPosts must be between 1 and 10"))]
    pub num_posts: i64,
    /// What the posts promote; defaults to "a new tech gadget".
    pub topic: Option<String>,
}

impl PostsRequest {
    pub fn topic(&self) -> &str {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_POST_TOPIC)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostsResponse {
    pub posts: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ImageRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,
    /// `realistic`, `cartoon` or `abstract`, case-insensitive.
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStyle {
    Realistic,
    Cartoon,
    Abstract,
}

impl ImageStyle {
    pub fn prompt(self, description: &str) -> String {
        match self {
            ImageStyle::Realistic => {
                format!("{}. The image should be highly realistic", description)
            }
            ImageStyle::Cartoon => format!("Create a cartoon-style influencer: {}.", description),
            ImageStyle::Abstract => format!(
                "Create an abstract artistic representation of a virtual influencer: {}.",
                description
            ),
        }
    }
}

impl FromStr for ImageStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "realistic" => Ok(ImageStyle::Realistic),
            "cartoon" => Ok(ImageStyle::Cartoon),
            "abstract" => Ok(ImageStyle::Abstract),
            _ => Err(AppError::InvalidStyle(s.trim().to_string())),
        }
    }
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::not_blank;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendsQuery {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Query is required"))]
    pub query: String,
    /// `Twitter` or `GPT`, case-insensitive.
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Source is required"))]
    pub source: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrendsResponse {
    pub trends: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSource {
    Twitter,
    Gpt,
}

impl FromStr for TrendSource {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twitter" => Ok(TrendSource::Twitter),
            "gpt" => Ok(TrendSource::Gpt),
            _ => Err(AppError::validation(format!(
                "Unknown trend source '{}'. Use 'Twitter' or 'GPT'.",
                s.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_parse_case_insensitively() {
        assert_eq!("Twitter".parse::<TrendSource>().unwrap(), TrendSource::Twitter);
        assert_eq!(" gpt ".parse::<TrendSource>().unwrap(), TrendSource::Gpt);
        assert!(matches!(
            "reddit".parse::<TrendSource>(),
            Err(AppError::Validation(_))
        ));
    }
}

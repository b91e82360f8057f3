use tracing::info;

use super::dto::TrendSource;
use crate::common::error::AppResult;
use crate::infrastructure::providers::openai::ChatPrompt;
use crate::state::AppState;

const TREND_SYSTEM_PROMPT: &str =
    "You are a trend generator. Provide the top trends based on the given topic.";

pub struct TrendService;

impl TrendService {
    pub async fn discover(state: AppState, query: &str, source: TrendSource) -> AppResult<Vec<String>> {
        let query = query.trim();
        let trends = match source {
            TrendSource::Twitter => state.providers.twitter.search_recent(query).await?,
            TrendSource::Gpt => {
                let prompt = ChatPrompt::user(format!("What are the top trends about {}?", query))
                    .with_system(TREND_SYSTEM_PROMPT);
                let text = state.providers.openai.complete(&prompt).await?;
                split_lines(&text)
            }
        };

        info!("Found {} trends for {:?} via {:?}", trends.len(), query, source);
        Ok(trends)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::infrastructure::providers::openai::tests::chat_reply;
    use crate::state::tests::state;

    #[test]
    fn blank_lines_are_dropped() {
        assert_eq!(
            split_lines("1. AI pins\n\n  2. Foldables  \n   \n3. E-bikes"),
            vec!["1. AI pins", "2. Foldables", "3. E-bikes"]
        );
    }

    #[tokio::test]
    async fn empty_twitter_result_is_an_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/tweets/search/recent"))
            .and(query_param("query", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "result_count": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let trends = TrendService::discover(
            state(&server.uri(), Arc::default()),
            "rust",
            TrendSource::Twitter,
        )
        .await
        .unwrap();

        assert!(trends.is_empty());
    }

    #[tokio::test]
    async fn gpt_trends_come_from_the_trend_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({
                "messages": [
                    { "role": "system", "content": TREND_SYSTEM_PROMPT },
                    { "role": "user", "content": "What are the top trends about gadgets?" }
                ]
            })))
            .respond_with(chat_reply("Smart rings\n\nFoldable phones\n"))
            .expect(1)
            .mount(&server)
            .await;

        let trends = TrendService::discover(
            state(&server.uri(), Arc::default()),
            "gadgets",
            TrendSource::Gpt,
        )
        .await
        .unwrap();

        assert_eq!(trends, vec!["Smart rings", "Foldable phones"]);
    }
}

use tracing::info;

use crate::common::error::AppResult;
use crate::infrastructure::providers::openai::ChatPrompt;
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const EMPTY_SCRIPT: &str = "No script generated.";

pub struct ScriptService;

impl ScriptService {
    pub async fn generate(state: AppState, topic: &str) -> AppResult<String> {
        let prompt = ChatPrompt::user(format!(
            "create a viral shortform video script for a talking head about: {}. \
             Give just the script to say, no meta description or anything else.",
            topic.trim()
        ))
        .with_system(SYSTEM_PROMPT)
        .with_temperature(0.7)
        .with_max_tokens(300);

        let script = state.providers.openai.complete(&prompt).await?;
        info!("Generated script for {:?} ({} chars)", topic, script.len());

        if script.is_empty() {
            return Ok(EMPTY_SCRIPT.to_string());
        }
        Ok(script)
    }
}

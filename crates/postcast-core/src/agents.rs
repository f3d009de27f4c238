use async_trait::async_trait;

use crate::error::{PostcastError, Result};
use crate::provider::Provider;

/// Identity and instruction of one generative agent. `search` asks the
/// provider to enable its web-search capability for the call.
#[derive(Debug, Clone, Copy)]
pub struct AgentSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    pub search: bool,
}

/// Generative-language collaborator: executes one agent prompt and returns
/// the final response text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn run_agent(&self, agent: &AgentSpec, message: &str) -> Result<String>;
}

/// Builds the single user message an agent receives: the topic plus the
/// previous stage's output, as literal text.
pub fn agent_message(topic: &str, subject: &str) -> String {
    format!("Topic: {topic}\n{subject}")
}

static SUMMARIZER_INSTRUCTION: &str = r#"
Write a concise summary of the provided text, highlighting the main points
in at most 100 words.
"#;

static SENTIMENT_INSTRUCTION: &str = r#"
Analyze the overall sentiment of the provided text and classify it as
'positive', 'negative' or 'neutral'. Reply with the classification only.
"#;

static SEARCHER_INSTRUCTION: &str = r#"
You are a research assistant. Use web search to retrieve the latest,
highly relevant release news about the topic below. Focus on at most 5
relevant releases, ranked by volume and enthusiasm of coverage. Releases
must be current: no older than one month before today's date.
"#;

static PLANNER_INSTRUCTION: &str = r#"
You are a social media content planner. Based on the provided list of
releases, use web search to work out the most relevant points to cover in
a post about each release. Pick the single most relevant one and return
its theme, its main points, and a plan of the subjects the post should
cover.
"#;

static DRAFTER_INSTRUCTION: &str = r#"
You are a creative copywriter specialized in viral social media posts.
Using the provided post plan, write a draft post for Instagram. The post
must be engaging, informative, written in simple language, and include 2
to 4 hashtags.
"#;

static REVIEWER_INSTRUCTION: &str = r#"
You are a meticulous content editor specialized in Instagram posts for a
young audience (18-30). Review the draft below for clarity, concision,
correctness and tone. If it is good, reply 'The draft is great and ready
to publish!'. Otherwise, point out the problems and suggest improvements.
"#;

pub fn summarizer() -> AgentSpec {
    AgentSpec {
        name: "summarizer",
        description: "Agent that writes concise summaries of texts.",
        instruction: SUMMARIZER_INSTRUCTION,
        search: false,
    }
}

pub fn sentiment_classifier() -> AgentSpec {
    AgentSpec {
        name: "sentiment_classifier",
        description: "Agent that classifies the overall sentiment of a text.",
        instruction: SENTIMENT_INSTRUCTION,
        search: false,
    }
}

pub fn searcher() -> AgentSpec {
    AgentSpec {
        name: "searcher",
        description: "Agent that searches the web for recent releases.",
        instruction: SEARCHER_INSTRUCTION,
        search: true,
    }
}

pub fn planner() -> AgentSpec {
    AgentSpec {
        name: "planner",
        description: "Agent that plans social media posts.",
        instruction: PLANNER_INSTRUCTION,
        search: true,
    }
}

pub fn drafter() -> AgentSpec {
    AgentSpec {
        name: "drafter",
        description: "Agent that drafts engaging Instagram posts.",
        instruction: DRAFTER_INSTRUCTION,
        search: false,
    }
}

pub fn reviewer() -> AgentSpec {
    AgentSpec {
        name: "reviewer",
        description: "Agent that reviews social media post drafts.",
        instruction: REVIEWER_INSTRUCTION,
        search: false,
    }
}

/// [`LanguageModel`] backed by an OpenAI-compatible chat completions API.
pub struct ChatCompletions {
    provider: Provider,
    client: reqwest::Client,
}

impl ChatCompletions {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LanguageModel for ChatCompletions {
    async fn run_agent(&self, agent: &AgentSpec, message: &str) -> Result<String> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let system_prompt = format!("{}\n{}", agent.description, agent.instruction.trim());
        let mut body = serde_json::json!({
            "model": config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt,
                },
                {
                    "role": "user",
                    "content": message,
                },
            ],
            "temperature": 0.3,
        });
        if agent.search {
            body["tools"] = serde_json::json!([{ "type": "web_search" }]);
        }

        let response = self
            .client
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        final_response_text(agent, &response)
    }
}

/// Extracts the completion text, distinguishing an API-level failure (no
/// completion in the body, e.g. a quota or auth error payload) from a
/// completion that came back genuinely blank.
fn final_response_text(agent: &AgentSpec, response: &serde_json::Value) -> Result<String> {
    let Some(content) = response["choices"][0]["message"]["content"].as_str() else {
        return Err(PostcastError::AgentFailed {
            agent: agent.name.to_string(),
            reason: format!("invalid API response: {response}"),
        });
    };

    let content = content.trim();
    if content.is_empty() {
        return Err(PostcastError::EmptyResponse {
            agent: agent.name.to_string(),
        });
    }

    Ok(content.to_string())
}

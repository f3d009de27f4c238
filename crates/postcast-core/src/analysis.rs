use std::sync::Arc;

use crate::agents::{self, LanguageModel, agent_message};
use crate::error::Result;
use crate::types::Sentiment;

/// Summary and sentiment over the completed transcript text.
///
/// Both operations are single no-search round-trips to the language model.
/// Failures stay typed here so the causes remain inspectable; the pipeline
/// boundary is what degrades them to empty values.
pub struct AnalysisStage {
    model: Arc<dyn LanguageModel>,
}

impl AnalysisStage {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        let agent = agents::summarizer();
        let message = agent_message(text, &format!("Text to summarize: {text}"));
        self.model.run_agent(&agent, &message).await
    }

    pub async fn classify_sentiment(&self, text: &str) -> Result<Sentiment> {
        let agent = agents::sentiment_classifier();
        let message = agent_message(text, &format!("Text to analyze: {text}"));
        let label = self.model.run_agent(&agent, &message).await?;
        Ok(Sentiment::parse(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::MockLanguageModel;
    use crate::error::PostcastError;

    #[tokio::test]
    async fn sentiment_label_is_parsed_into_the_enum() {
        let mut model = MockLanguageModel::new();
        model
            .expect_run_agent()
            .returning(|_, _| Ok("Positivo".to_string()));

        let stage = AnalysisStage::new(Arc::new(model));
        let sentiment = stage.classify_sentiment("great talk").await.unwrap();
        assert_eq!(sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn mismatched_label_collapses_to_unknown() {
        let mut model = MockLanguageModel::new();
        model
            .expect_run_agent()
            .returning(|_, _| Ok("somewhat enthusiastic".to_string()));

        let stage = AnalysisStage::new(Arc::new(model));
        let sentiment = stage.classify_sentiment("great talk").await.unwrap();
        assert_eq!(sentiment, Sentiment::Unknown);
    }

    #[tokio::test]
    async fn empty_response_stays_a_typed_error_here() {
        let mut model = MockLanguageModel::new();
        model.expect_run_agent().returning(|agent, _| {
            Err(PostcastError::EmptyResponse {
                agent: agent.name.to_string(),
            })
        });

        let stage = AnalysisStage::new(Arc::new(model));
        let err = stage.summarize("anything").await.unwrap_err();
        assert!(matches!(err, PostcastError::EmptyResponse { .. }));
    }
}

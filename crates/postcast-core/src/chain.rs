use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::agents::{self, AgentSpec, LanguageModel, agent_message};

/// Everything the four-stage chain produced. Inner stages feed the next
/// stage verbatim; all artifacts are surfaced so the caller can show the
/// intermediate results alongside the final reviewed post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainOutput {
    pub search_findings: String,
    pub post_plan: String,
    pub draft: String,
    pub reviewed_post: String,
}

/// Sequential agent pipeline: Search -> Plan -> Draft -> Review.
///
/// Best-effort by design: a failed stage logs its cause and passes an empty
/// string forward instead of aborting, so the chain always runs to the end
/// and the user always gets some final output.
pub struct AgentChain {
    model: Arc<dyn LanguageModel>,
}

impl AgentChain {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub async fn run(&self, topic: &str, today: NaiveDate) -> ChainOutput {
        let search_findings = self
            .step(
                &agents::searcher(),
                topic,
                &format!("Today's date: {}", today.format("%d/%m/%Y")),
            )
            .await;

        let post_plan = self
            .step(
                &agents::planner(),
                topic,
                &format!("Retrieved releases: {search_findings}"),
            )
            .await;

        let draft = self
            .step(&agents::drafter(), topic, &format!("Post plan: {post_plan}"))
            .await;

        let reviewed_post = self
            .step(&agents::reviewer(), topic, &format!("Draft: {draft}"))
            .await;

        ChainOutput {
            search_findings,
            post_plan,
            draft,
            reviewed_post,
        }
    }

    async fn step(&self, agent: &AgentSpec, topic: &str, subject: &str) -> String {
        match self
            .model
            .run_agent(agent, &agent_message(topic, subject))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(agent = agent.name, error = %err, "agent stage degraded to empty output");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::agents::MockLanguageModel;
    use crate::error::PostcastError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap()
    }

    #[tokio::test]
    async fn all_four_stages_run_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut model = MockLanguageModel::new();
        model.expect_run_agent().returning(move |agent, _| {
            sink.lock().unwrap().push(agent.name);
            Ok(format!("{} output", agent.name))
        });

        let chain = AgentChain::new(Arc::new(model));
        let out = chain.run("rust releases", today()).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["searcher", "planner", "drafter", "reviewer"]
        );
        assert_eq!(out.reviewed_post, "reviewer output");
    }

    #[tokio::test]
    async fn search_failure_still_reaches_done_with_empty_findings() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let mut model = MockLanguageModel::new();
        model.expect_run_agent().returning(move |agent, message| {
            sink.lock().unwrap().push((agent.name, message.to_string()));
            if agent.name == "searcher" {
                Err(PostcastError::EmptyResponse {
                    agent: agent.name.to_string(),
                })
            } else {
                Ok(format!("{} output", agent.name))
            }
        });

        let chain = AgentChain::new(Arc::new(model));
        let out = chain.run("rust releases", today()).await;

        assert!(out.search_findings.is_empty());
        assert_eq!(out.post_plan, "planner output");
        assert_eq!(out.reviewed_post, "reviewer output");

        let messages = messages.lock().unwrap();
        let planner_message = &messages
            .iter()
            .find(|(name, _)| *name == "planner")
            .unwrap()
            .1;
        assert!(planner_message.ends_with("Retrieved releases: "));
    }

    #[tokio::test]
    async fn every_stage_failing_still_completes_the_chain() {
        let mut model = MockLanguageModel::new();
        model.expect_run_agent().times(4).returning(|agent, _| {
            Err(PostcastError::EmptyResponse {
                agent: agent.name.to_string(),
            })
        });

        let chain = AgentChain::new(Arc::new(model));
        let out = chain.run("rust releases", today()).await;
        assert_eq!(out, ChainOutput::default());
    }
}

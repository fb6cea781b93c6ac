//! Astute RAG pipeline orchestration

use std::sync::Arc;

use serde::Serialize;
use tracing::{Instrument, debug, info, info_span};

use super::abstention::AbstentionDetector;
use super::completion::CompletionModel;
use super::config::RagConfig;
use super::consolidator::KnowledgeConsolidator;
use super::document::Document;
use super::finalizer::{AnswerFinalizer, FinalAnswer};
use super::generator::InternalKnowledgeGenerator;
use crate::domain::DomainError;

/// Everything one pipeline run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub question: String,
    /// External documents followed by the internal one, if any
    pub working_set: Vec<Document>,
    pub consolidated: Vec<Document>,
    pub answer: FinalAnswer,
}

/// Generate, consolidate and finalize, in that order
#[derive(Debug, Clone)]
pub struct AstuteRagPipeline {
    generator: InternalKnowledgeGenerator,
    consolidator: KnowledgeConsolidator,
    finalizer: AnswerFinalizer,
}

impl AstuteRagPipeline {
    /// Create a pipeline whose stages all share `model`
    pub fn new(model: Arc<dyn CompletionModel>, config: RagConfig) -> Self {
        Self {
            generator: InternalKnowledgeGenerator::new(model.clone(), config.clone()),
            consolidator: KnowledgeConsolidator::new(model.clone(), config.clone()),
            finalizer: AnswerFinalizer::new(model, config),
        }
    }

    /// Assemble a pipeline from individually configured stages
    pub fn from_stages(
        generator: InternalKnowledgeGenerator,
        consolidator: KnowledgeConsolidator,
        finalizer: AnswerFinalizer,
    ) -> Self {
        Self {
            generator,
            consolidator,
            finalizer,
        }
    }

    /// Replace the generator's abstention predicate
    pub fn with_abstention_detector(mut self, detector: Arc<dyn AbstentionDetector>) -> Self {
        self.generator = self.generator.with_detector(detector);
        self
    }

    /// Answer `question` using the retrieved passages and the model's own knowledge
    pub async fn answer_question<S: AsRef<str>>(
        &self,
        question: &str,
        retrieved_passages: &[S],
    ) -> Result<String, DomainError> {
        let outcome = self.run(question, retrieved_passages).await?;
        Ok(outcome.answer.answer)
    }

    /// Run the full pipeline and keep every intermediate result
    pub async fn run<S: AsRef<str>>(
        &self,
        question: &str,
        retrieved_passages: &[S],
    ) -> Result<PipelineOutcome, DomainError> {
        let span = info_span!("astute_rag", passages = retrieved_passages.len());

        async move {
            info!("Answering question with {} retrieved passages", retrieved_passages.len());

            let external_docs =
                Document::from_passages(retrieved_passages.iter().map(|p| p.as_ref()));

            let internal_docs = self.generator.generate(question).await?;
            debug!("Internal knowledge documents: {}", internal_docs.len());

            let mut working_set = external_docs;
            working_set.extend(internal_docs);

            let consolidated = self.consolidator.consolidate(question, &working_set).await?;

            let answer = self
                .finalizer
                .finalize(question, &working_set, &consolidated)
                .await?;

            info!(
                "Pipeline complete: working_set={}, consolidated={}, structured_answer={}",
                working_set.len(),
                consolidated.len(),
                answer.structured
            );

            Ok(PipelineOutcome {
                question: question.to_string(),
                working_set,
                consolidated,
                answer,
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rag::completion::mock::{PromptKind, ScriptedCompletionModel};
    use crate::domain::rag::document::DocumentOrigin;

    const QUESTION: &str = "What is the capital of France?";

    fn france_model() -> Arc<ScriptedCompletionModel> {
        Arc::new(
            ScriptedCompletionModel::new()
                .with_generation("Paris is the capital of France.")
                .with_consolidation(
                    r#"[{"content": "Paris is the capital of France.", "source": ["external_0", "internal_0"], "consistency_group": "1"}]"#,
                )
                .with_finalization(r#"{"answer": "Paris", "confidence": "high"}"#),
        )
    }

    fn pipeline(model: Arc<ScriptedCompletionModel>) -> AstuteRagPipeline {
        AstuteRagPipeline::new(model, RagConfig::default())
    }

    #[tokio::test]
    async fn test_answer_question_round_trip() {
        let model = france_model();
        let pipeline = pipeline(model.clone());

        let answer = pipeline
            .answer_question(QUESTION, &["Paris is the capital of France."])
            .await
            .unwrap();

        assert_eq!(answer, "Paris");
        assert_eq!(
            model.call_kinds(),
            vec![
                PromptKind::Generation,
                PromptKind::Consolidation,
                PromptKind::Finalization
            ]
        );
        assert!(model.calls().iter().all(|c| c.temperature == 0.0));
    }

    #[tokio::test]
    async fn test_working_set_order() {
        let pipeline = pipeline(france_model());
        let passages = vec![
            "Paris is the capital and largest city of France.".to_string(),
            "The city of Paris serves as France's capital.".to_string(),
            "France's political center is Paris.".to_string(),
        ];

        let outcome = pipeline.run(QUESTION, passages.as_slice()).await.unwrap();

        let ids: Vec<&str> = outcome.working_set.iter().map(|d| d.doc_id()).collect();
        assert_eq!(ids, vec!["external_0", "external_1", "external_2", "internal_0"]);
        assert_eq!(outcome.working_set[1].content(), passages[1]);
        assert_eq!(outcome.working_set[3].origin(), DocumentOrigin::Internal);
    }

    #[tokio::test]
    async fn test_outcome_surfaces_confidence_and_consolidation() {
        let pipeline = pipeline(france_model());

        let outcome = pipeline
            .run(QUESTION, &["Paris is the capital of France."])
            .await
            .unwrap();

        assert_eq!(outcome.answer.confidence.as_deref(), Some("high"));
        assert_eq!(outcome.consolidated.len(), 1);
        assert_eq!(outcome.consolidated[0].doc_id(), "consolidated_1");
    }

    #[tokio::test]
    async fn test_empty_passages_and_abstention() {
        let model = Arc::new(
            ScriptedCompletionModel::new()
                .with_generation("I don't know")
                .with_consolidation("There is nothing to consolidate.")
                .with_finalization("I cannot answer without context."),
        );
        let pipeline = pipeline(model.clone());
        let passages: [&str; 0] = [];

        let outcome = pipeline.run(QUESTION, passages.as_slice()).await.unwrap();

        assert!(outcome.working_set.is_empty());
        assert!(outcome.consolidated.is_empty());
        assert_eq!(outcome.answer.answer, "I cannot answer without context.");

        let consolidation_prompt = model.prompt_for(PromptKind::Consolidation).unwrap();
        assert!(consolidation_prompt.contains("Context: \n"));

        let finalization_prompt = model.prompt_for(PromptKind::Finalization).unwrap();
        assert!(finalization_prompt.contains("Initial Context: \n\nConsolidated Context: \n\n"));
    }

    #[tokio::test]
    async fn test_malformed_consolidation_feeds_working_set_to_finalizer() {
        let model = Arc::new(
            ScriptedCompletionModel::new()
                .with_generation("Paris.")
                .with_consolidation("not json")
                .with_finalization(r#"{"answer": "Paris"}"#),
        );
        let pipeline = pipeline(model.clone());

        let outcome = pipeline.run(QUESTION, &["Paris is the capital."]).await.unwrap();

        assert_eq!(outcome.consolidated, outcome.working_set);
        let prompt = model.prompt_for(PromptKind::Finalization).unwrap();
        assert!(prompt.contains("Consolidated Document 1 (internal): Paris."));
    }

    #[tokio::test]
    async fn test_idempotent_against_deterministic_model() {
        let pipeline = pipeline(france_model());
        let passages = ["Paris is the capital of France."];

        let first = pipeline.answer_question(QUESTION, &passages).await.unwrap();
        let second = pipeline.answer_question(QUESTION, &passages).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_provider_error_propagates_and_stops_pipeline() {
        let model = Arc::new(
            ScriptedCompletionModel::new()
                .with_generation("Paris.")
                .failing_on(PromptKind::Consolidation)
                .with_finalization(r#"{"answer": "Paris"}"#),
        );
        let pipeline = pipeline(model.clone());

        let result = pipeline.answer_question(QUESTION, &["Paris."]).await;

        assert!(result.unwrap_err().is_provider());
        assert_eq!(
            model.call_kinds(),
            vec![PromptKind::Generation, PromptKind::Consolidation]
        );
    }

    #[derive(Debug)]
    struct AlwaysAbstains;

    impl AbstentionDetector for AlwaysAbstains {
        fn is_abstention(&self, _response: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_custom_abstention_detector() {
        let pipeline = pipeline(france_model()).with_abstention_detector(Arc::new(AlwaysAbstains));

        let outcome = pipeline.run(QUESTION, &["Paris."]).await.unwrap();

        assert_eq!(outcome.working_set.len(), 1);
        assert_eq!(outcome.working_set[0].doc_id(), "external_0");
    }
}

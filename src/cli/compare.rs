//! Compare command - direct model answer next to the pipeline answer

use serde::Serialize;
use tracing::warn;

use super::{OutputFormat, QuestionArgs};

#[derive(Debug, Serialize)]
struct Comparison {
    question: String,
    without_rag: ArmResult,
    with_rag: ArmResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum ArmResult {
    Answer(String),
    Error(String),
}

impl ArmResult {
    fn from_result<E: std::fmt::Display>(result: Result<String, E>) -> Self {
        match result {
            Ok(answer) => Self::Answer(answer),
            Err(e) => {
                warn!("Comparison arm failed: {}", e);
                Self::Error(e.to_string())
            }
        }
    }
}

impl std::fmt::Display for ArmResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Answer(answer) => write!(f, "Answer: {}", answer),
            Self::Error(error) => write!(f, "Error: {}", error),
        }
    }
}

/// Run both arms; a failure in one is reported without skipping the other
pub async fn run(args: QuestionArgs) -> anyhow::Result<()> {
    let config = crate::bootstrap()?;
    let passages = args.collect_passages()?;

    let model = crate::create_completion_model(&config)?;
    let direct = crate::domain::DirectAnswerer::new(model.clone(), config.rag.clone());
    let pipeline = crate::domain::AstuteRagPipeline::new(model, config.rag.clone());

    let without_rag = ArmResult::from_result(direct.answer(&args.question).await);
    let with_rag =
        ArmResult::from_result(pipeline.answer_question(&args.question, passages.as_slice()).await);

    let comparison = Comparison {
        question: args.question,
        without_rag,
        with_rag,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        OutputFormat::Text => {
            println!("Question: {}", comparison.question);
            println!("\n1. Without RAG (model only):");
            println!("{}", comparison.without_rag);
            println!("\n2. With RAG (internal knowledge + retrieved passages):");
            println!("{}", comparison.with_rag);
        }
    }

    Ok(())
}

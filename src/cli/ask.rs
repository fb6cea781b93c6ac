//! Ask command - answers one question with the full pipeline

use tracing::info;

use super::{OutputFormat, QuestionArgs};
use crate::config::AppConfig;
use crate::domain::PipelineOutcome;

/// Run the pipeline for the given question and passages
pub async fn run(args: QuestionArgs) -> anyhow::Result<()> {
    let config = crate::bootstrap()?;
    let passages = args.collect_passages()?;

    let outcome = answer(&config, &args.question, &passages).await?;
    print_outcome(&outcome, args.format)?;

    Ok(())
}

async fn answer(
    config: &AppConfig,
    question: &str,
    passages: &[String],
) -> anyhow::Result<PipelineOutcome> {
    let pipeline = crate::create_pipeline(config)?;

    info!("Asking: {}", question);
    Ok(pipeline.run(question, passages).await?)
}

fn print_outcome(outcome: &PipelineOutcome, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Text => {
            println!("{}", outcome.answer.answer);
            if let Some(confidence) = &outcome.answer.confidence {
                println!("\nConfidence: {}", confidence);
            }
        }
    }

    Ok(())
}

//! Page markup generation

use tracing::info;

use crate::errors::DeployError;
use crate::http::gemini::TextGenerator;
use crate::models::request::Attachment;

/// Instruction sent to the model. Attachments are listed by name only.
pub fn build_prompt(brief: &str, attachments: &[Attachment]) -> String {
    let mut prompt = format!(
        "You are an expert web developer. Write a minimal HTML+JS+CSS app that fulfills this brief:\n{}\n",
        brief
    );

    if !attachments.is_empty() {
        prompt.push_str("\nAttachments provided:\n");
        for attachment in attachments {
            prompt.push_str("- ");
            prompt.push_str(&attachment.name);
            prompt.push('\n');
        }
    }

    prompt
}

/// Ask the model for the page and return its answer untouched
pub async fn generate(
    generator: &dyn TextGenerator,
    brief: &str,
    attachments: &[Attachment],
) -> Result<String, DeployError> {
    let prompt = build_prompt(brief, attachments);
    let markup = generator.generate(&prompt).await?;
    info!("Generated {} bytes of markup", markup.len());
    Ok(markup)
}

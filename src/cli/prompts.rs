//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user before sending the result to the AI service
pub fn confirm_generate_insight(model: &str) -> Result<bool> {
    confirm_step(&format!("Generate AI insight with {}?", model))
}

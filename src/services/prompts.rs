use std::path::Path;

use crate::error::AppError;

pub const CHEF_IMAGE_PROMPT_FILE: &str = "chef_image.txt";
pub const REVIEW_SYSTEM_PROMPT_FILE: &str = "pizza_review_system_prompt.txt";

const CHEF_NAME_PLACEHOLDER: &str = "{chef_name}";

/// Prompt templates loaded once at startup.
#[derive(Debug, Clone)]
pub struct Prompts {
    chef_image: String,
    review_system: String,
}

impl Prompts {
    pub fn new(chef_image: impl Into<String>, review_system: impl Into<String>) -> Self {
        Self {
            chef_image: chef_image.into(),
            review_system: review_system.into(),
        }
    }

    /// Reads both templates from `dir`. A missing or blank file is an error.
    pub fn load(dir: &Path) -> Result<Self, AppError> {
        Ok(Self::new(
            read_prompt(dir, CHEF_IMAGE_PROMPT_FILE)?,
            read_prompt(dir, REVIEW_SYSTEM_PROMPT_FILE)?,
        ))
    }

    pub fn chef_image(&self) -> &str {
        &self.chef_image
    }

    pub fn review_system(&self, chef_name: &str) -> String {
        self.review_system.replace(CHEF_NAME_PLACEHOLDER, chef_name)
    }

    pub fn review_user(chef_name: &str) -> String {
        format!(
            "Here is the submission from chef {}. Please review it and produce ONLY JSON matching the schema.",
            chef_name
        )
    }
}

fn read_prompt(dir: &Path, file: &str) -> Result<String, AppError> {
    let path = dir.join(file);
    let text = std::fs::read_to_string(&path).map_err(|e| AppError::MissingPrompt {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Err(AppError::MissingPrompt {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(text.trim().to_string())
}

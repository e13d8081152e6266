//! Confirmation prompts
//!
//! A [`Confirmer`] asks the user a yes/no question and suspends the caller
//! until it is answered.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Contents of a yes/no dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmPrompt {
    /// Prompt offered when a login email has no account
    pub fn create_account(email: &str) -> Self {
        ConfirmPrompt {
            title: "User not found".to_string(),
            message: format!(
                "No account exists for {}. Do you want to create one?",
                email
            ),
            confirm_text: "Create account".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }
}

/// Blocking yes/no question
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Shows the prompt and resolves to `true` if the user confirmed
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
}

/// Confirmer answering from a script
///
/// Each call pops the next answer. When the script runs out the answer is
/// `false`. Every prompt shown is recorded.
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirmer {
    /// Creates a confirmer giving `answers` in order
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        ScriptedConfirmer {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt);

        self.answers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_prompt_names_email() {
        let prompt = ConfirmPrompt::create_account("a@a.com");
        assert!(prompt.message.contains("a@a.com"));
        assert_eq!(prompt.confirm_text, "Create account");
        assert_eq!(prompt.cancel_text, "Cancel");
    }

    #[tokio::test]
    async fn test_scripted_answers() {
        let confirmer = ScriptedConfirmer::new([true, false]);

        assert!(confirmer.confirm(ConfirmPrompt::create_account("a@a.com")).await);
        assert!(!confirmer.confirm(ConfirmPrompt::create_account("b@b.com")).await);
        // Script exhausted
        assert!(!confirmer.confirm(ConfirmPrompt::create_account("c@c.com")).await);

        let prompts = confirmer.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].message.contains("b@b.com"));
    }
}

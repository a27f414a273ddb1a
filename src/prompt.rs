//! Interactive prompt surface.
//!
//! [`Prompt`] is the seam between flow logic and the terminal. The real
//! implementation wraps `dialoguer` on stderr; tests script answers through
//! [`ScriptedPrompt`].

use std::collections::VecDeque;

use dialoguer::{Input, Password, console::Term};

use crate::error::PromptError;

/// Question-and-answer surface for the bootstrap flows.
pub trait Prompt {
    /// Yes/no question. An empty reply takes `default`; `y`/`yes` (any case)
    /// accepts; any other reply declines.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError>;

    /// Free-text question. An empty reply is allowed and returned as-is.
    fn input(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Free-text question with the echo masked.
    fn password(&mut self, prompt: &str) -> Result<String, PromptError>;
}

/// Shared interpretation of a yes/no reply, so the terminal and scripted
/// prompts cannot drift apart.
fn interpret_confirm(reply: &str, default: bool) -> bool {
    let reply = reply.trim();
    if reply.is_empty() {
        return default;
    }
    matches!(reply.to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Terminal-backed prompt on stderr, so stdout stays clean for redirection.
#[derive(Debug, Default)]
pub struct TermPrompt;

impl Prompt for TermPrompt {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        let reply = Input::<String>::new()
            .with_prompt(format!("{prompt} {suffix}"))
            .allow_empty(true)
            .interact_text_on(&Term::stderr())?;
        Ok(interpret_confirm(&reply, default))
    }

    fn input(&mut self, prompt: &str) -> Result<String, PromptError> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&Term::stderr())?)
    }

    fn password(&mut self, prompt: &str) -> Result<String, PromptError> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact_on(&Term::stderr())?)
    }
}

/// Prompt fed from a fixed list of replies, consumed in order. Confirm
/// replies go through the same interpretation as the terminal prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    replies: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
        }
    }

    fn next_reply(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.replies
            .pop_front()
            .ok_or_else(|| PromptError::ScriptExhausted {
                prompt: prompt.to_string(),
            })
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, PromptError> {
        let reply = self.next_reply(prompt)?;
        Ok(interpret_confirm(&reply, default))
    }

    fn input(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.next_reply(prompt)
    }

    fn password(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.next_reply(prompt)
    }
}

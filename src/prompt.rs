use anyhow::{Context, Error};
use dialoguer::{console::Term, theme::ColorfulTheme, Confirm};
use log::info;

use crate::{
    collaborators::{Answer, UserPrompt},
    config::PromptMode,
};

/// Asks questions on the terminal, or answers them on its own when configured
/// to do so.
pub struct TerminalPrompt {
    mode: PromptMode,
    term: Term,
}

impl TerminalPrompt {
    pub fn new(mode: PromptMode) -> Self {
        Self {
            mode,
            term: Term::stderr(),
        }
    }

    fn fixed_answer(&self, message: &str, answer: Answer) -> Result<Answer, Error> {
        self.notify(message)?;
        info!("Answering {answer:?} without asking");
        Ok(answer)
    }
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<Answer, Error> {
        match self.mode {
            PromptMode::Ask => {
                let accepted = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(message)
                    .default(false)
                    .interact_on(&self.term)
                    .context("Failed to read the answer from the terminal")?;
                Ok(if accepted {
                    Answer::Accept
                } else {
                    Answer::Decline
                })
            }
            PromptMode::AssumeYes => self.fixed_answer(message, Answer::Accept),
            PromptMode::AssumeNo => self.fixed_answer(message, Answer::Decline),
        }
    }

    fn notify(&self, message: &str) -> Result<(), Error> {
        self.term
            .write_line(message)
            .context("Failed to write to the terminal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_answers() {
        let prompt = TerminalPrompt::new(PromptMode::AssumeYes);
        assert_eq!(prompt.confirm("Continue anyway?").unwrap(), Answer::Accept);

        let prompt = TerminalPrompt::new(PromptMode::AssumeNo);
        assert_eq!(prompt.confirm("Continue anyway?").unwrap(), Answer::Decline);
    }
}

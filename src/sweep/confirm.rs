use std::io::{BufRead, Write};

/// Capability to ask the operator a yes/no question
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Any `FnMut(&str) -> bool` answers prompts, which keeps tests free of stdin
impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Only the exact token `y` agrees. Spaces, tabs and newlines around it are
/// ignored, as a shell `read` with the default IFS strips them; any other
/// character, including other Unicode whitespace, declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n')) == "y"
}

/// Reads the answer from stdin
#[derive(Debug, Default)]
pub struct StdinConfirm {
    /// Write the prompt to stderr, leaving stdout for machine output
    prompt_to_stderr: bool,
}

impl StdinConfirm {
    pub fn new(prompt_to_stderr: bool) -> Self {
        Self { prompt_to_stderr }
    }

    fn ask(&self, prompt: &str) -> std::io::Result<String> {
        if self.prompt_to_stderr {
            let mut err = std::io::stderr();
            write!(err, "{} ", prompt)?;
            err.flush()?;
        } else {
            let mut out = std::io::stdout();
            write!(out, "{} ", prompt)?;
            out.flush()?;
        }

        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input)?;
        Ok(input)
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.ask(prompt) {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation; treating as no");
                false
            }
        }
    }
}

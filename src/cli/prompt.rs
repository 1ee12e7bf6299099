//! Line prompts on stderr, answers from one reader shared by every prompt of
//! a command.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::io::{IsTerminal, Write};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, BufReader, Stdin},
    task,
};

#[derive(Debug)]
pub struct Prompter<R> {
    reader: R,
    interactive: bool,
}

impl Prompter<BufReader<Stdin>> {
    /// Reads from stdin. Passwords are typed without echo when stdin is a terminal.
    #[must_use]
    pub fn stdin() -> Self {
        Self {
            reader: BufReader::new(io::stdin()),
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    /// Non-interactive prompter; passwords are read as plain lines.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            interactive: false,
        }
    }

    /// Returns the trimmed answer; an empty string once input is exhausted.
    ///
    /// # Errors
    /// Returns an error if the label cannot be written or the input read.
    pub async fn line(&mut self, label: &str) -> Result<String> {
        {
            let mut stderr = std::io::stderr().lock();
            write!(stderr, "{label}: ").context("failed to write prompt")?;
            stderr.flush().context("failed to write prompt")?;
        }

        let mut answer = String::new();
        self.reader
            .read_line(&mut answer)
            .await
            .context("failed to read input")?;

        Ok(answer.trim().to_string())
    }

    /// Uses `value` when given, otherwise asks.
    ///
    /// # Errors
    /// See [`Prompter::line`].
    pub async fn or_ask(&mut self, value: Option<String>, label: &str) -> Result<String> {
        match value {
            Some(value) => Ok(value),
            None => self.line(label).await,
        }
    }

    /// # Errors
    /// See [`Prompter::line`]; on a terminal, also fails if the tty cannot be read.
    pub async fn secret_or_ask(
        &mut self,
        value: Option<SecretString>,
        label: &str,
    ) -> Result<SecretString> {
        match value {
            Some(value) => Ok(value),
            None if self.interactive => hidden(label).await,
            None => self.line(label).await.map(SecretString::from),
        }
    }
}

async fn hidden(label: &str) -> Result<SecretString> {
    let prompt = format!("{label}: ");
    let answer = task::spawn_blocking(move || rpassword::prompt_password(prompt))
        .await
        .context("password prompt task failed")?
        .context("failed to read password")?;
    Ok(SecretString::from(answer))
}

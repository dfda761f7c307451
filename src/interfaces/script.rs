//! Line-oriented form script driving a session from a file or stdin.
//!
//! ```text
//! # comments and blank lines are skipped
//! payer_account 1
//! amount 100.50
//! payee_account LT307300010172619164
//! purpose Test payment
//! payee John Doe
//! submit
//! ```
//!
//! `wait` blocks until every in-flight IBAN check and submission has settled.

use crate::application::controller::FormEvent;
use crate::domain::form::Field;
use crate::error::{FormError, Result};
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Event(FormEvent),
    Wait,
}

/// Parses one script line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Option<std::result::Result<ScriptStep, String>> {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }

    let (head, value) = line.split_once(' ').unwrap_or((line, ""));
    let step = match head {
        "submit" => Ok(ScriptStep::Event(FormEvent::SubmitRequested)),
        "wait" => Ok(ScriptStep::Wait),
        _ => head
            .parse::<Field>()
            .map(|field| ScriptStep::Event(FormEvent::edit(field, value))),
    };
    Some(step)
}

pub struct ScriptReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily yields the steps of the script, tagging errors with line numbers.
    pub fn steps(self) -> impl Iterator<Item = Result<ScriptStep>> {
        self.source
            .lines()
            .enumerate()
            .filter_map(|(index, line)| match line {
                Ok(line) => parse_line(&line).map(|step| {
                    step.map_err(|message| FormError::InputError {
                        line: index + 1,
                        message,
                    })
                }),
                Err(e) => Some(Err(FormError::from(e))),
            })
    }
}

//! Scripted console for tests and non-terminal callers.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use buildtree_core::{
    application::{ApplicationError, ports::Console},
    error::BuildtreeResult,
};

/// Console that answers prompts from a queue and records every question.
///
/// When the queue runs dry the prompt's default is returned. Clones share
/// state, so a test can keep a handle after giving one to a service.
#[derive(Debug, Clone)]
pub struct ScriptedConsole {
    input_enabled: bool,
    inner: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    /// Interactive console with the given queued answers.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input_enabled: true,
            inner: Arc::new(Mutex::new(Script {
                answers: answers.into_iter().map(Into::into).collect(),
                prompts: Vec::new(),
            })),
        }
    }

    /// Console with input disabled.
    pub fn no_input() -> Self {
        Self {
            input_enabled: false,
            inner: Arc::default(),
        }
    }

    /// Every question asked so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|script| script.prompts.clone())
            .unwrap_or_default()
    }
}

impl Console for ScriptedConsole {
    fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    fn prompt(&self, text: &str, default: &str) -> BuildtreeResult<String> {
        if !self.input_enabled {
            return Err(ApplicationError::ConsoleError {
                reason: "input is disabled".into(),
            }
            .into());
        }
        let mut script = self
            .inner
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        script.prompts.push(text.to_string());
        Ok(script
            .answers
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }
}

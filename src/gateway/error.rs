use thiserror::Error;

use crate::backend::BackendError;

/// The tool an error came from; selects the wording of the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddMemory,
    SearchMemory,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::AddMemory => "add_memory",
            Self::SearchMemory => "search_memory",
        }
    }

    fn rejected_hint(self) -> &'static str {
        match self {
            Self::AddMemory => "try shortening or rewording the note",
            Self::SearchMemory => "try rephrasing your question",
        }
    }

    fn failure_prefix(self) -> &'static str {
        match self {
            Self::AddMemory => "I couldn't save that memory",
            Self::SearchMemory => "I couldn't search your memories",
        }
    }
}

/// Everything that can stop a tool invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Rejected locally; no request was sent.
    #[error("invalid input: {0} is empty")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Backend(e) => e.kind(),
        }
    }

    /// One plain sentence for the caller. Never carries status codes,
    /// backend payloads or transport error text.
    pub fn user_message(&self, op: Operation) -> String {
        let prefix = op.failure_prefix();
        match self {
            Self::InvalidInput(_) => match op {
                Operation::AddMemory => {
                    "I can't save an empty memory; please tell me what you'd like me to remember."
                        .to_string()
                }
                Operation::SearchMemory => {
                    "Please tell me what you're looking for so I can search your memories."
                        .to_string()
                }
            },
            Self::Backend(BackendError::Unreachable {
                timed_out: true, ..
            }) => format!(
                "{prefix} because the memory service took too long to respond (timeout); please try again in a moment."
            ),
            Self::Backend(BackendError::Unreachable { .. }) => format!(
                "{prefix} because the memory service is unreachable right now; please check the connection and try again."
            ),
            Self::Backend(BackendError::Rejected { .. }) => format!(
                "{prefix} because the memory service rejected the request; {}.",
                op.rejected_hint()
            ),
            Self::Backend(BackendError::BackendFault(_)) => format!(
                "{prefix} because the memory service ran into a problem on its side; please try again later."
            ),
        }
    }
}

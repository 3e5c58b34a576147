//! # Summarization
//!
//! Condenses a message collection into a single text by asking a completion
//! service, so the result can seed a new prompt.
//!
//! The request always has two entries: the instruction prompt as `system`,
//! then a transcript of the thread as `user`. System messages of the thread
//! are left out of the transcript.
//!
//! The core only sees the [`Completer`] trait. No retry and no timeout:
//! dropping the returned future is how a caller cancels.

use crate::{ChatGraphError, Graph, NodeId, Role};
use std::future::Future;
use tracing::{debug, instrument};

/// Instruction prompt used when the caller supplies none.
pub const DEFAULT_SUMMARY_PROMPT: &str = concat!(
    "You are an expert at summarization that answers as concisely as possible. ",
    "Provide a summary of the given conversation, including all the key information ",
    "(e.g. people, places, events, things, etc) to continue on the conversation. ",
    "Do not include any unnecessary information, or a prefix in the output."
);

// =============================================================================
// COMPLETION CONTRACT
// =============================================================================

/// One role-tagged entry of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub role: Role,
    pub content: String,
}

impl CompletionEntry {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An ordered list of entries plus the model that should answer them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub model: String,
    pub entries: Vec<CompletionEntry>,
}

/// Generated texts, best choice first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResponse {
    pub choices: Vec<String>,
}

impl CompletionResponse {
    /// A response with a single choice.
    #[must_use]
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            choices: vec![text.into()],
        }
    }
}

/// A language-model completion service.
///
/// Implementations can be written with `async fn`.
pub trait Completer {
    /// Transport or API failure, surfaced to the caller unmodified.
    type Error: std::error::Error + Send + Sync + 'static;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, Self::Error>> + Send;
}

// =============================================================================
// SUMMARIZE
// =============================================================================

/// Build the thread transcript: one `"<role>: <content>"` line per
/// non-system message, in collection order.
#[must_use]
pub fn transcript(graph: &Graph, messages: &[NodeId]) -> String {
    let mut out = String::new();
    for message in messages.iter().filter_map(|id| graph.get(*id)) {
        if message.role == Role::System {
            continue;
        }
        out.push_str(&format!("{message}\n"));
    }
    out
}

/// Build the two-entry request sent by [`summarize_with_prompt`].
#[must_use]
pub fn summary_request(
    graph: &Graph,
    messages: &[NodeId],
    model: &str,
    prompt: &str,
) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        entries: vec![
            CompletionEntry::new(Role::System, prompt),
            CompletionEntry::new(Role::User, transcript(graph, messages)),
        ],
    }
}

/// Summarize `messages` with [`DEFAULT_SUMMARY_PROMPT`].
pub async fn summarize<C: Completer>(
    graph: &Graph,
    messages: &[NodeId],
    completer: &C,
    model: &str,
) -> Result<String, ChatGraphError> {
    summarize_with_prompt(graph, messages, completer, model, DEFAULT_SUMMARY_PROMPT).await
}

/// Summarize `messages` with a caller-supplied instruction prompt.
///
/// Returns the first choice of the completion. A collaborator failure is
/// wrapped in [`ChatGraphError::Summarize`] together with the number of
/// messages that were being summarized.
#[instrument(skip_all, fields(model = %model, count = messages.len()))]
pub async fn summarize_with_prompt<C: Completer>(
    graph: &Graph,
    messages: &[NodeId],
    completer: &C,
    model: &str,
    prompt: &str,
) -> Result<String, ChatGraphError> {
    let request = summary_request(graph, messages, model, prompt);

    debug!("requesting summary");

    let response = completer
        .complete(&request)
        .await
        .map_err(|e| ChatGraphError::Summarize {
            count: messages.len(),
            source: Box::new(e),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .ok_or(ChatGraphError::EmptyCompletion)
}

// =============================================================================
// TESTS
// =============================================================================

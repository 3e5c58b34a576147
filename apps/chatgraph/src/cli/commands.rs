//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//! Every command writes its result to `out`; logs go through `tracing`.

use super::Format;
use crate::config::Config;
use crate::error::AppError;
use chatgraph_core::{
    Chat, Completer, HydrationReport, Matcher, Message, NodeId, PersistenceHeader,
    chat_from_bytes, chat_from_slice, chat_to_bytes, chat_to_json_pretty,
    primitives::MAX_PERSISTENCE_PAYLOAD_SIZE,
};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE HANDLING
// =============================================================================

/// Maximum chat file size, matching the largest binary payload the core
/// accepts.
const MAX_CHAT_FILE_SIZE: u64 = MAX_PERSISTENCE_PAYLOAD_SIZE as u64;

/// Canonicalize an input path and make sure it names a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, AppError> {
    let canonical = path.canonicalize().map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;

    if !canonical.is_file() {
        return Err(AppError::File {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    Ok(canonical)
}

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), AppError> {
    let metadata = std::fs::metadata(path).map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > max_size {
        return Err(AppError::FileTooLarge {
            size: metadata.len(),
            max: max_size,
        });
    }
    Ok(())
}

/// Read a chat file without hydrating it. Binary files are recognized by
/// their header; anything else is parsed as JSON.
pub fn read_chat(path: &Path) -> Result<Chat, AppError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, MAX_CHAT_FILE_SIZE)?;

    let data = std::fs::read(&validated).map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let chat = if PersistenceHeader::is_binary(&data) {
        chat_from_bytes(&data)?
    } else {
        chat_from_slice(&data)?
    };

    tracing::debug!(
        "Read chat '{}' with {} messages from {}",
        chat.id,
        chat.graph.len(),
        path.display()
    );
    Ok(chat)
}

/// Read a chat file and hydrate it. Edges left unresolved are logged and
/// ignored by the walk-based commands.
pub fn load_chat(path: &Path) -> Result<(Chat, HydrationReport), AppError> {
    let mut chat = read_chat(path)?;
    let report = chat.hydrate_messages();
    warn_unresolved(&chat, &report);
    Ok((chat, report))
}

/// Write a chat in the requested format. Returns the number of bytes written.
pub fn save_chat(chat: &Chat, path: &Path, format: Format) -> Result<usize, AppError> {
    let data = match format {
        Format::Json => chat_to_json_pretty(chat)?.into_bytes(),
        Format::Binary => chat_to_bytes(chat)?,
    };

    std::fs::write(path, &data).map_err(|source| AppError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(data.len())
}

fn warn_unresolved(chat: &Chat, report: &HydrationReport) {
    for edge in &report.unresolved {
        tracing::warn!(
            "Message {} has an '{}' edge to unknown id '{}'",
            message_id(chat, edge.node),
            edge.direction,
            edge.id
        );
    }
}

fn message_id(chat: &Chat, node: NodeId) -> &str {
    chat.get(node).map(|m| m.id.as_str()).unwrap_or("?")
}

fn message_json(message: &Message) -> serde_json::Value {
    json!({
        "id": message.id,
        "role": message.role.as_str(),
        "content": message.content,
    })
}

fn write_json(out: &mut dyn Write, value: &serde_json::Value) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show a chat's header and messages.
pub fn cmd_show(path: &Path, json_mode: bool, out: &mut dyn Write) -> Result<(), AppError> {
    let (chat, report) = load_chat(path)?;

    if json_mode {
        let messages: Vec<_> = chat
            .graph
            .iter()
            .map(|(_, m)| {
                let mut value = message_json(m);
                value["in"] = json!(chat.graph.ids_of(&m.incoming));
                value["out"] = json!(chat.graph.ids_of(&m.outgoing));
                value
            })
            .collect();
        return write_json(
            out,
            &json!({
                "id": chat.id,
                "name": chat.name,
                "message_count": chat.graph.len(),
                "edge_count": chat.graph.edge_count(),
                "unresolved": report.unresolved.len(),
                "messages": messages,
            }),
        );
    }

    writeln!(out, "Chat: {} ({})", chat.name, chat.id)?;
    writeln!(out, "Messages:   {}", chat.graph.len())?;
    writeln!(out, "Edges:      {}", chat.graph.edge_count())?;
    writeln!(out, "Unresolved: {}", report.unresolved.len())?;
    writeln!(out)?;
    for (_, message) in chat.graph.iter() {
        let next = chat.graph.ids_of(&message.outgoing);
        if next.is_empty() {
            writeln!(out, "[{}] {}", message.id, message)?;
        } else {
            writeln!(out, "[{}] {} -> {}", message.id, message, next.join(", "))?;
        }
    }

    Ok(())
}

// =============================================================================
// VISIT COMMAND
// =============================================================================

/// Print messages in depth-first order, each exactly once.
pub fn cmd_visit(
    path: &Path,
    from: Option<&str>,
    json_mode: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let (chat, _) = load_chat(path)?;

    let roots = match from {
        Some(id) => {
            let root = chat
                .graph
                .match_first_by_id(id)
                .ok_or_else(|| AppError::MessageNotFound(id.to_string()))?;
            vec![root]
        }
        None => chat.roots().as_slice().to_vec(),
    };

    if json_mode {
        let mut visited = Vec::new();
        chatgraph_core::visit(&chat.graph, &roots, |_, m| {
            visited.push(message_json(m));
            Ok::<(), AppError>(())
        })?;
        return write_json(out, &json!(visited));
    }

    let mut count = 0usize;
    chatgraph_core::visit(&chat.graph, &roots, |_, m| {
        count += 1;
        writeln!(out, "[{}] {}", m.id, m)
    })?;
    tracing::info!("Visited {} of {} messages", count, chat.graph.len());

    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Print every message containing `query`, with the span of the first match.
pub fn cmd_search(
    path: &Path,
    query: &str,
    ignore_diacritics: bool,
    json_mode: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let (chat, _) = load_chat(path)?;
    let matcher = Matcher::new().ignore_diacritics(ignore_diacritics);
    let results = chat.search_with(&matcher, query);

    if json_mode {
        let results: Vec<_> = results
            .iter()
            .map(|r| {
                json!({
                    "message_index": r.message_index,
                    "id": r.message.id,
                    "role": r.message.role.as_str(),
                    "start_index": r.start_index,
                    "end_index": r.end_index,
                    "matched": r.matched_text(),
                })
            })
            .collect();
        return write_json(out, &json!(results));
    }

    for result in &results {
        writeln!(
            out,
            "[{}] {} {}..{}: {}",
            result.message_index,
            result.message.id,
            result.start_index,
            result.end_index,
            result.message
        )?;
    }
    writeln!(out, "{} result(s) for \"{}\"", results.len(), query)?;

    Ok(())
}

// =============================================================================
// HYDRATE COMMAND
// =============================================================================

/// Resolve id-only edges and report what is left.
pub fn cmd_hydrate(
    path: &Path,
    strict: bool,
    json_mode: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let (chat, report) = load_chat(path)?;

    if json_mode {
        let unresolved: Vec<_> = report
            .unresolved
            .iter()
            .map(|edge| {
                json!({
                    "message": message_id(&chat, edge.node),
                    "direction": edge.direction,
                    "position": edge.position,
                    "id": edge.id,
                })
            })
            .collect();
        write_json(
            out,
            &json!({
                "resolved": report.resolved,
                "unresolved": unresolved,
                "hydrated": chat.is_hydrated(),
            }),
        )?;
    } else {
        writeln!(out, "Resolved:   {}", report.resolved)?;
        writeln!(out, "Unresolved: {}", report.unresolved.len())?;
        for edge in &report.unresolved {
            writeln!(
                out,
                "  {} {}[{}] -> {}",
                message_id(&chat, edge.node),
                edge.direction,
                edge.position,
                edge.id
            )?;
        }
    }

    if strict {
        report.into_result()?;
    }
    Ok(())
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Rewrite a chat file in another format.
pub fn cmd_convert(
    input: &Path,
    output: &Path,
    format: Format,
    json_mode: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let chat = read_chat(input)?;
    let bytes = save_chat(&chat, output, format)?;

    if json_mode {
        return write_json(
            out,
            &json!({
                "output": output.display().to_string(),
                "format": format!("{format:?}").to_lowercase(),
                "messages": chat.graph.len(),
                "bytes": bytes,
            }),
        );
    }

    writeln!(
        out,
        "Converted {} messages to {} ({} bytes)",
        chat.graph.len(),
        output.display(),
        bytes
    )?;
    Ok(())
}

// =============================================================================
// SUMMARIZE COMMAND
// =============================================================================

/// Resolves when the user presses Ctrl-C. Never resolves if the signal
/// handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Summarize a chat. Ctrl-C drops the pending request.
pub async fn cmd_summarize<C: Completer>(
    path: &Path,
    completer: &C,
    config: &Config,
    json_mode: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let (chat, _) = load_chat(path)?;

    tracing::info!(
        "Summarizing {} messages of chat '{}'",
        chat.graph.len(),
        chat.id
    );

    let summary = tokio::select! {
        result = chat.summarize_with_prompt(completer, &config.model, &config.summary_prompt) => result?,
        () = interrupted() => {
            tracing::warn!("Interrupted, dropping pending summary request");
            return Err(AppError::Cancelled);
        }
    };

    if json_mode {
        return write_json(
            out,
            &json!({
                "chat": chat.id,
                "model": config.model,
                "messages": chat.graph.len(),
                "summary": summary,
            }),
        );
    }

    writeln!(out, "{summary}")?;
    Ok(())
}

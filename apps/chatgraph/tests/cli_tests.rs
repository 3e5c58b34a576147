//! CLI command tests over chat files in a temporary directory.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chatgraph::AppError;
use chatgraph::cli::{
    Format, cmd_convert, cmd_hydrate, cmd_search, cmd_show, cmd_summarize, cmd_visit, load_chat,
    read_chat,
};
use chatgraph::config::Config;
use chatgraph_core::{
    ChatGraphError, Completer, CompletionRequest, CompletionResponse, PersistenceHeader,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WESTEROS: &str = r#"{
  "id": "chat-1",
  "name": "Westeros",
  "messages": [
    {"id": "1", "role": "user", "content": "Who is Jon Snow's father?", "out": ["2"]},
    {"id": "2", "role": "assistant", "content": "Jon Snow's father is Rhaegar Targaryen.", "in": ["1"], "out": ["3"]},
    {"id": "3", "role": "user", "content": "And who is Jon Snow's mother?", "in": ["2"], "out": ["4"]},
    {"id": "4", "role": "assistant", "content": "Lyanna Stark; Ned Stark raised him as if he were his father.", "in": ["3"]}
  ]
}"#;

fn write_chat(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<(), AppError>) -> String {
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn run_json(f: impl FnOnce(&mut Vec<u8>) -> Result<(), AppError>) -> serde_json::Value {
    serde_json::from_str(&run(f)).unwrap()
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_hydrates() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    assert!(!read_chat(&path).unwrap().is_hydrated());

    let (chat, report) = load_chat(&path).unwrap();
    assert!(chat.is_hydrated());
    assert_eq!(report.resolved, 6);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = read_chat(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, AppError::File { .. }));
}

#[test]
fn test_directory_rejected() {
    let dir = TempDir::new().unwrap();
    let err = read_chat(dir.path()).unwrap_err();
    assert!(matches!(err, AppError::File { .. }));
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "bad.json", "{\"messages\": [");

    let err = read_chat(&path).unwrap_err();
    assert!(matches!(
        err,
        AppError::Core(ChatGraphError::DeserializationError(_))
    ));
}

// =============================================================================
// SHOW / VISIT / SEARCH
// =============================================================================

#[test]
fn test_show_text() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let text = run(|out| cmd_show(&path, false, out));
    assert!(text.starts_with("Chat: Westeros (chat-1)\n"));
    assert!(text.contains("Messages:   4\n"));
    assert!(text.contains("Edges:      3\n"));
    assert!(text.contains("[1] user: Who is Jon Snow's father? -> 2\n"));
}

#[test]
fn test_show_json() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let value = run_json(|out| cmd_show(&path, true, out));
    assert_eq!(value["message_count"], 4);
    assert_eq!(value["unresolved"], 0);
    assert_eq!(value["messages"][1]["in"], serde_json::json!(["1"]));
}

#[test]
fn test_visit_order() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let value = run_json(|out| cmd_visit(&path, None, true, out));
    let ids: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
}

#[test]
fn test_visit_from_message() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let text = run(|out| cmd_visit(&path, Some("3"), false, out));
    assert_eq!(
        text,
        "[3] user: And who is Jon Snow's mother?\n\
         [4] assistant: Lyanna Stark; Ned Stark raised him as if he were his father.\n"
    );

    let mut out = Vec::new();
    let err = cmd_visit(&path, Some("99"), false, &mut out).unwrap_err();
    assert!(matches!(err, AppError::MessageNotFound(id) if id == "99"));
}

#[test]
fn test_search_father() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let value = run_json(|out| cmd_search(&path, "father", false, true, out));
    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["message_index"], 0);
    assert_eq!(results[2]["id"], "4");
    assert_eq!(results[0]["matched"], "father");

    let text = run(|out| cmd_search(&path, "MOTHER", false, false, out));
    assert!(text.contains("[2] 3 "));
    assert!(text.ends_with("1 result(s) for \"MOTHER\"\n"));
}

// =============================================================================
// HYDRATE / CONVERT
// =============================================================================

#[test]
fn test_hydrate_reports_unknown_ids() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(
        &dir,
        "broken.json",
        r#"{"id":"c","name":"n","messages":[{"id":"1","role":"user","content":"hi","out":["ghost"]}]}"#,
    );

    let value = run_json(|out| cmd_hydrate(&path, false, true, out));
    assert_eq!(value["resolved"], 0);
    assert_eq!(value["hydrated"], false);
    assert_eq!(value["unresolved"][0]["id"], "ghost");
    assert_eq!(value["unresolved"][0]["direction"], "out");

    let mut out = Vec::new();
    let err = cmd_hydrate(&path, true, false, &mut out).unwrap_err();
    assert!(matches!(
        err,
        AppError::Core(ChatGraphError::UnresolvedEdges { count: 1, .. })
    ));
    assert!(String::from_utf8(out).unwrap().contains("Unresolved: 1"));
}

#[test]
fn test_convert_roundtrip() {
    let dir = TempDir::new().unwrap();
    let json_path = write_chat(&dir, "chat.json", WESTEROS);
    let bin_path = dir.path().join("chat.cgrf");
    let back_path = dir.path().join("back.json");

    run(|out| cmd_convert(&json_path, &bin_path, Format::Binary, false, out));
    let bytes = std::fs::read(&bin_path).unwrap();
    assert!(PersistenceHeader::is_binary(&bytes));

    run(|out| cmd_convert(&bin_path, &back_path, Format::Json, false, out));

    let (original, _) = load_chat(&json_path).unwrap();
    let (from_binary, _) = load_chat(&bin_path).unwrap();
    let (from_json, _) = load_chat(&back_path).unwrap();
    assert_eq!(from_binary, original);
    assert_eq!(from_json, original);
}

// =============================================================================
// SUMMARIZE
// =============================================================================

struct Canned;

impl Completer for Canned {
    type Error = std::convert::Infallible;

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, Self::Error> {
        Ok(CompletionResponse::single(format!(
            "{} entries for {}",
            request.entries.len(),
            request.model
        )))
    }
}

async fn summarize(path: &Path, json_mode: bool) -> String {
    let config = Config::default().with_overrides(Some("local".to_string()), None);
    let mut out = Vec::new();
    cmd_summarize(path, &Canned, &config, json_mode, &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_summarize_text() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    assert_eq!(summarize(&path, false).await, "2 entries for local\n");
}

#[tokio::test]
async fn test_summarize_json() {
    let dir = TempDir::new().unwrap();
    let path = write_chat(&dir, "chat.json", WESTEROS);

    let value: serde_json::Value = serde_json::from_str(&summarize(&path, true).await).unwrap();
    assert_eq!(value["model"], "local");
    assert_eq!(value["messages"], 4);
    assert_eq!(value["summary"], "2 entries for local");
}

//! Input adapter tests: retries, typed fallback and end of input

use std::cell::RefCell;
use std::rc::Rc;

use elsa::Error;
use elsa::input::{InputAdapter, SERVICE_UNAVAILABLE_REPLY, UNINTELLIGIBLE_REPLY};

mod common;

use common::{RecordingSpeaker, ScriptedListener, ScriptedText};

type Prompts = Rc<RefCell<Vec<String>>>;

fn adapter(results: Vec<elsa::Result<String>>, lines: &[&str]) -> (InputAdapter, Prompts) {
    let text = ScriptedText::new(lines);
    let prompts = Rc::clone(&text.prompts);
    let adapter = InputAdapter::new(
        Some(Box::new(ScriptedListener::new(results))),
        Box::new(text),
        "elsa",
        3,
    );
    (adapter, prompts)
}

#[tokio::test]
async fn test_transcript_is_normalized() {
    let (mut input, _) = adapter(vec![Ok("Elsa, Open YouTube".to_string())], &[]);
    let mut speaker = RecordingSpeaker::default();

    assert_eq!(input.capture(&mut speaker).await, "open youtube");
    assert!(speaker.spoken.borrow().is_empty());
}

#[tokio::test]
async fn test_retry_after_unintelligible() {
    let (mut input, _) = adapter(
        vec![Err(Error::Unintelligible), Ok("what time is it".to_string())],
        &[],
    );
    let mut speaker = RecordingSpeaker::default();

    assert_eq!(input.capture(&mut speaker).await, "what time is it");
    assert_eq!(*speaker.spoken.borrow(), [UNINTELLIGIBLE_REPLY]);
}

#[tokio::test]
async fn test_typed_fallback_after_three_failures() {
    let (mut input, prompts) = adapter(
        vec![
            Err(Error::Unintelligible),
            Err(Error::Stt("503 Service Unavailable".to_string())),
            Err(Error::Unintelligible),
        ],
        &["Hello There"],
    );
    let mut speaker = RecordingSpeaker::default();

    assert_eq!(input.capture(&mut speaker).await, "hello there");
    assert_eq!(
        *speaker.spoken.borrow(),
        [
            UNINTELLIGIBLE_REPLY,
            SERVICE_UNAVAILABLE_REPLY,
            UNINTELLIGIBLE_REPLY
        ]
    );
    assert_eq!(*prompts.borrow(), ["Type your command: "]);
}

#[tokio::test]
async fn test_device_errors_are_silent_retries() {
    let (mut input, _) = adapter(
        vec![
            Err(Error::Audio("device unplugged".to_string())),
            Ok("tell me a joke".to_string()),
        ],
        &[],
    );
    let mut speaker = RecordingSpeaker::default();

    assert_eq!(input.capture(&mut speaker).await, "tell me a joke");
    assert!(speaker.spoken.borrow().is_empty());
}

#[tokio::test]
async fn test_text_mode_reads_typed_commands() {
    let text = ScriptedText::new(&["Elsa open GitHub"]);
    let prompts = Rc::clone(&text.prompts);
    let mut input = InputAdapter::new(None, Box::new(text), "elsa", 3);
    let mut speaker = RecordingSpeaker::default();

    assert!(!input.has_voice());
    assert_eq!(input.capture(&mut speaker).await, "open github");
    assert_eq!(*prompts.borrow(), ["You: "]);
}

#[tokio::test]
async fn test_end_of_input_closes() {
    let mut input = InputAdapter::new(None, Box::new(ScriptedText::new(&[])), "elsa", 3);
    let mut speaker = RecordingSpeaker::default();

    assert_eq!(input.capture(&mut speaker).await, "");
    assert!(input.is_closed());
    assert_eq!(input.read_typed("Enter alarm time (HH:MM): "), "");
}

#[tokio::test]
async fn test_read_typed_keeps_case() {
    let mut input = InputAdapter::new(
        None,
        Box::new(ScriptedText::new(&["  Alice@Example.com "])),
        "elsa",
        3,
    );

    assert_eq!(input.read_typed("Recipient: "), "Alice@Example.com");
}

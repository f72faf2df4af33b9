//! Intent routing over the built-in trigger table

use elsa::router::{Intent, Route, Router, TRIGGERS};

mod common;

#[test]
fn test_every_intent_is_reachable() {
    let router = Router::new();
    let cases = [
        ("what time is it", Intent::CurrentTime),
        ("find job listings", Intent::JobSearch),
        ("research black holes", Intent::Research),
        ("search for pasta recipes", Intent::WebSearch),
        ("show my calendar", Intent::Calendar),
        ("find location of paris", Intent::FindLocation),
        ("open youtube", Intent::Open),
        ("weather report", Intent::Weather),
        ("send email", Intent::SendEmail),
        ("system info", Intent::SystemInfo),
        ("create text file", Intent::CreateTextFile),
        ("play music", Intent::PlayMusic),
        ("set alarm", Intent::SetAlarm),
        ("take a screenshot", Intent::Screenshot),
        ("check internet speed", Intent::SpeedTest),
        ("schedule a meeting", Intent::ScheduleMeeting),
        ("start study timer", Intent::StudyTimer),
        ("take a note", Intent::Notes),
        ("current news", Intent::News),
        ("tell me a joke", Intent::Joke),
    ];

    for (command, intent) in cases {
        assert_eq!(router.route(command), Route::Task(intent), "{command}");
    }
}

#[test]
fn test_first_match_wins() {
    let router = Router::new();

    assert_eq!(router.route("weather and search"), Route::Task(Intent::WebSearch));
    assert_eq!(router.route("search job openings"), Route::Task(Intent::JobSearch));
    assert_eq!(router.route("research topic and search"), Route::Task(Intent::Research));
    assert_eq!(router.route("open the news"), Route::Task(Intent::Open));
    assert_eq!(router.route("meeting timer"), Route::Task(Intent::ScheduleMeeting));
}

#[test]
fn test_exit_has_priority() {
    let router = Router::new();

    assert_eq!(router.route("exit"), Route::Exit);
    assert_eq!(router.route("open youtube and quit"), Route::Exit);
}

#[test]
fn test_unmatched_goes_to_chat() {
    let router = Router::new();

    assert_eq!(router.route("hello"), Route::Chat);
    assert_eq!(router.route(""), Route::Chat);
}

#[test]
fn test_table_starts_with_exit() {
    assert_eq!(TRIGGERS.first().map(|t| t.route), Some(Route::Exit));
    assert_eq!(Router::new().triggers().len(), TRIGGERS.len());
}

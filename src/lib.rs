//! ELSA - voice-driven personal assistant
//!
//! This library provides the core functionality for the assistant:
//! - Voice input (utterance detection, STT) with a typed fallback
//! - Keyword intent routing to task handlers
//! - A conversational fallback (generative or static replies)
//! - Spoken output (system voice or cloud TTS)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      Input                          │
//! │   Microphone → STT  │  Typed fallback               │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                     Router                          │
//! │   Exit  │  Task handlers  │  Conversational fallback│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Services                         │
//! │  Weather │ News │ Wikipedia │ SMTP │ Launcher │ ... │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod assistant;
pub mod chat;
pub mod config;
pub mod dates;
pub mod error;
pub mod input;
pub mod router;
pub mod services;
pub mod setup;
pub mod speech;
pub mod tasks;
pub mod voice;

pub use assistant::{Assistant, Context, Flow};
pub use config::Config;
pub use error::{Error, Result};
pub use router::{Intent, Route, Router};

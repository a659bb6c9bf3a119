//! Morse-code text entry with one-shot remote dispatch and spoken replies.
//!
//! Two physical buttons are all the input surface: the control key taps out
//! dots and dashes, the input key decodes them into letters or, held long,
//! runs edit commands (backspace, clear-all, commit). A committed sentence
//! goes over plain TCP to a text-generation endpoint and the reply is spoken
//! aloud.

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod keys;
pub mod logger;
pub mod morse;
pub mod sentence;
pub mod service;
pub mod speech;
pub mod term;

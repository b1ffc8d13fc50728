#![allow(dead_code)]

pub mod config;
#[cfg(unix)]
pub mod fake_whisper;
pub mod mock_ollama;
pub mod server;

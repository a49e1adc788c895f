// Library view of the crate for tests/ and benches/. main.rs declares the
// same modules for the binary; items only the binary touches would otherwise
// warn here.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod store;
pub mod ui;

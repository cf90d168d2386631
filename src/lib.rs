// ABOUTME: Library crate for Market Alerts exposing the notification pipeline for testing and reuse

pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod delivery;
pub mod error;
pub mod models;
pub mod poller;

pub use error::AlertError;

//! # Tempo - Stage Timer Server
//!
//! The service shell around `tempo-core`: HTTP API, CLI and configuration.
//! Integration tests reach the router through `tempo::api`.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;

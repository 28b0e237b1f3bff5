//! HTTP glue for the shell
//!
//! This module contains:
//! - [`transport::Transport`] - Opaque raw-text request capability
//! - [`transport::TcpTransport`] - Minimal HTTP/1.0 host call over TCP
//! - [`response::Response`] - Status / headers / body splitter
//! - [`client::Client`] - Verb dispatch with base-URL resolution

pub mod client;
pub mod error;
pub mod response;
pub mod transport;

pub use client::Client;
pub use error::HttpError;
pub use response::Response;
pub use transport::{Method, TcpTransport, Transport};

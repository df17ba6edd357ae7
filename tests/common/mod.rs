//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient, VALID_TOKEN};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_user_profile() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.user_profile(Some(VALID_TOKEN)).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

#![allow(dead_code)]

mod client;
mod constants;
mod fakes;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use fakes::{FakeMusicApi, FakeTextGenerator};
pub use fixtures::*;
pub use server::{full_oauth, TestServer, TestServerOptions};

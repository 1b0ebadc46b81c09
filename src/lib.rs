//! Library crate for user-directory.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote user service trait and its HTTP/in-memory implementations (`api`)
//! - Application state and update loop (`app`)
//! - Directory state and the operations on it (`controller`)
//! - Error and result types (`error`)
//! - User records and drafts (`model`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//! - Draft validation rules (`validate`)
//!
//! It is used by the `user-directory` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod controller;
pub mod error;
pub mod model;
pub mod search;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
pub use api::{HttpUserApi, InMemoryUserApi, UserApi};
pub use controller::{DirectoryState, UserDirectoryController};
/// Convenient error and result types shared across the crate.
pub use error::{DirectoryError, NetworkError, Result, ValidationError};
pub use model::{Address, UserDraft, UserRecord};

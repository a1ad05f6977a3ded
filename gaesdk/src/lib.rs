//! gaesdk - keeps a Google App Engine Go SDK installation up to date.
//!
//! This library checks the published SDK version, compares it with the
//! version installed locally, and when needed backs up the old installation,
//! downloads the new archive and expands it in place.
//!
//! - [`manager`]: version discovery, download, extraction, backup and the update workflow
//! - [`config`]: INI configuration file
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod logging;
pub mod manager;

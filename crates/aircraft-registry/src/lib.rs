//! `aircraft-registry` - A record manager for an aircraft registry
//!
//! This library provides the aircraft record model, the document store it is
//! kept in, uploaded image storage, and the HTTP API and pages served on top.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod server;
pub mod service;
pub mod storage;
pub mod ui;
pub mod upload;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Aircraft, AircraftFields};
pub use service::{AircraftForm, AircraftService};
pub use storage::{DocumentStore, RecordStoreClient, SqliteDocumentStore, StoreHandle};
pub use upload::{ImageUpload, UploadDir};

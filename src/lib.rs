// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # dossier
//!
//! A personal-information aggregator. Unstructured documents (images, PDFs,
//! DOCX, plain text, remote document links) are run through an external
//! reasoning service to extract labeled facts, which are reconciled into a
//! single persistent aggregate record.
//!
//! ## Architecture
//!
//! - **Record model** (`record`): typed field mapping with an explicit
//!   `Unknown` state instead of a magic `"N/A"` string
//! - **Reconciler** (`reconcile`): deterministic first-observation-wins merge
//! - **Aggregate store** (`store`): single-record repository on redb
//! - **Reasoning boundary** (`reason`): pluggable `TextReasoner` trait with
//!   an Ollama-backed implementation
//! - **Extraction adapters** (`extract`): per-format text extraction
//! - **Batch walker** (`ingest`): sequential directory ingestion with an
//!   injectable inter-document delay
//!
//! ## Library usage
//!
//! ```no_run
//! use dossier::record::FieldMapping;
//! use dossier::store::AggregateStore;
//!
//! let store = AggregateStore::open(std::path::Path::new(".dossier")).unwrap();
//! let incoming: FieldMapping =
//!     serde_json::from_str(r#"{"name": "Jane Doe", "email": "N/A"}"#).unwrap();
//! store.absorb(&incoming).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod labels;
pub mod paths;
pub mod prompts;
pub mod query;
pub mod reason;
pub mod reconcile;
pub mod record;
pub mod store;

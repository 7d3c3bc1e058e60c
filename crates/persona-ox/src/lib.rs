#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::unwrap_used)]

//! Search intent and persona motivation analysis for Rust
//!
//! Given a keyword, this crate asks a chat-completion model to:
//! - infer the most likely search intent
//! - synthesize marketing personas in a fixed JSON schema
//! - answer a fixed battery of ten questions as each persona, concurrently
//!
//! The answers can be grouped per persona or exported as CSV.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use persona_ox::{Analyzer, CompletionClient, PersonaCount};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CompletionClient::new("your-api-key");
//!     let analyzer = Analyzer::new(Arc::new(client));
//!
//!     let report = analyzer.run("running shoes", PersonaCount::new(2)?).await?;
//!     println!("{}", report.intent);
//!     print!("{}", report.to_csv()?);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod batch;
pub mod client;
pub mod error;
pub mod export;
pub mod generator;
pub mod intent;
mod internal;
pub mod message;
pub mod model;
pub mod parser;
pub mod persona;
pub mod questions;

pub use analysis::{AnalysisReport, Analyzer, Readiness, Stage, check_inputs};
pub use batch::{AnswerRecord, BatchRunner};
pub use client::{Completion, CompletionClient};
pub use error::{AnalysisError, CompletionError, ErrorKind, ExportError, ParseError, SchemaError};
pub use export::{DEFAULT_EXPORT_FILE_NAME, group_by_persona, to_csv, write_csv};
pub use generator::{PersonaCount, generate_personas};
pub use intent::infer_intent;
pub use message::{Message, Role};
pub use model::Model;
pub use parser::parse_json_array;
pub use persona::{BehaviorAndDecisionMaking, Demographics, Persona, Psychographics};
pub use questions::questions_for;

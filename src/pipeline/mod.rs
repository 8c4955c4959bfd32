pub mod artifact;
pub mod bpmn;
pub mod normalize;
pub mod openai;
pub mod orchestrator;
pub mod prompt;
pub mod reconcile;
pub mod table;
pub mod types;

pub use artifact::*;
pub use bpmn::*;
pub use normalize::*;
pub use openai::*;
pub use orchestrator::*;
pub use prompt::*;
pub use reconcile::*;
pub use table::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid BPMN XML: {0}")]
    InvalidXml(String),

    #[error("No API credential configured")]
    MissingApiKey,

    #[error("Generation service rejected the credential (status {status}): {body}")]
    AuthRejected { status: u16, body: String },

    #[error("Generation service error (status {status}): {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Generation service returned no text")]
    EmptyResponse,

    #[error("Generated text is not parseable as a table: {0}")]
    TableParse(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

//! Orchestration from raw transaction reports to the written calendar report.

pub mod pipeline;
pub mod validator;

pub use pipeline::{PipelineSummary, ReportPipeline};
pub use validator::{TicketValidator, ValidationResult, ValidationStats};

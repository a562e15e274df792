pub mod engine;
pub mod error;
pub mod transitions;

pub use engine::OrderPipeline;
pub use error::PipelineError;

//! Library side of the `feat-pipeline` binary.

pub mod logging;
pub mod pipeline;
pub mod sample;
pub mod types;

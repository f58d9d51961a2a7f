pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod render;

pub use error::{ErrorKind, ReportError};

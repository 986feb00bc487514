//! # HMI Core Base
//!
//! Building blocks shared by every other subsystem of `hmi-core`.
//!
//! - **[`error_info`]**: [`ErrorInfo`], the immutable structured description of
//!   one failure, its [`ErrorKind`] taxonomy, and the [`ToErrorInfo`] conversion
//!   each error type implements.
//! - **[`exception`]**: [`ErrorException`], the single carrier type that moves an
//!   `ErrorInfo` (and the typed error it came from) up through the layers.
//! - **[`data_block`]**: [`DataBlock`], the shared reference-counted payload
//!   cell used as node body in the plugin graph.
//! - **[`log_sink`]**: the [`LogSink`] logging collaborator.
pub mod data_block;
pub mod error_info;
pub mod exception;
pub mod log_sink;

pub use data_block::DataBlock;
pub use error_info::{ErrorInfo, ErrorKind, ToErrorInfo};
pub use exception::{ErrorException, Result};
pub use log_sink::{LogFacadeSink, LogSink, MemorySink};

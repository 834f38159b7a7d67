// Regline - regulatory difference finder, API core
//
// This crate provides the backend pipeline that locates overlapping or
// contradictory requirements across a corpus of paginated regulatory
// documents. Infrastructure clients live in kernel/, business logic in
// domains/, and the HTTP surface in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;
pub mod server;

pub use config::*;
pub use error::{PipelineError, Result};

//! Subprocess orchestration for the CMS tool

mod args;
mod context;
mod status;

pub use args::ToolArgs;
pub use context::ProcessContext;
pub use status::TerminalStatus;

//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI.

pub mod autoanswer;
pub mod init_session;

// Re-export commonly used entry points
pub use autoanswer::run as autoanswer_run;
pub use init_session::run as init_session_run;

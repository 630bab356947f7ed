//! Stage handlers
//!
//! One module per handler kind with real behavior. Clean, anonymize and
//! merge are no-ops and are handled directly by the runner.

pub mod extract;
pub mod output;
pub mod transform;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Caller owns a Cancellation
//!     → hands CancelToken to OracleClient::with_cancel
//!     → every poll races its requests and delays against the token
//!     → Cancellation::cancel → in-flight polls return OracleError::Cancelled
//! ```

pub mod cancel;

pub use cancel::{CancelToken, Cancellation};

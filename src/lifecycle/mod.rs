//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! startup.rs:
//!     Resolve config → Logging/metrics → Load site snapshot
//!
//! signals.rs:
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! shutdown.rs:
//!     Stop accepting → Drain in-flight requests → main saves the snapshot
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;

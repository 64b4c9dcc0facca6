//! pipeline/mod.rs
//!
//! Composition of the CDF codec with the class/index transform, plus the
//! chunked and streaming drivers.
//!
//! Design notes:
//! - The pipeline owns no state; it borrows the map, dictionary and schema.
//! - Parallel runs split the input into chunks, fan them out over crossbeam
//!   bounded channels to scoped workers, and reassemble by chunk index, so
//!   the output is byte-identical to the sequential transform.
//! - Cancellation is checked between chunks. A cancelled run returns an
//!   error and leaves nothing shared half-written.

pub mod types;
pub mod parallelism;
pub mod chunked;
pub mod io;
pub mod core;

pub use types::*;
pub use parallelism::{CancellationToken, ParallelismProfile};
pub use chunked::{run_forward_parallel, run_inverse_parallel};
pub use io::{read_exact_or_eof, stream_forward, stream_inverse};
pub use self::core::Pipeline;

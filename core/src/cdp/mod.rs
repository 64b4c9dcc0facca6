//! cdp/mod.rs
//!
//! Class/index decomposition of arbitrary byte streams.
//!
//! Design notes:
//! - `forward` is total: every byte has a class and an index once the map
//!   is validated, so it cannot fail.
//! - `inverse` treats any class or index outside the map as corruption and
//!   stops at the first bad position; it never clamps.
//! - Both directions are position-local, which is what lets the pipeline
//!   split them across workers freely.

pub mod types;
pub mod forward;
pub mod inverse;

pub use types::*;
pub use forward::{forward, forward_into};
pub use inverse::{inverse, inverse_into};

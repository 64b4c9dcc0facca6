//! schema/mod.rs
//! Field-label ↔ tag-byte resolution.
//!
//! Notes:
//! - The hash from label to tag is a substitutable capability (`TagHasher`);
//!   the codec never hardwires an algorithm.
//! - Collision detection happens at registration, before anything is encoded.
//! - `Schema` is the stock `TagResolver`; the codec accepts any resolver.

pub mod types;
pub mod hasher;
pub mod registry;
pub mod resolver;
pub mod definition;

pub use types::*;
pub use hasher::*;
pub use registry::*;
pub use resolver::*;
pub use definition::*;

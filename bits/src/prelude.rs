//! The prelude exports the types which are useful in representing
//! fixed-width hardware data.  Providing this prelude is the main
//! purpose of the bits crate.
pub use super::error::WordError;
pub use super::word::{Width, Word};

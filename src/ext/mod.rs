//! Language ergonomics helpers
//!
//! Small traits that read well at call sites: Kotlin-style scope functions,
//! emptiness checks that compose with `Option`, a middle-anchored sub-slice,
//! and a copy-on-write indirect reference for recursive value types.

mod empty;
mod indirect;
mod scope;
mod slice;

pub use empty::{Emptyable, OptionEmptyExt};
pub use indirect::Indirect;
pub use scope::{run, ScopeFunctions};
pub use slice::SliceExt;

#[cfg(test)]
mod tests;

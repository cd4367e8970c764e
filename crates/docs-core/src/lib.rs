mod blocks;
mod chain;
mod core;
mod error;
mod handle;
mod inspect;
mod marks;
mod ops;
mod plugin;
mod tree;

pub use crate::chain::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::handle::*;
pub use crate::ops::*;
pub use crate::plugin::*;

pub use crate::blocks::{ALIGNMENTS, HEADING_LEVELS};

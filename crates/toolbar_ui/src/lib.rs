pub mod button;
mod picker;
mod toolbar;

pub use crate::picker::*;
pub use crate::toolbar::*;

mod command;
mod composer;
mod config;
mod controls;
mod dimension;
mod dispatcher;
mod error;
mod external;
mod reader;
mod registry;

pub use crate::command::*;
pub use crate::composer::*;
pub use crate::config::*;
pub use crate::controls::*;
pub use crate::dimension::*;
pub use crate::dispatcher::*;
pub use crate::error::*;
pub use crate::external::*;
pub use crate::reader::*;
pub use crate::registry::*;

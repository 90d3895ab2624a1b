pub mod board;
pub mod collection;
pub mod command_log;
pub mod config;
pub mod desk;
pub mod error;
pub mod group;
pub mod item;
pub mod nav;
pub mod status;
pub mod transition;
pub mod workspace;

pub use board::*;
pub use collection::*;
pub use command_log::*;
pub use config::*;
pub use desk::*;
pub use error::*;
pub use group::*;
pub use item::*;
pub use nav::*;
pub use status::*;
pub use transition::{Transition, TransitionMeta};
pub use workspace::*;

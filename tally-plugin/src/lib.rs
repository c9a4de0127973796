//! Tally Plugin System
//!
//! Provides:
//! - `Command`: the single-method contract every command implements
//! - `CommandRegistry`: name -> command table and line dispatcher
//! - `CommandContext`: session state handed to commands
//! - `PluginCatalog` / `PluginLoader`: how commands get registered

mod traits;
mod registry;
mod context;
mod loader;

pub use traits::{Command, CommandMeta};
pub use registry::{CommandRegistry, WeakRegistry};
pub use context::CommandContext;
pub use loader::{
    PluginCatalog, PluginDescriptor, PluginFactory, PluginLoader,
    derive_command_name, register_all, COMMAND_SUFFIX, ENTRY_POINT,
};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        Command, CommandMeta, CommandRegistry, WeakRegistry, CommandContext,
        PluginCatalog, PluginDescriptor,
    };
    pub use tally_core::prelude::*;
}

//! Plugin discovery
//!
//! Commands are compiled in and described by a `PluginCatalog`. Which of
//! them a session gets is decided either by registering the whole catalog,
//! or by scanning a plugin root directory: every immediate subdirectory with
//! a `plugin.json` entry point names a catalog module and lists the command
//! types it exports.
//!
//! ```text
//! plugins/
//!   add/plugin.json      {"exports": ["AddCommand"]}
//!   menu/plugin.json     {"exports": ["MenuCommand"]}
//! ```

use crate::{Command, CommandRegistry};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tally_core::CalcError;
use tracing::{debug, info, warn};

/// Type-name suffix that marks an export as a command
pub const COMMAND_SUFFIX: &str = "Command";

/// Entry-point file expected in each plugin directory
pub const ENTRY_POINT: &str = "plugin.json";

/// How to build a command instance
#[derive(Clone, Copy)]
pub enum PluginFactory {
    Standalone(fn() -> Box<dyn Command>),
    /// The command needs a handle to the registry it is registered in
    WithRegistry(fn(&CommandRegistry) -> Box<dyn Command>),
}

impl PluginFactory {
    pub fn needs_registry(&self) -> bool {
        matches!(self, PluginFactory::WithRegistry(_))
    }
}

/// A command type a plugin module makes available
#[derive(Clone, Copy)]
pub struct PluginDescriptor {
    /// Module (plugin directory name) that defines the type
    pub module: &'static str,
    pub type_name: &'static str,
    pub factory: PluginFactory,
}

impl PluginDescriptor {
    pub const fn standalone(module: &'static str, type_name: &'static str, factory: fn() -> Box<dyn Command>) -> Self {
        Self { module, type_name, factory: PluginFactory::Standalone(factory) }
    }

    pub const fn with_registry(
        module: &'static str,
        type_name: &'static str,
        factory: fn(&CommandRegistry) -> Box<dyn Command>,
    ) -> Self {
        Self { module, type_name, factory: PluginFactory::WithRegistry(factory) }
    }

    /// Name the command is registered and dispatched under
    pub fn command_name(&self) -> String {
        derive_command_name(self.type_name)
    }

    pub fn instantiate(&self, registry: &CommandRegistry) -> Box<dyn Command> {
        match self.factory {
            PluginFactory::Standalone(build) => build(),
            PluginFactory::WithRegistry(build) => build(registry),
        }
    }

    fn is_command(&self) -> bool {
        is_command_type(self.type_name)
    }
}

fn is_command_type(type_name: &str) -> bool {
    type_name.len() > COMMAND_SUFFIX.len() && type_name.ends_with(COMMAND_SUFFIX)
}

/// Derive a command name from a type name.
///
/// Strips the `Command` suffix, turns underscores into spaces and
/// title-cases: a letter is upper-cased when the character before it is not
/// a letter, lower-cased otherwise.
///
/// `AddCommand` -> `Add`, `ClearHistoryCommand` -> `Clearhistory`,
/// `Clear_HistoryCommand` -> `Clear History`.
pub fn derive_command_name(type_name: &str) -> String {
    let stem = type_name.strip_suffix(COMMAND_SUFFIX).unwrap_or(type_name).replace('_', " ");

    let mut name = String::with_capacity(stem.len());
    let mut after_letter = false;
    for c in stem.chars() {
        if c.is_alphabetic() {
            if after_letter {
                name.extend(c.to_lowercase());
            } else {
                name.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            name.push(c);
            after_letter = false;
        }
    }
    name
}

/// Compile-time table of available plugin commands
#[derive(Clone, Default)]
pub struct PluginCatalog {
    descriptors: Vec<PluginDescriptor>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, descriptor: PluginDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.descriptors.iter()
    }

    pub fn modules(&self) -> BTreeSet<&'static str> {
        self.descriptors.iter().map(|d| d.module).collect()
    }

    pub fn has_module(&self, module: &str) -> bool {
        self.descriptors.iter().any(|d| d.module == module)
    }

    /// Descriptor for `type_name` as defined by `module` itself
    pub fn defined_in(&self, module: &str, type_name: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.module == module && d.type_name == type_name)
    }

    /// Descriptor for `type_name` in any module
    pub fn find(&self, type_name: &str) -> Option<&PluginDescriptor> {
        self.descriptors.iter().find(|d| d.type_name == type_name)
    }
}

/// Register every command in the catalog, no directory scan involved
pub fn register_all(catalog: &PluginCatalog, registry: &CommandRegistry) -> usize {
    let mut count = 0;
    for descriptor in catalog.iter().filter(|d| d.is_command()) {
        let name = descriptor.command_name();
        registry.register(&name, descriptor.instantiate(registry));
        debug!(command = %name, module = descriptor.module, "registered command");
        count += 1;
    }
    info!(count, "Registered built-in commands");
    count
}

#[derive(Debug, Deserialize)]
struct PluginManifest {
    #[serde(default)]
    exports: Vec<String>,
}

/// Directory-convention plugin loader
#[derive(Debug, Clone)]
pub struct PluginLoader {
    root: PathBuf,
}

impl PluginLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the plugin root and register what it exports.
    ///
    /// A missing root loads nothing. A broken plugin (unreadable or
    /// malformed entry point, unknown module, export that nothing defines)
    /// is an error: it means the installation is inconsistent.
    pub fn load(&self, catalog: &PluginCatalog, registry: &CommandRegistry) -> Result<usize, CalcError> {
        if !self.root.is_dir() {
            warn!(path = %self.root.display(), "Plugin directory does not exist");
            return Ok(0);
        }

        let entries = fs::read_dir(&self.root).map_err(|e| {
            CalcError::Plugin(format!("cannot read plugin directory {}: {}", self.root.display(), e))
        })?;

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();

        let mut loaded = 0;
        for dir in dirs {
            let entry_point = dir.join(ENTRY_POINT);
            if !entry_point.is_file() {
                debug!(path = %dir.display(), "no entry point, skipping");
                continue;
            }
            let module = dir.file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| CalcError::Plugin(format!("invalid plugin directory name: {}", dir.display())))?;
            loaded += self.load_module(module, &entry_point, catalog, registry)?;
        }

        info!(path = %self.root.display(), loaded, "Loaded plugins");
        Ok(loaded)
    }

    fn load_module(
        &self,
        module: &str,
        entry_point: &Path,
        catalog: &PluginCatalog,
        registry: &CommandRegistry,
    ) -> Result<usize, CalcError> {
        let text = fs::read_to_string(entry_point)
            .map_err(|e| CalcError::Plugin(format!("cannot read {}: {}", entry_point.display(), e)))?;
        let manifest: PluginManifest = serde_json::from_str(&text)
            .map_err(|e| CalcError::Plugin(format!("malformed {}: {}", entry_point.display(), e)))?;

        if !catalog.has_module(module) {
            return Err(CalcError::Plugin(format!("plugin module '{}' is not built in", module)));
        }

        let mut loaded = 0;
        for export in &manifest.exports {
            if !is_command_type(export) {
                debug!(module, export = %export, "not a command type, skipping");
                continue;
            }

            match catalog.defined_in(module, export) {
                Some(descriptor) => {
                    let name = descriptor.command_name();
                    registry.register(&name, descriptor.instantiate(registry));
                    debug!(command = %name, module, "registered plugin command");
                    loaded += 1;
                }
                None if catalog.find(export).is_some() => {
                    debug!(module, export = %export, "re-exported from another module, skipping");
                }
                None => {
                    return Err(CalcError::Plugin(format!(
                        "plugin module '{}' exports '{}' but does not define it",
                        module, export
                    )));
                }
            }
        }
        Ok(loaded)
    }
}

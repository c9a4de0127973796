//! MENU command - list the other registered commands

use tally_plugin::prelude::*;

/// Name the menu itself is registered under; it does not list itself
pub const MENU_NAME: &str = "Menu";

pub struct Menu {
    registry: WeakRegistry,
}

impl Menu {
    pub fn new(registry: &CommandRegistry) -> Self {
        Self { registry: registry.downgrade() }
    }
}

impl Command for Menu {
    fn meta(&self) -> CommandMeta {
        CommandMeta {
            description: "List available commands",
            usage: "menu",
        }
    }

    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        let registry = self.registry.upgrade()
            .ok_or_else(|| CalcError::Internal("command registry was dropped".to_string()))?;

        let mut names: Vec<String> = registry.names()
            .into_iter()
            .filter(|name| !name.eq_ignore_ascii_case(MENU_NAME))
            .collect();
        // Shortest first, then alphabetical
        names.sort_by(|a, b| a.chars().count().cmp(&b.chars().count()).then_with(|| a.cmp(b)));

        ctx.emit("Available commands:");
        for name in names {
            ctx.emit(format!("- {}", capitalize(&name)));
        }
        Ok(None)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn menu(registry: &CommandRegistry) -> Box<dyn Command> {
    Box::new(Menu::new(registry))
}

//! Tally Standard Library

pub mod commands;

use tally_plugin::{register_all, CommandRegistry, PluginCatalog, PluginDescriptor};

/// Every built-in plugin, keyed by the module (plugin directory) defining it
pub fn catalog() -> PluginCatalog {
    PluginCatalog::new()
        // Arithmetic
        .with(PluginDescriptor::standalone("add", "AddCommand", commands::add))
        .with(PluginDescriptor::standalone("subtract", "SubtractCommand", commands::subtract))
        .with(PluginDescriptor::standalone("multiply", "MultiplyCommand", commands::multiply))
        .with(PluginDescriptor::standalone("divide", "DivideCommand", commands::divide))
        // History management
        .with(PluginDescriptor::standalone("save", "SaveHistoryCommand", commands::save))
        .with(PluginDescriptor::standalone("load", "LoadHistoryCommand", commands::load))
        .with(PluginDescriptor::standalone("clear", "ClearHistoryCommand", commands::clear))
        .with(PluginDescriptor::standalone("delete", "DeleteHistoryCommand", commands::delete))
        .with(PluginDescriptor::standalone("print", "PrintHistoryCommand", commands::print))
        // Menu needs to see the registry it lives in
        .with(PluginDescriptor::with_registry("menu", "MenuCommand", commands::menu))
}

/// Load standard library into registry
pub fn load_standard_library(registry: CommandRegistry) -> CommandRegistry {
    register_all(&catalog(), &registry);
    registry
}

/// Create registry with standard library
pub fn standard_registry() -> CommandRegistry {
    load_standard_library(CommandRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tally_core::{CalcError, Number};
    use tally_history::HistoryStore;
    use tally_plugin::{CommandContext, PluginLoader};
    use tempfile::TempDir;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn setup() -> (TempDir, CommandRegistry, CommandContext) {
        let dir = TempDir::new().unwrap();
        let ctx = CommandContext::new(HistoryStore::new(dir.path().join("history.csv")));
        (dir, standard_registry(), ctx)
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_standard_names() {
            let registry = standard_registry();
            let mut names = registry.names();
            names.sort();
            assert_eq!(
                names,
                vec![
                    "Add", "Clearhistory", "Deletehistory", "Divide", "Loadhistory",
                    "Menu", "Multiply", "Printhistory", "Savehistory", "Subtract",
                ]
            );
        }

        #[test]
        fn test_plugin_directory_matches_catalog() {
            let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../plugins");
            let registry = CommandRegistry::new();
            let loaded = PluginLoader::new(root).load(&catalog(), &registry).unwrap();
            assert_eq!(loaded, catalog().len());
            assert_eq!(registry.len(), standard_registry().len());
        }

        #[test]
        fn test_catalog_modules() {
            let modules = catalog().modules();
            assert_eq!(modules.len(), 10);
            assert!(modules.contains("menu"));
        }
    }

    mod arithmetic_tests {
        use super::*;

        #[test]
        fn test_scenario() {
            let (_dir, registry, mut ctx) = setup();
            assert_eq!(registry.dispatch("add 2 3", &mut ctx).unwrap(), Some(num("5")));
            assert_eq!(registry.dispatch("multiply 3 4", &mut ctx).unwrap(), Some(num("12")));
            assert_eq!(registry.dispatch("divide 8 0", &mut ctx), Err(CalcError::DivisionByZero));
            assert_eq!(ctx.history().len(), 2);
        }

        #[test]
        fn test_subtract_and_divide() {
            let (_dir, registry, mut ctx) = setup();
            assert_eq!(registry.dispatch("Subtract 5 2", &mut ctx).unwrap(), Some(num("3")));
            assert_eq!(registry.dispatch("DIVIDE 8 2", &mut ctx).unwrap(), Some(num("4")));
            assert_eq!(registry.dispatch("divide 1 3", &mut ctx).unwrap().map(|n| n.is_integer()), Some(false));
        }

        #[test]
        fn test_result_is_emitted() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("add 0.1 0.2", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["Result: 0.3"]);
        }

        #[test]
        fn test_argument_count() {
            let (_dir, registry, mut ctx) = setup();
            assert_eq!(
                registry.dispatch("subtract 5", &mut ctx),
                Err(CalcError::arg_count("Subtract", 2, 1))
            );
            assert_eq!(
                registry.dispatch("multiply 1 2 3", &mut ctx),
                Err(CalcError::arg_count("Multiply", 2, 3))
            );
        }

        #[test]
        fn test_invalid_operand() {
            let (_dir, registry, mut ctx) = setup();
            assert_eq!(
                registry.dispatch("subtract 5 invalid", &mut ctx),
                Err(CalcError::InvalidOperand("invalid".to_string()))
            );
            assert!(ctx.history().is_empty());
        }

        #[test]
        fn test_huge_exponent_is_an_invalid_operand() {
            let (_dir, registry, mut ctx) = setup();
            assert_eq!(
                registry.dispatch("add 1e20000000000 0", &mut ctx),
                Err(CalcError::InvalidOperand("1e20000000000".to_string()))
            );
            assert_eq!(
                registry.dispatch("multiply 2.5e-30000000000 1", &mut ctx),
                Err(CalcError::InvalidOperand("2.5e-30000000000".to_string()))
            );
            assert!(ctx.history().is_empty());
            assert!(ctx.take_output().is_empty());
        }

        #[test]
        fn test_zero_divisor_in_any_spelling() {
            let (_dir, registry, mut ctx) = setup();
            for zero in ["0", "0.0", "-0", "0e5"] {
                let line = format!("divide 1 {}", zero);
                assert_eq!(registry.dispatch(&line, &mut ctx), Err(CalcError::DivisionByZero), "{}", line);
            }
        }
    }

    mod history_command_tests {
        use super::*;

        #[test]
        fn test_print_history() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("printhistory", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["No history available."]);

            registry.dispatch("add 1 2", &mut ctx).unwrap();
            ctx.take_output();
            registry.dispatch("printhistory", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["1. 1 + 2 = 3"]);
        }

        #[test]
        fn test_clear_history() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("add 1 2", &mut ctx).unwrap();
            assert_eq!(registry.dispatch("clearhistory", &mut ctx).unwrap(), None);
            assert!(ctx.history().is_empty());
            assert!(ctx.history().is_cleared());
        }

        #[test]
        fn test_save_load_delete_cycle() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("add 1 2", &mut ctx).unwrap();
            registry.dispatch("multiply 2 5", &mut ctx).unwrap();
            ctx.take_output();

            assert_eq!(registry.dispatch("savehistory", &mut ctx).unwrap(), None);
            assert_eq!(ctx.take_output(), vec!["History saved successfully."]);
            assert!(ctx.history().path().exists());

            registry.dispatch("clearhistory", &mut ctx).unwrap();
            registry.dispatch("loadhistory", &mut ctx).unwrap();
            assert_eq!(ctx.history().len(), 2);

            ctx.take_output();
            registry.dispatch("deletehistory", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["History deleted successfully."]);
            assert!(!ctx.history().path().exists());
            assert!(ctx.history().is_empty());

            registry.dispatch("deletehistory", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["No history file found to delete."]);
        }

        #[test]
        fn test_save_after_clear_reports_skip() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("clearhistory", &mut ctx).unwrap();
            ctx.take_output();
            registry.dispatch("savehistory", &mut ctx).unwrap();
            assert_eq!(ctx.take_output(), vec!["History was cleared; nothing saved."]);
            assert!(!ctx.history().path().exists());
        }

        #[test]
        fn test_load_failure_is_reported_not_raised() {
            let (_dir, registry, mut ctx) = setup();
            fs::write(ctx.history().path(), "a,b,operation,result\nx,1,add,1\n").unwrap();

            assert_eq!(registry.dispatch("loadhistory", &mut ctx).unwrap(), None);
            let output = ctx.take_output();
            assert!(output[0].starts_with("Failed to load history"), "{:?}", output);
            assert!(ctx.history().is_empty());
        }

        #[test]
        fn test_save_failure_is_reported_not_raised() {
            let dir = TempDir::new().unwrap();
            // The history path is an existing directory, so it cannot be written
            let mut ctx = CommandContext::new(HistoryStore::new(dir.path()));
            let registry = standard_registry();
            registry.dispatch("add 1 1", &mut ctx).unwrap();
            ctx.take_output();

            assert_eq!(registry.dispatch("savehistory", &mut ctx).unwrap(), None);
            assert!(ctx.take_output()[0].starts_with("Failed to save history"));
            assert_eq!(ctx.history().len(), 1);
        }
    }

    mod menu_tests {
        use super::*;

        #[test]
        fn test_menu_lists_others_by_length_then_name() {
            let dir = TempDir::new().unwrap();
            let mut ctx = CommandContext::new(HistoryStore::new(dir.path().join("history.csv")));
            let catalog = PluginCatalog::new()
                .with(PluginDescriptor::standalone("add", "AddCommand", commands::add))
                .with(PluginDescriptor::standalone("subtract", "SubtractCommand", commands::subtract))
                .with(PluginDescriptor::standalone("multiply", "MultiplyCommand", commands::multiply))
                .with(PluginDescriptor::standalone("divide", "DivideCommand", commands::divide))
                .with(PluginDescriptor::with_registry("menu", "MenuCommand", commands::menu));
            let registry = CommandRegistry::new();
            register_all(&catalog, &registry);

            assert_eq!(registry.dispatch("menu", &mut ctx).unwrap(), None);
            assert_eq!(
                ctx.take_output(),
                vec!["Available commands:", "- Add", "- Divide", "- Multiply", "- Subtract"]
            );
        }

        #[test]
        fn test_menu_sees_later_registrations() {
            let (_dir, registry, mut ctx) = setup();
            registry.register("Zz", commands::add());
            registry.dispatch("menu", &mut ctx).unwrap();
            assert_eq!(ctx.take_output()[1], "- Zz");
        }

        #[test]
        fn test_full_menu_order() {
            let (_dir, registry, mut ctx) = setup();
            registry.dispatch("Menu", &mut ctx).unwrap();
            assert_eq!(
                ctx.take_output(),
                vec![
                    "Available commands:",
                    "- Add",
                    "- Divide",
                    "- Multiply",
                    "- Subtract",
                    "- Loadhistory",
                    "- Savehistory",
                    "- Clearhistory",
                    "- Printhistory",
                    "- Deletehistory",
                ]
            );
        }
    }
}

//! Command Registry and dispatcher

use crate::{Command, CommandContext, CommandMeta};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, Weak};
use tally_core::{CalcError, Number};
use tracing::debug;

/// Maximum number of "did you mean" names attached to an unknown command
const MAX_SUGGESTIONS: usize = 5;

struct Entry {
    /// Name as registered, used for display
    name: String,
    command: Arc<dyn Command>,
}

type CommandMap = HashMap<String, Entry>;

/// Central command registry
///
/// A cheap, clonable handle: clones share the same table. Keys are
/// case-insensitive; registering an existing name replaces the binding.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: Arc<RwLock<CommandMap>>,
}

/// Non-owning handle for commands that need to look back at their registry
#[derive(Clone, Default)]
pub struct WeakRegistry {
    commands: Weak<RwLock<CommandMap>>,
}

impl WeakRegistry {
    pub fn upgrade(&self) -> Option<CommandRegistry> {
        self.commands.upgrade().map(|commands| CommandRegistry { commands })
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command<C: Command + 'static>(self, name: &str, command: C) -> Self {
        self.register(name, Box::new(command));
        self
    }

    pub fn register(&self, name: &str, command: Box<dyn Command>) {
        let key = name.trim().to_lowercase();
        let entry = Entry { name: name.trim().to_string(), command: Arc::from(command) };
        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        if commands.insert(key, entry).is_some() {
            debug!(command = name, "replaced existing command binding");
        }
    }

    pub fn downgrade(&self) -> WeakRegistry {
        WeakRegistry { commands: Arc::downgrade(&self.commands) }
    }

    fn read(&self) -> RwLockReadGuard<'_, CommandMap> {
        // Writers only ever insert, so a poisoned table is still consistent
        self.commands.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Display names of every registered command, in no particular order
    pub fn names(&self) -> Vec<String> {
        self.read().values().map(|e| e.name.clone()).collect()
    }

    pub fn describe(&self, name: &str) -> Option<CommandMeta> {
        self.read().get(&name.trim().to_lowercase()).map(|e| e.command.meta())
    }

    /// Parse `line` as `<name> [args...]` and run the bound command.
    ///
    /// Names may span several words; the longest registered prefix wins.
    pub fn dispatch(&self, line: &str, ctx: &mut CommandContext) -> Result<Option<Number>, CalcError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(CalcError::EmptyInput);
        }

        let Some((name, command, consumed)) = self.resolve(&tokens) else {
            let err = CalcError::unknown_command(tokens[0]);
            return Err(err.with_suggestions(self.find_similar(tokens[0])));
        };

        let args = &tokens[consumed..];
        debug!(command = %name, ?args, "dispatching");
        command.execute(args, ctx)
    }

    /// Longest token prefix naming a registered command. The lock is
    /// released before returning so commands may read the registry again.
    fn resolve(&self, tokens: &[&str]) -> Option<(String, Arc<dyn Command>, usize)> {
        let commands = self.read();
        (1..=tokens.len()).rev().find_map(|n| {
            let key = tokens[..n].join(" ").to_lowercase();
            commands.get(&key).map(|e| (e.name.clone(), Arc::clone(&e.command), n))
        })
    }

    /// Find command names similar to the given name (for error suggestions)
    fn find_similar(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.read()
            .iter()
            .filter_map(|(key, entry)| {
                let score = Self::similarity_score(&name_lower, key);
                if score > 0 {
                    Some((entry.name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().take(MAX_SUGGESTIONS).map(|(name, _)| name).collect()
    }

    /// Calculate similarity score between two strings
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        // Exact prefix match is best
        if candidate.starts_with(query) {
            score += 100;
        }
        // Contains the query
        else if candidate.contains(query) {
            score += 50;
        }
        // Query contains the candidate
        else if query.contains(candidate) {
            score += 30;
        }

        // Shared characters only count when they cover half the query
        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        if common * 2 >= query_chars.len().max(1) {
            score += common * 2;
        }

        // Penalize length difference
        let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }
}

use tracing::debug;

use crate::analysis::analyser::Analyser;
use crate::analysis::error::ErrorKind;
use crate::analysis::input::Input;
use crate::analysis::result::ParseResult;
use crate::grammar::command::Command;

#[derive(Debug, Clone)]
struct Entry {
    command: Command,
    enabled: bool,
}

/// A caller-owned set of commands tried in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `command`, enabled. A command with the same name is replaced in
    /// place and returned.
    pub fn insert(&mut self, command: Command) -> Option<Command> {
        match self.position(command.name()) {
            Some(index) => {
                let old = std::mem::replace(&mut self.entries[index].command, command);
                Some(old)
            }
            None => {
                self.entries.push(Entry {
                    command,
                    enabled: true,
                });
                None
            }
        }
    }

    /// Remove and return the command called `name`.
    pub fn remove(&mut self, name: &str) -> Option<Command> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).command)
    }

    /// The command called `name`.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.entries
            .iter()
            .find(|e| e.command.name() == name)
            .map(|e| &e.command)
    }

    /// Re-enable a command. Returns false when there is no such command.
    pub fn enable(&mut self, name: &str) -> bool {
        self.set_enabled(name, true)
    }

    /// Skip a command in [`analyse`](Self::analyse) until re-enabled.
    /// Returns false when there is no such command.
    pub fn disable(&mut self, name: &str) -> bool {
        self.set_enabled(name, false)
    }

    /// Whether the command called `name` exists and is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.enabled && e.command.name() == name)
    }

    /// Command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.command.name())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Try every enabled command in order.
    ///
    /// Returns the first matching result. A command whose header matched but
    /// whose arguments did not ends the search with its failure; otherwise
    /// the last header mismatch is returned. `None` when no command is
    /// enabled. Failures are always returned as results, whatever each
    /// command's `raise_on_failure` says.
    pub fn analyse(&self, input: impl Into<Input>) -> Option<ParseResult> {
        let input = input.into();
        let mut last = None;
        for entry in self.entries.iter().filter(|e| e.enabled) {
            let result = Analyser::new(&entry.command).run(input.clone());
            let header_missed = matches!(
                result.error.as_ref().map(|e| &e.kind),
                Some(ErrorKind::HeaderMismatch { .. })
            );
            if result.matched || !header_missed {
                debug!(command = entry.command.name(), matched = result.matched, "registry resolved");
                return Some(result);
            }
            last = Some(result);
        }
        last
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.command.name() == name)
    }

    fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.position(name) {
            Some(index) => {
                self.entries[index].enabled = enabled;
                true
            }
            None => false,
        }
    }
}

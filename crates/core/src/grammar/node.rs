use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::args::Args;
use super::error::GrammarError;
use crate::analysis::split::split_once;

/// The shape shared by options and sub-commands.
///
/// A name containing `|` (e.g. `"--verbose|-v"`) is split into aliases sorted
/// longest-first; the longest alias becomes the canonical name. An option is
/// a plain `Node`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "NodeSpec")]
pub struct Node {
    name: String,
    aliases: Vec<String>,
    args: Args,
    separator: Option<String>,
    help_text: String,
}

impl Node {
    /// Create a node from a name (possibly `|`-separated aliases).
    pub fn new(name: &str) -> Result<Self, GrammarError> {
        let mut seen = HashSet::new();
        let mut aliases: Vec<String> = name
            .split('|')
            .filter(|a| !a.is_empty() && seen.insert(*a))
            .map(str::to_owned)
            .collect();
        if aliases.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        aliases.sort_by(|a, b| b.len().cmp(&a.len()));
        Ok(Self {
            name: aliases[0].clone(),
            aliases,
            args: Args::new(),
            separator: None,
            help_text: String::new(),
        })
    }

    /// Add an extra alias (builder pattern). The canonical name is unchanged.
    pub fn with_alias(mut self, alias: &str) -> Result<Self, GrammarError> {
        if alias.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        if !self.aliases.iter().any(|a| a == alias) {
            self.aliases.push(alias.to_owned());
            self.aliases[1..].sort_by(|a, b| b.len().cmp(&a.len()));
        }
        Ok(self)
    }

    /// Set the argument specification (builder pattern).
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Override the separator used for this node's own tokens (builder pattern).
    pub fn with_separator(mut self, separator: &str) -> Result<Self, GrammarError> {
        if separator.is_empty() {
            return Err(GrammarError::EmptySeparator);
        }
        self.separator = Some(separator.to_owned());
        Ok(self)
    }

    /// Set the help text (builder pattern).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help_text = help.into();
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All aliases, canonical name first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Argument specification.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Separator override, if any.
    pub fn separator(&self) -> Option<&str> {
        self.separator.as_deref()
    }

    /// The separator in effect given the parent's separator.
    pub fn separator_or<'a>(&'a self, parent: &'a str) -> &'a str {
        self.separator.as_deref().unwrap_or(parent)
    }

    /// Help text.
    pub fn help_text(&self) -> &str {
        &self.help_text
    }
}

/// A nested command with its own arguments and child options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SubcommandSpec")]
pub struct Subcommand {
    node: Node,
    options: Vec<Node>,
    lookup: AliasTable,
}

impl Subcommand {
    /// Build a sub-command from its node and children.
    pub fn new(node: Node, options: Vec<Node>) -> Result<Self, GrammarError> {
        let mut lookup = AliasTable::default();
        for (index, option) in options.iter().enumerate() {
            lookup.insert(option, index, node.name())?;
        }
        Ok(Self {
            node,
            options,
            lookup,
        })
    }

    /// The sub-command's own node (name, aliases, args, separator, help).
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        self.node.name()
    }

    /// Child options in declared order.
    pub fn options(&self) -> &[Node] {
        &self.options
    }

    /// Resolve a token to one of the child options.
    pub fn resolve(&self, text: &str) -> Option<&Node> {
        self.lookup.resolve(text).map(|i| &self.options[i])
    }
}

/// A direct child of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    /// A flag or option with its own arguments.
    Option(Node),
    /// A nested command.
    Subcommand(Subcommand),
}

impl Param {
    /// The underlying node.
    pub fn node(&self) -> &Node {
        match self {
            Param::Option(node) => node,
            Param::Subcommand(sub) => sub.node(),
        }
    }
}

/// Alias → child index, with support for aliases glued to their arguments
/// by a node-specific separator (`--level=3`).
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct AliasTable {
    exact: HashMap<String, usize>,
    glued: Vec<(String, String, usize)>,
}

impl AliasTable {
    pub(crate) fn insert(
        &mut self,
        node: &Node,
        index: usize,
        parent: &str,
    ) -> Result<(), GrammarError> {
        for alias in node.aliases() {
            if self.exact.insert(alias.clone(), index).is_some() {
                return Err(GrammarError::DuplicateName {
                    name: alias.clone(),
                    parent: parent.to_owned(),
                });
            }
            if let Some(sep) = node.separator() {
                self.glued.push((sep.to_owned(), alias.clone(), index));
            }
        }
        Ok(())
    }

    pub(crate) fn resolve(&self, text: &str) -> Option<usize> {
        if let Some(&index) = self.exact.get(text) {
            return Some(index);
        }
        self.glued.iter().find_map(|(sep, alias, index)| {
            let (head, rest) = split_once(text, sep);
            (head == alias.as_str() && !rest.is_empty()).then_some(*index)
        })
    }

    pub(crate) fn aliases(&self) -> impl Iterator<Item = &str> {
        self.exact.keys().map(String::as_str)
    }
}

// ── Serde forms ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeSpec {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    args: Args,
    #[serde(default)]
    separator: Option<String>,
    #[serde(default)]
    help: String,
}

impl TryFrom<NodeSpec> for Node {
    type Error = GrammarError;

    fn try_from(spec: NodeSpec) -> Result<Self, Self::Error> {
        let mut node = Node::new(&spec.name)?
            .with_args(spec.args)
            .with_help(spec.help);
        for alias in &spec.aliases {
            node = node.with_alias(alias)?;
        }
        if let Some(sep) = &spec.separator {
            node = node.with_separator(sep)?;
        }
        Ok(node)
    }
}

#[derive(Deserialize)]
struct SubcommandSpec {
    #[serde(flatten)]
    node: NodeSpec,
    #[serde(default)]
    options: Vec<Node>,
}

impl TryFrom<SubcommandSpec> for Subcommand {
    type Error = GrammarError;

    fn try_from(spec: SubcommandSpec) -> Result<Self, Self::Error> {
        Subcommand::new(Node::try_from(spec.node)?, spec.options)
    }
}

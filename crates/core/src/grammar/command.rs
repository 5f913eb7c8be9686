use serde::Deserialize;

use super::args::Args;
use super::error::GrammarError;
use super::keywords::KeywordIndex;
use super::node::{AliasTable, Node, Param, Subcommand};
use crate::analysis::analyser::Analyser;
use crate::analysis::error::ParseError;
use crate::analysis::header::HeaderMatcher;
use crate::analysis::input::Input;
use crate::analysis::result::ParseResult;

/// Default token separator.
pub const DEFAULT_SEPARATOR: &str = " ";

/// An alternative header trigger.
///
/// In JSON a literal is a plain string and a unit marker is
/// `{"unit": "<kind>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Trigger {
    /// A literal prefix glued to the command name (`"!"` matches `!go`).
    Literal(String),
    /// A unit of this kind must precede the command name.
    Unit {
        /// The unit kind.
        unit: String,
    },
}

impl Trigger {
    /// A literal prefix trigger.
    pub fn literal(text: impl Into<String>) -> Self {
        Trigger::Literal(text.into())
    }

    /// A unit marker trigger.
    pub fn unit(kind: impl Into<String>) -> Self {
        Trigger::Unit { unit: kind.into() }
    }
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_owned()
}

/// Everything needed to build a [`Command`].
///
/// Deserializable from a JSON grammar document; every field except `name`
/// is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Command name, compiled as a regular expression.
    pub name: String,
    /// Alternative header triggers.
    #[serde(default)]
    pub triggers: Vec<Trigger>,
    /// Characters that split the input.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Return `Err` instead of a failed result.
    #[serde(default)]
    pub raise_on_failure: bool,
    /// Main arguments.
    #[serde(default)]
    pub args: Args,
    /// Options.
    #[serde(default)]
    pub options: Vec<Node>,
    /// Sub-commands.
    #[serde(default)]
    pub subcommands: Vec<Subcommand>,
    /// Unit kinds rejected at tokenization.
    #[serde(default)]
    pub filter_out: Vec<String>,
    /// Help text.
    #[serde(default)]
    pub help: String,
}

impl CommandConfig {
    /// A configuration with only a name; everything else defaulted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
            separator: default_separator(),
            raise_on_failure: false,
            args: Args::new(),
            options: Vec::new(),
            subcommands: Vec::new(),
            filter_out: Vec::new(),
            help: String::new(),
        }
    }

    /// Add a header trigger (builder pattern).
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Set the separator (builder pattern).
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Return `Err` on failure (builder pattern).
    pub fn raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }

    /// Set the main arguments (builder pattern).
    pub fn args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Add an option (builder pattern).
    pub fn option(mut self, option: Node) -> Self {
        self.options.push(option);
        self
    }

    /// Add a sub-command (builder pattern).
    pub fn subcommand(mut self, subcommand: Subcommand) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Reject units of `kind` (builder pattern).
    pub fn filter_out(mut self, kind: impl Into<String>) -> Self {
        self.filter_out.push(kind.into());
        self
    }

    /// Set the help text (builder pattern).
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<Command, GrammarError> {
        Command::new(self)
    }
}

/// A validated, immutable command grammar.
///
/// Cheap to share: analysing never mutates the command, and each call to
/// [`analyse`](Self::analyse) owns its own cursor.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "CommandConfig")]
pub struct Command {
    name: String,
    triggers: Vec<Trigger>,
    separator: String,
    raise_on_failure: bool,
    args: Args,
    params: Vec<Param>,
    filter_out: Vec<String>,
    help_text: String,
    header: HeaderMatcher,
    keywords: KeywordIndex,
    lookup: AliasTable,
}

impl Command {
    /// Validate `config` and derive the header matcher, keyword index and
    /// option lookup.
    pub fn new(config: CommandConfig) -> Result<Self, GrammarError> {
        if config.name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        if config.separator.is_empty() {
            return Err(GrammarError::EmptySeparator);
        }
        let header = HeaderMatcher::build(&config.name, &config.triggers)?;

        let params: Vec<Param> = config
            .options
            .into_iter()
            .map(Param::Option)
            .chain(config.subcommands.into_iter().map(Param::Subcommand))
            .collect();
        let mut lookup = AliasTable::default();
        for (index, param) in params.iter().enumerate() {
            lookup.insert(param.node(), index, &config.name)?;
        }
        let keywords = KeywordIndex::build(&params);

        Ok(Self {
            name: config.name,
            triggers: config.triggers,
            separator: config.separator,
            raise_on_failure: config.raise_on_failure,
            args: config.args,
            params,
            filter_out: config.filter_out,
            help_text: config.help,
            header,
            keywords,
            lookup,
        })
    }

    /// Parse a JSON grammar document.
    pub fn from_json(text: &str) -> Result<Self, GrammarError> {
        let config: CommandConfig = serde_json::from_str(text)?;
        Self::new(config)
    }

    /// Match `input` against this grammar.
    ///
    /// With `raise_on_failure` set a failure is returned as `Err`; otherwise
    /// it is an `Ok` result with `matched == false` and the error attached.
    pub fn analyse(&self, input: impl Into<Input>) -> Result<ParseResult, ParseError> {
        let result = Analyser::new(self).run(input.into());
        match result.error.clone() {
            Some(err) if self.raise_on_failure => Err(err),
            _ => Ok(result),
        }
    }

    /// Command name pattern.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header triggers.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Input separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Whether failures are returned as `Err`.
    pub fn raises_on_failure(&self) -> bool {
        self.raise_on_failure
    }

    /// Main arguments.
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Options and sub-commands, options first.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Filtered unit kinds.
    pub fn filter_out(&self) -> &[String] {
        &self.filter_out
    }

    /// Help text.
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Compiled header.
    pub fn header(&self) -> &HeaderMatcher {
        &self.header
    }

    /// Every alias reachable from this command.
    pub fn keywords(&self) -> &KeywordIndex {
        &self.keywords
    }

    /// Resolve a token to a direct option or sub-command.
    pub fn resolve(&self, text: &str) -> Option<&Param> {
        self.lookup.resolve(text).map(|index| &self.params[index])
    }
}

impl TryFrom<CommandConfig> for Command {
    type Error = GrammarError;

    fn try_from(config: CommandConfig) -> Result<Self, Self::Error> {
        Command::new(config)
    }
}

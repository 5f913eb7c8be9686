use std::collections::BTreeSet;

use super::node::Param;

/// Every alias reachable from a command: its options' aliases, its
/// sub-commands' aliases and the aliases of their child options.
///
/// Built once when the command is constructed and consulted read-only by the
/// variadic handler to decide where a run of values ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    words: BTreeSet<String>,
}

impl KeywordIndex {
    /// Collect the aliases of `params` and everything nested below them.
    pub fn build(params: &[Param]) -> Self {
        let mut words = BTreeSet::new();
        for param in params {
            words.extend(param.node().aliases().iter().cloned());
            if let Param::Subcommand(sub) = param {
                for option in sub.options() {
                    words.extend(option.aliases().iter().cloned());
                }
            }
        }
        Self { words }
    }

    /// Whether `text` is a keyword.
    pub fn contains(&self, text: &str) -> bool {
        self.words.contains(text)
    }

    /// Keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the index holds no keywords.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

//! The configuration module of the ranking engine.
use serde::{Deserialize, Serialize};

/// The configuration of the [`Engine`](crate::engine::Engine) struct. This should suffice most scenarios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub struct Config {
    /// The configuration of the regex compiler.
    pub regex_config: RegexConfig,
}

/// The configuration of the regex to DFA compilation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub struct RegexConfig {
    /// The maximum memory usage in bytes allowed when compiling the regex.
    /// If the memory usage exceeds this limit, an error will be returned.
    /// The default is `None`, which means no limit.
    ///
    /// Compiling an adversarial pattern into a complete DFA can take space
    /// exponential in the pattern length, so a limit is strongly recommended
    /// when patterns come from untrusted input.
    pub max_memory_usage: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regex_config: RegexConfig {
                max_memory_usage: None,
            },
        }
    }
}

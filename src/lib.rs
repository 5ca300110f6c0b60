/*!
# regrank

This crate provides a regular-language ranking engine: for a regex `R` and a
length bound, it bijectively maps the strings of a fixed length accepted by
`R` onto a contiguous range of non-negative integers. `rank` takes a word to
its position in the lexicographic enumeration of same-length words of the
language, `unrank` inverts that, and `count` reports how many words fall in a
length window. Ranking against a regular language is the core primitive of
format-transforming encryption, where ciphertexts are re-encoded as strings
matching a chosen format, but it is equally usable on its own.
Here is a quick example of how this crate works:

```rust
use num::BigUint;
use regrank::Engine;

let engine = Engine::new("[a-c]{2}", 2).unwrap();
// 9 two-letter words: "aa", "ab", ..., "cc".
assert_eq!(engine.count(0, 2).unwrap(), BigUint::from(9u32));
let rank = engine.rank(b"ca").unwrap();
assert_eq!(rank, BigUint::from(6u32));
assert_eq!(engine.unrank(&rank, 2).unwrap(), b"ca");
```

# Overview

The primary type in this crate is [`Engine`]. The most important methods are
as follows:
- [`Engine::new`]: compiles a regex into a minimised byte-level DFA and
    precomputes, for every state and every length up to the bound, how many
    words lead from that state into acceptance. [`Engine::with_config`]
    allows a custom [`Config`], notably a memory budget for the compilation.
- [`Engine::rank`] / [`Engine::unrank`]: the fixed-length bijection. For
    every length `n` up to the bound and every `i` in `[0, count(n, n))`,
    `rank(&unrank(i, n)?)? == i` and `unrank(&rank(w)?, n)? == w`.
- [`Engine::count`]: the number of accepted words in an inclusive length
    window.
- [`Engine::rank_variable`] / [`Engine::unrank_variable`]: the same
    bijection over all lengths up to the bound at once, ordered by length
    first.

The compilation pipeline is split in two stable halves: the regex front-end
([`regex::att_fst_from_regex`]) serialises the automaton as an AT&T FST
transition dump, and the loader ([`Dfa`]) parses such a dump back into dense
tables. [`Engine::from_att_fst`] accepts a dump directly, so an automaton
minimised by external FST tooling can be ranked without going through the
regex front-end.

```rust
use num::BigUint;
use regrank::Engine;

let engine = Engine::new("(ab)+", 6).unwrap();
// The language has one word each at lengths 2, 4 and 6.
assert_eq!(engine.count(0, 6).unwrap(), BigUint::from(3u32));
assert_eq!(engine.rank_variable(b"abab").unwrap(), BigUint::from(1u32));
assert_eq!(engine.unrank_variable(&BigUint::from(1u32)).unwrap(), b"abab");
```

# Lexicographic order

The order enumerated by rank/unrank is induced by the automaton's symbol
indices, which are assigned in order of first appearance in the transition
dump, not by numeric byte value. Dumps produced by this crate's regex
front-end happen to probe bytes in ascending order from the start state, but
the induced order of an arbitrary dump can differ from byte order, and two
different serialisations of the same language define different (equally
valid) bijections. Treat the engine as opaque: never compare ranks across
independently constructed engines.

# Performance

Construction costs `O(states * alphabet * max_len)` big-integer additions;
every query costs at most `O(word_len * alphabet)` big-integer operations,
and states whose transitions all share one target are handled with a single
multiplication or division instead of an alphabet scan. Compiling the regex
into a complete DFA has worst-case exponential blow-up; set
[`RegexConfig::max_memory_usage`](config::RegexConfig) when patterns are
untrusted.
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
pub mod config;
pub mod dfa;
pub mod engine;
pub mod regex;
pub use config::Config;
pub use config::RegexConfig;
pub use dfa::Dfa;
pub use engine::Engine;
pub use regex::att_fst_from_regex;

//! cfg-sampler generates random strings conforming to a context-free
//! grammar.
//!
//! A grammar maps rule names to alternative expansions of quoted literals
//! and other rule names. Generation starts from the `start` rule and
//! repeatedly rewrites non-terminals, choosing among alternatives uniformly
//! at random, until only terminal text remains. Expansion is iterative
//! (explicit stack), so deeply nested grammars are safe.
//!
//! # Example
//!
//! ```rust
//! use cfg_sampler::{Expander, Grammar};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut grammar = Grammar::new();
//! grammar.add_rule("start", r#""Hello" subject"#).unwrap();
//! grammar.add_rule("subject", r#""world" | "Rust""#).unwrap();
//!
//! let expander = Expander::new(&grammar).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let text = expander.expand(&mut rng).unwrap();
//! assert!(text == "Hello world" || text == "Hello Rust");
//! ```

pub mod generator;
pub mod grammar;
pub mod utils;

pub use generator::{generate_batch, Expander, RuleTable, START_SYMBOL};
pub use grammar::{Grammar, Rule, Symbol};
pub use utils::{GrammarError, Result};

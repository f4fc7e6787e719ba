use std::collections::HashMap;
use std::io::Write;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::grammar::{Grammar, Rule, Symbol};
use crate::utils::{GrammarError, Result};

/// Every generated string is expanded from this rule
pub const START_SYMBOL: &str = "start";

/// Mapping from non-terminal name to its alternative expansions, built once
/// per grammar from the flat rule list.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    table: HashMap<String, Vec<Vec<Symbol>>>,
}

impl RuleTable {
    /// Group the flat rule list by origin, preserving input order per origin
    /// and keeping duplicate expansions as distinct alternatives.
    pub fn build(rules: &[Rule]) -> Self {
        let mut table: HashMap<String, Vec<Vec<Symbol>>> = HashMap::new();
        for rule in rules {
            table
                .entry(rule.origin.clone())
                .or_default()
                .push(rule.expansion.clone());
        }
        RuleTable { table }
    }

    /// The alternative expansions for a non-terminal, or None if the name
    /// has no rule (and is therefore a terminal)
    pub fn alternatives(&self, origin: &str) -> Option<&[Vec<Symbol>]> {
        self.table.get(origin).map(Vec::as_slice)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.table.contains_key(origin)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Expands the start symbol into random terminal strings.
///
/// Expansion is iterative with an explicit stack rather than recursive, so
/// deeply nested grammars cannot overflow the call stack. A popped name is
/// classified purely by rule-table membership: a table key is expanded, any
/// other name is emitted through the terminal-pattern lookup.
#[derive(Debug)]
pub struct Expander<'g> {
    table: RuleTable,
    grammar: &'g Grammar,
}

impl<'g> Expander<'g> {
    /// Build the rule table and verify the grammar has a `start` rule
    pub fn new(grammar: &'g Grammar) -> Result<Self> {
        let table = RuleTable::build(grammar.rules());
        if !table.contains(START_SYMBOL) {
            return Err(GrammarError::MissingStart(START_SYMBOL.to_string()));
        }
        Ok(Expander { table, grammar })
    }

    /// Generate one random string conforming to the grammar, with terminal
    /// fragments joined by single spaces in left-to-right expansion order.
    pub fn expand<R: Rng>(&self, rng: &mut R) -> Result<String> {
        let mut stack: Vec<&str> = vec![START_SYMBOL];
        let mut parts: Vec<&str> = Vec::new();

        while let Some(current) = stack.pop() {
            if let Some(alternatives) = self.table.alternatives(current) {
                let expansion = alternatives
                    .choose(rng)
                    .ok_or_else(|| GrammarError::EmptyRule(current.to_string()))?;
                // Push in reverse so popping preserves left-to-right order
                for symbol in expansion.iter().rev() {
                    stack.push(symbol.name());
                }
            } else {
                let text = self
                    .grammar
                    .terminal_pattern(current)
                    .ok_or_else(|| GrammarError::UnknownTerminal(current.to_string()))?;
                parts.push(text);
            }
        }

        Ok(parts.join(" "))
    }

    pub fn rule_table(&self) -> &RuleTable {
        &self.table
    }
}

/// Generate `count` strings and write them newline-separated, with no
/// trailing newline after the final string.
///
/// The RNG is seeded once for the whole batch, so a fixed seed makes the
/// entire output reproducible; without a seed each run is independent.
pub fn generate_batch<W: Write>(
    expander: &Expander,
    count: usize,
    seed: Option<u64>,
    writer: &mut W,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for i in 0..count {
        let text = expander.expand(&mut rng)?;
        writer.write_all(text.as_bytes())?;
        if i + 1 != count {
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;

    Ok(())
}

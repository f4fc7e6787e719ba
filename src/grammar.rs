use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;
use regex::Regex;

use crate::utils::{GrammarError, Result};

/// A symbol in the grammar, either a terminal or a non-terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    /// A terminal symbol, referenced by its interned name
    Terminal(String),
    /// A non-terminal symbol (reference to a rule)
    NonTerminal(String),
}

impl Symbol {
    /// The symbol's name, regardless of kind
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name,
        }
    }
}

/// A production rule: the origin non-terminal may be rewritten as the
/// expansion sequence.
#[derive(Debug, Clone)]
pub struct Rule {
    pub origin: String,
    pub expansion: Vec<Symbol>,
}

/// A parsed grammar: the flat rule list in the order the rules were
/// encountered, plus the lookup from interned terminal name to the literal
/// text it emits.
///
/// Quoted literals in rule bodies are interned as anonymous terminals named
/// `__ANON_{n}`, one name per distinct literal text. Rule names must start
/// with a letter, so the two namespaces never collide.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
    terminals: HashMap<String, String>,
    interned: HashMap<String, String>,
}

impl Grammar {
    /// Create a new empty grammar
    pub fn new() -> Self {
        Grammar::default()
    }

    /// Parse a grammar from a file.
    ///
    /// The syntax is line oriented: `name: alternative | alternative`, where
    /// each alternative is a sequence of quoted literals and bare rule
    /// references. A line starting with `|` adds alternatives to the
    /// preceding rule; repeating a rule head appends alternatives as well.
    /// `#` and `//` start comments.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = io::BufReader::new(file);
        let mut grammar = Grammar::new();

        let head_regex = Regex::new(r"^([A-Za-z][A-Za-z0-9_]*)\s*:\s*(.*)$").unwrap();
        let mut current_rule = String::new();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
                continue;
            }

            // Continuation: more alternatives for the previous rule
            if let Some(rest) = trimmed.strip_prefix('|') {
                if current_rule.is_empty() {
                    return Err(GrammarError::Parse {
                        line: line_no,
                        message: "alternative with no preceding rule".to_string(),
                    });
                }
                let origin = current_rule.clone();
                grammar.parse_alternatives(&origin, rest, line_no)?;
                continue;
            }

            match head_regex.captures(trimmed) {
                Some(captures) => {
                    let origin = captures.get(1).unwrap().as_str().to_string();
                    let rhs = captures.get(2).unwrap().as_str();
                    grammar.parse_alternatives(&origin, rhs, line_no)?;
                    current_rule = origin;
                }
                None => {
                    return Err(GrammarError::Parse {
                        line: line_no,
                        message: format!("expected 'name: alternatives', got '{}'", trimmed),
                    });
                }
            }
        }

        Ok(grammar)
    }

    /// Add alternatives for a rule programmatically, using the same
    /// right-hand-side syntax as grammar files.
    pub fn add_rule(&mut self, origin: &str, rhs: &str) -> Result<&mut Self> {
        self.parse_alternatives(origin, rhs, 0)?;
        Ok(self)
    }

    /// Parse a `|`-separated right-hand side and append one rule per
    /// alternative, preserving order and keeping duplicates distinct.
    fn parse_alternatives(&mut self, origin: &str, rhs: &str, line_no: usize) -> Result<()> {
        let mut expansion = Vec::new();
        let chars: Vec<char> = rhs.chars().collect();
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];

            if c.is_whitespace() {
                pos += 1;
            } else if c == '#' || (c == '/' && chars.get(pos + 1) == Some(&'/')) {
                break;
            } else if c == '|' {
                self.push_rule(origin, std::mem::take(&mut expansion))?;
                pos += 1;
            } else if c == '"' || c == '\'' {
                let quote = c;
                pos += 1;
                let start = pos;
                while pos < chars.len() && chars[pos] != quote {
                    pos += 1;
                }
                if pos >= chars.len() {
                    return Err(GrammarError::Parse {
                        line: line_no,
                        message: format!("unterminated {} quote", quote),
                    });
                }
                let text: String = chars[start..pos].iter().collect();
                let name = self.intern_terminal(&text);
                expansion.push(Symbol::Terminal(name));
                pos += 1;
            } else if c.is_ascii_alphabetic() {
                let start = pos;
                while pos < chars.len()
                    && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                let name: String = chars[start..pos].iter().collect();
                expansion.push(Symbol::NonTerminal(name));
            } else {
                return Err(GrammarError::Parse {
                    line: line_no,
                    message: format!("unexpected character '{}'", c),
                });
            }
        }

        self.push_rule(origin, expansion)
    }

    fn push_rule(&mut self, origin: &str, expansion: Vec<Symbol>) -> Result<()> {
        if expansion.is_empty() {
            return Err(GrammarError::EmptyProduction(origin.to_string()));
        }
        self.rules.push(Rule {
            origin: origin.to_string(),
            expansion,
        });
        Ok(())
    }

    /// Intern a literal, returning its terminal name. Each distinct literal
    /// text gets one name, assigned in first-occurrence order.
    fn intern_terminal(&mut self, text: &str) -> String {
        if let Some(name) = self.interned.get(text) {
            return name.clone();
        }
        let name = format!("__ANON_{}", self.terminals.len());
        self.terminals.insert(name.clone(), text.to_string());
        self.interned.insert(text.to_string(), name.clone());
        name
    }

    /// The flat rule list, in the order the rules were encountered
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up the literal text a terminal name emits
    pub fn terminal_pattern(&self, name: &str) -> Option<&str> {
        self.terminals.get(name).map(String::as_str)
    }

    /// The full terminal-name to literal-text lookup
    pub fn terminals(&self) -> &HashMap<String, String> {
        &self.terminals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_alternatives() {
        let mut grammar = Grammar::new();
        grammar.add_rule("start", r#""a" "b" | "c""#).unwrap();

        assert_eq!(grammar.rules().len(), 2);
        assert_eq!(grammar.rules()[0].origin, "start");
        assert_eq!(grammar.rules()[0].expansion.len(), 2);
        assert_eq!(grammar.rules()[1].expansion.len(), 1);

        match &grammar.rules()[0].expansion[0] {
            Symbol::Terminal(name) => {
                assert_eq!(grammar.terminal_pattern(name), Some("a"));
            }
            other => panic!("expected Terminal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rule_references() {
        let mut grammar = Grammar::new();
        grammar.add_rule("start", r#"subject "x""#).unwrap();

        match &grammar.rules()[0].expansion[0] {
            Symbol::NonTerminal(name) => assert_eq!(name, "subject"),
            other => panic!("expected NonTerminal, got {:?}", other),
        }
    }

    #[test]
    fn test_literals_interned_once() {
        let mut grammar = Grammar::new();
        grammar.add_rule("start", r#""a" "a" "b""#).unwrap();

        assert_eq!(grammar.terminals().len(), 2);
        let first = grammar.rules()[0].expansion[0].name();
        let second = grammar.rules()[0].expansion[1].name();
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_heads_append_without_dedup() {
        let mut grammar = Grammar::new();
        grammar.add_rule("start", r#""a""#).unwrap();
        grammar.add_rule("start", r#""a""#).unwrap();

        // Identical alternatives stay distinct
        assert_eq!(grammar.rules().len(), 2);
    }

    #[test]
    fn test_empty_alternative_rejected() {
        let mut grammar = Grammar::new();
        let err = grammar.add_rule("start", r#""a" |"#).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyProduction(_)));
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        let mut grammar = Grammar::new();
        let err = grammar.add_rule("start", r#""a"#).unwrap_err();
        assert!(matches!(err, GrammarError::Parse { .. }));
    }

    #[test]
    fn test_single_quoted_literals() {
        let mut grammar = Grammar::new();
        grammar.add_rule("start", "'hello world'").unwrap();

        let name = grammar.rules()[0].expansion[0].name();
        assert_eq!(grammar.terminal_pattern(name), Some("hello world"));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.cfg");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            "# test grammar\n\
             start: subject \"x\"  // trailing comment\n\
             subject: \"y\"\n\
             \t| \"z\"\n"
        )
        .unwrap();
        drop(file);

        let grammar = Grammar::from_file(&path).unwrap();
        assert_eq!(grammar.rules().len(), 3);
        assert_eq!(grammar.rules()[1].origin, "subject");
        assert_eq!(grammar.rules()[2].origin, "subject");
        assert_eq!(grammar.terminals().len(), 3);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cfg");
        let mut file = File::create(&path).unwrap();
        write!(file, "start: \"a\"\n???\n").unwrap();
        drop(file);

        let err = Grammar::from_file(&path).unwrap_err();
        match err {
            GrammarError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_leading_alternative_without_rule() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.cfg");
        let mut file = File::create(&path).unwrap();
        write!(file, "| \"a\"\n").unwrap();
        drop(file);

        let err = Grammar::from_file(&path).unwrap_err();
        assert!(matches!(err, GrammarError::Parse { line: 1, .. }));
    }
}

//! Path template parsing and rendering.
//!
//! A template is the path component of a route: literal text, `:name`
//! segments bound from the caller's parameter bag, `(...)` optional groups,
//! and a `*` catch-all whose value is inserted verbatim (it may itself
//! contain `/`). Rendering reports which bag keys were consumed so the
//! caller knows what is left over for query or body data.

use std::collections::BTreeSet;

use crate::error::{Result, SdkError};
use crate::params::Params;

/// Parse-time configuration for path templates.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOptions {
    /// Bag key the `*` catch-all segment binds to.
    pub wildcard_key: String,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self {
            wildcard_key: "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Param(String),
    Wildcard,
    Group(Vec<Token>),
}

/// An immutable parsed path template.
///
/// Construction fails fast on malformed syntax; binding problems only
/// surface at [`render`](Self::render) time.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    tokens: Vec<Token>,
    wildcard_key: String,
}

/// Outcome of rendering a template against a parameter bag.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The concrete path.
    pub path: String,
    /// Every bag key that was bound into the path. Optional-group keys
    /// appear only when the group actually rendered.
    pub consumed: BTreeSet<String>,
}

impl PathTemplate {
    /// Parse a template string.
    pub fn parse(template: &str, options: &TemplateOptions) -> Result<Self> {
        let mut parser = Parser {
            chars: template.chars().collect(),
            pos: 0,
        };
        let tokens = parser.sequence(0)?;
        Ok(Self {
            tokens,
            wildcard_key: options.wildcard_key.clone(),
        })
    }

    /// Every parameter name this template can consume.
    pub fn param_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        collect_names(&self.tokens, &self.wildcard_key, &mut names);
        names
    }

    /// Bind `bag` to the template and produce the concrete path.
    ///
    /// Fails with [`SdkError::MissingParam`] when a required (non-optional)
    /// segment has no binding. Optional groups never trigger that error:
    /// a group missing any of its names is omitted wholesale.
    pub fn render(&self, bag: &Params) -> Result<Rendered> {
        let mut path = String::new();
        let mut consumed = BTreeSet::new();
        render_sequence(&self.tokens, bag, &self.wildcard_key, &mut path, &mut consumed)?;
        Ok(Rendered { path, consumed })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn sequence(&mut self, depth: usize) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                ':' => {
                    flush_literal(&mut literal, &mut tokens);
                    self.pos += 1;
                    let name = self.take_name();
                    if name.is_empty() {
                        return Err(SdkError::Template(
                            "empty parameter name after `:`".to_string(),
                        ));
                    }
                    tokens.push(Token::Param(name));
                }
                '*' => {
                    flush_literal(&mut literal, &mut tokens);
                    self.pos += 1;
                    tokens.push(Token::Wildcard);
                }
                '(' => {
                    flush_literal(&mut literal, &mut tokens);
                    self.pos += 1;
                    let inner = self.sequence(depth + 1)?;
                    tokens.push(Token::Group(inner));
                }
                ')' => {
                    if depth == 0 {
                        return Err(SdkError::Template(
                            "unbalanced `)` in template".to_string(),
                        ));
                    }
                    flush_literal(&mut literal, &mut tokens);
                    self.pos += 1;
                    return Ok(tokens);
                }
                c => {
                    literal.push(c);
                    self.pos += 1;
                }
            }
        }
        if depth > 0 {
            return Err(SdkError::Template("unclosed `(` in template".to_string()));
        }
        flush_literal(&mut literal, &mut tokens);
        Ok(tokens)
    }

    fn take_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn collect_names(tokens: &[Token], wildcard_key: &str, names: &mut BTreeSet<String>) {
    for token in tokens {
        match token {
            Token::Param(name) => {
                names.insert(name.clone());
            }
            Token::Wildcard => {
                names.insert(wildcard_key.to_string());
            }
            Token::Group(inner) => collect_names(inner, wildcard_key, names),
            Token::Literal(_) => {}
        }
    }
}

fn render_sequence(
    tokens: &[Token],
    bag: &Params,
    wildcard_key: &str,
    out: &mut String,
    consumed: &mut BTreeSet<String>,
) -> Result<()> {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Param(name) => {
                let value = bag.get(name).ok_or_else(|| SdkError::MissingParam {
                    key: name.clone(),
                })?;
                out.push_str(&value.to_string());
                consumed.insert(name.clone());
            }
            Token::Wildcard => {
                let value = bag.get(wildcard_key).ok_or_else(|| SdkError::MissingParam {
                    key: wildcard_key.to_string(),
                })?;
                out.push_str(&value.to_string());
                consumed.insert(wildcard_key.to_string());
            }
            Token::Group(inner) => {
                if group_is_satisfied(inner, bag, wildcard_key) {
                    render_sequence(inner, bag, wildcard_key, out, consumed)?;
                }
            }
        }
    }
    Ok(())
}

/// A group renders only when every name it binds at its own level is
/// present in the bag. Nested groups decide for themselves once the
/// enclosing group renders.
fn group_is_satisfied(tokens: &[Token], bag: &Params, wildcard_key: &str) -> bool {
    tokens.iter().all(|token| match token {
        Token::Param(name) => bag.contains(name),
        Token::Wildcard => bag.contains(wildcard_key),
        _ => true,
    })
}

//=========================================================================
// Selectors
//=========================================================================
//
// Minimal CSS selector support for the declarative drag attributes
// (delegation targets, handles, constraint ancestors, drop zones).
//
// Grammar:
//   list     := compound ( ',' compound )*
//   compound := simple+
//   simple   := '*' | tag | '#' id | '.' class | '[' attr ( '=' value )? ']'
//
// Combinators (descendant, child, sibling) are rejected at parse time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{ElementId, ElementTree};

//=== SelectorError =======================================================

/// Reasons a selector string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,

    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("combinators are not supported (offset {offset})")]
    UnsupportedCombinator { offset: usize },

    #[error("unterminated attribute selector")]
    UnterminatedAttribute,

    #[error("missing name at offset {offset}")]
    MissingName { offset: usize },
}

//=== Simple Selectors ====================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl Simple {
    fn matches<T: ElementTree + ?Sized>(&self, tree: &T, element: ElementId) -> bool {
        match self {
            Simple::Universal => true,
            Simple::Tag(tag) => tree
                .tag_name(element)
                .is_some_and(|name| name.eq_ignore_ascii_case(tag)),
            Simple::Id(id) => tree.attribute(element, "id").as_deref() == Some(id.as_str()),
            Simple::Class(class) => tree.has_class(element, class),
            Simple::Attribute { name, value: None } => tree.has_attribute(element, name),
            Simple::Attribute { name, value: Some(expected) } => {
                tree.attribute(element, name).as_deref() == Some(expected.as_str())
            }
        }
    }
}

//=== Selector ============================================================

/// A parsed selector list.
///
/// Keeps its source text so it can be rendered back into an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Vec<Simple>>,
}

impl Selector {
    /// Parses a selector list such as `"li.item, [data-row]"`.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        let mut offset = input.len() - input.trim_start().len();

        for part in source.split(',') {
            let leading = part.len() - part.trim_start().len();
            let compound = part.trim();
            if compound.is_empty() {
                return Err(SelectorError::Empty);
            }
            alternatives.push(parse_compound(compound, offset + leading)?);
            offset += part.len() + 1;
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// Returns `true` if `element` matches any alternative of the list.
    pub fn matches<T: ElementTree + ?Sized>(&self, tree: &T, element: ElementId) -> bool {
        self.alternatives
            .iter()
            .any(|compound| compound.iter().all(|simple| simple.matches(tree, element)))
    }

    /// The selector text as written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

//--- Parsing Helpers -----------------------------------------------------

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn parse_compound(compound: &str, base: usize) -> Result<Vec<Simple>, SelectorError> {
    let chars: Vec<(usize, char)> = compound.char_indices().collect();
    let mut simples = Vec::new();
    let mut i = 0;

    let read_name = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && is_name_char(chars[end].1) {
            end += 1;
        }
        let name: String = chars[start..end].iter().map(|(_, c)| *c).collect();
        (name, end)
    };

    while i < chars.len() {
        let (pos, ch) = chars[i];
        match ch {
            '*' => {
                simples.push(Simple::Universal);
                i += 1;
            }
            '#' | '.' => {
                let (name, end) = read_name(i + 1);
                if name.is_empty() {
                    return Err(SelectorError::MissingName { offset: base + pos + 1 });
                }
                simples.push(if ch == '#' { Simple::Id(name) } else { Simple::Class(name) });
                i = end;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|(_, c)| *c == ']')
                    .map(|rel| i + rel)
                    .ok_or(SelectorError::UnterminatedAttribute)?;
                let body: String = chars[i + 1..close].iter().map(|(_, c)| *c).collect();
                simples.push(parse_attribute(&body, base + pos + 1)?);
                i = close + 1;
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err(SelectorError::UnsupportedCombinator { offset: base + pos });
            }
            c if is_name_char(c) && simples.is_empty() => {
                let (name, end) = read_name(i);
                simples.push(Simple::Tag(name));
                i = end;
            }
            c => return Err(SelectorError::UnexpectedChar { ch: c, offset: base + pos }),
        }
    }

    Ok(simples)
}

fn parse_attribute(body: &str, offset: usize) -> Result<Simple, SelectorError> {
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };

    if name.is_empty() {
        return Err(SelectorError::MissingName { offset });
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(SelectorError::UnexpectedChar { ch: bad, offset });
    }

    Ok(Simple::Attribute {
        name: name.to_string(),
        value,
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

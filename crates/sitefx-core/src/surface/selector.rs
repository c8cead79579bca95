//! Compound selector parsing and matching
//!
//! Supports comma-separated lists of `tag#id.class[attr][attr=value]`
//! compounds. Combinators are not supported.

use crate::{Error, Result};

/// Element view a selector can be matched against
pub trait Matchable {
    fn tag(&self) -> &str;
    fn attr(&self, name: &str) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList(pub Vec<Selector>);

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let selectors = input
            .split(',')
            .map(|part| Selector::parse(part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(selectors))
    }

    pub fn matches(&self, element: &impl Matchable) -> bool {
        self.0.iter().any(|s| s.matches(element))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidSelector(input.to_string());
        if input.is_empty() {
            return Err(invalid());
        }

        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        let mut selector = Selector::default();

        let tag = take_ident(&chars, &mut pos);
        if !tag.is_empty() {
            selector.tag = Some(tag.to_ascii_lowercase());
        }

        while pos < chars.len() {
            match chars[pos] {
                '#' => {
                    pos += 1;
                    let id = take_ident(&chars, &mut pos);
                    if id.is_empty() {
                        return Err(invalid());
                    }
                    selector.id = Some(id);
                }
                '.' => {
                    pos += 1;
                    let class = take_ident(&chars, &mut pos);
                    if class.is_empty() {
                        return Err(invalid());
                    }
                    selector.classes.push(class);
                }
                '[' => {
                    pos += 1;
                    let name = take_ident(&chars, &mut pos);
                    if name.is_empty() {
                        return Err(invalid());
                    }
                    let mut value = None;
                    if pos < chars.len() && chars[pos] == '=' {
                        pos += 1;
                        let end = chars[pos..]
                            .iter()
                            .position(|&c| c == ']')
                            .ok_or_else(invalid)?;
                        let raw: String = chars[pos..pos + end].iter().collect();
                        value = Some(raw.trim_matches(|c| c == '"' || c == '\'').to_string());
                        pos += end;
                    }
                    if pos >= chars.len() || chars[pos] != ']' {
                        return Err(invalid());
                    }
                    pos += 1;
                    selector.attrs.push((name, value));
                }
                _ => return Err(invalid()),
            }
        }

        Ok(selector)
    }

    pub fn matches(&self, element: &impl Matchable) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| element.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (element.attr(name), value) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(_), None) => true,
            (None, _) => false,
        })
    }
}

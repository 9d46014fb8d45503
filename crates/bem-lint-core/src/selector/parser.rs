//! Lossless selector parser.
//!
//! Produces one [`SelectorNodeKind::Selector`] group per comma-separated
//! entry. Whitespace and comments are preserved so that serialising the
//! result reproduces the input.

use super::node::{SelectorNode, SelectorNodeKind, Spaces};

/// Pseudo-classes whose arguments are selector lists.
const SELECTOR_PSEUDOS: &[&str] = &[
    "is",
    "where",
    "not",
    "has",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "host",
    "host-context",
    "global",
    "local",
    "deep",
];

/// Pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Errors produced while parsing a selector.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// A character that cannot start or continue a selector.
    #[error("unexpected `{found}` at {index}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Its byte index.
        index: usize,
    },

    /// A bracket, parenthesis, string, comment or interpolation that never closes.
    #[error("unterminated {what} starting at {index}")]
    Unterminated {
        /// What was left open.
        what: &'static str,
        /// Byte index of the opening token.
        index: usize,
    },

    /// An empty entry in a selector list (`.a,,.b`) or a missing name (`.`).
    #[error("empty selector at {index}")]
    Empty {
        /// Byte index where a selector was expected.
        index: usize,
    },

    /// Two explicit combinators in a row (`.a > > .b`).
    #[error("consecutive combinators at {index}")]
    DoubleCombinator {
        /// Byte index of the second combinator.
        index: usize,
    },
}

/// Parses a selector list, returning an empty list when the input is malformed.
#[must_use]
pub fn parse_selector(input: &str) -> Vec<SelectorNode> {
    match try_parse_selector(input) {
        Ok(groups) => groups,
        Err(e) => {
            tracing::debug!("Unparseable selector {:?}: {}", input, e);
            Vec::new()
        }
    }
}

/// Parses a selector list.
///
/// Whitespace-only input yields an empty list.
///
/// # Errors
///
/// Returns [`SelectorError`] when the input is not a valid selector list.
pub fn try_parse_selector(input: &str) -> Result<Vec<SelectorNode>, SelectorError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    Parser::new(input).parse_list()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(ahead)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected {
                found,
                index: self.pos,
            },
            None => SelectorError::Empty { index: self.pos },
        }
    }

    fn eat_whitespace(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_list(&mut self) -> Result<Vec<SelectorNode>, SelectorError> {
        let mut groups = Vec::new();
        loop {
            groups.push(self.parse_group()?);
            match self.peek() {
                Some(',') => self.pos += 1,
                None => return Ok(groups),
                Some(_) => return Err(self.unexpected()),
            }
        }
    }

    fn parse_group(&mut self) -> Result<SelectorNode, SelectorError> {
        let before = self.eat_whitespace();
        let start = self.pos;
        let mut children: Vec<SelectorNode> = Vec::new();
        let mut after = String::new();

        loop {
            match self.peek() {
                None | Some(',') => break,
                Some(c) if is_whitespace(c) => {
                    let ws_start = self.pos;
                    let ws = self.eat_whitespace();
                    if matches!(self.peek(), None | Some(',')) {
                        after = ws;
                        break;
                    }
                    if self.at_explicit_combinator() {
                        children.push(self.parse_combinator(ws, &children)?);
                    } else {
                        children.push(SelectorNode::new(SelectorNodeKind::Combinator, ws, ws_start));
                    }
                }
                Some(_) if self.at_explicit_combinator() => {
                    children.push(self.parse_combinator(String::new(), &children)?);
                }
                Some(_) => children.push(self.parse_simple()?),
            }
        }

        if children.is_empty() {
            return Err(SelectorError::Empty { index: start });
        }

        let mut group = SelectorNode::new(SelectorNodeKind::Selector, "", start);
        group.spaces = Spaces { before, after };
        group.children = children;
        Ok(group)
    }

    fn at_explicit_combinator(&self) -> bool {
        match self.peek() {
            Some('>' | '+' | '~') => true,
            Some('|') => self.peek_at(1) == Some('|'),
            _ => false,
        }
    }

    fn parse_combinator(
        &mut self,
        before: String,
        previous: &[SelectorNode],
    ) -> Result<SelectorNode, SelectorError> {
        let start = self.pos;
        let is_explicit = |n: &SelectorNode| n.is_combinator() && !n.value.trim().is_empty();
        if previous.last().is_some_and(is_explicit) {
            return Err(SelectorError::DoubleCombinator { index: start });
        }

        if self.input[self.pos..].starts_with("||") {
            self.pos += 2;
        } else {
            self.pos += 1;
        }
        let mut node = SelectorNode::new(
            SelectorNodeKind::Combinator,
            &self.input[start..self.pos],
            start,
        );
        node.spaces.before = before;
        node.spaces.after = self.eat_whitespace();
        Ok(node)
    }

    fn parse_simple(&mut self) -> Result<SelectorNode, SelectorError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Err(self.unexpected());
        };
        match c {
            '.' => {
                self.pos += 1;
                let name = self.ident()?;
                if name.is_empty() {
                    return Err(SelectorError::Empty { index: start });
                }
                Ok(SelectorNode::new(SelectorNodeKind::Class, name, start))
            }
            '#' if self.peek_at(1) != Some('{') => {
                self.pos += 1;
                let name = self.ident()?;
                if name.is_empty() {
                    return Err(SelectorError::Empty { index: start });
                }
                Ok(SelectorNode::new(SelectorNodeKind::Id, name, start))
            }
            '&' => {
                self.pos += 1;
                Ok(SelectorNode::new(SelectorNodeKind::Nesting, "&", start))
            }
            '*' => {
                self.pos += 1;
                self.namespace_suffix()?;
                Ok(SelectorNode::new(
                    SelectorNodeKind::Universal,
                    &self.input[start..self.pos],
                    start,
                ))
            }
            '[' => self.attribute(),
            ':' => self.pseudo(),
            '/' if self.peek_at(1) == Some('*') => self.comment(),
            '%' => {
                self.pos += 1;
                self.ident()?;
                Ok(SelectorNode::new(
                    SelectorNodeKind::Tag,
                    &self.input[start..self.pos],
                    start,
                ))
            }
            _ if self.at_ident() => {
                self.ident()?;
                self.namespace_suffix()?;
                Ok(SelectorNode::new(
                    SelectorNodeKind::Tag,
                    &self.input[start..self.pos],
                    start,
                ))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn at_ident(&self) -> bool {
        match self.peek() {
            Some(c) if is_ident_char(c) || c == '\\' => true,
            Some('#' | '@' | '$') => self.peek_at(1) == Some('{'),
            _ => false,
        }
    }

    /// Consumes an identifier, including escapes and `#{}` / `@{}` / `${}`
    /// interpolations, and returns it.
    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    self.bump();
                }
                Some('\\') => {
                    self.pos += 1;
                    self.bump();
                }
                Some('#' | '@' | '$') if self.peek_at(1) == Some('{') => {
                    self.interpolation()?;
                }
                _ => break,
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn interpolation(&mut self) -> Result<(), SelectorError> {
        let start = self.pos;
        self.pos += 2;
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::Unterminated {
            what: "interpolation",
            index: start,
        })
    }

    fn namespace_suffix(&mut self) -> Result<(), SelectorError> {
        if self.peek() == Some('|') && self.peek_at(1) != Some('|') {
            self.pos += 1;
            if self.peek() == Some('*') {
                self.pos += 1;
            } else if self.ident()?.is_empty() {
                return Err(self.unexpected());
            }
        }
        Ok(())
    }

    fn attribute(&mut self) -> Result<SelectorNode, SelectorError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.bump() {
            match c {
                ']' => {
                    let value = &self.input[start + 1..self.pos - 1];
                    return Ok(SelectorNode::new(SelectorNodeKind::Attribute, value, start));
                }
                '"' | '\'' => self.skip_string(c, self.pos - 1)?,
                '\\' => {
                    self.bump();
                }
                _ => {}
            }
        }
        Err(SelectorError::Unterminated {
            what: "attribute selector",
            index: start,
        })
    }

    fn skip_string(&mut self, quote: char, start: usize) -> Result<(), SelectorError> {
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return Ok(());
            }
        }
        Err(SelectorError::Unterminated {
            what: "string",
            index: start,
        })
    }

    fn comment(&mut self) -> Result<SelectorNode, SelectorError> {
        let start = self.pos;
        match self.input[start + 2..].find("*/") {
            Some(end) => {
                self.pos = start + 2 + end + 2;
                Ok(SelectorNode::new(
                    SelectorNodeKind::Comment,
                    &self.input[start..self.pos],
                    start,
                ))
            }
            None => Err(SelectorError::Unterminated {
                what: "comment",
                index: start,
            }),
        }
    }

    fn pseudo(&mut self) -> Result<SelectorNode, SelectorError> {
        let start = self.pos;
        self.pos += 1;
        let double = self.peek() == Some(':');
        if double {
            self.pos += 1;
        }
        let name = self.ident()?;
        if name.is_empty() {
            return Err(SelectorError::Empty { index: start });
        }
        let lower = name.to_ascii_lowercase();
        let kind = if double || LEGACY_PSEUDO_ELEMENTS.contains(&lower.as_str()) {
            SelectorNodeKind::PseudoElement
        } else {
            SelectorNodeKind::PseudoClass
        };

        if self.peek() != Some('(') {
            return Ok(SelectorNode::new(kind, &self.input[start..self.pos], start));
        }

        let open = self.pos;
        let close = self.matching_paren(open)?;
        let args = &self.input[open + 1..close];
        self.pos = close + 1;

        let takes_selectors = kind == SelectorNodeKind::PseudoClass
            && SELECTOR_PSEUDOS.contains(&lower.as_str())
            && !args.trim().is_empty();
        if !takes_selectors {
            return Ok(SelectorNode::new(kind, &self.input[start..self.pos], start));
        }

        let mut node = SelectorNode::new(kind, &self.input[start..open], start);
        node.children = Parser::new(args).parse_list().map_err(|e| shift_error(e, open + 1))?;
        Ok(node)
    }

    /// Finds the `)` matching the `(` at `open`.
    fn matching_paren(&self, open: usize) -> Result<usize, SelectorError> {
        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, c) in self.input[open..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match (quote, c) {
                (_, '\\') => escaped = true,
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(open + i);
                    }
                }
                _ => {}
            }
        }
        Err(SelectorError::Unterminated {
            what: "parenthesis",
            index: open,
        })
    }
}

fn shift_error(e: SelectorError, by: usize) -> SelectorError {
    match e {
        SelectorError::Unexpected { found, index } => SelectorError::Unexpected {
            found,
            index: index + by,
        },
        SelectorError::Unterminated { what, index } => SelectorError::Unterminated {
            what,
            index: index + by,
        },
        SelectorError::Empty { index } => SelectorError::Empty { index: index + by },
        SelectorError::DoubleCombinator { index } => {
            SelectorError::DoubleCombinator { index: index + by }
        }
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::super::node::stringify;
    use super::*;

    fn kinds(group: &SelectorNode) -> Vec<SelectorNodeKind> {
        group.children.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn compound_and_combinator() {
        let groups = parse_selector(".a.b.c:hover > d");
        assert_eq!(groups.len(), 1);
        assert_eq!(
            kinds(&groups[0]),
            vec![
                SelectorNodeKind::Class,
                SelectorNodeKind::Class,
                SelectorNodeKind::Class,
                SelectorNodeKind::PseudoClass,
                SelectorNodeKind::Combinator,
                SelectorNodeKind::Tag,
            ]
        );
        let combinator = &groups[0].children[4];
        assert_eq!(combinator.value, ">");
        assert_eq!(combinator.source_index, 13);
        assert_eq!(groups[0].children[5].source_index, 15);
    }

    #[test]
    fn values_strip_syntax_sugar() {
        let groups = parse_selector("#main.card[data-x=\"1\"]::before");
        let values: Vec<&str> = groups[0].children.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["main", "card", "data-x=\"1\"", "::before"]);
    }

    #[test]
    fn descendant_combinator_keeps_whitespace() {
        let groups = parse_selector(".a \n .b");
        let combinator = &groups[0].children[1];
        assert!(combinator.is_combinator());
        assert_eq!(combinator.value, " \n ");
        assert_eq!(combinator.source_index, 2);
    }

    #[test]
    fn selector_list_groups() {
        let groups = parse_selector(".a, .b");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].source_index, 4);
        assert_eq!(groups[1].spaces.before, " ");
        assert_eq!(groups[1].children[0].source_index, 4);
    }

    #[test]
    fn pseudo_arguments_are_relative() {
        let groups = parse_selector(".x:is(.a, .b)");
        let pseudo = &groups[0].children[1];
        assert_eq!(pseudo.value, ":is");
        assert_eq!(pseudo.source_index, 2);
        assert_eq!(pseudo.children.len(), 2);
        assert_eq!(pseudo.children[0].children[0].source_index, 0);
        assert_eq!(pseudo.children[1].children[0].source_index, 4);
    }

    #[test]
    fn non_selector_arguments_stay_verbatim() {
        let groups = parse_selector("li:nth-child(2n + 1)");
        let pseudo = &groups[0].children[1];
        assert_eq!(pseudo.value, ":nth-child(2n + 1)");
        assert!(pseudo.children.is_empty());
    }

    #[test]
    fn nesting_marker_and_suffix() {
        let groups = parse_selector("&__title");
        assert_eq!(
            kinds(&groups[0]),
            vec![SelectorNodeKind::Nesting, SelectorNodeKind::Tag]
        );
        assert_eq!(groups[0].children[1].value, "__title");
    }

    #[test]
    fn interpolation_stays_in_identifier() {
        let groups = parse_selector(".block-#{$name} .x");
        assert_eq!(groups[0].children[0].value, "block-#{$name}");
    }

    #[test]
    fn malformed_input_yields_empty_list() {
        for input in [".a,,.b", ".", "[x", ":is(.a", ".a > > .b", ".a )", "/* open"] {
            assert!(parse_selector(input).is_empty(), "{input}");
        }
        assert!(parse_selector("   ").is_empty());
    }

    #[test]
    fn error_positions() {
        let err = try_parse_selector(".a:is(.b,,.c)").unwrap_err();
        assert_eq!(err, SelectorError::Empty { index: 9 });
    }

    #[test]
    fn round_trip_is_lossless() {
        for input in [
            ".a.b.c:hover > d",
            ".a, .b",
            "  .a  ,\n  .b  ",
            ".x:is( .a , .b ) ~ .y",
            "a[href='x,y']::after",
            ".a /* note */ .b",
            "&__item + &--active",
            "svg|circle || *|*",
            ":not(.a:not(.b))",
            "%placeholder.c",
        ] {
            let groups = parse_selector(input);
            assert!(!groups.is_empty(), "{input}");
            assert_eq!(stringify(&groups).trim(), input.trim());
        }
    }
}

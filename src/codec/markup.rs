//! Permissive HTML tokenizer and tree builder.
//!
//! Bookmark files are not XML: `<DT>` and `<p>` are never closed, tag and attribute names come in
//! any case, and attribute values may be unquoted. Browsers rely on the HTML tree construction
//! rules to turn that into a nested list, so [`Dom::parse`] reproduces the subset of those rules
//! the bookmark dialects depend on:
//!
//! - `<dt>`/`<dd>` close an open `dt`/`dd` of the same list,
//! - block-level start tags close an open `p`,
//! - void elements never take children,
//! - an end tag closes up to its matching open element, or is ignored when none is open.
//!
//! Anything else is accepted as written. Parsing never fails.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is read verbatim up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "title", "textarea"];

/// Start tags that close an open `p` element.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "details", "dir", "div", "dl",
    "dt", "fieldset", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Elements that stop the search for an open `dt`, `dd` or `li` to close.
const LIST_BOUNDARIES: &[&str] = &[
    "blockquote", "body", "button", "dl", "fieldset", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "html", "li", "menu", "ol", "section", "table", "td", "th", "ul",
];

/// Elements that end the search for an open element matching an end tag.
const SCOPE_BOUNDARIES: &[&str] = &[
    "applet", "button", "caption", "html", "marquee", "object", "table", "td", "th",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

static CHARACTER_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([A-Za-z][A-Za-z0-9]{1,31}));")
        .expect("character reference pattern is valid")
});

/// Replace character references with the characters they name.
///
/// Unknown named references and invalid code points are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    CHARACTER_REFERENCE
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(decimal) = caps.get(1) {
                decimal.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                caps.get(3).and_then(|name| named_reference(name.as_str()))
            };
            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_reference(name: &str) -> Option<char> {
    match name {
        "amp" | "AMP" => Some('&'),
        "lt" | "LT" => Some('<'),
        "gt" | "GT" => Some('>'),
        "quot" | "QUOT" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('©'),
        "reg" => Some('®'),
        "hellip" => Some('…'),
        "ndash" => Some('–'),
        "mdash" => Some('—'),
        "laquo" => Some('«'),
        "raquo" => Some('»'),
        _ => None,
    }
}

/// Escape text for element content and double-quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

/// Splits markup into [`Token`]s. Tag and attribute names are lowercased.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    /// Set after a raw-text start tag: the next token is its verbatim content.
    raw_text_of: Option<String>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            pos: 0,
            raw_text_of: None,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Consume up to (not including) `stop`, or to the end of input.
    fn take_until(&mut self, stop: &str) -> &'a str {
        let rest = self.rest();
        let len = rest.find(stop).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, ch)| !pred(*ch))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// True when the input at the cursor opens a tag, comment or declaration.
    fn at_markup(&self) -> bool {
        let mut chars = self.rest().chars();
        if chars.next() != Some('<') {
            return false;
        }
        match chars.next() {
            Some('!') | Some('?') => true,
            Some('/') => chars.next().is_some_and(|ch| ch.is_ascii_alphabetic()),
            Some(ch) => ch.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn read_raw_text(&mut self, element: &str) -> Token {
        let rest = self.rest();
        let closing = format!("</{element}");
        let len = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        self.pos += len;
        let content = &rest[..len];
        match element {
            "title" | "textarea" => Token::Text(decode_entities(content)),
            _ => Token::Text(content.to_string()),
        }
    }

    fn read_text(&mut self) -> Token {
        let start = self.pos;
        // A '<' that does not open markup is ordinary text.
        self.bump();
        while !self.rest().is_empty() && !self.at_markup() {
            self.take_until("<");
            if !self.rest().is_empty() && !self.at_markup() {
                self.bump();
            }
        }
        Token::Text(decode_entities(&self.input[start..self.pos]))
    }

    fn read_declaration(&mut self) -> Token {
        if self.rest().starts_with("<!--") {
            self.pos += 4;
            let body = self.take_until("-->");
            self.pos = (self.pos + 3).min(self.input.len());
            return Token::Comment(body.to_string());
        }
        self.pos += 2;
        let body = self.take_until(">");
        self.bump();
        Token::Doctype(body.trim().to_string())
    }

    fn read_end_tag(&mut self) -> Token {
        self.pos += 2;
        let name = self
            .take_while(|ch| !ch.is_whitespace() && ch != '>' && ch != '/')
            .to_ascii_lowercase();
        self.take_until(">");
        self.bump();
        Token::EndTag { name }
    }

    fn read_start_tag(&mut self) -> Token {
        self.bump();
        let name = self
            .take_while(|ch| !ch.is_whitespace() && ch != '>' && ch != '/')
            .to_ascii_lowercase();
        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    break;
                }
                Some('/') => {
                    self.bump();
                    if self.peek() == Some('>') {
                        self.bump();
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let attr_name = self
                        .take_while(|ch| {
                            !ch.is_whitespace() && ch != '=' && ch != '>' && ch != '/'
                        })
                        .to_ascii_lowercase();
                    if attr_name.is_empty() {
                        // Stray '=' or similar; skip it so the loop always advances.
                        self.bump();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.bump();
                        self.skip_whitespace();
                        self.read_attribute_value()
                    } else {
                        String::new()
                    };
                    if !attributes.iter().any(|(existing, _)| *existing == attr_name) {
                        attributes.push((attr_name, value));
                    }
                }
            }
        }
        if !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.raw_text_of = Some(name.clone());
        }
        Token::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    fn read_attribute_value(&mut self) -> String {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let raw = self.take_until(if quote == '"' { "\"" } else { "'" });
                self.bump();
                decode_entities(raw)
            }
            _ => decode_entities(self.take_while(|ch| !ch.is_whitespace() && ch != '>')),
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(element) = self.raw_text_of.take() {
            if !self.rest().is_empty() {
                let token = self.read_raw_text(&element);
                if token != Token::Text(String::new()) {
                    return Some(token);
                }
            }
        }
        if self.rest().is_empty() {
            return None;
        }
        if !self.at_markup() {
            return Some(self.read_text());
        }
        let rest = self.rest();
        if rest.starts_with("<!") || rest.starts_with("<?") {
            Some(self.read_declaration())
        } else if rest.starts_with("</") {
            Some(self.read_end_tag())
        } else {
            Some(self.read_start_tag())
        }
    }
}

/// Index of a node inside a [`Dom`].
pub type DomIndex = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<DomIndex>,
    },
    Text(String),
}

/// A parsed document. Index [`Dom::DOCUMENT`] is a synthetic container for the top level.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

impl Dom {
    pub const DOCUMENT: DomIndex = 0;

    pub fn parse(input: &str) -> Dom {
        let mut dom = Dom {
            nodes: vec![DomNode::Element {
                tag: "#document".to_string(),
                attributes: Vec::new(),
                children: Vec::new(),
            }],
        };
        let mut open: Vec<DomIndex> = vec![Dom::DOCUMENT];
        for token in Tokenizer::new(input) {
            match token {
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => dom.open_element(&mut open, name, attributes, self_closing),
                Token::EndTag { name } => dom.close_element(&mut open, &name),
                Token::Text(text) => {
                    let parent = open.last().copied().unwrap_or(Dom::DOCUMENT);
                    dom.push_text(parent, text);
                }
                Token::Comment(_) | Token::Doctype(_) => {}
            }
        }
        dom
    }

    fn open_element(
        &mut self,
        open: &mut Vec<DomIndex>,
        tag: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    ) {
        match tag.as_str() {
            "dt" | "dd" => self.close_list_item(open, &["dt", "dd"]),
            "li" => self.close_list_item(open, &["li"]),
            "a" => {
                // Links do not nest; an unclosed one ends where the next begins.
                if let Some(depth) = self.find_open(open, &["a"], LIST_BOUNDARIES) {
                    open.truncate(depth);
                }
            }
            _ => {}
        }
        if CLOSES_PARAGRAPH.contains(&tag.as_str()) {
            if let Some(depth) = self.find_open(open, &["p"], SCOPE_BOUNDARIES) {
                open.truncate(depth);
            }
        }
        if HEADINGS.contains(&tag.as_str())
            && open
                .last()
                .and_then(|top| self.tag(*top))
                .is_some_and(|top| HEADINGS.contains(&top))
        {
            open.pop();
        }

        let parent = open.last().copied().unwrap_or(Dom::DOCUMENT);
        let is_void = self_closing || VOID_ELEMENTS.contains(&tag.as_str());
        let index = self.nodes.len();
        self.nodes.push(DomNode::Element {
            tag,
            attributes,
            children: Vec::new(),
        });
        self.push_child(parent, index);
        if !is_void {
            open.push(index);
        }
    }

    fn close_list_item(&self, open: &mut Vec<DomIndex>, items: &[&str]) {
        if let Some(depth) = self.find_open(open, items, LIST_BOUNDARIES) {
            open.truncate(depth);
        }
    }

    fn close_element(&self, open: &mut Vec<DomIndex>, tag: &str) {
        let targets: &[&str] = if HEADINGS.contains(&tag) {
            HEADINGS
        } else {
            &[tag]
        };
        // The document container is never closed.
        if let Some(depth) = self
            .find_open(open, targets, SCOPE_BOUNDARIES)
            .filter(|depth| *depth > 0)
        {
            open.truncate(depth);
        }
    }

    /// Stack depth of the innermost open element named in `targets`, searching down from the
    /// current node and giving up at any element named in `boundaries`.
    fn find_open(
        &self,
        open: &[DomIndex],
        targets: &[&str],
        boundaries: &[&str],
    ) -> Option<usize> {
        for (depth, index) in open.iter().enumerate().rev() {
            let tag = self.tag(*index)?;
            if targets.contains(&tag) {
                return Some(depth);
            }
            if boundaries.contains(&tag) {
                return None;
            }
        }
        None
    }

    fn push_child(&mut self, parent: DomIndex, child: DomIndex) {
        if let Some(DomNode::Element { children, .. }) = self.nodes.get_mut(parent) {
            children.push(child);
        }
    }

    fn push_text(&mut self, parent: DomIndex, text: String) {
        let last = self.children(parent).last().copied();
        if let Some(DomNode::Text(existing)) = last.and_then(|idx| self.nodes.get_mut(idx)) {
            existing.push_str(&text);
            return;
        }
        let index = self.nodes.len();
        self.nodes.push(DomNode::Text(text));
        self.push_child(parent, index);
    }

    pub fn get(&self, index: DomIndex) -> Option<&DomNode> {
        self.nodes.get(index)
    }

    /// Lowercased tag name, `None` for text nodes.
    pub fn tag(&self, index: DomIndex) -> Option<&str> {
        match self.nodes.get(index)? {
            DomNode::Element { tag, .. } => Some(tag),
            DomNode::Text(_) => None,
        }
    }

    pub fn children(&self, index: DomIndex) -> &[DomIndex] {
        match self.nodes.get(index) {
            Some(DomNode::Element { children, .. }) => children,
            _ => &[],
        }
    }

    /// Child elements, skipping text.
    pub fn element_children(&self, index: DomIndex) -> Vec<DomIndex> {
        self.children(index)
            .iter()
            .copied()
            .filter(|child| self.tag(*child).is_some())
            .collect()
    }

    /// Attribute value by case-insensitive name.
    pub fn attribute(&self, index: DomIndex, name: &str) -> Option<&str> {
        match self.nodes.get(index)? {
            DomNode::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            DomNode::Text(_) => None,
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, index: DomIndex) -> String {
        let mut text = String::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            match self.nodes.get(current) {
                Some(DomNode::Text(content)) => text.push_str(content),
                Some(DomNode::Element { children, .. }) => {
                    stack.extend(children.iter().rev().copied())
                }
                None => {}
            }
        }
        text
    }

    /// First descendant of `index` (document order) with tag `tag`, not looking inside
    /// elements named in `skip`.
    pub fn find_descendant(&self, index: DomIndex, tag: &str, skip: &[&str]) -> Option<DomIndex> {
        let mut stack: Vec<DomIndex> = self.children(index).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(current_tag) = self.tag(current) else {
                continue;
            };
            if current_tag == tag {
                return Some(current);
            }
            if !skip.contains(&current_tag) {
                stack.extend(self.children(current).iter().rev().copied());
            }
        }
        None
    }

    /// Every element with tag `tag` in document order.
    pub fn find_all(&self, tag: &str) -> Vec<DomIndex> {
        let mut found = Vec::new();
        let mut stack = vec![Dom::DOCUMENT];
        while let Some(current) = stack.pop() {
            if self.tag(current) == Some(tag) {
                found.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        found
    }
}

use std::{
    fmt,
    hash::{Hash, Hasher},
};

///
/// LikeAffix
///
/// Wildcard decoration applied to a text argument before rendering
/// (`{0%}`, `{%0}`, `{%0%}`).
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LikeAffix {
    None,
    Prefix,
    Suffix,
    Both,
}

impl LikeAffix {
    /// Decorate an already-escaped text value.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::None => text.to_string(),
            Self::Prefix => format!("%{text}"),
            Self::Suffix => format!("{text}%"),
            Self::Both => format!("%{text}%"),
        }
    }
}

///
/// Element
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Element {
    Text(String),
    Arg {
        index: usize,
        affix: LikeAffix,
        /// Argument sits inside call parentheses or a comma list, so it never
        /// needs extra grouping.
        enclosed: bool,
    },
}

///
/// Template
///
/// Parsed rendering pattern with `{n}` argument slots. Text that is not a
/// well-formed slot is kept verbatim, so parsing never fails.
///

#[derive(Clone)]
pub struct Template {
    pattern: String,
    elements: Vec<Element>,
}

impl Template {
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let elements = parse(&pattern);

        Self { pattern, elements }
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Highest referenced argument index plus one.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Arg { index, .. } => Some(index + 1),
                Element::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Same template with every newline replaced by a single space.
    #[must_use]
    pub fn single_line(&self) -> Self {
        Self::new(self.pattern.replace('\n', " "))
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Template({:?})", self.pattern)
    }
}

// ----------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------

fn parse(pattern: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut text = String::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let slot = after
            .find('}')
            .and_then(|close| parse_slot(&after[..close]).map(|slot| (slot, close)));

        match slot {
            Some(((index, affix), close)) => {
                if !text.is_empty() {
                    elements.push(Element::Text(std::mem::take(&mut text)));
                }
                elements.push(Element::Arg {
                    index,
                    affix,
                    enclosed: false,
                });
                rest = &after[close + 1..];
            }
            None => {
                text.push('{');
                rest = after;
            }
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        elements.push(Element::Text(text));
    }

    mark_enclosed(&mut elements);
    elements
}

fn parse_slot(body: &str) -> Option<(usize, LikeAffix)> {
    let (prefix, body) = match body.strip_prefix('%') {
        Some(stripped) => (true, stripped),
        None => (false, body),
    };
    let (suffix, body) = match body.strip_suffix('%') {
        Some(stripped) => (true, stripped),
        None => (false, body),
    };

    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let index = body.parse().ok()?;
    let affix = match (prefix, suffix) {
        (false, false) => LikeAffix::None,
        (true, false) => LikeAffix::Prefix,
        (false, true) => LikeAffix::Suffix,
        (true, true) => LikeAffix::Both,
    };

    Some((index, affix))
}

fn mark_enclosed(elements: &mut [Element]) {
    for i in 0..elements.len() {
        let opens = i
            .checked_sub(1)
            .and_then(|prev| text_of(&elements[prev]))
            .is_some_and(|t| {
                let t = t.trim_end();
                t.ends_with('(') || t.ends_with(',')
            });
        let closes = elements.get(i + 1).and_then(text_of).is_some_and(|t| {
            let t = t.trim_start();
            t.starts_with(')') || t.starts_with(',')
        });

        if let Element::Arg { enclosed, .. } = &mut elements[i] {
            *enclosed = opens && closes;
        }
    }
}

fn text_of(element: &Element) -> Option<&str> {
    match element {
        Element::Text(t) => Some(t),
        Element::Arg { .. } => None,
    }
}

//! Minimal CSS text parsing for `<style>` content and `style` attributes

use indexmap::IndexMap;

/// Property name -> value, in declaration order
pub type Declarations = IndexMap<String, String>;

/// Selector key -> declarations, in merge order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRules {
    rules: IndexMap<String, Declarations>,
}

impl StyleRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stylesheet text.
    ///
    /// Comma-separated selector lists register the same declarations under
    /// every selector. At-rule blocks are skipped entirely.
    pub fn parse(css: &str) -> Self {
        let css = strip_comments(css);
        let mut rules = StyleRules::new();
        let mut rest = css.as_str();

        while let Some(open) = rest.find('{') {
            let prelude = rest[..open].trim();
            let Some(close) = matching_brace(&rest[open..]) else {
                break;
            };
            let body = &rest[open + 1..open + close];
            rest = &rest[open + close + 1..];

            if prelude.starts_with('@') {
                continue;
            }

            let declarations = parse_declarations(body);
            for selector in prelude.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                rules.insert(selector, declarations.clone());
            }
        }

        rules
    }

    /// Register declarations for a selector, replacing any previous set
    pub fn insert(&mut self, selector: impl Into<String>, declarations: Declarations) {
        self.rules.insert(selector.into(), declarations);
    }

    /// Merge another rule set in; its selectors win on collision
    pub fn merge(&mut self, other: StyleRules) {
        for (selector, declarations) in other.rules {
            self.rules.insert(selector, declarations);
        }
    }

    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.rules.get(selector)
    }

    /// Rules in merge order; iterate in reverse for last-wins lookups
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &Declarations)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Parse `name: value; name: value` pairs
pub fn parse_declarations(input: &str) -> Declarations {
    input
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Serialize declarations back into `style` attribute form
pub fn format_declarations(declarations: &Declarations) -> String {
    declarations
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("; ")
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Offset of the brace closing the block opened at `block[0]`
fn matching_brace(block: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in block.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

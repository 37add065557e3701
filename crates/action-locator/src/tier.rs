//! Selector tier classification
//!
//! Tiers rank selectors by how stable they tend to be across UI changes:
//! 1. TestId - explicit test hooks (`data-testid`, `data-cy`, `testid=`)
//! 2. StableDataAttr - any other `data-*` attribute
//! 3. SemanticText - `text=`, `role=`, `:has-text(...)`, quoted text
//! 4. SimpleCss - id, attribute, tag and class selectors
//! 5. XPath - `xpath=` prefixed or `//` rooted expressions
//! 6. Icon - icon glyph selectors, never used for resolution

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static TEST_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)((^|[\[@\s])data-(testid|test-id|test|cy|qa)\b|^(internal:)?testid\s*=)"#)
        .expect("test-id pattern")
});

static DATA_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[\[@]\s*data-[a-z0-9_-]+").expect("data attribute pattern"));

static TEXT_ENGINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(internal:)?(text|role|label|placeholder|alt|title)\s*=\s*(?P<body>.+)$",
    )
    .expect("text engine pattern")
});

static TEXT_PSEUDO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i):(has-text|text|text-is|text-matches)\(\s*(?P<body>[^)]*)\)"#)
        .expect("text pseudo-class pattern")
});

static XPATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(xpath\s*=|\(*\.{0,2}//)").expect("xpath pattern"));

/// Icon class token, matched against one whole class name
static ICON_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(fa[srlbd]?|fa-[\w-]*|glyphicon(-[\w-]+)?|material-(icons|symbols)[\w-]*|mdi(-[\w-]+)?|bi(-[\w-]+)?|icons?|icon-[\w-]+|[\w-]+-icon)$",
    )
    .expect("icon class pattern")
});

/// `.name` class tokens; run on the selector with attribute values removed
static CLASS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(-?[A-Za-z_][\w-]*)").expect("class token pattern"));

/// `[class="..."]`, `[class~=...]`, `[class*='...']` and friends
static CLASS_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\[\s*class\s*[~*^$|]?=\s*["']?(?P<value>[^"'\]]*)"#)
        .expect("class attribute pattern")
});

/// `@class='...'` and `contains(@class, '...')` in XPath
static XPATH_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)@class\s*[,=]\s*["'](?P<value>[^"']*)["']"#).expect("xpath class pattern")
});

/// Glyph tags in element position; run on the selector with attribute values removed
static ICON_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|[\s>+~,(/])(svg|i|use|path)($|[\s.#\[:>+~,)/])").expect("icon tag pattern")
});

/// Locator tier, best first.
///
/// The derived ordering is the ranking order: a lower tier always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    /// Dedicated test hook attribute
    TestId,

    /// Other `data-*` attribute
    StableDataAttr,

    /// Text, role or label based selector
    SemanticText,

    /// Plain CSS (id/attribute/tag/class)
    SimpleCss,

    /// XPath expression
    XPath,

    /// Icon glyph; excluded from ranking
    Icon,
}

impl Tier {
    /// Classification precedence. The first tier whose pattern matches wins.
    pub const PRECEDENCE: [Tier; 6] = [
        Tier::TestId,
        Tier::StableDataAttr,
        Tier::SemanticText,
        Tier::SimpleCss,
        Tier::XPath,
        Tier::Icon,
    ];

    /// Classify a selector string into exactly one tier
    pub fn classify(selector: &str) -> Tier {
        Self::PRECEDENCE
            .iter()
            .copied()
            .find(|tier| tier.matches(selector))
            .unwrap_or(Tier::SimpleCss)
    }

    /// Whether the selector has this tier's syntactic shape.
    ///
    /// `SimpleCss` and `XPath` refuse icon glyph selectors so the icon
    /// heuristic only claims what no stable pattern matched first.
    pub fn matches(&self, selector: &str) -> bool {
        match self {
            Tier::TestId => TEST_ID_RE.is_match(selector),
            Tier::StableDataAttr => DATA_ATTR_RE.is_match(selector),
            Tier::SemanticText => semantic_text_of(selector).is_some(),
            Tier::SimpleCss => !is_xpath(selector) && !looks_like_icon(selector),
            Tier::XPath => is_xpath(selector) && !looks_like_icon(selector),
            Tier::Icon => looks_like_icon(selector),
        }
    }

    /// Whether candidates of this tier may be used for resolution
    pub fn is_rankable(&self) -> bool {
        !matches!(self, Tier::Icon)
    }

    /// Get tier name as string
    pub fn name(&self) -> &'static str {
        match self {
            Tier::TestId => "test-id",
            Tier::StableDataAttr => "data-attr",
            Tier::SemanticText => "semantic-text",
            Tier::SimpleCss => "css",
            Tier::XPath => "xpath",
            Tier::Icon => "icon",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extract the human-visible text a semantic selector targets.
///
/// Returns `None` when the selector carries no explicit text marker.
pub fn semantic_text_of(selector: &str) -> Option<String> {
    let trimmed = selector.trim();

    if let Some(caps) = TEXT_ENGINE_RE.captures(trimmed) {
        return Some(strip_quotes(&caps["body"]));
    }

    if let Some(caps) = TEXT_PSEUDO_RE.captures(trimmed) {
        return Some(strip_quotes(&caps["body"]));
    }

    if is_quoted(trimmed) {
        return Some(strip_quotes(trimmed));
    }

    None
}

fn is_xpath(selector: &str) -> bool {
    XPATH_RE.is_match(selector.trim_start())
}

/// Icon glyph by element tag or class name. Attribute values, quoted text
/// and pseudo-class arguments never count.
fn looks_like_icon(selector: &str) -> bool {
    let structure = strip_attribute_values(selector);
    if ICON_TAG_RE.is_match(&structure) {
        return true;
    }

    let css_classes = CLASS_TOKEN_RE
        .captures_iter(&structure)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect::<Vec<_>>();
    let attr_classes = CLASS_ATTR_RE
        .captures_iter(selector)
        .chain(XPATH_CLASS_RE.captures_iter(selector))
        .flat_map(|caps| {
            caps["value"]
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    css_classes
        .iter()
        .chain(attr_classes.iter())
        .any(|class| ICON_CLASS_RE.is_match(class))
}

/// Selector skeleton: bracket contents, quoted strings and the arguments of
/// functional pseudo-classes (`:not(...)`, `contains(...)`) are dropped, the
/// delimiters kept.
fn strip_attribute_values(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut quote: Option<char> = None;
    let mut brackets = 0usize;
    let mut call_parens = 0usize;

    for ch in selector.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
            continue;
        }

        if brackets > 0 {
            match ch {
                '[' => brackets += 1,
                ']' => {
                    brackets -= 1;
                    if brackets == 0 && call_parens == 0 {
                        out.push(']');
                    }
                }
                _ => {}
            }
            continue;
        }

        if call_parens > 0 {
            match ch {
                '(' => call_parens += 1,
                ')' => {
                    call_parens -= 1;
                    if call_parens == 0 {
                        out.push(')');
                    }
                }
                '[' => brackets += 1,
                _ => {}
            }
            continue;
        }

        match ch {
            '[' => {
                brackets = 1;
                out.push('[');
            }
            '(' if out.ends_with(|c: char| c.is_alphanumeric() || c == '-' || c == '_') => {
                call_parens = 1;
                out.push('(');
            }
            _ => out.push(ch),
        }
    }

    out
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

fn strip_quotes(value: &str) -> String {
    let value = value.trim();
    if is_quoted(value) {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

//! Font resources
//!
//! `INTER` is the body font, `LUSITANA` the heading font. Both are loaded
//! from the latin subset only and fall back to local faces while loading.

use serde::Serialize;

/// A named web font and its fallback stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontConfig {
    pub family: &'static str,
    /// `None` means the variable font's full weight range
    pub weight: Option<&'static str>,
    pub subsets: &'static [&'static str],
    pub fallback: &'static [&'static str],
}

pub const INTER: FontConfig = FontConfig {
    family: "Inter",
    weight: None,
    subsets: &["latin"],
    fallback: &["system-ui", "arial"],
};

pub const LUSITANA: FontConfig = FontConfig {
    family: "Lusitana",
    weight: Some("400"),
    subsets: &["latin"],
    fallback: &["serif"],
};

/// Generic CSS family keywords, which must stay unquoted
const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
    "ui-serif",
    "ui-sans-serif",
    "ui-monospace",
    "ui-rounded",
    "math",
    "emoji",
    "fangsong",
];

impl FontConfig {
    /// Value for a CSS `font-family` declaration
    pub fn css_font_family(&self) -> String {
        std::iter::once(self.family)
            .chain(self.fallback.iter().copied())
            .map(quote_family)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn includes_subset(&self, subset: &str) -> bool {
        self.subsets.contains(&subset)
    }
}

fn quote_family(name: &str) -> String {
    if GENERIC_FAMILIES.contains(&name) {
        name.to_string()
    } else {
        format!("'{}'", name)
    }
}

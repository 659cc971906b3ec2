//! Keyword substitution applied to submitted input before it becomes a
//! bubble's text.
//!
//! The engine treats substitution as a pure string rewrite. The built-in
//! implementation knows `{time}` and whatever dynamic keywords the host
//! registers; host-environment lookups (player position, weather, whatever
//! the embedding exposes) belong in the host's own `KeywordExpander`.

use std::collections::BTreeMap;

/// Pure string-rewrite collaborator.
pub trait KeywordExpander: Send + Sync {
    fn process(&self, text: &str) -> String;
}

/// Passthrough expander for hosts that opt out of substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullKeywords;

impl KeywordExpander for NullKeywords {
    fn process(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Case-insensitive `{keyword}` template replacement with a dynamic table.
#[derive(Debug, Clone, Default)]
pub struct TemplateKeywords {
    dynamic: BTreeMap<String, String>,
}

impl TemplateKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>, replacement: impl Into<String>) {
        self.dynamic.insert(keyword.into(), replacement.into());
    }

    pub fn remove_keyword(&mut self, keyword: &str) {
        self.dynamic.remove(keyword);
    }

    /// Human-readable keyword help, built-ins first.
    pub fn available_keywords(&self) -> Vec<String> {
        let mut out = vec!["{time} - current wall-clock time".to_owned()];
        out.extend(
            self.dynamic
                .iter()
                .map(|(keyword, replacement)| format!("{keyword} - {replacement}")),
        );
        out
    }
}

impl KeywordExpander for TemplateKeywords {
    fn process(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut processed = text.to_owned();
        if processed.to_lowercase().contains("{time}") {
            let now = chrono::Local::now().format("%H:%M:%S").to_string();
            processed = replace_ignore_case(&processed, "{time}", &now);
        }
        for (keyword, replacement) in &self.dynamic {
            processed = replace_ignore_case(&processed, keyword, replacement);
        }
        processed
    }
}

/// Replace every occurrence of `target` in `source`, matching
/// case-insensitively but preserving the rest of the string untouched.
fn replace_ignore_case(source: &str, target: &str, replacement: &str) -> String {
    if target.is_empty() {
        return source.to_owned();
    }
    let lower_source = source.to_lowercase();
    let lower_target = target.to_lowercase();
    // Lowercasing can change byte lengths for some scripts; fall back to the
    // exact-case path rather than splitting on misaligned indices.
    if lower_source.len() != source.len() {
        return source.replace(target, replacement);
    }

    let mut result = String::with_capacity(source.len());
    let mut last = 0;
    while let Some(found) = lower_source[last..].find(&lower_target) {
        let index = last + found;
        result.push_str(&source[last..index]);
        result.push_str(replacement);
        last = index + target.len();
    }
    result.push_str(&source[last..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_ignores_case() {
        assert_eq!(
            replace_ignore_case("Hello {NAME} and {name}", "{name}", "world"),
            "Hello world and world"
        );
    }

    #[test]
    fn replacement_preserves_surroundings() {
        assert_eq!(replace_ignore_case("a{x}b{X}c", "{x}", "-"), "a-b-c");
        assert_eq!(replace_ignore_case("no match here", "{x}", "-"), "no match here");
    }

    #[test]
    fn empty_target_is_identity() {
        assert_eq!(replace_ignore_case("abc", "", "zzz"), "abc");
    }

    #[test]
    fn dynamic_keywords_apply() {
        let mut kw = TemplateKeywords::new();
        kw.add_keyword("{greet}", "hello");
        assert_eq!(kw.process("say {GREET}!"), "say hello!");
        kw.remove_keyword("{greet}");
        assert_eq!(kw.process("say {GREET}!"), "say {GREET}!");
    }

    #[test]
    fn time_keyword_expands_to_clock() {
        let kw = TemplateKeywords::new();
        let out = kw.process("now: {time}");
        assert!(out.starts_with("now: "));
        assert_ne!(out, "now: {time}");
        // HH:MM:SS shape.
        let clock = &out["now: ".len()..];
        assert_eq!(clock.len(), 8);
        assert_eq!(clock.matches(':').count(), 2);
    }

    #[test]
    fn keyword_help_lists_builtins_first() {
        let mut kw = TemplateKeywords::new();
        kw.add_keyword("{who}", "the current user");
        let help = kw.available_keywords();
        assert!(help[0].starts_with("{time}"));
        assert!(help.iter().any(|line| line.starts_with("{who}")));
    }
}

//! Line-oriented extraction for text uploads.
//!
//! Each line is matched independently: a `Module:` declaration, a
//! `<label> at <number>` data pair, or a `<user> assigns <bot> with <N>
//! credits` intent. Anything else is ignored.
use crate::spec::{Intent, Spec, SpecKind};
use regex::Regex;

const MODULE_MARKER: &str = "Module:";

/// Compiled line patterns for text specs.
pub struct TextSpecParser {
    pair: Regex,
    intent: Regex,
}

impl Default for TextSpecParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSpecParser {
    pub fn new() -> Self {
        Self {
            pair: Regex::new(r"^(.+?) at ([0-9.]+)").expect("regex for data pairs"),
            intent: Regex::new(r"^(\w+) assigns (\w+) with ([0-9]+) credits")
                .expect("regex for credit assignments"),
        }
    }

    /// Parse `text` into a text spec. Never fails; malformed lines are skipped.
    pub fn parse(&self, text: &str) -> Spec {
        let mut module = None;
        let mut pairs = Vec::new();
        let mut intents = Vec::new();

        for line in text.lines() {
            if line.contains(MODULE_MARKER) {
                // Last declaration wins.
                module = line
                    .split(MODULE_MARKER)
                    .nth(1)
                    .map(|rest| rest.trim().to_string());
                continue;
            }
            let line = line.trim();
            if let Some(pair) = self.parse_pair(line) {
                pairs.push(pair);
            } else if let Some(intent) = self.parse_intent(line) {
                intents.push(intent);
            }
        }

        Spec {
            kind: SpecKind::Text,
            module,
            pairs,
            intents,
            raw: text.to_string(),
            language: None,
        }
    }

    fn parse_pair(&self, line: &str) -> Option<(String, f64)> {
        let caps = self.pair.captures(line)?;
        let label = caps.get(1)?.as_str().trim();
        if label.is_empty() {
            return None;
        }
        let value: f64 = caps.get(2)?.as_str().parse().ok()?;
        Some((label.to_string(), value))
    }

    fn parse_intent(&self, line: &str) -> Option<Intent> {
        let caps = self.intent.captures(line)?;
        let credits = caps.get(3)?.as_str().parse().ok()?;
        Some(Intent {
            user: caps.get(1)?.as_str().to_string(),
            bot: caps.get(2)?.as_str().to_string(),
            credits,
        })
    }
}

//! Fuzzy command search, the backend of a command palette
//!
//! Matches the query against each command's label, id and category using
//! nucleo's fuzzy matcher. Label hits weigh more than id hits, which weigh
//! more than category hits.

use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::command::{CommandRegistry, ExecutionResult};
use crate::keymap::KeyboardShortcut;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteMatch {
    pub command_id: String,
    pub label: String,
    pub category: String,
    pub shortcut: Option<KeyboardShortcut>,
    pub enabled: bool,
    pub score: u32,
}

impl PaletteMatch {
    /// Run the matched command
    pub fn execute(&self, registry: &CommandRegistry) -> ExecutionResult {
        registry.execute_command(&self.command_id)
    }
}

/// Reusable matcher state for one query
struct FuzzyQuery {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl FuzzyQuery {
    fn new(query: &str) -> Self {
        Self {
            pattern: Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    fn score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}

const LABEL_WEIGHT: u32 = 3;
const ID_WEIGHT: u32 = 2;
const CATEGORY_WEIGHT: u32 = 1;
const PREFIX_BONUS: u32 = 100;

/// Search all registered commands
///
/// An empty (or whitespace) query returns every command in registration
/// order with score 0. Otherwise results are sorted by descending score,
/// ties keeping registration order. Disabled commands are included with
/// `enabled == false`.
pub fn search(registry: &CommandRegistry, query: &str) -> Vec<PaletteMatch> {
    let query = query.trim();
    let commands = registry.all_commands();

    if query.is_empty() {
        return commands
            .into_iter()
            .map(|cmd| PaletteMatch {
                enabled: registry.can_execute(&cmd.id),
                command_id: cmd.id,
                label: cmd.label,
                category: cmd.category,
                shortcut: cmd.shortcut,
                score: 0,
            })
            .collect();
    }

    let mut fuzzy = FuzzyQuery::new(query);
    let query_lower = query.to_lowercase();

    let mut matches: Vec<PaletteMatch> = commands
        .into_iter()
        .filter_map(|cmd| {
            let label = fuzzy.score(&cmd.label).map(|s| s * LABEL_WEIGHT);
            let id = fuzzy.score(&cmd.id).map(|s| s * ID_WEIGHT);
            let category = fuzzy.score(&cmd.category).map(|s| s * CATEGORY_WEIGHT);
            let mut score = [label, id, category].into_iter().flatten().max()?;

            if cmd.label.to_lowercase().starts_with(&query_lower) {
                score += PREFIX_BONUS;
            }

            Some(PaletteMatch {
                enabled: registry.can_execute(&cmd.id),
                command_id: cmd.id,
                label: cmd.label,
                category: cmd.category,
                shortcut: cmd.shortcut,
                score,
            })
        })
        .collect();

    // Stable: equal scores keep registration order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    tracing::trace!("Palette query '{}' matched {} commands", query, matches.len());
    matches
}

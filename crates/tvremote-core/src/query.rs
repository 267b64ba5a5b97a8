//! Smart query parsing: free text → `(app, search term)`.
//!
//! ```text
//! "play stranger things on netflix"  →  { app: "Netflix", search: "stranger things" }
//! "search for cat videos"            →  { app: "YouTube", search: "cat videos" }
//! ```
//!
//! The parser is pure and total: every input (including the empty string)
//! produces a result.  Matching works on whitespace-separated words, so an app
//! name only matches as a whole word (`"hulu"`, not `"hulugan"`).
//!
//! Steps:
//!
//! 1. Lowercase the query and split it into words, trimming punctuation.
//! 2. Strip leading command verbs ([`STOP_PHRASES`]), so the `on` of
//!    `"put on"` is never taken for a connector.
//! 3. Walk [`APP_PATTERNS`] in priority order; the first trigger phrase found
//!    picks the app.  The trigger (and an `on`/`in` right before it) is removed.
//! 4. Strip leading command verbs again from what is left
//!    (`"netflix play wednesday"`).
//! 5. No trigger anywhere → the default app.

use serde::{Deserialize, Serialize};

/// App used when the query names none.
pub const DEFAULT_APP: &str = "YouTube";

/// Result of [`parse_smart_query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartQuery {
    /// Canonical app name as it appears in the app table.
    pub app: String,
    /// What to search for inside the app.  May be empty.
    pub search: String,
}

struct AppPattern {
    app: &'static str,
    /// Longer phrases first so `"disney plus"` wins over `"disney"`.
    triggers: &'static [&'static str],
}

/// Ordered by priority: the first app with a matching trigger wins.
const APP_PATTERNS: &[AppPattern] = &[
    AppPattern {
        app: "Netflix",
        triggers: &["netflix"],
    },
    AppPattern {
        app: "Disney+",
        triggers: &["disney plus", "disney+", "disney"],
    },
    AppPattern {
        app: "Hulu",
        triggers: &["hulu"],
    },
    AppPattern {
        app: "HBO Max",
        triggers: &["hbo max", "hbomax", "hbo"],
    },
    AppPattern {
        app: "Prime Video",
        triggers: &["prime video", "amazon prime", "prime", "amazon"],
    },
    AppPattern {
        app: "YouTube",
        triggers: &["youtube"],
    },
];

/// Command verbs stripped from the front of the search term.
const STOP_PHRASES: &[&str] = &[
    "search for",
    "look up",
    "put on",
    "play",
    "watch",
    "find",
    "search",
];

/// Words dropped when they sit directly before an app trigger ("… on netflix").
const CONNECTORS: &[&str] = &["on", "in"];

/// Classifies `query` into an app and a search term.
pub fn parse_smart_query(query: &str) -> SmartQuery {
    let mut words: Vec<String> = query
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();
    drop_stop_phrases(&mut words);

    for pattern in APP_PATTERNS {
        for trigger in pattern.triggers {
            let phrase: Vec<&str> = trigger.split(' ').collect();
            if let Some(start) = find_phrase(&words, &phrase) {
                let mut rest = words.clone();
                let mut from = start;
                if from > 0 && CONNECTORS.contains(&rest[from - 1].as_str()) {
                    from -= 1;
                }
                rest.drain(from..start + phrase.len());
                drop_stop_phrases(&mut rest);
                return SmartQuery {
                    app: pattern.app.to_string(),
                    search: rest.join(" "),
                };
            }
        }
    }

    SmartQuery {
        app: DEFAULT_APP.to_string(),
        search: words.join(" "),
    }
}

fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '\'')
        .to_lowercase()
}

fn find_phrase(words: &[String], phrase: &[&str]) -> Option<usize> {
    if phrase.is_empty() || words.len() < phrase.len() {
        return None;
    }
    (0..=words.len() - phrase.len()).find(|&i| {
        words[i..i + phrase.len()]
            .iter()
            .zip(phrase)
            .all(|(w, p)| w == p)
    })
}

fn drop_stop_phrases(words: &mut Vec<String>) {
    'outer: loop {
        for stop in STOP_PHRASES {
            let phrase: Vec<&str> = stop.split(' ').collect();
            if find_phrase(&words, &phrase) == Some(0) {
                words.drain(..phrase.len());
                continue 'outer;
            }
        }
        break;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

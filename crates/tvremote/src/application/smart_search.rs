//! Smart search: one free-text request → content playing on the TV.
//!
//! ```text
//! query ──parse──▶ (app, search)
//!                     │
//!      YouTube ───────┼──▶ video search ──▶ cast first hit ──┐
//!      other app ─────┴──▶ cast search term ─────────────────┤
//!                                                            ▼
//!                                              success? done : fallback script
//! ```
//!
//! The fallback script drives the TV's own search screen with key presses
//! and fixed pauses.  It is a list of named [`FallbackStep`]s run in order; a
//! failed step is logged and the script carries on, and a cancellation flag
//! is checked before each step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tvremote_core::keymap::{CONFIRM_KEY, DOWN_KEY, SEARCH_KEY};
use tvremote_core::query::DEFAULT_APP;
use tvremote_core::{parse_smart_query, RemoteError, VideoResult};

use super::commands::RemoteControl;

/// Finds videos for a search term.  Never fails: problems yield no results.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, term: &str) -> Vec<VideoResult>;
}

/// Result of [`SmartSearchEngine::smart_search`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartSearchOutcome {
    pub success: bool,
    pub app: String,
    pub search: String,
    /// Error code from the `RemoteError` taxonomy (`"NotConnected"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable text for `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What one fallback step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackAction {
    Key(&'static str),
    /// Types the search term.
    Text,
}

/// One step of the fallback script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackStep {
    pub name: &'static str,
    pub action: FallbackAction,
    /// Pause after this step, giving the TV's UI time to catch up.
    pub pause: Duration,
}

/// Open search, type, submit, move to the first result, open it.
pub const FALLBACK_SCRIPT: [FallbackStep; 5] = [
    FallbackStep {
        name: "open-search",
        action: FallbackAction::Key(SEARCH_KEY),
        pause: Duration::from_secs(3),
    },
    FallbackStep {
        name: "type-term",
        action: FallbackAction::Text,
        pause: Duration::from_secs(1),
    },
    FallbackStep {
        name: "submit",
        action: FallbackAction::Key(CONFIRM_KEY),
        pause: Duration::from_secs(3),
    },
    FallbackStep {
        name: "first-result",
        action: FallbackAction::Key(DOWN_KEY),
        pause: Duration::from_millis(500),
    },
    FallbackStep {
        name: "open-result",
        action: FallbackAction::Key(CONFIRM_KEY),
        pause: Duration::ZERO,
    },
];

/// Runs smart searches against one remote.
pub struct SmartSearchEngine {
    remote: Arc<dyn RemoteControl>,
    videos: Arc<dyn VideoSearch>,
    cancel: Arc<AtomicBool>,
}

impl SmartSearchEngine {
    pub fn new(remote: Arc<dyn RemoteControl>, videos: Arc<dyn VideoSearch>) -> Self {
        Self {
            remote,
            videos,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the flag stops a running fallback script before its next step.
    /// It is cleared once observed.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Plays whatever `query` asks for.
    ///
    /// Fails only when there is no live channel; once connected the outcome
    /// is always successful, since the fallback script cannot observe
    /// whether it found anything.
    pub async fn smart_search(&self, query: &str) -> SmartSearchOutcome {
        let parsed = parse_smart_query(query);
        let search = if parsed.search.is_empty() {
            query.trim().to_string()
        } else {
            parsed.search
        };
        let app = parsed.app;

        if !self.remote.is_live().await {
            let error = RemoteError::NotConnected;
            return SmartSearchOutcome {
                success: false,
                app,
                search,
                error: Some(error.code().to_string()),
                message: Some(error.to_string()),
            };
        }

        info!("smart search: {search:?} in {app}");
        if self.try_direct(&app, &search).await {
            return Self::succeeded(app, search);
        }

        self.run_fallback(&search).await;
        Self::succeeded(app, search)
    }

    /// Deep-link attempt.  `true` once something was cast.
    async fn try_direct(&self, app: &str, search: &str) -> bool {
        let result = if app == DEFAULT_APP {
            let results = self.videos.search(search).await;
            let Some(first) = results.first() else {
                debug!("no video results for {search:?}");
                return false;
            };
            self.remote
                .cast_to_tv(app, &first.id, Some(&first.id))
                .await
        } else {
            self.remote.cast_to_tv(app, search, None).await
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("direct cast to {app} failed: {e}");
                false
            }
        }
    }

    /// Runs [`FALLBACK_SCRIPT`].  Returns how many steps were dispatched.
    async fn run_fallback(&self, search: &str) -> usize {
        info!("falling back to on-screen search for {search:?}");
        let mut dispatched = 0;

        for step in &FALLBACK_SCRIPT {
            if self.cancel.swap(false, Ordering::SeqCst) {
                info!("fallback cancelled before {}", step.name);
                break;
            }

            let result = match step.action {
                FallbackAction::Key(code) => self.remote.send_key(code).await.map(|_| ()),
                FallbackAction::Text => self.remote.send_text(search).await,
            };
            match result {
                Ok(()) => debug!("fallback step {} sent", step.name),
                Err(e) => warn!("fallback step {} failed: {e}", step.name),
            }
            dispatched += 1;

            if !step.pause.is_zero() {
                tokio::time::sleep(step.pause).await;
            }
        }
        dispatched
    }

    fn succeeded(app: String, search: String) -> SmartSearchOutcome {
        SmartSearchOutcome {
            success: true,
            app,
            search,
            error: None,
            message: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

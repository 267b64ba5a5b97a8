//! Application name → application id table.
//!
//! Two lookups with deliberately different strictness:
//!
//! - [`resolve_launch_id`] (plain app launch) accepts a purely numeric name as
//!   a raw application id.
//! - [`resolve_app_id`] (deep-link casting) accepts table names only.

use crate::error::RemoteError;

/// One row of the app table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppEntry {
    pub name: &'static str,
    pub id: &'static str,
}

/// Applications the controller can launch and cast to by name.
pub const KNOWN_APPS: &[AppEntry] = &[
    AppEntry { name: "Netflix", id: "3201907018807" },
    AppEntry { name: "YouTube", id: "111299001912" },
    AppEntry { name: "Disney+", id: "3201901017640" },
    AppEntry { name: "Hulu", id: "3201601007625" },
    AppEntry { name: "HBO Max", id: "3201601007230" },
    AppEntry { name: "Prime Video", id: "3201910019365" },
    AppEntry { name: "Apple TV", id: "3201807016597" },
    AppEntry { name: "Spotify", id: "3201606009684" },
    AppEntry { name: "Plex", id: "3201512006963" },
];

/// Looks up `name` in the table (case-insensitive).  No raw-id fallback.
///
/// # Errors
///
/// Returns [`RemoteError::UnknownApp`] for any name not in [`KNOWN_APPS`],
/// numeric or not.
pub fn resolve_app_id(name: &str) -> Result<&'static str, RemoteError> {
    let trimmed = name.trim();
    KNOWN_APPS
        .iter()
        .find(|app| app.name.eq_ignore_ascii_case(trimmed))
        .map(|app| app.id)
        .ok_or_else(|| RemoteError::UnknownApp(trimmed.to_string()))
}

/// Looks up `name` for a plain launch, accepting a purely numeric raw id.
///
/// # Errors
///
/// Returns [`RemoteError::UnknownApp`] when the name is neither in the table
/// nor all ASCII digits.
pub fn resolve_launch_id(name: &str) -> Result<String, RemoteError> {
    match resolve_app_id(name) {
        Ok(id) => Ok(id.to_string()),
        Err(err) => {
            let trimmed = name.trim();
            if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
                Ok(trimmed.to_string())
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_app_id_is_case_insensitive() {
        assert_eq!(resolve_app_id("netflix"), Ok("3201907018807"));
        assert_eq!(resolve_app_id("YOUTUBE"), Ok("111299001912"));
    }

    #[test]
    fn test_resolve_app_id_rejects_numeric_names() {
        assert_eq!(
            resolve_app_id("3201907018807"),
            Err(RemoteError::UnknownApp("3201907018807".to_string()))
        );
    }

    #[test]
    fn test_resolve_launch_id_accepts_numeric_raw_id() {
        assert_eq!(resolve_launch_id("3201234567890").unwrap(), "3201234567890");
    }

    #[test]
    fn test_resolve_launch_id_prefers_table() {
        assert_eq!(resolve_launch_id("Hulu").unwrap(), "3201601007625");
    }

    #[test]
    fn test_resolve_launch_id_rejects_unknown_text() {
        assert!(matches!(
            resolve_launch_id("Crunchyroll"),
            Err(RemoteError::UnknownApp(name)) if name == "Crunchyroll"
        ));
    }

    #[test]
    fn test_resolve_launch_id_rejects_empty() {
        assert!(resolve_launch_id("  ").is_err());
    }
}

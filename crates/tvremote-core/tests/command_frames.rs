//! Integration tests for the public tvremote-core API.
//!
//! These tests exercise the lookup tables, the query parser and the frame
//! encoder together, the way the command channel and smart search use them:
//! user text in, JSON frame out.

use serde_json::Value;
use tvremote_core::{
    parse_smart_query, resolve_app_id, resolve_key, ConnectionProfile, RemoteCommand,
    RemoteError,
};

fn frame_json(cmd: &RemoteCommand) -> Value {
    serde_json::from_str(&cmd.to_frame()).expect("frames are JSON")
}

#[test]
fn test_alias_key_becomes_canonical_code_on_the_wire() {
    // Arrange
    let code = resolve_key("volume_up");

    // Act
    let json = frame_json(&RemoteCommand::Key { code });

    // Assert
    assert_eq!(json["params"]["DataOfCmd"], "KEY_VOLUP");
}

#[test]
fn test_unknown_key_is_still_dispatched_raw() {
    let json = frame_json(&RemoteCommand::Key {
        code: resolve_key("KEY_MAGIC_NEW"),
    });
    assert_eq!(json["params"]["DataOfCmd"], "KEY_MAGIC_NEW");
}

#[test]
fn test_smart_query_app_resolves_to_deep_link_frame() {
    // Arrange: the parser's canonical app names must all exist in the app table.
    let query = parse_smart_query("play stranger things on netflix");
    let app_id = resolve_app_id(&query.app).expect("parser app must be launchable");

    // Act
    let json = frame_json(&RemoteCommand::DeepLink {
        app_id: app_id.to_string(),
        meta_tag: query.search.clone(),
    });

    // Assert
    assert_eq!(json["params"]["data"]["appId"], "3201907018807");
    assert_eq!(json["params"]["data"]["metaTag"], "stranger things");
}

#[test]
fn test_every_parser_app_is_in_the_app_table() {
    for query in [
        "netflix",
        "disney plus",
        "hulu",
        "hbo max",
        "prime video",
        "youtube",
        "nothing in particular",
    ] {
        let app = parse_smart_query(query).app;
        assert!(resolve_app_id(&app).is_ok(), "{app} missing from app table");
    }
}

#[test]
fn test_numeric_name_is_unknown_for_casting() {
    assert_eq!(
        resolve_app_id("12345"),
        Err(RemoteError::UnknownApp("12345".to_string()))
    );
}

#[test]
fn test_profiles_cover_both_transport_variants() {
    let ports: Vec<u16> = ConnectionProfile::DEFAULT_ORDER
        .iter()
        .map(|p| p.port)
        .collect();
    assert_eq!(ports, vec![8002, 8001]);
}

//! End-to-end tests for export parsing and analysis

use serde_json::json;
use std::fs;
use tempfile::TempDir;
use telegram_chat_stats::{
    analyze, analyze_str, load_export, parse_export_str, AggregatedChat, AnalyzerError,
};

fn analyze_json(value: serde_json::Value) -> telegram_chat_stats::AnalysisResult {
    analyze_str(&value.to_string()).unwrap()
}

#[test]
fn test_personal_chat_scenario() {
    let result = analyze_json(json!({
        "chats": { "list": [{
            "type": "personal_chat",
            "first_name": "Ann",
            "last_name": "Lee",
            "id": 42,
            "messages": [{}, {}, {}]
        }]}
    }));

    assert_eq!(
        result.chats,
        vec![AggregatedChat {
            name: "Ann Lee".to_string(),
            id: "42".to_string(),
            full_name: "Ann Lee".to_string(),
            message_count: 3,
        }]
    );
}

#[test]
fn test_duplicate_chats_merge() {
    let result = analyze_json(json!({
        "chats": { "list": [
            { "name": "Bob", "id": 7, "messages": [{}, {}] },
            { "name": "Alice", "id": 1, "messages": [{}, {}, {}] },
            { "name": "Bob", "id": "7", "messages": [{}, {}, {}, {}, {}] }
        ]}
    }));

    assert_eq!(result.chats.len(), 2);
    assert_eq!(result.chats[0].name, "Bob");
    assert_eq!(result.chats[0].message_count, 7);
    assert_eq!(result.chats[1].name, "Alice");
}

#[test]
fn test_full_name_skips_owner_messages() {
    let result = analyze_json(json!({
        "personal_information": { "user_id": 100 },
        "chats": { "list": [{
            "name": "Chat",
            "id": 5,
            "messages": [
                { "from": "Carl", "from_id": "user100" },
                { "from": "Dana", "from_id": "user200" }
            ]
        }]}
    }));

    assert_eq!(result.chats[0].full_name, "Dana");
}

#[test]
fn test_camel_case_fields_are_accepted() {
    let result = analyze_json(json!({
        "personalInformation": { "userId": "100" },
        "chats": { "list": [{
            "type": "personal_chat",
            "firstName": "Eve",
            "chatId": 9,
            "messages": [
                { "from": "Me", "fromId": "user100" },
                { "from": "Eve Adams", "fromId": "user9" }
            ]
        }]}
    }));

    let chat = &result.chats[0];
    assert_eq!(chat.name, "Eve");
    assert_eq!(chat.id, "9");
    assert_eq!(chat.full_name, "Eve Adams");
}

#[test]
fn test_chat_without_messages_contributes_nothing() {
    let result = analyze_json(json!({
        "chats": { "list": [
            { "name": "Ghost", "id": 1 },
            { "name": "Empty", "id": 2, "messages": [] },
            { "name": "Real", "id": 3, "messages": [{ "date": "2023-01-02T08:00:00" }] }
        ]}
    }));

    assert_eq!(result.chats.len(), 1);
    assert_eq!(result.chats[0].name, "Real");
    assert_eq!(result.message_activity.daily.len(), 1);
    assert_eq!(result.message_activity.daily[0].date, "2023-01-02");
    assert_eq!(result.message_activity.weekly[0].date, "2023-01-01");
    assert_eq!(result.message_activity.monthly[0].date, "2023-01");
}

#[test]
fn test_missing_chat_list_is_invalid_format() {
    for doc in [json!({}), json!({ "chats": {} }), json!({ "chats": { "list": null } })] {
        let err = analyze_str(&doc.to_string()).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidFormat), "{doc}");
        assert_eq!(err.to_string(), "Invalid Telegram export format");
    }
}

#[test]
fn test_empty_list_gives_empty_result() {
    let result = analyze_json(json!({ "chats": { "list": [] } }));
    assert!(result.chats.is_empty());
    assert!(result.message_activity.daily.is_empty());
    assert!(result.message_activity.weekly.is_empty());
    assert!(result.message_activity.monthly.is_empty());
}

#[test]
fn test_unparseable_dates_are_ignored_for_activity() {
    let result = analyze_json(json!({
        "chats": { "list": [{
            "name": "Mixed",
            "id": 1,
            "messages": [
                { "date": "2023-03-05T23:30:00" },
                { "date": "not a date" },
                { "date": 12345 },
                {}
            ]
        }]}
    }));

    assert_eq!(result.chats[0].message_count, 4);
    assert_eq!(result.total_messages(), 4);
    let counted: usize = result
        .message_activity
        .daily
        .iter()
        .map(|b| b.message_count)
        .sum();
    assert_eq!(counted, 1);
}

#[test]
fn test_analysis_is_idempotent() {
    let doc = json!({
        "chats": { "list": [
            { "name": "A", "id": 1, "messages": [{ "date": "2023-01-01T00:00:00" }] },
            { "title": "B", "messages": [{ "date": "2023-02-01T00:00:00" }, {}] }
        ]}
    });
    let export = parse_export_str(&doc.to_string()).unwrap();
    assert_eq!(analyze(&export).unwrap(), analyze(&export).unwrap());
}

#[test]
fn test_unknown_chat_label() {
    let result = analyze_json(json!({
        "chats": { "list": [
            { "id": 55, "messages": [{}, {}] },
            { "messages": [{}] }
        ]}
    }));

    assert_eq!(result.chats[0].name, "Unknown Chat (ID: 55)");
    assert_eq!(result.chats[0].id, "55");
    assert_eq!(result.chats[1].name, "Unknown Chat (ID: N/A)");
    assert_eq!(result.chats[1].id, "unknown");
}

#[test]
fn test_load_export_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("result.json");
    fs::write(
        &path,
        json!({ "chats": { "list": [{ "name": "A", "id": 1, "messages": [{}] }] } }).to_string(),
    )
    .unwrap();

    let export = load_export(&path).unwrap();
    let result = analyze(&export).unwrap();
    assert_eq!(result.chats.len(), 1);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_export(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, AnalyzerError::Io(_)));
}

#[test]
fn test_result_serializes_camel_case() {
    let result = analyze_json(json!({
        "chats": { "list": [{ "name": "A", "id": 1, "messages": [{ "date": "2023-01-01T00:00:00" }] }] }
    }));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["chats"][0]["fullName"], "A");
    assert_eq!(value["chats"][0]["messageCount"], 1);
    assert_eq!(value["messageActivity"]["daily"][0]["messageCount"], 1);
}

#[test]
fn test_wrong_typed_personal_information_disables_owner() {
    let result = analyze_json(json!({
        "personal_information": "n/a",
        "chats": { "list": [{
            "name": "Good",
            "id": 1,
            "messages": [{ "date": "2023-01-01T00:00:00", "from": "Zed", "from_id": "user5" }]
        }]}
    }));

    assert_eq!(result.chats.len(), 1);
    assert_eq!(result.chats[0].full_name, "Zed");
}

#[test]
fn test_malformed_chat_entries_are_skipped() {
    let good = json!({ "name": "Good", "id": 1, "messages": [{ "date": "2023-01-01T00:00:00" }] });

    for bad in [
        json!(null),
        json!("chat"),
        json!({ "name": "Odd", "id": 2, "messages": { "oops": true } }),
    ] {
        let result = analyze_json(json!({ "chats": { "list": [good.clone(), bad.clone()] } }));
        assert_eq!(result.chats.len(), 1, "{bad}");
        assert_eq!(result.chats[0].name, "Good");
        assert_eq!(result.message_activity.daily[0].message_count, 1);
    }
}

#[test]
fn test_non_object_messages_still_count() {
    let result = analyze_json(json!({
        "chats": { "list": [{ "name": "A", "id": 1, "messages": [null, 3, { "date": "2023-01-01" }] }] }
    }));

    assert_eq!(result.chats[0].message_count, 3);
    assert_eq!(result.message_activity.daily[0].message_count, 1);
}

#[test]
fn test_both_key_spellings_are_accepted() {
    let result = analyze_json(json!({
        "personal_information": { "user_id": 100 },
        "personalInformation": { "userId": 999 },
        "chats": { "list": [{
            "name": "A",
            "chat_id": 1,
            "chatId": 2,
            "messages": [
                { "from": "Me", "from_id": "user100", "fromId": "user100" },
                { "from": "Them", "from_id": "user8" }
            ]
        }]}
    }));

    assert_eq!(result.chats[0].id, "1");
    assert_eq!(result.chats[0].full_name, "Them");
}

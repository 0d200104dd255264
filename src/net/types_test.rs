use super::*;
use time::macros::datetime;

fn message_json() -> &'static str {
    r#"{
        "_id": "m1",
        "workspaceId": "w1",
        "content": "hello there",
        "author": { "name": "alice", "userId": "u1" },
        "type": "text",
        "createdAt": "2026-08-01T10:00:00.000Z"
    }"#
}

// =============================================================================
// Message decoding
// =============================================================================

#[test]
fn message_decodes_server_field_names() {
    let msg: Message = serde_json::from_str(message_json()).unwrap();
    assert_eq!(msg.id, "m1");
    assert_eq!(msg.workspace_id, "w1");
    assert_eq!(msg.content, "hello there");
    assert_eq!(msg.author.name, "alice");
    assert_eq!(msg.author.user_id.as_deref(), Some("u1"));
    assert_eq!(msg.kind, MessageKind::Text);
    assert_eq!(msg.created_at, datetime!(2026-08-01 10:00 UTC));
}

#[test]
fn message_is_edited_defaults_false() {
    let msg: Message = serde_json::from_str(message_json()).unwrap();
    assert!(!msg.is_edited);
}

#[test]
fn message_author_without_user_id() {
    let json = r#"{
        "_id": "m2",
        "workspaceId": "w1",
        "content": "anon",
        "author": { "name": "Anonymous User" },
        "type": "system",
        "createdAt": "2026-08-01T10:05:00Z",
        "isEdited": true
    }"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert!(msg.author.user_id.is_none());
    assert_eq!(msg.kind, MessageKind::System);
    assert!(msg.is_edited);
}

#[test]
fn message_kind_rejects_unknown_tag() {
    let json = message_json().replace("\"text\"", "\"video\"");
    assert!(serde_json::from_str::<Message>(&json).is_err());
}

// =============================================================================
// Workspace decoding
// =============================================================================

#[test]
fn workspace_decodes_with_optional_description() {
    let json = r#"{ "_id": "w1", "name": "general", "type": "public" }"#;
    let ws: Workspace = serde_json::from_str(json).unwrap();
    assert_eq!(ws.id, "w1");
    assert_eq!(ws.name, "general");
    assert!(ws.description.is_none());
    assert_eq!(ws.kind, WorkspaceKind::Public);
}

#[test]
fn workspace_decodes_private_kind() {
    let json = r#"{ "_id": "w2", "name": "ops", "description": "ops room", "type": "private" }"#;
    let ws: Workspace = serde_json::from_str(json).unwrap();
    assert_eq!(ws.kind, WorkspaceKind::Private);
    assert_eq!(ws.description.as_deref(), Some("ops room"));
}

// =============================================================================
// Draft encoding
// =============================================================================

#[test]
fn message_draft_serializes_type_tag() {
    let draft = MessageDraft {
        content: "hi".into(),
        author: AuthorDraft { name: "bob".into() },
        kind: MessageKind::Text,
    };
    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(value["type"], "text");
    assert_eq!(value["author"]["name"], "bob");
}

#[test]
fn workspace_draft_omits_empty_description() {
    let draft = WorkspaceDraft {
        name: "general".into(),
        description: None,
        kind: WorkspaceKind::Public,
    };
    let value = serde_json::to_value(&draft).unwrap();
    assert!(value.get("description").is_none());
    assert_eq!(value["type"], "public");
}

// =============================================================================
// Envelope
// =============================================================================

#[test]
fn envelope_decodes_paged_list() {
    let json = r#"{
        "success": true,
        "data": [],
        "page": 1,
        "pages": 3,
        "total": 57
    }"#;
    let env: Envelope<Vec<Message>> = serde_json::from_str(json).unwrap();
    assert!(env.success);
    assert_eq!(env.page, Some(1));
    assert_eq!(env.pages, Some(3));
    assert_eq!(env.total, Some(57));
}

#[test]
fn envelope_decodes_failure_message() {
    let json = r#"{ "success": false, "data": null, "message": "workspace not found" }"#;
    let env: Envelope<Vec<Workspace>> = serde_json::from_str(json).unwrap();
    assert!(!env.success);
    assert!(env.data.is_none());
    assert_eq!(env.message.as_deref(), Some("workspace not found"));
}

#[test]
fn page_info_empty_has_no_pages() {
    let info = PageInfo::empty();
    assert_eq!(info.page, 0);
    assert_eq!(info.total_pages, 0);
    assert_eq!(info.total_count, 0);
}

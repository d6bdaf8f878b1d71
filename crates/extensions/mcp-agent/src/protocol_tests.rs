use super::*;

#[test]
fn test_request_serialization() {
    let req = McpRequest::call(1i64, "initialize").with_params(serde_json::json!({"capabilities": {}}));

    let json = serde_json::to_string(&req).unwrap();
    assert!(json.contains(r#""jsonrpc":"2.0""#));
    assert!(json.contains(r#""id":1"#));
    assert!(json.contains("initialize"));
}

#[test]
fn test_notification_has_no_id() {
    let note = McpRequest::notification(McpMethod::Initialized.as_str());
    assert!(note.is_notification());
    let json = serde_json::to_value(&note).unwrap();
    assert!(json.get("id").is_none());
    assert!(json.get("params").is_none());
    assert_eq!(json["method"], "notifications/initialized");
}

#[test]
fn test_answer_carries_result_or_error() {
    let failed = McpResponse::answer(Some(RequestId::Number(1)), Err(McpError::method_not_found()));
    assert!(failed.is_error());
    assert!(failed.result.is_none());
    assert_eq!(failed.error.as_ref().unwrap().code, -32601);

    let json = serde_json::to_value(McpResponse::answer(
        Some(RequestId::String("s1".to_string())),
        Ok(serde_json::json!({})),
    ))
    .unwrap();
    assert_eq!(json["id"], "s1");
    assert!(json.get("error").is_none());
}

#[test]
fn test_message_classification() {
    let resp = McpMessage::parse(r#"{"jsonrpc":"2.0","id":3,"result":{}}"#).unwrap();
    assert!(matches!(resp, McpMessage::Response(r) if r.id == Some(RequestId::Number(3))));

    let req = McpMessage::parse(r#"{"jsonrpc":"2.0","id":"s1","method":"ping"}"#).unwrap();
    assert!(matches!(req, McpMessage::Request(r) if r.method == "ping" && !r.is_notification()));

    let note = McpMessage::parse(
        r#"{"jsonrpc":"2.0","method":"notifications/message","params":{"level":"info"}}"#,
    )
    .unwrap();
    assert!(matches!(note, McpMessage::Request(n) if n.is_notification()));

    assert!(McpMessage::parse("not json").is_err());
}

#[test]
fn test_tool_result_text_and_image() {
    let json = r#"{
        "content": [
            {"type": "text", "text": "Badges render"},
            {"type": "image", "data": "iVBORw0=", "mimeType": "image/png"}
        ]
    }"#;

    let result: McpToolResult = serde_json::from_str(json).unwrap();
    assert!(!result.is_error);
    assert_eq!(result.content.len(), 2);
    assert!(matches!(&result.content[0], McpContent::Text { text } if text == "Badges render"));
    assert!(matches!(
        &result.content[1],
        McpContent::Image { data, mime_type } if data == "iVBORw0=" && mime_type.as_deref() == Some("image/png")
    ));
}

#[test]
fn test_image_base64_alias() {
    let content: McpContent = serde_json::from_str(r#"{"type":"image","base64":"AAAA"}"#).unwrap();
    assert!(matches!(content, McpContent::Image { data, mime_type: None } if data == "AAAA"));
}

#[test]
fn test_unknown_content_type_is_tolerated() {
    let result: McpToolResult =
        serde_json::from_str(r#"{"content":[{"type":"audio","data":"x"}],"isError":true}"#).unwrap();
    assert!(result.is_error);
    assert!(matches!(result.content[0], McpContent::Unknown));
}

#[test]
fn test_missing_content_defaults_to_empty() {
    let result: McpToolResult = serde_json::from_str("{}").unwrap();
    assert!(result.content.is_empty());
}

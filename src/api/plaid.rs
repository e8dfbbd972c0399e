//! Mock bank-link endpoints.
//!
//! The link flow is two steps: obtain a link token for a user, then exchange
//! the public token the widget hands back. Both steps answer canned JSON and
//! call nothing external.

use {
    axum::{Json, Router, body::Bytes, http::StatusCode, routing::post},
    serde_json::{Value, json},
};

pub const MOCK_LINK_TOKEN: &str = "mock-link-token-for-testing";

const LINK_TOKEN_MESSAGE: &str =
    "This is a mock implementation. In a real app, this would return a Plaid link token.";
const EXCHANGE_MESSAGE: &str = "This is a mock implementation. In a real app, this would exchange a public token for an access token.";
const MOCK_FAILURE: &str = "An error occurred in the mock implementation";

/// Routes at `/api/plaid/*`.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/plaid/create-link-token", post(create_link_token))
        .route("/api/plaid/exchange-public-token", post(exchange_public_token))
}

/// POST /api/plaid/create-link-token
pub async fn create_link_token(body: Bytes) -> (StatusCode, Json<Value>) {
    let payload = match parse_body(&body, "create-link-token") {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    if !has_value(&payload, "userId") {
        return bad_request("User ID is required");
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "link_token": MOCK_LINK_TOKEN,
            "message": LINK_TOKEN_MESSAGE,
        })),
    )
}

/// POST /api/plaid/exchange-public-token
pub async fn exchange_public_token(body: Bytes) -> (StatusCode, Json<Value>) {
    let payload = match parse_body(&body, "exchange-public-token") {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    if !has_value(&payload, "public_token") || !has_value(&payload, "userId") {
        return bad_request("Public token and user ID are required");
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": EXCHANGE_MESSAGE,
        })),
    )
}

/// Parses the request body. Anything that is not JSON, or is JSON `null`,
/// is a mock failure rather than a client error.
fn parse_body(body: &[u8], endpoint: &str) -> Result<Value, (StatusCode, Json<Value>)> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Null) => {
            tracing::error!(endpoint, "Error in mock endpoint: null body");
            Err(failure())
        }
        Ok(payload) => Ok(payload),
        Err(err) => {
            tracing::error!(endpoint, error = %err, "Error in mock endpoint");
            Err(failure())
        }
    }
}

/// A field counts as present unless it is missing, `null`, `false`, `0` or
/// the empty string.
fn has_value(payload: &Value, field: &str) -> bool {
    match payload.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn failure() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": MOCK_FAILURE })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_value_follows_truthiness() {
        let payload = json!({
            "a": "x", "b": "", "c": null, "d": 0, "e": 7, "f": false, "g": {}, "h": []
        });
        assert!(has_value(&payload, "a"));
        assert!(!has_value(&payload, "b"));
        assert!(!has_value(&payload, "c"));
        assert!(!has_value(&payload, "d"));
        assert!(has_value(&payload, "e"));
        assert!(!has_value(&payload, "f"));
        assert!(has_value(&payload, "g"));
        assert!(has_value(&payload, "h"));
        assert!(!has_value(&payload, "missing"));
    }

    #[test]
    fn test_non_object_payload_has_no_fields() {
        assert!(!has_value(&json!([1, 2]), "userId"));
        assert!(!has_value(&json!("userId"), "userId"));
    }

    #[tokio::test]
    async fn test_create_link_token() {
        let (status, Json(body)) = create_link_token(Bytes::from(r#"{"userId":"u1"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["link_token"], MOCK_LINK_TOKEN);
        assert_eq!(body["message"], LINK_TOKEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_create_link_token_requires_user() {
        let (status, Json(body)) = create_link_token(Bytes::from("{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "User ID is required" }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_mock_failure() {
        for body in ["not json", "", "null"] {
            let (status, Json(json)) = create_link_token(Bytes::from(body)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body:?}");
            assert_eq!(json["error"], MOCK_FAILURE);

            let (status, _) = exchange_public_token(Bytes::from(body)).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{body:?}");
        }
    }

    #[tokio::test]
    async fn test_exchange_requires_both_fields() {
        for body in [r#"{"userId":"u1"}"#, r#"{"public_token":"p"}"#, r#"{"public_token":"","userId":"u1"}"#] {
            let (status, Json(json)) = exchange_public_token(Bytes::from(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], "Public token and user ID are required");
        }

        let (status, Json(json)) = exchange_public_token(Bytes::from(
            r#"{"public_token":"public-sandbox-1","userId":"u1","metadata":{"institution":"x"}}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "success": true, "message": EXCHANGE_MESSAGE }));
    }
}

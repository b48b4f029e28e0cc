use super::*;
use serde_json::json;

// =============================================================
// Envelopes
// =============================================================

#[test]
fn api_response_meta_is_optional() {
    let resp: ApiResponse<User> =
        serde_json::from_value(json!({"data": {"id": 1, "github_id": 2, "username": "alice"}})).unwrap();
    assert_eq!(resp.data.username, "alice");
    assert!(resp.meta.is_none());
    assert!(resp.data.email.is_none());
    assert!(resp.data.avatar_url.is_none());
}

#[test]
fn api_response_keeps_meta_mapping() {
    let resp: ApiResponse<Vec<Project>> =
        serde_json::from_value(json!({"data": [], "meta": {"count": 0}})).unwrap();
    assert!(resp.data.is_empty());
    assert_eq!(resp.meta.unwrap().get("count"), Some(&json!(0)));
}

#[test]
fn error_response_parses_code_and_details() {
    let resp: ErrorResponse = serde_json::from_value(json!({
        "error": {"message": "invalid token", "code": "unauthorized", "details": {"hint": "relogin"}}
    }))
    .unwrap();
    let err = resp.error.unwrap();
    assert_eq!(err.message, "invalid token");
    assert_eq!(err.code.as_deref(), Some("unauthorized"));
    assert_eq!(err.details, Some(json!({"hint": "relogin"})));
}

#[test]
fn error_response_error_field_is_optional() {
    let resp: ErrorResponse = serde_json::from_value(json!({})).unwrap();
    assert_eq!(resp, ErrorResponse::default());
}

// =============================================================
// Domain payloads
// =============================================================

#[test]
fn user_accepts_null_email() {
    let user: User = serde_json::from_value(json!({
        "id": 7, "github_id": 99, "username": "bob", "email": null, "avatar_url": "https://img.test/b.png"
    }))
    .unwrap();
    assert!(user.email.is_none());
    assert_eq!(user.avatar_url.as_deref(), Some("https://img.test/b.png"));
}

#[test]
fn user_serialization_omits_absent_fields() {
    let user = User { id: 1, github_id: 2, username: "alice".to_owned(), email: None, avatar_url: None };
    assert_eq!(serde_json::to_value(&user).unwrap(), json!({"id": 1, "github_id": 2, "username": "alice"}));
}

#[test]
fn project_with_repo_info_parses() {
    let project: Project = serde_json::from_value(json!({
        "id": 3, "user_id": 1, "name": "Novel", "slug": "novel", "project_type": "novel",
        "github_repo": {"name": "novel", "url": "https://github.com/alice/novel"}
    }))
    .unwrap();
    let repo = project.github_repo.unwrap();
    assert!(repo.id.is_none());
    assert_eq!(repo.url.as_deref(), Some("https://github.com/alice/novel"));
}

#[test]
fn agent_run_passes_results_through() {
    let run: AgentRun = serde_json::from_value(json!({
        "id": 5, "project_id": 3, "agent_type": "continuity", "trigger": "manual", "status": "queued",
        "results": {"issues": []}, "created_at": "2025-01-01T00:00:00Z"
    }))
    .unwrap();
    assert_eq!(run.results, Some(json!({"issues": []})));
    assert!(run.started_at.is_none());
    assert_eq!(run.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
}

#[test]
fn auth_result_carries_token_pair() {
    let result: AuthResult = serde_json::from_value(json!({
        "user": {"id": 1, "github_id": 2, "username": "alice"},
        "token": {"access_token": "a", "refresh_token": "r", "expires_in": 900}
    }))
    .unwrap();
    assert_eq!(result.token.access_token, "a");
    assert_eq!(result.token.expires_in, 900);
}

// =============================================================
// AuthState
// =============================================================

#[test]
fn auth_state_default_is_unauthenticated() {
    let state = AuthState::default();
    assert!(state.access_token.is_empty());
    assert!(state.user.is_none());
    assert!(!state.is_authenticated());
}

#[test]
fn auth_state_token_without_user_counts_as_authenticated() {
    let state = AuthState { access_token: "abc".to_owned(), user: None };
    assert!(state.is_authenticated());
}

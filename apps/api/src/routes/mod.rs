pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::biography::handlers as biography;
use crate::documents::handlers as documents;
use crate::editor::handlers as editor;
use crate::generation::handlers as generation;
use crate::prompts::handlers as prompts;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document API
        .route(
            "/api/v1/documents/:kind",
            get(documents::handle_list_documents).post(documents::handle_save_document),
        )
        .route(
            "/api/v1/documents/:kind/import",
            post(documents::handle_import_document),
        )
        .route(
            "/api/v1/documents/:kind/:name",
            get(documents::handle_get_document).delete(documents::handle_delete_document),
        )
        // Biography API
        .route(
            "/api/v1/biography",
            get(biography::handle_get_biography)
                .post(biography::handle_save_biography)
                .delete(biography::handle_delete_biography),
        )
        .route(
            "/api/v1/biography/merge",
            post(biography::handle_merge_biography),
        )
        .route(
            "/api/v1/biography/versions",
            get(biography::handle_list_versions),
        )
        .route(
            "/api/v1/biography/:version",
            get(biography::handle_get_version),
        )
        .route(
            "/api/v1/biography/:version/revert",
            post(biography::handle_revert),
        )
        // Prompt API
        .route("/api/v1/prompts", get(prompts::handle_list_prompts))
        .route("/api/v1/prompts/reset", post(prompts::handle_reset_prompts))
        .route(
            "/api/v1/prompts/:name",
            get(prompts::handle_get_prompt)
                .post(prompts::handle_save_prompt)
                .delete(prompts::handle_delete_prompt),
        )
        // Generation API
        .route("/api/v1/generate", post(generation::handle_generate))
        // Editor API
        .route(
            "/api/v1/editor/sessions",
            post(editor::handle_start_session),
        )
        .route(
            "/api/v1/editor/sessions/:id",
            get(editor::handle_get_session).delete(editor::handle_end_session),
        )
        .route(
            "/api/v1/editor/sessions/:id/messages",
            post(editor::handle_send_message),
        )
        .route(
            "/api/v1/editor/sessions/:id/save",
            post(editor::handle_save_draft),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::db::test_pool;
    use crate::editor::handlers::new_session_store;
    use crate::llm_client::testing::ScriptedModel;
    use crate::mirror::FileMirror;
    use crate::prompts::store::seed_default_prompts_if_empty;

    struct TestApp {
        router: Router,
        llm: Arc<ScriptedModel>,
        _dir: TempDir,
    }

    async fn app_with(llm: ScriptedModel, seed_prompts: bool) -> TestApp {
        let db = test_pool().await;
        if seed_prompts {
            seed_default_prompts_if_empty(&db).await.unwrap();
        }
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::init(dir.path()).await.unwrap();
        let llm = Arc::new(llm);
        let state = AppState {
            db,
            llm: llm.clone(),
            mirror,
            sessions: new_session_store(),
        };
        TestApp {
            router: build_router(state),
            llm,
            _dir: dir,
        }
    }

    impl TestApp {
        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .unwrap();
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn save_doc(&self, kind: &str, name: &str, content: &str) {
            let response = self
                .send(
                    Method::POST,
                    &format!("/api/v1/documents/{kind}"),
                    Some(json!({ "name": name, "content": content })),
                )
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(ScriptedModel::new(), false).await;
        let response = app.send(Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "quill-api");
    }

    #[tokio::test]
    async fn test_document_crud() {
        let app = app_with(ScriptedModel::new(), false).await;
        app.save_doc("resume", "cv", "Jane Doe, Rust engineer").await;

        let response = app.send(Method::GET, "/api/v1/documents/resume/cv", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["content"], "Jane Doe, Rust engineer");

        let response = app.send(Method::GET, "/api/v1/documents/resume", None).await;
        let listed = json_body(response).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["name"], "cv");

        let response = app.send(Method::DELETE, "/api/v1/documents/resume/cv", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.send(Method::GET, "/api/v1/documents/resume/cv", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_save_document_rejects_blank_content() {
        let app = app_with(ScriptedModel::new(), false).await;
        let response = app
            .send(
                Method::POST,
                "/api/v1/documents/cover_letter",
                Some(json!({ "name": "acme", "content": "   " })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_names_claimed_by_action_routes_are_rejected() {
        let app = app_with(ScriptedModel::new(), true).await;
        let response = app
            .send(
                Method::POST,
                "/api/v1/documents/cover_letter",
                Some(json!({ "name": "import", "content": "Dear team" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");

        let response = app
            .send(Method::GET, "/api/v1/documents/cover_letter", None)
            .await;
        assert!(json_body(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_text_file() {
        let app = app_with(ScriptedModel::new(), false).await;
        let boundary = "quill-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             acme\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"company\"\r\n\r\n\
             Acme Corp\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"acme.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             We are hiring a Rust engineer.\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/documents/job_description/import")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .send(Method::GET, "/api/v1/documents/job_description/acme", None)
            .await;
        let doc = json_body(response).await;
        assert_eq!(doc["content"], "We are hiring a Rust engineer.");
        assert_eq!(doc["company"], "Acme Corp");
    }

    #[tokio::test]
    async fn test_biography_versions_and_revert() {
        let app = app_with(ScriptedModel::new(), false).await;

        let response = app.send(Method::GET, "/api/v1/biography", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        for content in ["first", "second"] {
            let response = app
                .send(
                    Method::POST,
                    "/api/v1/biography",
                    Some(json!({ "content": content })),
                )
                .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app.send(Method::POST, "/api/v1/biography/1/revert", None).await;
        assert_eq!(json_body(response).await["version"], 3);

        let latest = json_body(app.send(Method::GET, "/api/v1/biography", None).await).await;
        assert_eq!(latest["content"], "first");
        assert_eq!(latest["notes"], "Reverted to version 1");

        let versions =
            json_body(app.send(Method::GET, "/api/v1/biography/versions", None).await).await;
        assert_eq!(versions.as_array().unwrap().len(), 3);

        let response = app.send(Method::GET, "/api/v1/biography/7", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_biography_merge_stores_validated_text() {
        let llm = ScriptedModel::new().validated("# Biography\nMerged text", "VALID");
        let app = app_with(llm, true).await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/biography/merge",
                Some(json!({ "content": "Led a team of five", "notes": "new job" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["version"], 1);
        assert_eq!(body["mode"], "merge");

        let latest = json_body(app.send(Method::GET, "/api/v1/biography", None).await).await;
        assert_eq!(latest["content"], "# Biography\nMerged text");
        assert_eq!(app.llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_prompt_routes() {
        let app = app_with(ScriptedModel::new(), true).await;

        let listed = json_body(app.send(Method::GET, "/api/v1/prompts", None).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 4);

        let response = app
            .send(
                Method::POST,
                "/api/v1/prompts/validator",
                Some(json!({ "content": "Edited validator" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.send(Method::POST, "/api/v1/prompts/reset", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let validator =
            json_body(app.send(Method::GET, "/api/v1/prompts/validator", None).await).await;
        assert_ne!(validator["content"], "Edited validator");

        let response = app.send(Method::DELETE, "/api/v1/prompts/validator", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = app.send(Method::GET, "/api/v1/prompts/validator", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    async fn seed_generation_documents(app: &TestApp) {
        app.save_doc("resume", "cv", "Resume text").await;
        app.save_doc("job_description", "acme", "JD text").await;
        app.save_doc("cover_letter", "sample", "Sample text").await;
    }

    fn generate_body(save_as: Option<&str>) -> Value {
        json!({
            "resume_name": "cv",
            "job_description_name": "acme",
            "sample_letter_name": "sample",
            "preferences": "Remote only",
            "save_as": save_as,
        })
    }

    #[tokio::test]
    async fn test_generate_returns_every_stage_and_saves_letter() {
        let llm = ScriptedModel::new()
            .validated("PROFILE", "VALID")
            .validated("JOB", "VALID")
            .validated("ALIGNMENT", "VALID")
            .validated("Dear Acme", "VALID");
        let app = app_with(llm, true).await;
        seed_generation_documents(&app).await;

        let response = app
            .send(Method::POST, "/api/v1/generate", Some(generate_body(Some("acme_letter"))))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["user_profile"], "PROFILE");
        assert_eq!(body["job_analysis"], "JOB");
        assert_eq!(body["alignment"], "ALIGNMENT");
        assert_eq!(body["cover_letter"], "Dear Acme");
        assert_eq!(body["saved_as"], "acme_letter");

        let saved = json_body(
            app.send(Method::GET, "/api/v1/documents/cover_letter/acme_letter", None)
                .await,
        )
        .await;
        assert_eq!(saved["content"], "Dear Acme");
        assert_eq!(app.llm.call_count(), 8);
    }

    #[tokio::test]
    async fn test_generate_surfaces_stage_diagnostic() {
        let llm = ScriptedModel::new()
            .validated("PROFILE", "VALID")
            .validated("bad", "INVALID")
            .validated("bad", "INVALID")
            .validated("bad", "INVALID");
        let app = app_with(llm, true).await;
        seed_generation_documents(&app).await;

        let response = app
            .send(Method::POST, "/api/v1/generate", Some(generate_body(None)))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Error analyzing job: Failed to generate a valid response after multiple attempts"
        );
        assert_eq!(app.llm.call_count(), 8);
    }

    #[tokio::test]
    async fn test_generate_without_prompts_is_config_error() {
        let app = app_with(ScriptedModel::new(), false).await;
        seed_generation_documents(&app).await;

        let response = app
            .send(Method::POST, "/api/v1/generate", Some(generate_body(None)))
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let message = json_body(response).await["error"]["message"].clone();
        assert!(message.as_str().unwrap().contains("Please initialize prompts first"));
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_missing_documents() {
        let app = app_with(ScriptedModel::new(), true).await;
        let response = app
            .send(Method::POST, "/api/v1/generate", Some(generate_body(None)))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_editor_session_flow() {
        let llm = ScriptedModel::new().reply("Dear Acme, tighter.");
        let app = app_with(llm, false).await;

        let response = app
            .send(
                Method::POST,
                "/api/v1/editor/sessions",
                Some(json!({ "letter": "Dear Acme, I am writing to apply." })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let session = json_body(response).await;
        let id = session["session_id"].as_str().unwrap().to_string();
        assert_eq!(session["transcript"].as_array().unwrap().len(), 2);

        // bare model switch never reaches the model
        let reply = json_body(
            app.send(
                Method::POST,
                &format!("/api/v1/editor/sessions/{id}/messages"),
                Some(json!({ "message": "\\o1" })),
            )
            .await,
        )
        .await;
        assert_eq!(reply["kind"], "model_switched");
        assert_eq!(app.llm.call_count(), 0);

        let reply = json_body(
            app.send(
                Method::POST,
                &format!("/api/v1/editor/sessions/{id}/messages"),
                Some(json!({ "message": "make it shorter" })),
            )
            .await,
        )
        .await;
        assert_eq!(reply["kind"], "reply");
        assert_eq!(reply["content"], "Dear Acme, tighter.");
        assert_eq!(app.llm.calls()[0].model, "o1-preview");

        let response = app
            .send(
                Method::POST,
                &format!("/api/v1/editor/sessions/{id}/save"),
                Some(json!({ "name": "acme_edited" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = json_body(
            app.send(Method::GET, "/api/v1/documents/cover_letter/acme_edited", None)
                .await,
        )
        .await;
        assert_eq!(saved["content"], "Dear Acme, tighter.");

        let uri = format!("/api/v1/editor/sessions/{id}");
        assert_eq!(
            app.send(Method::DELETE, &uri, None).await.status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            app.send(Method::GET, &uri, None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_editor_failed_turn_returns_bad_gateway() {
        let llm = ScriptedModel::new().fail(503);
        let app = app_with(llm, false).await;

        let session = json_body(
            app.send(
                Method::POST,
                "/api/v1/editor/sessions",
                Some(json!({ "letter": "Dear Acme" })),
            )
            .await,
        )
        .await;
        let id = session["session_id"].as_str().unwrap().to_string();

        let response = app
            .send(
                Method::POST,
                &format!("/api/v1/editor/sessions/{id}/messages"),
                Some(json!({ "message": "shorter" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let view = json_body(app.send(Method::GET, &format!("/api/v1/editor/sessions/{id}"), None).await).await;
        assert_eq!(view["transcript"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_editor_requires_a_letter() {
        let app = app_with(ScriptedModel::new(), false).await;
        let response = app
            .send(Method::POST, "/api/v1/editor/sessions", Some(json!({})))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .send(
                Method::POST,
                "/api/v1/editor/sessions",
                Some(json!({ "cover_letter_name": "missing" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

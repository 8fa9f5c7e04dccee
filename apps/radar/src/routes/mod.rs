pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::pipeline::handlers as pipeline;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Pipeline API
        .route("/api/v1/pipeline/run", post(pipeline::handle_run_pipeline))
        .route("/api/v1/jobs/normalize", post(pipeline::handle_normalize))
        .route("/api/v1/jobs/dedup", post(pipeline::handle_dedup))
        .route("/api/v1/jobs/score", post(pipeline::handle_score))
        // Resume API
        .route("/api/v1/resume/skills", post(skills::handle_resume_skills))
        .route(
            "/api/v1/resume/skills/upload",
            post(skills::handle_resume_upload),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::dedup::{Deduplicator, SourcePriority};
    use crate::models::PersistedRecord;
    use crate::skills::SkillCatalog;
    use crate::tracker::StaticHistory;

    fn test_state(history: Vec<PersistedRecord>) -> AppState {
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            source_priority: SourcePriority::default(),
            description_length_tolerance: 0.05,
            tracker_dir: None,
            skill_catalog_path: None,
            resume_path: None,
        };
        AppState {
            deduplicator: Deduplicator::new(config.source_priority.clone(), config.dedup_config()),
            config,
            catalog: Arc::new(SkillCatalog::new(["python", "sql", "tableau"], ["tableau"]).unwrap()),
            history: Arc::new(StaticHistory::new(history)),
        }
    }

    fn app() -> Router {
        build_router(test_state(Vec::new()))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn duplicate_u1_body() -> Value {
        json!({
            "batches": [
                {"provider": "canonical", "records": [
                    {"source": "linkedin", "url": "u1", "title": "Data Engineer",
                     "company": "Acme", "description": "Python SQL"}
                ]},
                {"provider": "canonical", "records": [
                    {"source": "indeed", "url": "u1", "title": "Data Eng",
                     "company": "Acme", "description": "Python"}
                ]}
            ],
            "resume_text": "Python, SQL"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "radar-api");
    }

    #[tokio::test]
    async fn test_pipeline_run_collapses_and_scores() {
        let (status, body) = send(app(), post_json("/api/v1/pipeline/run", duplicate_u1_body())).await;
        assert_eq!(status, StatusCode::OK);

        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["title"], "Data Engineer");
        assert_eq!(jobs[0]["source"], "linkedin");
        assert_eq!(jobs[0]["match_score"], 10);
        assert_eq!(jobs[0]["match_reason"], "skills: python, sql");
        assert_eq!(body["profile"], json!(["python", "sql"]));
        assert_eq!(body["fallback_profile"], false);
        assert_eq!(body["stats"]["dedup"]["exact_duplicates"], 1);
        assert!(body["run_id"].is_string());
    }

    #[tokio::test]
    async fn test_pipeline_run_uses_configured_history() {
        let app = build_router(test_state(vec![PersistedRecord::from_url("u1")]));
        let (status, body) = send(app, post_json("/api/v1/pipeline/run", duplicate_u1_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"], json!([]));
        assert_eq!(body["stats"]["dedup"]["previously_seen"], 1);
    }

    #[tokio::test]
    async fn test_pipeline_run_request_history_overrides_configured() {
        let app = build_router(test_state(vec![PersistedRecord::from_url("u1")]));
        let mut body = duplicate_u1_body();
        body["history"] = json!([]);
        let (status, body) = send(app, post_json("/api/v1/pipeline/run", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_validation_error() {
        let body = json!({"batches": [{"provider": "monster", "records": []}]});
        let (status, body) = send(app(), post_json("/api/v1/pipeline/run", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_normalize_reports_dropped_records() {
        let body = json!({"batches": [{"provider": "jobspy", "records": [
            {"job_url": "https://x.test/1", "title": "Data Analyst", "site": "indeed"},
            {"title": "No URL"}
        ]}]});
        let (status, body) = send(app(), post_json("/api/v1/jobs/normalize", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"][0]["source"], "indeed");
        assert_eq!(body["dropped"][0]["provider"], "jobspy");
        assert_eq!(body["dropped"][0]["index"], 1);
    }

    #[tokio::test]
    async fn test_strict_normalize_fails_on_malformed_record() {
        let body = json!({"strict": true, "batches": [{"provider": "jsearch", "records": [
            {"job_apply_link": "https://x.test/1"},
            {"job_title": "No link"}
        ]}]});
        let (status, body) = send(app(), post_json("/api/v1/jobs/normalize", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MALFORMED_RECORD");
    }

    #[tokio::test]
    async fn test_score_endpoint_falls_back_without_resume() {
        let job = json!({
            "id": "", "source": "builtin", "title": "BI Analyst", "company": "Acme",
            "location": null, "description": "Tableau dashboards", "url": "u9",
            "posted_date": null, "salary": null, "employment_type": null,
            "experience_level": null, "remote": false,
            "scraped_at": "2025-02-01T12:00:00Z"
        });
        let (status, body) = send(app(), post_json("/api/v1/jobs/score", json!({"jobs": [job]}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback_profile"], true);
        assert_eq!(body["jobs"][0]["match_score"], 5);
        assert_eq!(body["jobs"][0]["match_reason"], "skills: tableau");
    }

    #[tokio::test]
    async fn test_resume_skills_endpoint() {
        let body = json!({"resume_text": "SQL and Python"});
        let (status, body) = send(app(), post_json("/api/v1/resume/skills", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["python", "sql"]));
        assert_eq!(body["fallback_used"], false);
    }

    #[tokio::test]
    async fn test_resume_upload_reads_text_file() {
        let boundary = "radar-boundary";
        let multipart_body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"resume.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Tableau and SQL\r\n\
             --{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/resume/skills/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body))
            .unwrap();

        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], json!(["sql", "tableau"]));
    }

    #[tokio::test]
    async fn test_resume_upload_without_field_is_rejected() {
        let boundary = "radar-boundary";
        let multipart_body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             nothing\r\n\
             --{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/resume/skills/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body))
            .unwrap();

        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    fn job_json(id: &str, source: &str, url: &str) -> Value {
        json!({
            "id": id, "source": source,
            "title": "Data Analyst", "company": "Acme", "location": null,
            "description": "", "url": url, "posted_date": null, "salary": null,
            "employment_type": null, "experience_level": null, "remote": false,
            "scraped_at": "2025-02-01T12:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_dedup_endpoint_collapses_same_url() {
        let id = crate::models::job_id_for_url("u1");
        let body = json!({"jobs": [job_json(&id, "indeed", "u1"), job_json(&id, "linkedin", "u1")]});
        let (status, body) = send(app(), post_json("/api/v1/jobs/dedup", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(body["jobs"][0]["source"], "linkedin");
    }

    #[tokio::test]
    async fn test_dedup_include_seen_keeps_records_in_request_history() {
        let id = crate::models::job_id_for_url("u1");
        let body = json!({
            "jobs": [job_json(&id, "linkedin", "u1")],
            "history": [{"url": "u1"}],
            "include_seen": true
        });
        let (status, body) = send(app(), post_json("/api/v1/jobs/dedup", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
        assert_eq!(body["stats"]["previously_seen"], 0);
    }

    #[tokio::test]
    async fn test_dedup_recomputes_client_ids_from_url() {
        let url = "https://x.test/u1";
        let body = json!({
            "jobs": [job_json("deadbeef0000", "indeed", url), job_json("", "linkedin", url)],
            "history": []
        });
        let (status, body) = send(app(), post_json("/api/v1/jobs/dedup", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["exact_duplicates"], 1);
        assert_eq!(body["jobs"][0]["id"], crate::models::job_id_for_url(url));

        let body = json!({
            "jobs": [job_json("deadbeef0000", "indeed", url)],
            "history": [{"url": url}]
        });
        let (_, body) = send(app(), post_json("/api/v1/jobs/dedup", body)).await;
        assert!(body["jobs"].as_array().unwrap().is_empty());
        assert_eq!(body["stats"]["previously_seen"], 1);
    }
}

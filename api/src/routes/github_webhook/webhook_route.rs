use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use complexity_engine::{
    RunOutcome,
    errors::EngineResult,
    events::{Dispatch, PrAction},
    git_providers::PullRequestEvent,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error_handler::AppError,
    routes::github_webhook::{
        webhook_payload::{Delivery, parse_delivery},
        webhook_response::WebhookResponse,
    },
    shared::{app_state::AppState, http::response_envelope::ApiResponse},
};

/// POST /webhooks/github
///
/// Receives GitHub deliveries. `pull_request` events whose action is in the
/// handler table run the complexity report on a detached task: the run always
/// completes (and logs its outcome) even when the sender hangs up early. The
/// response reports whether a comment was posted; pipeline failures answer
/// with an error envelope and nothing is posted.
#[instrument(name = "github_webhook_route", skip(state, headers, body))]
pub async fn github_webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(id) = headers
        .get("X-GitHub-Delivery")
        .and_then(|h| h.to_str().ok())
    {
        debug!(%id, "delivery id attached");
    }

    let event_kind = headers.get("X-GitHub-Event").and_then(|h| h.to_str().ok());

    let delivery = match parse_delivery(event_kind, &body) {
        Ok(d) => d,
        Err(err) => return err.into_response(),
    };

    let (action, event) = match delivery {
        Delivery::Ping => return ok("pong", None),
        Delivery::Unhandled(kind) => {
            debug!(%kind, "ignoring non pull_request delivery");
            return ok(format!("event '{kind}' ignored"), None);
        }
        Delivery::PullRequest { action, event } => (action, event),
    };

    info!(
        repo = %event.id.repo,
        pr = event.id.number,
        ?action,
        "pull request event received"
    );

    let run = tokio::spawn(run_detached(state, action, event));

    match run.await {
        Ok(Ok(dispatch)) => {
            let message = match &dispatch {
                Dispatch::Ignored { .. } => "action not registered, ignored".to_string(),
                Dispatch::Handled(RunOutcome::NothingToReport { .. }) => {
                    "no analyzable files, no comment posted".to_string()
                }
                Dispatch::Handled(RunOutcome::Commented { analyzed_files, .. }) => {
                    format!("complexity report posted for {analyzed_files} file(s)")
                }
            };
            ok(message, Some(dispatch))
        }
        Ok(Err(err)) => AppError::from(err).into_response(),
        Err(join) => AppError::from(join).into_response(),
    }
}

/// Dispatches one event and logs how it ended.
async fn run_detached(
    state: Arc<AppState>,
    action: PrAction,
    event: PullRequestEvent,
) -> EngineResult<Dispatch> {
    let result = state
        .handlers
        .dispatch(&state.github, &state.oracle, action, &event)
        .await;

    match &result {
        Ok(dispatch) => debug!(
            repo = %event.id.repo,
            pr = event.id.number,
            ?dispatch,
            "event run finished"
        ),
        Err(err) => warn!(
            repo = %event.id.repo,
            pr = event.id.number,
            error = %err,
            "complexity report aborted"
        ),
    }

    result
}

fn ok(message: impl Into<String>, result: Option<Dispatch>) -> Response {
    ApiResponse::success(WebhookResponse {
        message: message.into(),
        result,
    })
    .into_response_with_status(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::{
        Json, Router,
        extract::{Path, Query},
        routing::{get, post},
    };
    use complexity_engine::oracle::{OracleConfig, OracleKind};
    use serde_json::{Value, json};
    use tokio::{io::AsyncWriteExt, net::TcpListener};

    use super::*;
    use crate::shared::app_state::AppConfig;

    /// GitHub API + remote oracle stand-in.
    #[derive(Default)]
    struct Mock {
        changed: Vec<Value>,
        /// "path@ref" → base64 content
        contents: HashMap<String, String>,
        scores: HashMap<String, f64>,
        compare_delay: Duration,
        calls: Mutex<Vec<String>>,
        comments: Mutex<Vec<String>>,
    }

    impl Mock {
        fn file(mut self, path: &str, status: &str) -> Self {
            self.changed
                .push(json!({ "filename": path, "status": status }));
            self
        }

        fn content(mut self, path: &str, git_ref: &str, base64: &str) -> Self {
            self.contents
                .insert(format!("{path}@{git_ref}"), base64.to_string());
            self
        }

        fn score(mut self, text: &str, score: f64) -> Self {
            self.scores.insert(text.to_string(), score);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn comments(&self) -> Vec<String> {
            self.comments.lock().unwrap().clone()
        }
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn start_mock(mock: Mock) -> (String, Arc<Mock>) {
        let mock = Arc::new(mock);

        let m = mock.clone();
        let compare = get(move || {
            let m = m.clone();
            async move {
                m.calls.lock().unwrap().push("compare".into());
                tokio::time::sleep(m.compare_delay).await;
                Json(json!({ "files": m.changed }))
            }
        });

        let m = mock.clone();
        let contents = get(
            move |Path((_o, _r, path)): Path<(String, String, String)>,
                  Query(q): Query<HashMap<String, String>>| {
                let m = m.clone();
                async move {
                    m.calls.lock().unwrap().push("contents".into());
                    let key = format!("{path}@{}", q.get("ref").cloned().unwrap_or_default());
                    match m.contents.get(&key) {
                        Some(c) => Ok(Json(json!({ "content": c, "encoding": "base64" }))),
                        None => Err(StatusCode::NOT_FOUND),
                    }
                }
            },
        );

        let m = mock.clone();
        let comment = post(move |Json(body): Json<Value>| {
            let m = m.clone();
            async move {
                m.calls.lock().unwrap().push("comment".into());
                m.comments
                    .lock()
                    .unwrap()
                    .push(body["body"].as_str().unwrap_or_default().to_string());
                StatusCode::CREATED
            }
        });

        let m = mock.clone();
        let score = post(move |Json(body): Json<Value>| {
            let m = m.clone();
            async move {
                m.calls.lock().unwrap().push("score".into());
                let text = body["text"].as_str().unwrap_or_default();
                Json(json!({
                    "totalLines": text.lines().count(),
                    "codehawkScore": m.scores.get(text).copied().unwrap_or(50.0),
                }))
            }
        });

        let router = Router::new()
            .route("/repos/{owner}/{repo}/compare/{range}", compare)
            .route("/repos/{owner}/{repo}/contents/{*path}", contents)
            .route("/repos/{owner}/{repo}/issues/{number}/comments", comment)
            .route("/score", score);

        (serve(router).await, mock)
    }

    async fn start_app(mock_url: &str) -> String {
        let config = AppConfig {
            api_address: "127.0.0.1:0".into(),
            github_api_base: mock_url.to_string(),
            github_token: "ghp_test".into(),
            oracle: OracleConfig {
                kind: OracleKind::Http,
                target: format!("{mock_url}/score"),
            },
            enable_edited_trigger: false,
        };
        let state = Arc::new(AppState::build(&config).unwrap());
        serve(crate::router(state)).await
    }

    fn pull_request(action: &str) -> String {
        json!({
            "action": action,
            "pull_request": {
                "number": 5,
                "base": { "sha": "b1", "ref": "main" },
                "head": { "sha": "h1", "ref": "topic" }
            },
            "repository": { "full_name": "octo/widgets" }
        })
        .to_string()
    }

    async fn deliver(app: &str, kind: &str, body: String) -> (StatusCode, Value) {
        let resp = reqwest::Client::new()
            .post(format!("{app}/webhooks/github"))
            .header("X-GitHub-Event", kind)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    // "old" / "new" in base64
    const OLD: &str = "b2xk";
    const NEW: &str = "bmV3";

    #[tokio::test]
    async fn ping_is_answered() {
        let (mock_url, mock) = start_mock(Mock::default()).await;
        let app = start_app(&mock_url).await;

        let (status, body) = deliver(&app, "ping", "{}".into()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["message"], "pong");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn other_event_kinds_are_acknowledged() {
        let (mock_url, mock) = start_mock(Mock::default()).await;
        let app = start_app(&mock_url).await;

        let (status, body) = deliver(&app, "push", r#"{"ref":"main"}"#.into()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["message"], "event 'push' ignored");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn unregistered_action_is_ignored() {
        let (mock_url, mock) = start_mock(Mock::default().file("a.js", "modified")).await;
        let app = start_app(&mock_url).await;

        let (status, body) = deliver(&app, "pull_request", pull_request("closed")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["result"]["status"], "ignored");
        assert_eq!(body["data"]["result"]["action"], "other");
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn opened_posts_a_report() {
        let mock = Mock::default()
            .file("src/a.js", "modified")
            .file("README.md", "modified")
            .content("src/a.js", "main", OLD)
            .content("src/a.js", "topic", NEW)
            .score("old", 50.0)
            .score("new", 70.0);
        let (mock_url, mock) = start_mock(mock).await;
        let app = start_app(&mock_url).await;

        let (status, body) = deliver(&app, "pull_request", pull_request("opened")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["result"]["status"], "handled");
        assert_eq!(body["data"]["result"]["outcome"], "commented");
        assert_eq!(body["data"]["result"]["analyzed_files"], 1);

        let comments = mock.comments();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].contains("| src/a.js | 1 | 50 ✅ | 30 ✅ | -20.00% 📉👍 |"));
    }

    #[tokio::test]
    async fn aborted_run_returns_error_and_posts_nothing() {
        // no base revision for a.js
        let mock = Mock::default()
            .file("a.js", "modified")
            .content("a.js", "topic", NEW);
        let (mock_url, mock) = start_mock(mock).await;
        let app = start_app(&mock_url).await;

        let (status, body) = deliver(&app, "pull_request", pull_request("synchronize")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
        assert!(mock.comments().is_empty());
    }

    #[tokio::test]
    async fn run_completes_after_sender_disconnects() {
        let mock = Mock {
            compare_delay: Duration::from_millis(500),
            ..Mock::default()
        }
        .file("a.ts", "modified")
        .content("a.ts", "main", OLD)
        .content("a.ts", "topic", NEW);
        let (mock_url, mock) = start_mock(mock).await;
        let app = start_app(&mock_url).await;

        let body = pull_request("opened");
        let request = format!(
            "POST /webhooks/github HTTP/1.1\r\nHost: localhost\r\nX-GitHub-Event: pull_request\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let mut stream = tokio::net::TcpStream::connect(app.trim_start_matches("http://"))
            .await
            .unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        drop(stream);

        let mut waited = Duration::ZERO;
        while mock.comments().is_empty() && waited < Duration::from_secs(5) {
            tokio::time::sleep(Duration::from_millis(50)).await;
            waited += Duration::from_millis(50);
        }

        assert_eq!(mock.comments().len(), 1);
        let calls = mock.calls();
        assert_eq!(calls.first().map(String::as_str), Some("compare"));
        assert_eq!(calls.iter().filter(|c| *c == "contents").count(), 2);
        assert_eq!(calls.last().map(String::as_str), Some("comment"));
    }
}

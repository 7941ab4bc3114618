//! End-to-end dispatch against the bundled view.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use ceno_errors::render::{CONTENT_TYPE_HTML, CONTENT_TYPE_TEXT};
use ceno_errors::{
    ErrorCode, ErrorDispatcher, ErrorKind, ErrorPageConfig, ErrorState, RequestContext,
};
use std::sync::Arc;
use tower::ServiceExt;

fn dispatcher() -> ErrorDispatcher {
    let config = ErrorPageConfig::default().with_views_dir(common::bundled_views_dir());
    ErrorDispatcher::from_config(&config)
}

fn state_for(url: &str) -> ErrorState {
    ErrorState::new(RequestContext::new(url.parse().unwrap()))
}

fn should_refresh_meta(body: &str, value: bool) -> bool {
    body.contains(&format!(
        "<meta name=\"ceno-should-refresh\" content=\"{value}\">"
    ))
}

#[test]
fn test_malformed_url_scenario() {
    common::init_test_logging();
    let dispatcher = dispatcher();
    let mut state = state_for("http://example.com/story");

    assert!(dispatcher.handle_cc_error(ErrorCode::new(1101), "bad scheme", &mut state));

    let body = state.response.body();
    assert_eq!(state.response.content_type(), Some(CONTENT_TYPE_HTML));
    assert!(body.contains("bad scheme"));
    assert!(should_refresh_meta(body, false));
    assert!(body.contains("http://example.com/story"));
    assert!(body.contains("You asked for"));
}

#[test]
fn test_waiting_on_peers_scenario() {
    common::init_test_logging();
    let dispatcher = dispatcher();
    let mut state = state_for("http://example.com/");

    assert!(dispatcher.handle_lcs_error(ErrorCode::new(2301), "waiting for peers", &mut state));

    let body = state.response.body();
    assert!(should_refresh_meta(body, true));
    let advice = dispatcher.renderer().translator().t("lcs_lookup_failure_err");
    assert!(body.contains(&advice));
}

#[test]
fn test_auto_refresh_only_for_refreshing_codes() {
    common::init_test_logging();
    let dispatcher = dispatcher();

    for kind in ErrorKind::all() {
        let mut state = state_for("http://example.com/");
        let code = kind.code();
        if code.is_cache_server_error() {
            dispatcher.handle_lcs_error(code, "msg", &mut state);
        } else {
            dispatcher.handle_cc_error(code, "msg", &mut state);
        }
        assert!(
            should_refresh_meta(state.response.body(), kind.auto_refresh()),
            "{:?}",
            kind
        );
    }

    for code in [1103, 1104, 1200] {
        assert!(ErrorCode::new(code).should_refresh());
    }

    let mut unknown = state_for("http://example.com/");
    dispatcher.handle_cc_error(ErrorCode::new(9999), "msg", &mut unknown);
    assert!(should_refresh_meta(unknown.response.body(), false));
}

#[test]
fn test_unknown_code_renders_like_invalid_error() {
    common::init_test_logging();
    let dispatcher = dispatcher();

    let mut unknown = state_for("http://example.com/");
    dispatcher.handle_cc_error(ErrorCode::new(9999), "ignored", &mut unknown);

    let mut invalid = state_for("http://example.com/");
    dispatcher.handle_cc_error(
        ErrorKind::InvalidError.code(),
        "Encountered an unrecognized error code: 9999",
        &mut invalid,
    );

    assert_eq!(unknown.response, invalid.response);
    assert!(unknown.response.body().contains("9999"));
}

#[test]
fn test_missing_view_plain_text() {
    common::init_test_logging();
    let empty = tempfile::tempdir().unwrap();
    let config = ErrorPageConfig::default().with_views_dir(empty.path());
    let dispatcher = ErrorDispatcher::from_config(&config);
    let mut state = state_for("http://example.com/");

    assert!(dispatcher.handle_lcs_error(ErrorCode::new(2130), "lookup failed", &mut state));
    assert_eq!(state.response.content_type(), Some(CONTENT_TYPE_TEXT));
    assert!(state.response.body().contains("error.html"));
    assert!(!state.response.body().contains("<html"));
}

#[test]
fn test_locale_directory_from_config() {
    common::init_test_logging();
    let locales = tempfile::tempdir().unwrap();
    std::fs::write(
        locales.path().join("es-es.all.json"),
        r#"[{"id": "you_asked_for_html", "translation": "Usted pidió"}]"#,
    )
    .unwrap();
    let config = ErrorPageConfig::default()
        .with_views_dir(common::bundled_views_dir())
        .with_locales_dir(locales.path())
        .with_lang("es_ES");
    let dispatcher = ErrorDispatcher::from_config(&config);
    let mut state = state_for("http://example.com/");

    dispatcher.handle_cc_error(ErrorCode::new(1105), "corrupt", &mut state);
    assert!(state.response.body().contains("Usted pidió"));
    // Untranslated strings come from en-us
    assert!(state.response.body().contains("The error we got"));
}

async fn failing_proxy(dispatcher: Arc<ErrorDispatcher>, request: Request<Body>) -> Response {
    let context = RequestContext::from_request(&request);
    tokio::task::spawn_blocking(move || {
        let mut state = ErrorState::new(context);
        dispatcher.handle_lcs_error(ErrorCode::new(2120), "will not serve", &mut state);
        state.into_page().into_response()
    })
    .await
    .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[tokio::test]
async fn test_error_page_through_axum() {
    common::init_test_logging();
    let dispatcher = Arc::new(dispatcher());
    let router = Router::new().route(
        "/{*path}",
        get(move |request: Request<Body>| failing_proxy(dispatcher.clone(), request)),
    );

    let response = router
        .oneshot(
            Request::builder()
                .uri("/blocked/page")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        CONTENT_TYPE_HTML
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("will not serve"));
    assert!(body.contains("/blocked/page"));
}

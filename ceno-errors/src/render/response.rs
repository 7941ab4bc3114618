//! Request and response handles the renderer works against.

use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// What the renderer needs to know about the request that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    url: Uri,
}

impl RequestContext {
    pub fn new(url: Uri) -> Self {
        Self { url }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::new(request.uri().clone())
    }

    /// The URL the user asked for.
    pub fn url(&self) -> &Uri {
        &self.url
    }
}

/// A buffered error response.
///
/// The request layer hands one to the dispatcher and converts it into an
/// HTTP response once the handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: String,
}

impl Default for PageResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: String::new(),
        }
    }
}

impl PageResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever was written with a complete response body.
    pub fn respond(&mut self, content_type: &'static str, body: String) {
        self.content_type = Some(content_type);
        self.body = body;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.content_type
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// True once a handler has produced a response.
    pub fn is_written(&self) -> bool {
        self.content_type.is_some()
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}

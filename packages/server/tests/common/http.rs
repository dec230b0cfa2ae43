//! Request builders and response readers for router tests.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response};
use serde_json::Value;
use vendor_core::domains::registration::RegistrationSubmission;

pub const MULTIPART_BOUNDARY: &str = "vendor-test-boundary";

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values of a response
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// `name=value` pair of the named cookie, ready for a `Cookie` header
pub fn cookie_pair(response: &Response<Body>, name: &str) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|c| c.starts_with(&format!("{}=", name)))
        .and_then(|c| c.split(';').next().map(str::to_string))
}

/// A form-data body in the shape the registration form posts.
pub struct MultipartBody {
    buf: String,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            MULTIPART_BOUNDARY, name, value
        ));
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, contents: &str) -> Self {
        self.buf.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n{}\r\n",
            MULTIPART_BOUNDARY, name, filename, content_type, contents
        ));
        self
    }

    /// Text parts for the three JSON sections plus the password
    pub fn from_submission(submission: &RegistrationSubmission) -> Self {
        Self::new()
            .text(
                "CompanyInfo",
                &serde_json::to_string(&submission.company_info).unwrap(),
            )
            .text(
                "ContactDetails",
                &serde_json::to_string(&submission.contact_details).unwrap(),
            )
            .text("Address", &serde_json::to_string(&submission.address).unwrap())
            .text("password", &submission.password)
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.buf.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(self.buf))
            .unwrap()
    }
}

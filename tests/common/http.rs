//! In-process calls against the router, decoded into the API envelope.

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;

use vision_backend::constants::USER_ID_HEADER;

use super::app::TestApp;

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Reply {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// `data.id` of a created record.
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .unwrap_or_else(|| panic!("no id in {}", self.body))
            .to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn assert_ok(&self) {
        assert!(self.status.is_success(), "status {}: {}", self.status, self.body);
        assert_eq!(self.body["success"], true);
        assert!(self.body.get("data").is_some());
    }

    pub fn assert_error(&self, status: StatusCode, code: &str) {
        assert_eq!(self.status, status, "body: {}", self.body);
        assert_eq!(self.body["success"], false);
        assert_eq!(self.body["code"], code);
        assert!(self.body["message"].is_string());
    }
}

impl TestApp {
    pub async fn get(&self, path: &str, caller: Option<&str>) -> Reply {
        self.call(Method::GET, path, caller, None).await
    }

    pub async fn post(&self, path: &str, caller: Option<&str>, body: Value) -> Reply {
        self.call(Method::POST, path, caller, Some(body)).await
    }

    pub async fn put(&self, path: &str, caller: Option<&str>, body: Value) -> Reply {
        self.call(Method::PUT, path, caller, Some(body)).await
    }

    pub async fn delete(&self, path: &str, caller: Option<&str>) -> Reply {
        self.call(Method::DELETE, path, caller, None).await
    }

    /// `caller` goes out as the `x-user-id` header.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> Reply {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user_id) = caller {
            builder = builder.header(USER_ID_HEADER, user_id);
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> Reply {
        let resp = self.app.clone().oneshot(req).await.expect("router response");
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        Reply {
            status,
            headers,
            body,
        }
    }
}

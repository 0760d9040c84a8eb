//! In-memory GitHub stand-in for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::client::GitHubApi;
use super::error::RequestError;

type Call = (String, Vec<(String, String)>);

enum Route {
    Items(Vec<serde_json::Value>),
    Body(String),
    Status(u16),
}

/// Serves paginated listings per path and records every request it sees.
/// Unknown paths answer 404.
pub struct FakeApi {
    routes: HashMap<String, Route>,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_items(mut self, path: &str, items: Vec<serde_json::Value>) -> Self {
        self.routes.insert(path.to_string(), Route::Items(items));
        self
    }

    pub fn with_body(mut self, path: &str, body: &str) -> Self {
        self.routes.insert(path.to_string(), Route::Body(body.to_string()));
        self
    }

    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(path.to_string(), Route::Status(status));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

fn param(params: &[(&str, String)], key: &str) -> Option<usize> {
    params
        .iter()
        .find(|(k, _)| *k == key)
        .and_then(|(_, v)| v.parse().ok())
}

impl GitHubApi for FakeApi {
    async fn get_raw(&self, path: &str, params: &[(&str, String)]) -> Result<String, RequestError> {
        self.calls.borrow_mut().push((
            path.to_string(),
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));

        match self.routes.get(path) {
            Some(Route::Items(items)) => {
                let page = param(params, "page").unwrap_or(1).max(1);
                let per_page = param(params, "per_page").unwrap_or(30);
                let start = ((page - 1) * per_page).min(items.len());
                let end = (start + per_page).min(items.len());
                Ok(serde_json::to_string(&items[start..end]).unwrap())
            }
            Some(Route::Body(body)) => Ok(body.clone()),
            Some(Route::Status(status)) => Err(RequestError::Status {
                path: path.to_string(),
                status: *status,
            }),
            None => Err(RequestError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }
}

/// A pull request shaped like the GitHub REST payload
pub fn fake_pr(
    id: u64,
    created_at: &str,
    merged_at: Option<&str>,
    login: &str,
    repo: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "number": id,
        "title": format!("PR {}", id),
        "created_at": created_at,
        "merged_at": merged_at,
        "user": {"login": login},
        "base": {"ref": "main", "repo": {"full_name": repo}},
    })
}

use super::{ApiError, Variable, VariableCategory, VariableUpdateOptions, Workspace, WorkspaceApi};
use reqwest::blocking::{Client, ClientBuilder, RequestBuilder};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

const JSON_API: &str = "application/vnd.api+json";

/// Requests run until the platform answers; the blocking client would otherwise stop at 30s.
fn client_builder() -> ClientBuilder {
    Client::builder()
        .user_agent(concat!("tfvar/", env!("CARGO_PKG_VERSION")))
        .timeout(None)
}

/// Blocking JSON:API client for the Terraform Cloud / Enterprise v2 API.
pub struct TfeClient {
    http: Client,
    base: Url,
    token: String,
}

impl TfeClient {
    pub fn new(address: &str, token: &str) -> Result<Self, ApiError> {
        Self::with_client(address, token, client_builder().build()?)
    }

    pub fn with_client(address: &str, token: &str, http: Client) -> Result<Self, ApiError> {
        let base = Url::parse(address).map_err(|_| ApiError::Address(address.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Address(address.to_string()));
        }
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ApiError::InvalidToken)?;
        Ok(Self {
            http,
            base,
            token: token.to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Address(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", "v2"])
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token).header(ACCEPT, JSON_API)
    }

    fn fetch(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let resp = self.authorized(req).send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.text()?);
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            _ => {
                let detail = match resp.text() {
                    Ok(body) => error_detail(&body),
                    Err(e) => {
                        debug!(status = status.as_u16(), "reading error body failed: {e}");
                        format!("unreadable response body: {e}")
                    }
                };
                Err(ApiError::Status {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

impl WorkspaceApi for TfeClient {
    fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace, ApiError> {
        let url = self.endpoint(&["organizations", organization, "workspaces", name])?;
        debug!(%url, "reading workspace");
        let body = self.fetch(self.http.get(url))?;
        decode_workspace(&body)
    }

    fn list_variables(&self, workspace_id: &str) -> Result<Vec<Variable>, ApiError> {
        let url = self.endpoint(&["workspaces", workspace_id, "vars"])?;
        debug!(%url, "listing variables");
        let body = self.fetch(self.http.get(url))?;
        decode_variables(&body)
    }

    fn update_variable(
        &self,
        workspace_id: &str,
        variable_id: &str,
        options: &VariableUpdateOptions,
    ) -> Result<Option<Variable>, ApiError> {
        let url = self.endpoint(&["workspaces", workspace_id, "vars", variable_id])?;
        debug!(%url, "updating variable");
        let payload = encode_update(variable_id, options)?;
        let req = self.http.patch(url).header(CONTENT_TYPE, JSON_API).body(payload);
        let body = self.fetch(req)?;
        decode_updated_variable(&body)
    }
}

// ---------------- JSON:API documents ----------------

#[derive(Debug, Deserialize)]
struct Document<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Resource<A> {
    id: String,
    attributes: A,
}

#[derive(Debug, Deserialize)]
struct WorkspaceAttributes {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VariableAttributes {
    key: String,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    category: VariableCategory,
    #[serde(default)]
    hcl: bool,
    #[serde(default)]
    sensitive: bool,
}

impl From<Resource<VariableAttributes>> for Variable {
    fn from(r: Resource<VariableAttributes>) -> Self {
        Variable {
            id: r.id,
            key: r.attributes.key,
            value: r.attributes.value.unwrap_or_default(),
            category: r.attributes.category,
            hcl: r.attributes.hcl,
            sensitive: r.attributes.sensitive,
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateDocument<'a> {
    data: UpdateResource<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateResource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    attributes: &'a VariableUpdateOptions,
}

fn decode_workspace(body: &str) -> Result<Workspace, ApiError> {
    let doc: Document<Resource<WorkspaceAttributes>> = serde_json::from_str(body)?;
    Ok(Workspace {
        id: doc.data.id,
        name: doc.data.attributes.name,
    })
}

fn decode_variables(body: &str) -> Result<Vec<Variable>, ApiError> {
    let doc: Document<Vec<Resource<VariableAttributes>>> = serde_json::from_str(body)?;
    Ok(doc.data.into_iter().map(Variable::from).collect())
}

fn decode_updated_variable(body: &str) -> Result<Option<Variable>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let doc: Document<Option<Resource<VariableAttributes>>> = serde_json::from_str(body)?;
    Ok(doc.data.map(Variable::from))
}

fn encode_update(variable_id: &str, options: &VariableUpdateOptions) -> Result<Vec<u8>, ApiError> {
    let doc = UpdateDocument {
        data: UpdateResource {
            kind: "vars",
            id: variable_id,
            attributes: options,
        },
    };
    serde_json::to_vec(&doc).map_err(ApiError::Encode)
}

/// First human readable message of a JSON:API error document, else the raw body.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorDocument {
        #[serde(default)]
        errors: Vec<serde_json::Value>,
    }
    if let Ok(doc) = serde_json::from_str::<ErrorDocument>(body) {
        let first = doc.errors.first().and_then(|e| match e {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(o) => o
                .get("detail")
                .or_else(|| o.get("title"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        });
        if let Some(msg) = first {
            return msg;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}

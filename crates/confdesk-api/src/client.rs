//! Tenant API client

use reqwest::multipart::Form;
use serde::Serialize;
use serde_json::{Map, Value};

use confdesk_session::SessionStore;

use crate::error::ApiError;
use crate::Result;

/// Body of the `data` field for language value writes
#[derive(Debug, Serialize)]
pub struct LangValuesEnvelope<'a> {
    pub lang_vls: &'a Map<String, Value>,
}

pub struct ApiClient {
    session: SessionStore,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(session: SessionStore, http: reqwest::Client) -> Self {
        Self { session, http }
    }

    /// Base URL for a tenant from the live catalog.
    /// Unknown ids and configs without a URL are rejected here, before any request.
    pub fn resolve_url(&self, tenant_id: &str) -> Result<String> {
        self.session
            .config_by_id(tenant_id)
            .and_then(|config| config.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ApiError::ConfigNotFound(tenant_id.to_string()))
    }

    /// `POST {url}user` with every param plus `token` and `u_hash`
    pub async fn get_user(
        &self,
        tenant_id: &str,
        params: &Map<String, Value>,
        token: &str,
        u_hash: &str,
    ) -> Result<Value> {
        let url = self.resolve_url(tenant_id)?;

        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key.clone(), form_value(value));
        }
        let form = form
            .text("token", token.to_string())
            .text("u_hash", u_hash.to_string());

        tracing::debug!(tenant_id = %tenant_id, "Fetching user");
        self.post_form(format!("{url}user"), form).await
    }

    /// `GET {url}data`
    pub async fn get_constants(&self, tenant_id: &str) -> Result<Value> {
        let url = self.resolve_url(tenant_id)?;

        tracing::debug!(tenant_id = %tenant_id, "Fetching constants");
        let body = self
            .http
            .get(format!("{url}data"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }

    pub async fn upload_lang_values(
        &self,
        tenant_id: &str,
        token: &str,
        u_hash: &str,
        values: &Map<String, Value>,
    ) -> Result<Value> {
        self.post_lang_values("upload", tenant_id, token, u_hash, values)
            .await
    }

    /// Same request as [`ApiClient::upload_lang_values`]; the server decides
    /// what to delete from the payload.
    pub async fn delete_lang_values(
        &self,
        tenant_id: &str,
        token: &str,
        u_hash: &str,
        values: &Map<String, Value>,
    ) -> Result<Value> {
        self.post_lang_values("delete", tenant_id, token, u_hash, values)
            .await
    }

    async fn post_lang_values(
        &self,
        operation: &'static str,
        tenant_id: &str,
        token: &str,
        u_hash: &str,
        values: &Map<String, Value>,
    ) -> Result<Value> {
        let url = self.resolve_url(tenant_id)?;
        let data = serde_json::to_string(&LangValuesEnvelope { lang_vls: values })?;

        let form = Form::new()
            .text("token", token.to_string())
            .text("u_hash", u_hash.to_string())
            .text("data", data);

        tracing::info!(
            tenant_id = %tenant_id,
            operation,
            count = values.len(),
            "Posting language values"
        );
        self.post_form(format!("{url}data"), form).await
    }

    async fn post_form(&self, url: String, form: Form) -> Result<Value> {
        let body = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body)
    }
}

impl Clone for ApiClient {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            http: self.http.clone(),
        }
    }
}

/// Form fields are text: strings go as-is, anything else as its JSON text
fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confdesk_session::{TenantCatalog, TenantConfig};
    use confdesk_storage::Database;
    use serde_json::json;
    use wiremock::matchers::{any, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApiClient {
        let catalog = TenantCatalog::new(
            format!("{}/taxi/c/^CONFIG_ID^/api/v1/", server.uri()),
            vec![
                TenantConfig::new("t1", "One", "active", ""),
                TenantConfig::new("t2", "Two", "active", ""),
            ],
        );
        let http = reqwest::Client::new();
        let session =
            SessionStore::new(Database::open_in_memory().unwrap(), catalog, http.clone());
        session.initialize().unwrap();
        ApiClient::new(session, http)
    }

    fn lang_values() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("greeting".to_string(), json!("hi"));
        values
    }

    #[test]
    fn test_form_value_stringifies() {
        assert_eq!(form_value(&json!("plain")), "plain");
        assert_eq!(form_value(&json!(5)), "5");
        assert_eq!(form_value(&json!(true)), "true");
        assert_eq!(form_value(&json!(null)), "null");
    }

    #[test]
    fn test_envelope_shape() {
        let values = lang_values();
        let data = serde_json::to_string(&LangValuesEnvelope { lang_vls: &values }).unwrap();
        assert_eq!(data, r#"{"lang_vls":{"greeting":"hi"}}"#);
    }

    #[tokio::test]
    async fn test_unknown_tenant_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let values = lang_values();

        assert!(matches!(
            client.resolve_url("t3"),
            Err(ApiError::ConfigNotFound(id)) if id == "t3"
        ));
        assert!(matches!(
            client.get_user("t3", &Map::new(), "tok", "uh").await,
            Err(ApiError::ConfigNotFound(_))
        ));
        assert!(matches!(
            client.get_constants("t3").await,
            Err(ApiError::ConfigNotFound(_))
        ));
        assert!(matches!(
            client.upload_lang_values("t3", "tok", "uh", &values).await,
            Err(ApiError::ConfigNotFound(_))
        ));
        assert!(matches!(
            client.delete_lang_values("t3", "tok", "uh", &values).await,
            Err(ApiError::ConfigNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user_posts_params_and_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/taxi/c/t1/api/v1/user"))
            .and(body_string_contains("name=\"u_id\""))
            .and(body_string_contains("name=\"token\""))
            .and(body_string_contains("name=\"u_hash\""))
            .and(body_string_contains("tok-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "200",
                "data": {"user": {"u_id": 42}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut params = Map::new();
        params.insert("u_id".to_string(), json!(42));

        let body = client
            .get_user("t1", &params, "tok-abc", "uh")
            .await
            .unwrap();

        // Returned verbatim
        assert_eq!(body["data"]["user"]["u_id"], 42);
    }

    #[tokio::test]
    async fn test_get_constants_is_plain_get() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/taxi/c/t2/api/v1/data"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": "200", "data": {"langs": ["en"]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = client.get_constants("t2").await.unwrap();
        assert_eq!(body, json!({"code": "200", "data": {"langs": ["en"]}}));
    }

    #[tokio::test]
    async fn test_upload_and_delete_share_wire_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/taxi/c/t1/api/v1/data"))
            .and(body_string_contains("name=\"data\""))
            .and(body_string_contains(r#"{"lang_vls":{"greeting":"hi"}}"#))
            .and(body_string_contains("name=\"token\""))
            .and(body_string_contains("name=\"u_hash\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "200"})))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let values = lang_values();

        let uploaded = client
            .upload_lang_values("t1", "tok", "uh", &values)
            .await
            .unwrap();
        let deleted = client
            .delete_lang_values("t1", "tok", "uh", &values)
            .await
            .unwrap();

        assert_eq!(uploaded, deleted);
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.get_constants("t1").await,
            Err(ApiError::Http(_))
        ));
    }
}

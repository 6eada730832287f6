use super::source::ListingSource;
use super::types::Page;
use crate::error::{ExportError, Result};
use anyhow::{Context, Result as AnyhowResult};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Fields requested for every list item.
const SELECT_FIELDS: &str =
    "FileLeafRef,FileRef,File_x0020_Size,Author/EMail,Editor/EMail,Created,Modified";

/// Lookup fields that must be expanded for their `EMail` to be returned.
const EXPAND_FIELDS: &str = "Author,Editor";

const ODATA_ACCEPT: &str = "application/json;odata=nometadata";

/// Shape of a list-items response under `odata=nometadata`.
///
/// Items stay raw here; each is decoded on its own in the per-record path.
#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(default)]
    value: Vec<Value>,
    #[serde(rename = "odata.nextLink", default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WebInfo {
    #[serde(rename = "Title", default)]
    title: Option<String>,
}

/// Lists document library items through the SharePoint REST API.
///
/// Authentication uses a bearer token obtained out of band (e.g., from an app registration).
/// The token only becomes an active session once [`connect`](ListingSource::connect) has
/// confirmed the site accepts it.
///
/// # Examples
///
/// ```rust,no_run
/// use library_export::fetch::{ListingSource, SharePointClient};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut client = SharePointClient::new("https://contoso.sharepoint.com/sites/finance", "token")?;
///     client.connect().await?;
///     let page = client.list_items("Shared Documents", 5000, None).await?;
///     println!("Fetched {} items", page.len());
///     client.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct SharePointClient {
    http: Client,
    base_url: String,
    access_token: String,
    session: Option<String>,
}

impl SharePointClient {
    pub fn new(site_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("library_export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExportError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: normalize_url(site_url),
            access_token: access_token.into(),
            session: None,
        })
    }

    /// URL of the first page of items for `library`.
    fn items_url(&self, library: &str, page_size: usize) -> String {
        // OData string literals escape a single quote by doubling it.
        let title = library.replace('\'', "''");
        format!(
            "{}_api/web/lists/GetByTitle('{}')/items?$select={}&$expand={}&$top={}",
            self.base_url,
            urlencoding::encode(&title),
            SELECT_FIELDS,
            EXPAND_FIELDS,
            page_size
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, token: &str) -> AnyhowResult<T> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, ODATA_ACCEPT)
            .send()
            .await
            .context("Request failed")?
            .error_for_status()
            .context("Server rejected the request")?;
        let body = resp.json::<T>().await.context("Failed to parse response body")?;
        Ok(body)
    }
}

#[async_trait]
impl ListingSource for SharePointClient {
    async fn connect(&mut self) -> Result<()> {
        let url = format!("{}_api/web?$select=Title", self.base_url);
        let web: WebInfo = self
            .get_json(&url, &self.access_token)
            .await
            .map_err(|e| ExportError::Connection {
                site: self.base_url.clone(),
                message: format!("{:#}", e),
            })?;
        info!(
            "Connected to site '{}' at {}",
            web.title.as_deref().unwrap_or("<untitled>"),
            self.base_url
        );
        self.session = Some(self.access_token.clone());
        Ok(())
    }

    async fn list_items(
        &self,
        library: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> Result<Page> {
        let fetch_error = |message: String| ExportError::Fetch {
            library: library.to_string(),
            message,
        };
        let token = self
            .session
            .as_deref()
            .ok_or_else(|| fetch_error("not connected".to_string()))?;
        let url = match continuation {
            Some(link) => link.to_string(),
            None => self.items_url(library, page_size),
        };
        let envelope: ListingEnvelope = self
            .get_json(&url, token)
            .await
            .map_err(|e| fetch_error(format!("{:#}", e)))?;
        Ok(Page {
            items: envelope.value,
            next_link: envelope.next_link,
        })
    }

    /// Drops the session. Without one (e.g., after a failed connect) this is a no-op.
    async fn disconnect(&mut self) -> Result<()> {
        match self.session.take() {
            Some(_) => info!("Disconnected from {}", self.base_url),
            None => debug!("No active session for {}, nothing to disconnect", self.base_url),
        }
        Ok(())
    }
}

/// Normalizes the site URL by ensuring it ends with a trailing slash.
fn normalize_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::SourceRecord;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "test-token";

    async fn connected_client(server: &MockServer) -> SharePointClient {
        Mock::given(method("GET"))
            .and(path("/_api/web"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Title": "Finance" })))
            .mount(server)
            .await;
        let mut client = SharePointClient::new(&server.uri(), TOKEN).unwrap();
        client.connect().await.unwrap();
        client
    }

    fn item(name: &str) -> serde_json::Value {
        json!({
            "FileLeafRef": name,
            "FileRef": format!("/sites/finance/Shared Documents/{}", name),
            "File_x0020_Size": "1048576",
            "Author": { "EMail": "alice@example.com" },
            "Editor": { "EMail": "bob@example.com" },
            "Created": "2024-01-02T03:04:05Z",
            "Modified": "2024-02-03T04:05:06Z"
        })
    }

    /// Tests the `normalize_url` function to ensure it correctly adds a trailing slash.
    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://contoso.sharepoint.com/sites/finance"),
            "https://contoso.sharepoint.com/sites/finance/"
        );
        assert_eq!(
            normalize_url("https://contoso.sharepoint.com/sites/finance/"),
            "https://contoso.sharepoint.com/sites/finance/"
        );
    }

    #[test]
    fn test_items_url_escapes_library_title() {
        let client = SharePointClient::new("https://contoso.sharepoint.com/sites/hr", TOKEN).unwrap();
        let url = client.items_url("Bob's Docs", 5000);

        assert!(url.starts_with(
            "https://contoso.sharepoint.com/sites/hr/_api/web/lists/GetByTitle('Bob%27%27s%20Docs')/items?"
        ));
        assert!(url.ends_with("&$top=5000"));
        assert!(url.contains("$expand=Author,Editor"));
    }

    #[tokio::test]
    async fn test_connect_rejected_token_is_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_api/web"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut client = SharePointClient::new(&server.uri(), "expired").unwrap();
        let err = client.connect().await.unwrap_err();

        assert!(matches!(err, ExportError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_list_items_requests_page_size_and_follows_next_link() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;
        let next_link = format!("{}/_api/web/lists/next-page", server.uri());

        Mock::given(method("GET"))
            .and(path_regex(r"/items$"))
            .and(query_param("$top", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [item("a.docx"), item("b.pdf")],
                "odata.nextLink": next_link
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/_api/web/lists/next-page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [item("c.txt")]
            })))
            .mount(&server)
            .await;

        let first = client.list_items("Shared Documents", 2, None).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.items[1]["FileLeafRef"], "b.pdf");
        assert_eq!(first.next_link.as_deref(), Some(next_link.as_str()));

        let second = client
            .list_items("Shared Documents", 2, first.next_link.as_deref())
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert!(second.next_link.is_none());
    }

    #[tokio::test]
    async fn test_list_items_keeps_page_with_wrongly_typed_item() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;
        let mut bad = item("broken.docx");
        bad["Author"] = json!({ "EMail": 12345 });
        Mock::given(method("GET"))
            .and(path_regex(r"/items$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [item("good.docx"), bad, item("also-good.pdf")]
            })))
            .mount(&server)
            .await;

        let page = client.list_items("Docs", 5000, None).await.unwrap();
        assert_eq!(page.len(), 3);

        let decoded: Vec<_> = page.items.iter().map(SourceRecord::try_from).collect();
        assert!(decoded[0].is_ok());
        assert_eq!(
            decoded[1].as_ref().unwrap_err().file_name.as_deref(),
            Some("broken.docx")
        );
        assert!(decoded[2].is_ok());
    }

    #[tokio::test]
    async fn test_list_items_server_error_is_fetch_error() {
        let server = MockServer::start().await;
        let client = connected_client(&server).await;
        Mock::given(method("GET"))
            .and(path_regex(r"/items$"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client.list_items("Shared Documents", 5000, None).await.unwrap_err();

        match err {
            ExportError::Fetch { library, .. } => assert_eq!(library, "Shared Documents"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_items_without_session_fails() {
        let client = SharePointClient::new("http://127.0.0.1:9", TOKEN).unwrap();
        let err = client.list_items("Shared Documents", 10, None).await.unwrap_err();
        assert!(matches!(err, ExportError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_disconnect_releases_session() {
        let server = MockServer::start().await;
        let mut client = connected_client(&server).await;

        client.disconnect().await.unwrap();

        assert!(matches!(
            client.list_items("Docs", 10, None).await,
            Err(ExportError::Fetch { .. })
        ));
        assert!(client.disconnect().await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_after_failed_connect_is_noop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/_api/web"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let mut client = SharePointClient::new(&server.uri(), "revoked").unwrap();

        assert!(client.connect().await.is_err());
        assert!(client.disconnect().await.is_ok());
    }
}

use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::clients::{
    entities::SetlistPage,
    errors::{Error, Result},
};
use crate::fetcher::PageSource;

pub const DEFAULT_BASE_URL: &str = "https://api.setlist.fm/rest/1.0/";

const API_KEY_HEADER: &str = "x-api-key";

pub struct SetlistFmClient {
    http: Client,
    base_url: Url,
}

impl SetlistFmClient {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Setlist.fm base URL {base_url} cannot be used as a base"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| Error::ConfigurationError(format!("Invalid API key: {e}")))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("setlist-export/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(SetlistFmClient { http, base_url })
    }

    // Create a client from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        let api_key = std::env::var("SETLISTFM_API_KEY").map_err(|_| {
            Error::ConfigurationError(
                "Missing SETLISTFM_API_KEY in environment variables. Check README.MD for details."
                    .into(),
            )
        })?;
        let base_url =
            std::env::var("SETLISTFM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&api_key, &base_url)
    }

    pub fn attended_url(&self, username: &str, page: u64) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::ConfigurationError(format!("Cannot extend base URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["user", username, "attended"]);
        url.query_pairs_mut().append_pair("p", &page.to_string());
        Ok(url)
    }

    // Fetch one page of the user's attended concerts
    pub async fn get_attended_page(&self, username: &str, page: u64) -> Result<SetlistPage> {
        let url = self.attended_url(username, page)?;
        debug!("GET {url}");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(Error::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl PageSource for SetlistFmClient {
    async fn fetch_page(&self, username: &str, page: u64) -> Result<SetlistPage> {
        self.get_attended_page(username, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE_JSON: &str = r#"{
        "type": "setlists",
        "itemsPerPage": 20,
        "page": 1,
        "total": 1,
        "setlist": [{
            "eventDate": "01-05-2021",
            "artist": { "name": "ArtistA" },
            "venue": { "name": "VenueX", "city": { "name": "CityY", "country": { "name": "CountryZ" } } }
        }]
    }"#;

    #[test]
    fn builds_attended_url_under_api_root() {
        let client = SetlistFmClient::new("key", DEFAULT_BASE_URL).unwrap();
        let url = client.attended_url("some user", 3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.setlist.fm/rest/1.0/user/some%20user/attended?p=3"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        assert!(matches!(
            SetlistFmClient::new("key", "mailto:someone@example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn sends_key_and_accept_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/fan/attended"))
            .and(query_param("p", "1"))
            .and(header("accept", "application/json"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE_JSON))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SetlistFmClient::new("secret", &mock_server.uri()).unwrap();
        let page = client.get_attended_page("fan", 1).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items_per_page, 20);
        assert_eq!(page.setlist.len(), 1);
    }

    #[tokio::test]
    async fn non_ok_status_carries_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/fan/attended"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&mock_server)
            .await;

        let client = SetlistFmClient::new("secret", &mock_server.uri()).unwrap();
        match client.get_attended_page("fan", 1).await {
            Err(Error::UnexpectedResponse { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected unexpected response error, got {other:?}"),
        }
    }
}

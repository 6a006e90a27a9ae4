//! HTTP client for Amazon offer listings using wreq for TLS fingerprint emulation.

use crate::amazon::error::LookupError;
use crate::config::Config;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::redirect::Policy;
use wreq::Client;
use wreq_util::Emulation;

/// Source of offer-listing pages - enables mocking for tests.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Fetches the first offer-listing page for a normalized ASIN.
    async fn fetch_listing_page(&self, asin: &str) -> Result<String, LookupError>;

    /// Fetches a follow-up page from a pagination href.
    async fn fetch_next_page(&self, href: &str) -> Result<String, LookupError>;
}

/// Amazon HTTP client with browser impersonation.
pub struct AmazonClient {
    client: Client,
    base_url: String,
    condition: String,
}

impl AmazonClient {
    /// Creates a new Amazon client with the given configuration.
    pub fn new(config: &Config) -> Result<Self, LookupError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(Policy::limited(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        // Configure proxy if specified
        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).map_err(LookupError::Client)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(LookupError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            condition: config.condition.clone(),
        })
    }

    /// Builds the offer-listing URL for a normalized ASIN.
    pub fn listing_url(&self, asin: &str) -> String {
        format!(
            "{}/gp/offer-listing/{}/ref=dp_olp_all_mbc?ie=UTF8&condition={}",
            self.base_url,
            urlencoding::encode(asin),
            urlencoding::encode(&self.condition)
        )
    }

    /// Resolves a pagination href against the base URL.
    pub fn resolve_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(rest) = href.strip_prefix("//") {
            let scheme = self.base_url.split_once("://").map_or("https", |(scheme, _)| scheme);
            format!("{}://{}", scheme, rest)
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    /// Performs a GET request with browser emulation.
    async fn get(&self, url: &str) -> Result<String, LookupError> {
        debug!("GET {}", url);

        let transport = |source: wreq::Error| LookupError::Transport { url: url.to_string(), source };

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy.");
            return Err(LookupError::RateLimited { url: url.to_string() });
        }

        if !status.is_success() {
            return Err(LookupError::Status { status: status.as_u16(), url: url.to_string() });
        }

        let final_url = response.uri().to_string();
        if !final_url.starts_with(&self.base_url) {
            warn!("Redirected away from {}: {}", self.base_url, final_url);
        }

        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl OfferSource for AmazonClient {
    async fn fetch_listing_page(&self, asin: &str) -> Result<String, LookupError> {
        let url = self.listing_url(asin);

        info!("Fetching offer listing: {}", asin);
        self.get(&url).await
    }

    async fn fetch_next_page(&self, href: &str) -> Result<String, LookupError> {
        let url = self.resolve_url(href);

        info!("Fetching next offer page");
        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_test_config(base_url: &str) -> Config {
        Config { base_url: base_url.to_string(), ..Config::default() }
    }

    #[tokio::test]
    async fn test_listing_url_default() {
        let client = AmazonClient::new(&Config::default()).unwrap();
        assert_eq!(
            client.listing_url("0134685991"),
            "https://www.amazon.com/gp/offer-listing/0134685991/ref=dp_olp_all_mbc?ie=UTF8&condition=all"
        );
    }

    #[tokio::test]
    async fn test_listing_url_custom_condition() {
        let mut config = make_test_config("http://localhost:8080/");
        config.condition = "used".to_string();
        let client = AmazonClient::new(&config).unwrap();
        assert_eq!(
            client.listing_url("B08N5WRWNW"),
            "http://localhost:8080/gp/offer-listing/B08N5WRWNW/ref=dp_olp_all_mbc?ie=UTF8&condition=used"
        );
    }

    #[tokio::test]
    async fn test_listing_url_encodes_asin() {
        let client = AmazonClient::new(&Config::default()).unwrap();
        let url = client.listing_url("a/b?c");
        assert!(url.contains("/gp/offer-listing/a%2Fb%3Fc/"));
    }

    #[tokio::test]
    async fn test_resolve_url() {
        let client = AmazonClient::new(&make_test_config("https://www.amazon.com")).unwrap();
        assert_eq!(
            client.resolve_url("/gp/offer-listing/X/ref=olp_page_next?startIndex=10"),
            "https://www.amazon.com/gp/offer-listing/X/ref=olp_page_next?startIndex=10"
        );
        assert_eq!(
            client.resolve_url("gp/offer-listing/X"),
            "https://www.amazon.com/gp/offer-listing/X"
        );
        assert_eq!(
            client.resolve_url("https://smile.amazon.com/gp/offer-listing/X"),
            "https://smile.amazon.com/gp/offer-listing/X"
        );
    }

    #[tokio::test]
    async fn test_resolve_url_scheme_edge_cases() {
        let client = AmazonClient::new(&make_test_config("https://www.amazon.com")).unwrap();
        assert_eq!(
            client.resolve_url("//smile.amazon.com/gp/offer-listing/X"),
            "https://smile.amazon.com/gp/offer-listing/X"
        );
        assert_eq!(
            client.resolve_url("httpfoo/gp/offer-listing/X"),
            "https://www.amazon.com/httpfoo/gp/offer-listing/X"
        );

        let client = AmazonClient::new(&make_test_config("http://127.0.0.1:8080")).unwrap();
        assert_eq!(client.resolve_url("//example.com/page"), "http://example.com/page");
    }

    #[tokio::test]
    async fn test_fetch_listing_page_follows_redirect() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gp/offer-listing/0134685991/ref=dp_olp_all_mbc"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/landing"))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/landing"))
            .respond_with(ResponseTemplate::new(200).set_body_string("LANDED"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let body = client.fetch_listing_page("0134685991").await.unwrap();
        assert_eq!(body, "LANDED");
    }

    #[tokio::test]
    async fn test_fetch_listing_page_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gp/offer-listing/0134685991/ref=dp_olp_all_mbc"))
            .and(query_param("condition", "all"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><div class=\"olpOffer\">offer</div></html>"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let body = client.fetch_listing_page("0134685991").await.unwrap();
        assert!(body.contains("olpOffer"));
    }

    #[tokio::test]
    async fn test_fetch_next_page_resolves_href() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/gp/offer-listing/0134685991/ref=olp_page_next"))
            .and(query_param("startIndex", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>page 2</html>"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let body = client
            .fetch_next_page("/gp/offer-listing/0134685991/ref=olp_page_next?ie=UTF8&startIndex=10")
            .await
            .unwrap();
        assert!(body.contains("page 2"));
    }

    #[tokio::test]
    async fn test_rate_limited_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let err = client.fetch_listing_page("0134685991").await.unwrap_err();
        assert!(matches!(err, LookupError::RateLimited { .. }));
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_http_error_404() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let err = client.fetch_listing_page("INVALIDASIN").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { status: 404, .. }));
        assert!(!err.is_parse_error());
    }

    #[tokio::test]
    async fn test_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&mock_server)
            .await;

        let client = AmazonClient::new(&make_test_config(&mock_server.uri())).unwrap();

        let body = client.fetch_listing_page("0134685991").await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on port 1
        let client = AmazonClient::new(&make_test_config("http://127.0.0.1:1")).unwrap();

        let err = client.fetch_listing_page("0134685991").await.unwrap_err();
        assert!(matches!(err, LookupError::Transport { .. }));
        assert_eq!(err.exit_code(), 4);
        // The cause is carried as the error source, not repeated in the message
        assert!(err.to_string().ends_with("condition=all failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

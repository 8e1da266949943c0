use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

/// Product record as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub daily_rental_price: Decimal,
    pub purchase_price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid search endpoint: {0}")]
    Endpoint(String),
}

/// Free-text product search. Idempotent and side-effect free.
pub trait ProductSearch {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Product>, SearchError>> + Send;
}

/// Product API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(base: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base: base.into(),
            client,
        }
    }

    fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        let raw = format!("{}/products/search", self.base.trim_end_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| SearchError::Endpoint(e.to_string()))?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }
}

impl ProductSearch for HttpCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Product>, SearchError> {
        let url = self.search_url(query)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let products: Vec<Product> = serde_json::from_str(&body)?;
        Ok(products)
    }
}

/// In-memory catalog matching on product name, case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load from a JSON array in the same shape the HTTP endpoint returns.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
}

impl ProductSearch for StaticCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Product>, SearchError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CATALOG: &str = r#"[
        {"id": "d1", "name": "Váy cưới Ren Pháp", "dailyRentalPrice": 1500000,
         "purchasePrice": 25000000, "images": ["a.jpg"], "avgRating": 4.5},
        {"id": "d2", "name": "Áo dài cưới đỏ", "dailyRentalPrice": "800000",
         "purchasePrice": "9000000"}
    ]"#;

    #[test]
    fn test_product_deserialize() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.products.len(), 2);

        let first = &catalog.products[0];
        assert_eq!(first.daily_rental_price, dec!(1500000));
        assert_eq!(first.avg_rating, Some(4.5));

        let second = &catalog.products[1];
        assert_eq!(second.purchase_price, dec!(9000000));
        assert!(second.images.is_empty());
        assert_eq!(second.avg_rating, None);
    }

    #[tokio::test]
    async fn test_static_search_case_insensitive() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();

        let hits = catalog.search("  REN ").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "d1");

        let all = catalog.search("").await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_search_url() {
        let api = HttpCatalog::new("http://shop.local/api/");
        let url = api.search_url("váy ren").unwrap();
        assert_eq!(
            url.as_str(),
            "http://shop.local/api/products/search?q=v%C3%A1y+ren"
        );
    }

    /// Serve one canned HTTP response on a local port, return the API base.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn local_catalog(base: String) -> HttpCatalog {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpCatalog::with_client(base, client)
    }

    #[tokio::test]
    async fn test_http_search_ok() {
        let base = serve_once("200 OK", CATALOG).await;
        let hits = local_catalog(base).search("ren").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "d1");
    }

    #[tokio::test]
    async fn test_http_non_success_is_status_error() {
        let base = serve_once("503 Service Unavailable", "").await;
        let err = local_catalog(base).search("ren").await.unwrap_err();
        assert!(matches!(err, SearchError::Status(503)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_http_bad_body_is_decode_error() {
        let base = serve_once("200 OK", "{\"not\": \"a list\"}").await;
        let err = local_catalog(base).search("ren").await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn test_bad_base_is_endpoint_error() {
        let api = HttpCatalog::new("not a url");
        assert!(matches!(api.search_url("x"), Err(SearchError::Endpoint(_))));
    }
}

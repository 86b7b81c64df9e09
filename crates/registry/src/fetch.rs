use {async_trait::async_trait, bytes::Bytes, url::Url};

use crate::error::{FetchError, Result, SyncError};

/// Retrieves the bytes of one registry file, addressed by its manifest path.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Fetch `path`. Transport failures and non-success statuses both surface
    /// as [`FetchError`]; this never panics or returns another error kind.
    async fn fetch(&self, path: &str) -> std::result::Result<Bytes, FetchError>;
}

/// Fetches files relative to a fixed base URL.
pub struct HttpFileFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFileFetcher {
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|source| SyncError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(Self { client, base })
    }

    /// Remote URL for a manifest path. Each `/`-separated segment is appended
    /// to the base path and percent-encoded, so a path can never change the
    /// host or scheme.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        url
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    async fn fetch(&self, path: &str) -> std::result::Result<Bytes, FetchError> {
        let url = self.url_for(path);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        resp.bytes().await.map_err(FetchError::network)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_joins_segments_onto_base() {
        let fetcher =
            HttpFileFetcher::new(reqwest::Client::new(), "https://registry.example/files").unwrap();
        assert_eq!(
            fetcher.url_for("review/SKILL.md").as_str(),
            "https://registry.example/files/review/SKILL.md"
        );

        let fetcher =
            HttpFileFetcher::new(reqwest::Client::new(), "https://registry.example/files/").unwrap();
        assert_eq!(
            fetcher.url_for("review/SKILL.md").as_str(),
            "https://registry.example/files/review/SKILL.md"
        );
    }

    #[test]
    fn url_for_encodes_segments() {
        let fetcher = HttpFileFetcher::new(reqwest::Client::new(), "https://registry.example/").unwrap();
        assert_eq!(
            fetcher.url_for("my skill/notes?.md").as_str(),
            "https://registry.example/my%20skill/notes%3F.md"
        );
    }

    #[test]
    fn rejects_unparseable_base() {
        assert!(matches!(
            HttpFileFetcher::new(reqwest::Client::new(), "not a url"),
            Err(SyncError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpFileFetcher::new(reqwest::Client::new(), "mailto:ops@example.com"),
            Err(SyncError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn fetch_returns_body_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/review/SKILL.md")
            .with_status(200)
            .with_body("---\nname: review\n---\n")
            .create_async()
            .await;

        let fetcher =
            HttpFileFetcher::new(reqwest::Client::new(), &format!("{}/files/", server.url())).unwrap();
        let bytes = fetcher.fetch("review/SKILL.md").await.unwrap();
        assert_eq!(&bytes[..], b"---\nname: review\n---\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_maps_status_to_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/files/missing.md")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let fetcher =
            HttpFileFetcher::new(reqwest::Client::new(), &format!("{}/files/", server.url())).unwrap();
        let err = fetcher.fetch("missing.md").await.unwrap_err();
        assert_eq!(err.status, Some(404));
    }

    #[tokio::test]
    async fn fetch_maps_transport_failure_to_fetch_error() {
        let fetcher = HttpFileFetcher::new(reqwest::Client::new(), "http://127.0.0.1:9/files/").unwrap();
        let err = fetcher.fetch("a.md").await.unwrap_err();
        assert_eq!(err.status, None);
    }
}

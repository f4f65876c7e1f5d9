//! DAC client capability and its HTTP realization.

use std::{fmt::Debug, time::Duration};

use alloy_primitives::{B256, Bytes, keccak256};
use async_trait::async_trait;
use url::Url;

use crate::{DacError, config::parse_member};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts L2 blobs to a data availability committee and reads them back.
#[async_trait]
pub trait DacClient: Debug + Send + Sync {
    /// Stores `data` with every committee member and returns its keccak256 commitment.
    async fn put_blob(&self, data: Bytes) -> Result<B256, DacError>;

    /// Fetches the blob for `commitment` from the first member that serves matching data.
    async fn get_blob(&self, commitment: B256) -> Result<Bytes, DacError>;
}

/// Returns true if `data` hashes to `commitment`.
pub fn verify_commitment(commitment: B256, data: &[u8]) -> bool {
    keccak256(data) == commitment
}

/// HTTP client for a data availability committee.
///
/// Members expose `POST {base}/put/{commitment}` and `GET {base}/get/{commitment}`.
#[derive(Debug, Clone)]
pub struct HttpDacClient {
    client: reqwest::Client,
    members: Vec<Url>,
}

impl HttpDacClient {
    /// Creates a client for the given member URLs.
    ///
    /// Only parses the URLs; no connection is opened until the first request.
    pub fn new(urls: &[String]) -> Result<Self, DacError> {
        Self::with_timeout(urls, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(urls: &[String], timeout: Duration) -> Result<Self, DacError> {
        let members = urls.iter().map(|url| parse_member(url)).collect::<Result<Vec<_>, _>>()?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DacError::Client(e.to_string()))?;
        Ok(Self { client, members })
    }

    /// Committee member base URLs.
    pub fn members(&self) -> &[Url] {
        &self.members
    }

    fn endpoint(member: &Url, action: &str, commitment: B256) -> String {
        format!("{}/{action}/{commitment}", member.as_str().trim_end_matches('/'))
    }

    async fn put_one(&self, member: &Url, commitment: B256, data: &Bytes) -> Result<(), DacError> {
        let url = Self::endpoint(member, "put", commitment);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| DacError::Http { url: url.clone(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DacError::Status { url, status: status.as_u16() });
        }
        Ok(())
    }

    async fn get_one(&self, member: &Url, commitment: B256) -> Result<Bytes, DacError> {
        let url = Self::endpoint(member, "get", commitment);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DacError::Http { url: url.clone(), message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DacError::Status { url, status: status.as_u16() });
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| DacError::Http { url: url.clone(), message: e.to_string() })?;
        Ok(Bytes::from(body.to_vec()))
    }
}

#[async_trait]
impl DacClient for HttpDacClient {
    async fn put_blob(&self, data: Bytes) -> Result<B256, DacError> {
        let commitment = keccak256(&data);
        for member in &self.members {
            self.put_one(member, commitment, &data).await?;
            tracing::debug!(member = %member, %commitment, size = data.len(), "blob stored");
        }
        Ok(commitment)
    }

    async fn get_blob(&self, commitment: B256) -> Result<Bytes, DacError> {
        for member in &self.members {
            match self.get_one(member, commitment).await {
                Ok(data) if verify_commitment(commitment, &data) => return Ok(data),
                Ok(_) => {
                    tracing::warn!(
                        member = %member,
                        %commitment,
                        "DAC member served mismatched blob"
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        member = %member,
                        %commitment,
                        error = %e,
                        "DAC member fetch failed"
                    );
                }
            }
        }
        Err(DacError::Unavailable { commitment, attempts: self.members.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refused() -> HttpDacClient {
        // Port 1 on loopback refuses connections immediately.
        HttpDacClient::with_timeout(&["http://127.0.0.1:1".to_string()], Duration::from_secs(2))
            .unwrap()
    }

    #[test]
    fn test_verify_commitment() {
        let data = b"l2 blob payload";
        assert!(verify_commitment(keccak256(data), data));
        assert!(!verify_commitment(B256::ZERO, data));
    }

    #[test]
    fn test_endpoint_layout() {
        let member = Url::parse("http://dac-0:8888/base/").unwrap();
        let commitment = keccak256(b"x");
        assert_eq!(
            HttpDacClient::endpoint(&member, "get", commitment),
            format!("http://dac-0:8888/base/get/{commitment}")
        );
        assert!(HttpDacClient::endpoint(&member, "put", commitment).contains("/put/0x"));
    }

    #[test]
    fn test_construction_keeps_member_order() {
        let urls = vec!["http://dac-1".to_string(), "http://dac-0".to_string()];
        let client = HttpDacClient::new(&urls).unwrap();
        let hosts: Vec<_> = client.members().iter().filter_map(Url::host_str).collect();
        assert_eq!(hosts, vec!["dac-1", "dac-0"]);
    }

    #[tokio::test]
    async fn test_put_fails_when_member_unreachable() {
        let err = refused().put_blob(Bytes::from_static(b"data")).await.unwrap_err();
        assert!(matches!(err, DacError::Http { .. }));
    }

    #[tokio::test]
    async fn test_get_reports_unavailable() {
        let commitment = keccak256(b"data");
        let err = refused().get_blob(commitment).await.unwrap_err();
        assert!(matches!(
            err,
            DacError::Unavailable { attempts: 1, commitment: c } if c == commitment
        ));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//! Default asset fetcher for local files and data: URIs

use crate::traits::{AssetFetcher, FetchError};
use base64::Engine;
use std::path::PathBuf;

/// Fetcher that reads local paths and decodes base64 `data:` URIs.
///
/// Remote `http(s)` locators are refused with a typed error so the caller
/// can substitute its own network-capable fetcher when it wants one.
pub struct FsAssetFetcher {
    /// Base directory for relative paths
    pub root: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FsAssetFetcher {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetFetcher for FsAssetFetcher {
    fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        if locator.starts_with("data:") {
            return decode_data_uri(locator);
        }
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return Err(FetchError::RemoteNotSupported(locator.to_string()));
        }
        Ok(std::fs::read(self.root.join(locator))?)
    }
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>, FetchError> {
    let payload = uri
        .split_once("base64,")
        .map(|(_, rest)| rest)
        .ok_or(FetchError::InvalidDataUri)?;
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|_| FetchError::InvalidDataUri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_decodes_base64_payload() {
        let fetcher = FsAssetFetcher::default();
        // "hello" in base64
        let bytes = fetcher.fetch("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_data_uri_without_base64_marker_is_invalid() {
        let fetcher = FsAssetFetcher::default();
        assert!(matches!(
            fetcher.fetch("data:image/png,rawbytes"),
            Err(FetchError::InvalidDataUri)
        ));
    }

    #[test]
    fn test_remote_locator_is_refused() {
        let fetcher = FsAssetFetcher::default();
        assert!(matches!(
            fetcher.fetch("https://example.com/pic.png"),
            Err(FetchError::RemoteNotSupported(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let fetcher = FsAssetFetcher::default();
        assert!(matches!(
            fetcher.fetch("definitely/not/a/real/file.png"),
            Err(FetchError::Io(_))
        ));
    }
}

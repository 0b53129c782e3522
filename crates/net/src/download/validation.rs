//! URL validation and HTTP response validation for downloads

use arcade_errors::{Error, NetworkError};
use url::Url;

/// Validate URL and check for supported protocols
pub(crate) fn validate_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::InvalidUrl(format!("unsupported scheme {scheme}: {url}")).into()),
    }
}

/// Validate HTTP response status
pub(crate) fn validate_response(response: &reqwest::Response) -> Result<(), Error> {
    let status = response.status();

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    Ok(())
}

/// Last non-empty path segment of `url`, used as the staged archive name
///
/// # Errors
///
/// Returns an error if the URL is malformed or has no file name.
pub fn filename_from_url(url: &str) -> Result<String, Error> {
    let parsed = validate_url(url)?;
    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(str::to_string)
        .ok_or_else(|| NetworkError::InvalidUrl(format!("no file name in {url}")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("http://cdn.example.com/games/g1.zip").unwrap(),
            "g1.zip"
        );
        assert_eq!(
            filename_from_url("https://cdn.example.com/a/b/g2.zip?token=1").unwrap(),
            "g2.zip"
        );
        assert_eq!(
            filename_from_url("https://cdn.example.com/dir/g3.zip/").unwrap(),
            "g3.zip"
        );
    }

    #[test]
    fn test_filename_requires_segment() {
        assert!(filename_from_url("https://cdn.example.com/").is_err());
        assert!(filename_from_url("not a url").is_err());
        assert!(filename_from_url("ftp://cdn.example.com/g1.zip").is_err());
    }
}

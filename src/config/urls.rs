//! Endpoint url file loading.
//!
//! The url file lists one queue endpoint per line. Blank lines are skipped
//! and lines that fail url validation are dropped with a warning; an empty
//! surviving list is a fatal configuration error, since the exporter could
//! never produce a metric.

use std::path::Path;

use super::validation::ConfigError;

/// Check that a line is a well-formed absolute http(s) url.
fn is_valid_url(candidate: &str) -> bool {
    match url::Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

/// Load and validate the endpoint list from a file.
///
/// Endpoint order follows file order; duplicates are kept as-is.
///
/// # Errors
/// Returns `ConfigError` if the file cannot be read or no valid urls remain.
pub fn load_url_file(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "Reading endpoint url file");
    let content = std::fs::read_to_string(path)?;

    let mut urls = Vec::new();
    let mut invalid = 0usize;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_valid_url(line) {
            urls.push(line.to_string());
        } else {
            tracing::warn!(url = %line, "String is not a valid url. Skipping...");
            invalid += 1;
        }
    }

    if invalid > 0 {
        tracing::warn!(
            count = invalid,
            path = %path.display(),
            "Removed url(s) due to invalid format"
        );
    }

    if urls.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "no valid endpoint urls in '{}'",
            path.display()
        )));
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_url_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_valid_urls_in_file_order() {
        let file = write_url_file(
            "http://gradle-a.example.com/queue\nhttps://gradle-b.example.com/queue\n",
        );

        let urls = load_url_file(file.path()).unwrap();
        assert_eq!(
            urls,
            vec![
                "http://gradle-a.example.com/queue",
                "https://gradle-b.example.com/queue",
            ]
        );
    }

    #[test]
    fn test_blank_lines_and_whitespace_are_skipped() {
        let file = write_url_file("\n  \nhttp://gradle.example.com/queue  \n\n");

        let urls = load_url_file(file.path()).unwrap();
        assert_eq!(urls, vec!["http://gradle.example.com/queue"]);
    }

    #[test]
    fn test_invalid_lines_are_dropped() {
        let file = write_url_file(
            "not a url\nhttp://gradle.example.com/queue\nftp://wrong-scheme.example.com\nexample.com/no-scheme\n",
        );

        let urls = load_url_file(file.path()).unwrap();
        assert_eq!(urls, vec!["http://gradle.example.com/queue"]);
    }

    #[test]
    fn test_no_valid_urls_is_fatal() {
        let file = write_url_file("not a url\n\n");

        let result = load_url_file(file.path());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("no valid endpoint urls")
        );
    }

    #[test]
    fn test_empty_file_is_fatal() {
        let file = write_url_file("");
        assert!(load_url_file(file.path()).is_err());
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let result = load_url_file("/nonexistent/urls.txt");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}

use url::{ParseError, Url};

/// Resolves `path` under `base`, treating `base` as a directory even without a trailing slash.
pub fn join_endpoint(base: &str, path: &str) -> Result<Url, ParseError> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }

    base.join(path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use crate::commons::url::join_endpoint;

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("https://host", "sign-download").unwrap().as_str(),
            "https://host/sign-download"
        );
        assert_eq!(
            join_endpoint("https://host/api", "sign-download").unwrap().as_str(),
            "https://host/api/sign-download"
        );
        assert_eq!(
            join_endpoint("https://host/api/", "/auth/v1/user").unwrap().as_str(),
            "https://host/api/auth/v1/user"
        );
        assert!(join_endpoint("not a url", "sign-download").is_err());
    }
}

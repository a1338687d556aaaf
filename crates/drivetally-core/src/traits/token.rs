//! Access token source.

use async_trait::async_trait;

use crate::error::AppError;
use crate::result::AppResult;

/// Supplies bearer tokens to the HTTP fetch provider.
///
/// Interactive sign-in lives outside drivetally; whatever performs it hands
/// tokens over through this trait.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return a token valid for the next request.
    async fn access_token(&self) -> AppResult<String>;
}

/// A provider that always returns the same pre-acquired token.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a token obtained elsewhere. Empty tokens are rejected.
    pub fn new(token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AppError::configuration(
                "no access token configured (set graph.access_token or DRIVETALLY_ACCESS_TOKEN)",
            ));
        }
        Ok(Self { token })
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> AppResult<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_empty_token_rejected() {
        let err = StaticTokenProvider::new("  ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_returns_token() {
        let provider = StaticTokenProvider::new("abc").unwrap();
        assert_eq!(provider.access_token().await.unwrap(), "abc");
    }

    #[test]
    fn test_debug_redacts() {
        let provider = StaticTokenProvider::new("abc").unwrap();
        assert!(!format!("{provider:?}").contains("abc"));
    }
}

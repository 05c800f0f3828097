//! Credentials for the completion and literature backends.
//!
//! Keys are held as [`secrecy::SecretString`], whose `Debug` output is
//! redacted, so the clients holding them can derive `Debug` safely. Code
//! reads a key through `ExposeSecret` only when building a request.

use secrecy::ExposeSecret;
use std::fmt;

pub use secrecy::SecretString;

/// Optional NCBI E-utilities identification.
///
/// Neither field is required. An API key raises NCBI's rate ceiling, and
/// the contact email is sent so NCBI can reach the operator before blocking.
#[derive(Clone, Default)]
pub struct EutilsCredentials {
    pub api_key: Option<SecretString>,
    pub email: Option<String>,
    /// Reported to NCBI as the `tool` parameter
    pub tool: Option<String>,
}

impl EutilsCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the NCBI API key. A blank key is ignored.
    pub fn with_api_key(mut self, key: impl Into<SecretString>) -> Self {
        let key = key.into();
        self.api_key = (!key.expose_secret().is_empty()).then_some(key);
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Query parameters identifying the caller, appended to every request.
    pub(crate) fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.expose_secret().to_string()));
        }
        if let Some(email) = &self.email {
            params.push(("email", email.clone()));
        }
        if let Some(tool) = &self.tool {
            params.push(("tool", tool.clone()));
        }
        params
    }
}

impl fmt::Debug for EutilsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EutilsCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("email", &self.email)
            .field("tool", &self.tool)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug() {
        let secret = SecretString::from("sk-super-secret-key");
        assert!(!format!("{:?}", secret).contains("sk-super"));
        assert_eq!(secret.expose_secret(), "sk-super-secret-key");
    }

    #[test]
    fn test_eutils_credentials_debug_redacts_key() {
        let creds = EutilsCredentials::new()
            .with_api_key("ncbi-secret")
            .with_email("ops@example.org");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("ncbi-secret"));
        assert!(debug.contains("ops@example.org"));
    }

    #[test]
    fn test_empty_api_key_is_dropped() {
        let creds = EutilsCredentials::new().with_api_key("");
        assert!(creds.api_key.is_none());
        assert!(creds.query_params().is_empty());
    }

    #[test]
    fn test_query_params() {
        let creds = EutilsCredentials::new()
            .with_api_key("k")
            .with_tool("evidence");
        assert_eq!(
            creds.query_params(),
            vec![
                ("api_key", "k".to_string()),
                ("tool", "evidence".to_string()),
            ]
        );
    }
}

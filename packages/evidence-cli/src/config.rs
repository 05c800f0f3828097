use anyhow::{bail, Context, Result};
use claim_evidence::{
    ai::ollama::DEFAULT_OLLAMA_URL, CompletionService, EutilsCredentials, LiteratureSearchClient,
    OllamaClient, OpenAIClient, PipelineConfig, PubMedBackend, RequestPacer, SearchConfig,
    SecretString, DEFAULT_MODEL,
};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Which completion backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Ollama,
    OpenAI,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub ollama_url: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub ncbi_api_key: Option<SecretString>,
    pub ncbi_email: Option<String>,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let backend = var("EVIDENCE_BACKEND").map(|b| b.to_lowercase());
        let backend = match backend.as_deref() {
            None | Some("ollama") => Backend::Ollama,
            Some("openai") => Backend::OpenAI,
            Some(other) => bail!(
                "EVIDENCE_BACKEND must be 'ollama' or 'openai', got '{}'",
                other
            ),
        };

        let openai_api_key = var("OPENAI_API_KEY").map(SecretString::from);
        if backend == Backend::OpenAI && openai_api_key.is_none() {
            bail!("OPENAI_API_KEY must be set when EVIDENCE_BACKEND=openai");
        }

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            None => SearchConfig::default().request_timeout,
        };

        Ok(Self {
            backend,
            ollama_url: var("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL"),
            model: var("EVIDENCE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ncbi_api_key: var("NCBI_API_KEY").map(SecretString::from),
            ncbi_email: var("NCBI_EMAIL"),
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            http_timeout,
        })
    }

    /// Directory batch results are written to.
    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    /// Long-lived history of single-post analyses.
    pub fn manual_history_path(&self) -> PathBuf {
        self.data_dir.join("manual_analyses.jsonl")
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default().with_model(&self.model)
    }

    pub fn completion_service(&self) -> Result<Box<dyn CompletionService>> {
        match self.backend {
            Backend::Ollama => {
                let client = OllamaClient::new(self.http_timeout)
                    .context("Failed to create Ollama client")?
                    .with_base_url(&self.ollama_url);
                Ok(Box::new(client))
            }
            Backend::OpenAI => {
                let key = self
                    .openai_api_key
                    .clone()
                    .context("OPENAI_API_KEY must be set")?;
                let mut client = OpenAIClient::new(key, self.http_timeout)
                    .context("Failed to create OpenAI client")?;
                if let Some(url) = &self.openai_base_url {
                    client = client.with_base_url(url);
                }
                Ok(Box::new(client))
            }
        }
    }

    pub fn search_client(&self) -> Result<LiteratureSearchClient<PubMedBackend>> {
        let search_config = SearchConfig::default().with_request_timeout(self.http_timeout);

        let mut credentials = EutilsCredentials::new().with_tool(env!("CARGO_PKG_NAME"));
        if let Some(key) = &self.ncbi_api_key {
            credentials = credentials.with_api_key(key.clone());
        }
        if let Some(email) = &self.ncbi_email {
            credentials = credentials.with_email(email);
        }

        let backend = PubMedBackend::from_config(&search_config)
            .context("Failed to create PubMed client")?
            .with_credentials(credentials);

        Ok(LiteratureSearchClient::new(backend, RequestPacer::from_config(&search_config)))
    }
}

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub perplexity_api_key: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub figures_bucket: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            perplexity_api_key: require_env("PERPLEXITY_API_KEY")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            s3_region: env_or("S3_REGION", "us-east-1"),
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            figures_bucket: env_or("FIGURES_BUCKET", "figures"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Public URL of an object in the figures bucket (path-style addressing).
    pub fn figure_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.s3_endpoint.trim_end_matches('/'),
            self.figures_bucket,
            key
        )
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        perplexity_api_key: "test-key".into(),
        s3_endpoint: "http://localhost:9000/".into(),
        s3_region: "us-east-1".into(),
        aws_access_key_id: "minio".into(),
        aws_secret_access_key: "minio123".into(),
        figures_bucket: "figures".into(),
        port: 8080,
        rust_log: "info".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_url_joins_endpoint_bucket_key() {
        let config = test_config();
        assert_eq!(
            config.figure_url("figures/abc.png"),
            "http://localhost:9000/figures/figures/abc.png"
        );
    }
}

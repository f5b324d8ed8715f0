use anyhow::{Context, Result};
use storage::query::{QueryOptions, UnknownFieldPolicy};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub identity_service_url: String,
    pub query: QueryOptions,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_page_size = parse_or("DEFAULT_PAGE_SIZE", 20)?;
        let max_page_size = parse_or("MAX_PAGE_SIZE", 100)?;
        anyhow::ensure!(
            default_page_size > 0 && default_page_size <= max_page_size,
            "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE"
        );

        let unknown_fields = match std::env::var("UNKNOWN_FILTER_FIELDS") {
            Ok(value) => value
                .parse::<UnknownFieldPolicy>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("UNKNOWN_FILTER_FIELDS must be 'reject' or 'ignore'")?,
            Err(_) => UnknownFieldPolicy::default(),
        };

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            identity_service_url: std::env::var("IDENTITY_SERVICE_URL")
                .context("Cannot load IDENTITY_SERVICE_URL env variable")?,
            query: QueryOptions {
                default_page_size,
                max_page_size,
                unknown_fields,
            },
        })
    }
}

fn parse_or(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be a positive number")),
        Err(_) => Ok(default),
    }
}

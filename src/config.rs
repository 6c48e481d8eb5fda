use std::env;

use anyhow::{Context, Result};

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    pub collection: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mongodb_uri = env::var("MONGODB_URI").context("MONGODB_URI must be set")?;
        let database = env::var("DB").context("DB must be set")?;
        let collection = env::var("COLLECTION").context("COLLECTION must be set")?;
        let port = env::var("PORT")
            .context("PORT must be set")?
            .parse()
            .context("PORT must be a valid port number")?;

        Ok(Self {
            mongodb_uri,
            database,
            collection,
            port,
        })
    }
}

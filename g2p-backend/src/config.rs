use std::fs;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::{Args, Parser};
use url::Url;

use crate::db::seed_data::SeedData;

pub const DEFAULT_OLS_URL: &str = "https://www.ebi.ac.uk/ols4/api";
pub const DEFAULT_OMIM_URL: &str = "https://api.omim.org/api";

#[derive(Args, serde::Deserialize, Clone)]
pub struct Config {
    #[arg(long, default_value_t)]
    #[serde(default)]
    dev: bool,
    #[arg(long)]
    secrets_dir: Option<Utf8PathBuf>,
    #[arg(long, env = "G2P_DB_USER", default_value_t)]
    db_user: String,
    #[arg(long, env = "G2P_DB_PASSWORD", default_value_t)]
    db_password: String,
    #[arg(long, env = "G2P_DB_HOST", default_value_t = String::from("localhost"))]
    db_host: String,
    #[arg(long, env = "G2P_DB_PORT", default_value_t = 5432)]
    db_port: u16,
    #[arg(long, env = "G2P_DB_NAME", default_value_t)]
    db_name: String,
    #[arg(long, env = "G2P_FRONTEND_TOKEN", default_value_t)]
    frontend_token: String,
    #[arg(long, env = "G2P_BACKEND_HOST", default_value_t = String::from("localhost"))]
    host: String,
    #[arg(long, env = "G2P_BACKEND_PORT", default_value_t = 8000)]
    port: u16,
    #[arg(skip)]
    seed_data: Option<SeedData>,
    #[arg(long, env = "G2P_SEED_DATA_PATH")]
    seed_data_path: Option<Utf8PathBuf>,
    #[arg(long, env = "G2P_OLS_URL", default_value = DEFAULT_OLS_URL)]
    ols_url: Url,
    #[arg(long, env = "G2P_OMIM_URL", default_value = DEFAULT_OMIM_URL)]
    omim_url: Url,
    #[arg(long, env = "G2P_OMIM_API_KEY")]
    omim_api_key: Option<String>,
}

impl Config {
    #[must_use]
    pub fn is_dev(&self) -> bool {
        self.dev
    }

    /// Replaces credentials with the contents of files in `secrets_dir`, one
    /// file per secret. `omim_api_key` and `seed_data` are optional there.
    ///
    /// # Errors
    pub fn read_secrets(&mut self) -> anyhow::Result<()> {
        let Self {
            secrets_dir,
            db_user,
            db_password,
            db_name,
            frontend_token,
            seed_data,
            seed_data_path,
            omim_api_key,
            ..
        } = self;

        let Some(secrets_dir) = secrets_dir else {
            return Ok(());
        };

        let read_secret = |name: &str| {
            fs::read_to_string(secrets_dir.join(name))
                .map(|s| s.trim().to_string())
                .context(format!("failed to read secret {name}"))
        };
        let read_optional_secret = |name: &str| {
            let path = secrets_dir.join(name);
            path.exists().then(|| read_secret(name)).transpose()
        };

        *db_user = read_secret("db_user")?;
        *db_password = read_secret("db_password")?;
        *db_name = read_secret("db_name")?;
        *frontend_token = read_secret("frontend_token")?;

        if let Some(key) = read_optional_secret("omim_api_key")? {
            *omim_api_key = Some(key);
        }

        if let Some(data) = read_optional_secret("seed_data")? {
            *seed_data = Some(serde_json::from_str(&data).context("malformed seed data secret")?);
            *seed_data_path = None;
        }

        Ok(())
    }

    #[must_use]
    pub fn app_address(&self) -> String {
        let Self { host, port, .. } = self;

        format!("{host}:{port}")
    }

    #[must_use]
    pub fn db_url(&self) -> String {
        let Self {
            db_user,
            db_password,
            db_host,
            db_port,
            db_name,
            ..
        } = self;

        format!("postgres://{db_user}:{db_password}@{db_host}:{db_port}/{db_name}")
    }

    #[must_use]
    pub fn frontend_token(&self) -> &str {
        &self.frontend_token
    }

    #[must_use]
    pub fn ols_url(&self) -> &Url {
        &self.ols_url
    }

    #[must_use]
    pub fn omim_url(&self) -> &Url {
        &self.omim_url
    }

    #[must_use]
    pub fn omim_api_key(&self) -> Option<&str> {
        self.omim_api_key.as_deref()
    }

    /// Seed data from the secrets directory or `seed_data_path`, falling back
    /// to the bundled reference data.
    ///
    /// # Errors
    pub fn seed_data(&self) -> anyhow::Result<SeedData> {
        let Self {
            seed_data,
            seed_data_path,
            ..
        } = self;

        match (seed_data, seed_data_path) {
            (Some(seed_data), None) => Ok(seed_data.clone()),
            (None, Some(seed_data_path)) => Ok(serde_json::from_str(
                &fs::read_to_string(seed_data_path)
                    .context(format!("failed to read {seed_data_path}"))?,
            )?),
            (Some(_), Some(_)) => bail!("`seed_data` and `seed_data_path` are mutually exclusive"),
            (None, None) => SeedData::bundled(),
        }
    }
}

#[derive(Parser)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,
    #[arg(long, env = "G2P_LOG_DIR")]
    pub log_dir: Option<Utf8PathBuf>,
}

use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use uuid::Uuid;

/// A throwaway postgres instance for dev mode and tests.
pub struct DevContainer {
    container: ContainerAsync<Postgres>,
    db_password: Option<String>,
}

impl DevContainer {
    /// # Errors
    pub async fn new(container_name: &str, with_password: bool) -> anyhow::Result<Self> {
        let postgres_version = "17-alpine";

        let container = Postgres::default();
        let (container, db_password) = if with_password {
            let pass = Uuid::now_v7().to_string();
            (container.with_password(&pass), Some(pass))
        } else {
            (container.with_host_auth(), None)
        };

        let container = container
            .with_tag(postgres_version)
            .with_container_name(container_name)
            .start()
            .await?;

        Ok(Self {
            container,
            db_password,
        })
    }

    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.db_password.as_deref()
    }

    /// # Errors
    pub async fn db_host(&self) -> anyhow::Result<String> {
        Ok(self.container.get_host().await?.to_string())
    }

    /// # Errors
    pub async fn db_port(&self) -> anyhow::Result<u16> {
        Ok(self.container.get_host_port_ipv4(5432).await?)
    }

    /// # Errors
    pub async fn db_url(&self) -> anyhow::Result<String> {
        let credentials = match self.password() {
            Some(pass) => format!("postgres:{pass}"),
            None => "postgres".to_string(),
        };

        Ok(format!(
            "postgres://{credentials}@{}:{}/postgres",
            self.db_host().await?,
            self.db_port().await?
        ))
    }
}

//! Shared `PostgreSQL` server for integration tests.
//!
//! `CHAT_TEST_DATABASE_URL` points the suite at an existing server through
//! its administrative database. Without it an embedded server is started
//! once per test binary, unless the process runs as root, where `initdb`
//! refuses to run and the suite is skipped.

use diesel::prelude::*;
use postgresql_embedded::PostgreSQL;
use rstest::fixture;
use std::sync::{Mutex, OnceLock, PoisonError};
use tokio::runtime::{Builder, Runtime};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Variable naming an external server's administrative database.
pub const ENV_TEST_DATABASE_URL: &str = "CHAT_TEST_DATABASE_URL";

static SHARED_CLUSTER: OnceLock<Result<Option<ManagedCluster>, String>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

/// Embedded server kept alive for the life of the test binary.
struct EmbeddedServer {
    _runtime: Runtime,
    _postgres: PostgreSQL,
}

/// A reachable `PostgreSQL` server used to host per-test databases.
pub struct ManagedCluster {
    admin_url: String,
    _embedded: Option<EmbeddedServer>,
}

impl ManagedCluster {
    fn discover() -> Result<Option<Self>, BoxError> {
        if let Some(admin_url) = std::env::var(ENV_TEST_DATABASE_URL)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            return Ok(Some(Self {
                admin_url,
                _embedded: None,
            }));
        }
        if running_as_root() {
            return Ok(None);
        }

        let (admin_url, embedded) = start_embedded()?;
        Ok(Some(Self {
            admin_url,
            _embedded: Some(embedded),
        }))
    }

    /// Returns the connection URL for `database` on this server.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        match self.admin_url.rsplit_once('/') {
            Some((base, _)) => format!("{base}/{database}"),
            None => format!("{}/{database}", self.admin_url),
        }
    }

    /// Creates `template` and applies `migrate` to it unless it already
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue query, creation, or migration
    /// fails.
    pub fn ensure_template_exists<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let lock = TEMPLATE_LOCK.get_or_init(|| Mutex::new(()));
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if self.database_exists(template)? {
            return Ok(());
        }

        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Creates `name` as a copy of `template`.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn create_database_from_template(&self, name: &str, template: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(name),
            quote_identifier(template),
        ))
    }

    /// Drops `name`, closing any connections still attached to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    pub fn drop_database(&self, name: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(name)
        ))
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = PgConnection::establish(&self.admin_url)?;
        diesel::sql_query(sql).execute(&mut conn)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = PgConnection::establish(&self.admin_url)?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result::<ExistsRow>(&mut conn)?;
        Ok(row.exists)
    }
}

/// A per-test database dropped when the guard goes out of scope.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Creates `name` from `template` on `cluster`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub async fn from_template(
        cluster: PostgresCluster,
        name: String,
        template: &'static str,
    ) -> Result<Self, BoxError> {
        let db_name = name.clone();
        tokio::task::spawn_blocking(move || {
            cluster.create_database_from_template(&db_name, template)
        })
        .await??;
        let url = cluster.database_url(&name);
        Ok(Self { cluster, name, url })
    }

    /// Returns the connection URL for this database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Provides the shared server, or `None` when the suite must be skipped.
#[fixture]
pub fn postgres_cluster() -> Result<Option<PostgresCluster>, BoxError> {
    let shared =
        SHARED_CLUSTER.get_or_init(|| ManagedCluster::discover().map_err(|err| err.to_string()));
    match shared {
        Ok(cluster) => Ok(cluster.as_ref()),
        Err(message) => Err(message.clone().into()),
    }
}

fn start_embedded() -> Result<(String, EmbeddedServer), BoxError> {
    // The async fixtures already run inside a runtime, so the embedded
    // server gets its own thread and runtime.
    std::thread::spawn(|| -> Result<(String, EmbeddedServer), BoxError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let mut postgres = PostgreSQL::default();
        runtime.block_on(async {
            postgres.setup().await?;
            postgres.start().await
        })?;
        let admin_url = postgres.settings().url("postgres");
        Ok((
            admin_url,
            EmbeddedServer {
                _runtime: runtime,
                _postgres: postgres,
            },
        ))
    })
    .join()
    .map_err(|_| BoxError::from("embedded PostgreSQL start-up panicked"))?
}

#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
const fn running_as_root() -> bool {
    false
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

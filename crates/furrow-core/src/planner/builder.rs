//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use jiff::{tz::TimeZone, Timestamp};
use tokio::task;

use super::{Clock, Planner};
use crate::{
    db::Database,
    error::{PlannerError, Result},
    models::Language,
    oracle::GenerationOracle,
};

/// Country sent to the oracle when none is configured.
pub const DEFAULT_COUNTRY: &str = "IN";

/// Builder for creating and configuring Planner instances.
#[derive(Clone)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    user_id: Option<String>,
    language: Language,
    country: String,
    time_zone: Option<TimeZone>,
    clock: Clock,
    oracle: Option<Arc<dyn GenerationOracle>>,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            user_id: None,
            language: Language::default(),
            country: DEFAULT_COUNTRY.to_string(),
            time_zone: None,
            clock: Clock::System,
            oracle: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/furrow/furrow.db` or `~/.local/share/furrow/furrow.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the caller identity. Blank ids are treated as absent.
    pub fn with_user<S: Into<String>>(mut self, user_id: Option<S>) -> Self {
        self.user_id = user_id
            .map(Into::into)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the time zone for "today" and reminder triggers. Defaults to the
    /// system time zone.
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// Freezes the planner's clock at `now`.
    pub fn with_fixed_now(mut self, now: Timestamp) -> Self {
        self.clock = Clock::Fixed(now);
        self
    }

    /// Configures the generation oracle consulted for new plans.
    pub fn with_oracle(mut self, oracle: Arc<dyn GenerationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the database path is invalid
    /// Returns `PlannerError::Database` if database initialization fails
    pub async fn build(self) -> Result<Planner> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), PlannerError>(())
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Planner {
            db_path,
            user_id: self.user_id,
            language: self.language,
            country: self.country,
            time_zone: self.time_zone.unwrap_or_else(TimeZone::system),
            clock: self.clock,
            oracle: self.oracle,
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("furrow")
            .place_data_file("furrow.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

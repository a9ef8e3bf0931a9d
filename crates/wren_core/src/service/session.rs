//! Session arena: store, datum identity map, and live grids.
//!
//! # Responsibility
//! - Bootstrap well-known records on first launch (`NotFound` recovery).
//! - Own every live `Datum` and `Grid` by key and hand out borrows.
//! - Persist each record synchronously at the end of a mutation.
//!
//! # Invariants
//! - Exactly one grid is current; it is never absent from the session.
//! - A datum is loaded from the store at most once per session.

use crate::config::{
    ConfigError, GridConfig, APPLICATION_KEY, MAIN_GRID_KEY, NAME_COUNTER_KEY,
};
use crate::grid::{Grid, GridError};
use crate::model::application::ApplicationRecord;
use crate::model::datum::Datum;
use crate::model::grid_record::GridRecord;
use crate::model::record::Record;
use crate::model::{new_key, DatumKey, GridKey};
use crate::repo::record_store::{RecordStore, RepoError, RepoResult};
use log::info;
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors escalated to the session caller.
///
/// Unmet user preconditions are not errors; see `Outcome`.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    /// Invariant violation inside the grid engine.
    Grid(GridError),
    Config(ConfigError),
    UnknownGrid(GridKey),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Grid(err) => write!(f, "grid invariant violated: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::UnknownGrid(key) => write!(f, "grid not registered: {key}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Grid(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::UnknownGrid(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<GridError> for ServiceError {
    fn from(value: GridError) -> Self {
        Self::Grid(value)
    }
}

impl From<ConfigError> for ServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

/// Application session over one record store.
pub struct Session<S: RecordStore> {
    store: S,
    config: GridConfig,
    application: ApplicationRecord,
    datums: HashMap<DatumKey, Datum>,
    grid: Grid,
    parked_grids: HashMap<GridKey, Grid>,
}

impl<S: RecordStore> Session<S> {
    /// Opens a session, creating the name counter, application record and
    /// main grid when the store does not have them yet.
    pub fn open(store: S, config: GridConfig) -> ServiceResult<Self> {
        config.validate()?;

        let name_counter = load_or_create(
            &store,
            || store.load_datum(NAME_COUNTER_KEY),
            || Datum::with_key(NAME_COUNTER_KEY, NAME_COUNTER_KEY, "0"),
        )?;
        let mut application = load_or_create(
            &store,
            || store.load_application(APPLICATION_KEY),
            || ApplicationRecord::new(APPLICATION_KEY),
        )?;
        let main_grid = load_or_create(
            &store,
            || store.load_grid(MAIN_GRID_KEY),
            || GridRecord::empty(MAIN_GRID_KEY, &config),
        )?;

        if application.adopt_grid(MAIN_GRID_KEY) {
            store.save(&Record::Application(application.clone()))?;
        }

        let current_key = application
            .current_grid
            .clone()
            .unwrap_or_else(|| MAIN_GRID_KEY.to_string());
        let mut parked_grids = HashMap::new();
        let main_grid = Grid::from_record(main_grid, &config)?;
        let grid = if current_key == MAIN_GRID_KEY {
            main_grid
        } else {
            parked_grids.insert(MAIN_GRID_KEY.to_string(), main_grid);
            Grid::from_record(store.load_grid(&current_key)?, &config)?
        };

        let mut datums = HashMap::new();
        datums.insert(NAME_COUNTER_KEY.to_string(), name_counter);

        info!(
            "event=session_open module=service status=ok grids={} current_clips={}",
            application.grids.len(),
            grid.plane().len()
        );

        Ok(Self {
            store,
            config,
            application,
            datums,
            grid,
            parked_grids,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn application(&self) -> &ApplicationRecord {
        &self.application
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Creates an empty grid, registers it, and makes it current.
    pub fn create_grid(&mut self) -> ServiceResult<GridKey> {
        let key = new_key();
        let grid = Grid::new(key.clone(), &self.config);
        self.store.save(&Record::Grid(grid.to_record()))?;
        self.application.grids.insert(key.clone());
        self.switch_grid(&key)?;
        Ok(key)
    }

    /// Makes a registered grid current, loading it on first use.
    pub fn switch_grid(&mut self, key: &str) -> ServiceResult<()> {
        if self.grid.key() == key {
            return Ok(());
        }
        if !self.application.grids.contains(key) {
            return Err(ServiceError::UnknownGrid(key.to_string()));
        }
        let next = match self.parked_grids.remove(key) {
            Some(grid) => grid,
            None => Grid::from_record(self.store.load_grid(key)?, &self.config)?,
        };
        let previous = std::mem::replace(&mut self.grid, next);
        self.parked_grids.insert(previous.key().to_string(), previous);
        self.application.current_grid = Some(key.to_string());
        self.store
            .save(&Record::Application(self.application.clone()))?;
        info!("event=grid_switch module=service status=ok");
        Ok(())
    }

    /// Borrows a datum, loading it through the identity map.
    pub fn datum(&mut self, key: &str) -> ServiceResult<&Datum> {
        if !self.datums.contains_key(key) {
            let datum = self.store.load_datum(key)?;
            self.datums.insert(key.to_string(), datum);
        }
        self.datums
            .get(key)
            .ok_or_else(|| ServiceError::Repo(RepoError::NotFound(key.to_string())))
    }

    /// Display name of a datum, falling back to its key.
    pub fn datum_name(&mut self, key: &str) -> String {
        self.datum(key)
            .map(|datum| datum.name.clone())
            .unwrap_or_else(|_| key.to_string())
    }

    /// Returns the next datum name and advances the persisted counter.
    pub fn next_datum_name(&mut self) -> ServiceResult<String> {
        let counter = self.datum_mut(NAME_COUNTER_KEY)?;
        let current = counter.content.trim().parse::<u64>().map_err(|_| {
            RepoError::InvalidData(format!(
                "name counter `{}` is not a number",
                counter.content
            ))
        })?;
        counter.set_content((current + 1).to_string());
        self.save_datum(NAME_COUNTER_KEY)?;
        Ok(current.to_string())
    }

    /// Creates and persists a datum named from the counter.
    pub fn create_datum(&mut self, content: impl Into<String>) -> ServiceResult<DatumKey> {
        let name = self.next_datum_name()?;
        let datum = Datum::new(name, content);
        let key = datum.key.clone();
        self.store.save(&Record::Datum(datum.clone()))?;
        self.datums.insert(key.clone(), datum);
        Ok(key)
    }

    /// Replaces a datum's content and persists it.
    pub fn set_datum_content(&mut self, key: &str, content: impl Into<String>) -> ServiceResult<()> {
        self.datum_mut(key)?.set_content(content);
        self.save_datum(key)
    }

    /// Renames a datum and persists it.
    pub fn rename_datum(&mut self, key: &str, name: impl Into<String>) -> ServiceResult<()> {
        self.datum_mut(key)?.set_name(name);
        self.save_datum(key)
    }

    /// Parent chain of `key`, nearest first.
    ///
    /// Parent links are not guaranteed acyclic; the walk stops at the first
    /// repeated datum.
    pub fn ancestors(&mut self, key: &str) -> ServiceResult<Vec<DatumKey>> {
        let mut visited: HashSet<DatumKey> = HashSet::from([key.to_string()]);
        let mut chain = Vec::new();
        let mut cursor = self.datum(key)?.parent.clone();
        while let Some(parent) = cursor {
            if !visited.insert(parent.clone()) {
                break;
            }
            cursor = self.datum(&parent)?.parent.clone();
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Persists the current grid.
    pub fn save_grid(&self) -> ServiceResult<()> {
        self.store.save(&Record::Grid(self.grid.to_record()))?;
        Ok(())
    }

    pub(crate) fn datum_mut(&mut self, key: &str) -> ServiceResult<&mut Datum> {
        self.datum(key)?;
        self.datums
            .get_mut(key)
            .ok_or_else(|| ServiceError::Repo(RepoError::NotFound(key.to_string())))
    }

    pub(crate) fn save_datum(&self, key: &str) -> ServiceResult<()> {
        let datum = self
            .datums
            .get(key)
            .ok_or_else(|| ServiceError::Repo(RepoError::NotFound(key.to_string())))?;
        self.store.save(&Record::Datum(datum.clone()))?;
        Ok(())
    }
}

fn load_or_create<S, T, L, C>(store: &S, load: L, create: C) -> ServiceResult<T>
where
    S: RecordStore,
    T: Clone + Into<Record>,
    L: FnOnce() -> RepoResult<T>,
    C: FnOnce() -> T,
{
    match load() {
        Ok(value) => Ok(value),
        Err(RepoError::NotFound(key)) => {
            let value = create();
            let record: Record = value.clone().into();
            store.save(&record)?;
            info!(
                "event=bootstrap_record module=service status=created kind={} key={}",
                record.kind().as_str(),
                key
            );
            Ok(value)
        }
        Err(err) => Err(err.into()),
    }
}

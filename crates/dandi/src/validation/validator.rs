//! Validation of stored asset and version records.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::record::{AssetRecord, AssetRef, RecordId, RecordKind, Settled, VersionRecord};
use crate::schema::{schema_version_of, SchemaOracle, SchemaRegistry, ValidationMode};
use crate::store::RecordStore;

use super::report::{child_invalid_error, ValidationReport};

/// Loads records, runs them through the schema oracle and writes the
/// settled status back.
///
/// Validation has no side effects beyond that status write, so running it
/// twice on unchanged input yields the same status and error text.
pub struct Validator<S> {
    store: S,
    oracle: Arc<dyn SchemaOracle>,
    mode: ValidationMode,
}

impl<S: RecordStore> Validator<S> {
    /// Validator backed by the built-in schema registry.
    pub fn new(store: S) -> Self {
        Self {
            store,
            oracle: Arc::new(SchemaRegistry::builtin()),
            mode: ValidationMode::default(),
        }
    }

    /// Use a different schema oracle.
    pub fn with_oracle(mut self, oracle: impl SchemaOracle + 'static) -> Self {
        self.oracle = Arc::new(oracle);
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate an asset record and persist the outcome.
    ///
    /// Schema errors end up in the stored `validation_error`; only storage
    /// failures are returned as errors.
    pub fn validate_asset(&self, id: &RecordId) -> Result<Settled> {
        let asset = self.store.get_record(id)?.into_asset()?;
        let run = asset.status.begin_validation()?;
        debug!(record = %id, prior = %run.prior(), "validating asset metadata");

        let report = self.check_asset(&asset)?;
        let settled = run.settle(report.render());
        self.store.save_status(id, &settled)?;

        info!(record = %id, status = %settled.status(), errors = report.len(), "asset validated");
        Ok(settled)
    }

    /// Validate a version record, including the status of its assets, and
    /// persist the outcome.
    pub fn validate_version(&self, id: &RecordId) -> Result<Settled> {
        let version = self.store.get_record(id)?.into_version()?;
        let run = version.status.begin_validation()?;
        debug!(record = %id, prior = %run.prior(), "validating version metadata");

        let children = self.store.get_children(id)?;
        let report = self.check_version(&version, &children)?;
        let settled = run.settle(report.render());
        self.store.save_status(id, &settled)?;

        info!(record = %id, status = %settled.status(), errors = report.len(), "version validated");
        Ok(settled)
    }

    /// Check an asset without touching the store.
    pub fn check_asset(&self, asset: &AssetRecord) -> Result<ValidationReport> {
        let metadata = asset.full_metadata()?;
        let version = schema_version_of(&metadata);
        let errors = self
            .oracle
            .validate(RecordKind::Asset, version.as_deref(), &metadata, self.mode)
            .err()
            .unwrap_or_default();
        Ok(ValidationReport::new(RecordKind::Asset.model_name(), errors))
    }

    /// Check a version against its children without touching the store.
    ///
    /// Schema errors come first; the child aggregate error follows. A
    /// rejected schema version is reported on its own.
    pub fn check_version(
        &self,
        version: &VersionRecord,
        children: &[AssetRef],
    ) -> Result<ValidationReport> {
        let metadata = version.metadata()?;
        let schema_version = schema_version_of(&metadata);
        let mut errors = self
            .oracle
            .validate(RecordKind::Version, schema_version.as_deref(), &metadata, self.mode)
            .err()
            .unwrap_or_default();

        let rejected = errors.first().is_some_and(|e| e.is_version_rejection());
        if !rejected {
            errors.extend(child_invalid_error(children));
        }
        Ok(ValidationReport::new(RecordKind::Version.model_name(), errors))
    }
}

//! Manifest files for a dataset version.
//!
//! A manifest is the version's metadata plus the metadata of each of its
//! assets, written under `dandisets/{identifier}/{version}/` as YAML and as
//! pretty-printed JSON-LD.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::{DandiError, Result};
use crate::record::{DatasetVersion, RecordId};
use crate::store::RecordStore;

pub const DANDISET_MANIFEST: &str = "dandiset.yaml";
pub const ASSETS_MANIFEST: &str = "assets.yaml";
pub const DANDISET_JSONLD: &str = "dandiset.jsonld";
pub const ASSETS_JSONLD: &str = "assets.jsonld";

/// Paths of the files written by [`write_manifests`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    pub dandiset: PathBuf,
    pub assets: PathBuf,
    pub dandiset_jsonld: PathBuf,
    pub assets_jsonld: PathBuf,
}

impl ManifestPaths {
    fn in_dir(dir: &Path) -> Self {
        Self {
            dandiset: dir.join(DANDISET_MANIFEST),
            assets: dir.join(ASSETS_MANIFEST),
            dandiset_jsonld: dir.join(DANDISET_JSONLD),
            assets_jsonld: dir.join(ASSETS_JSONLD),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.dandiset.as_path(),
            self.assets.as_path(),
            self.dandiset_jsonld.as_path(),
            self.assets_jsonld.as_path(),
        ]
    }
}

/// Directory that holds the manifests of `version`, relative to `root`.
///
/// The identifier and label must each be a single plain path component.
pub fn manifest_dir(
    root: impl AsRef<Path>,
    id: &RecordId,
    version: &DatasetVersion,
) -> Result<PathBuf> {
    let identifier = path_segment(id, "dataset identifier", &version.dataset_identifier)?;
    let label = path_segment(id, "version label", &version.version_label)?;
    Ok(root.as_ref().join("dandisets").join(identifier).join(label))
}

fn path_segment<'a>(id: &RecordId, what: &str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(DandiError::storage(
            id,
            format!("{} '{}' is not a valid directory name", what, value),
        ));
    }
    Ok(value)
}

/// Write the manifests of a stored version under `root`.
///
/// Asset metadata includes the asset's digest. Existing manifests are
/// overwritten.
pub fn write_manifests<S: RecordStore>(
    store: &S,
    id: &RecordId,
    root: impl AsRef<Path>,
) -> Result<ManifestPaths> {
    let version = store.get_record(id)?.into_version()?;
    let dir = manifest_dir(root, id, &version.dataset)?;
    let dandiset = Value::Object(version.metadata()?);

    let assets = version
        .assets
        .iter()
        .map(|asset_id| {
            let asset = store.get_record(asset_id)?.into_asset()?;
            Ok(Value::Object(asset.full_metadata()?))
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(&dir)?;

    let paths = ManifestPaths::in_dir(&dir);
    write_yaml(&paths.dandiset, &dandiset)?;
    write_yaml(&paths.assets, &assets)?;
    write_json(&paths.dandiset_jsonld, &dandiset)?;
    write_json(&paths.assets_jsonld, &assets)?;

    info!(record = %id, assets = assets.len(), dir = %dir.display(), "manifests written");
    Ok(paths)
}

fn write_yaml<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_yaml::to_writer(BufWriter::new(file), value)?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

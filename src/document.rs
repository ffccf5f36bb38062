use crate::endpoint::Endpoint;
use crate::error::{MergeError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const ENDPOINTS_POINTER: &str = "/whitelists/0/endpoints";
const OUTPUT_INDENT: &[u8] = b"    ";

/// A whitelist document of the form
/// `{ "whitelists": [ { "endpoints": [ ... ], ... }, ... ], ... }`.
///
/// Only the endpoints of the first group are read or replaced. Every other
/// field, and every other group, is carried through untouched.
#[derive(Debug, Clone)]
pub struct WhitelistDocument {
    origin: PathBuf,
    root: Value,
}

impl WhitelistDocument {
    /// Reads and validates the document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading whitelist from {}", path.display());
        let data = fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        Self::from_json(path, &data)
    }

    /// Parses and validates a document. `origin` is only used in messages.
    pub fn from_json(origin: impl Into<PathBuf>, data: &str) -> Result<Self> {
        let origin = origin.into();
        let root: Value = serde_json::from_str(data).map_err(|source| MergeError::Parse {
            path: origin.clone(),
            source,
        })?;

        let document = WhitelistDocument { origin, root };
        let endpoints = document.endpoint_values()?;
        debug!(
            "{} holds {} endpoints in its first whitelist",
            document.origin.display(),
            endpoints.len()
        );
        if document.group_count() > 1 {
            warn!(
                "{} contains {} whitelist groups, only the first one is merged",
                document.origin.display(),
                document.group_count()
            );
        }
        Ok(document)
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Number of whitelist groups in the document.
    pub fn group_count(&self) -> usize {
        self.root
            .get("whitelists")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Copies the endpoints of the first whitelist group.
    pub fn endpoints(&self) -> Result<Vec<Endpoint>> {
        self.endpoint_values()?
            .iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(map) => Ok(map.clone()),
                _ => Err(self.structure_error(format!(
                    "endpoint #{} of the first whitelist is not an object",
                    index
                ))),
            })
            .collect()
    }

    /// Replaces the endpoints of the first whitelist group.
    pub fn replace_endpoints(&mut self, endpoints: Vec<Endpoint>) -> Result<()> {
        let slot = match self.root.pointer_mut(ENDPOINTS_POINTER) {
            Some(slot) => slot,
            None => {
                return Err(MergeError::structure(
                    self.origin.display().to_string(),
                    "missing 'whitelists[0].endpoints'",
                ))
            }
        };
        *slot = Value::Array(endpoints.into_iter().map(Value::Object).collect());
        Ok(())
    }

    /// Serializes the document with a 4-space indent and a trailing newline.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(OUTPUT_INDENT));
        self.root
            .serialize(&mut serializer)
            .map_err(|source| MergeError::Encode {
                origin: self.origin.clone(),
                source,
            })?;
        buffer.push(b'\n');
        Ok(buffer)
    }

    /// Writes the document to `path`, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_json_bytes()?;
        write_atomically(path, &contents)?;
        info!("Whitelist written to {}", path.display());
        Ok(())
    }

    fn endpoint_values(&self) -> Result<&Vec<Value>> {
        if !self.root.is_object() {
            return Err(self.structure_error("top-level value is not an object"));
        }
        let groups = self
            .root
            .get("whitelists")
            .ok_or_else(|| self.structure_error("missing 'whitelists' key"))?
            .as_array()
            .ok_or_else(|| self.structure_error("'whitelists' is not an array"))?;
        let first = groups
            .first()
            .ok_or_else(|| self.structure_error("'whitelists' is empty"))?;
        first
            .get("endpoints")
            .ok_or_else(|| self.structure_error("missing 'whitelists[0].endpoints' key"))?
            .as_array()
            .ok_or_else(|| self.structure_error("'whitelists[0].endpoints' is not an array"))
    }

    fn structure_error(&self, reason: impl Into<String>) -> MergeError {
        MergeError::structure(self.origin.display().to_string(), reason)
    }
}

/// Writes `contents` to a temporary file next to `path`, then renames it over
/// `path`. A failure at any point leaves the existing file as it was. The
/// replaced file keeps its permissions; a new file gets the usual 0644.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(directory).map_err(|e| MergeError::io(directory, e))?;
    let permissions = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|e| MergeError::io(temp.path(), e))?;
    }
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| MergeError::io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| MergeError::io(path, e.error))?;
    Ok(())
}

// Temp files start out as 0600
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

//! JSON state files.

use crate::director::DirectorError;
use crate::store::TournamentRecord;
use std::path::Path;

/// Reads a tournament record from `path`.
pub fn load(path: &Path) -> Result<TournamentRecord, DirectorError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes `record` to `path` as pretty JSON.
///
/// The file is written next to its destination first and then renamed
/// over it, so readers never see a partial record.
pub fn save(path: &Path, record: &TournamentRecord) -> Result<(), DirectorError> {
    let json = serde_json::to_string_pretty(record)?;
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, json)?;
    std::fs::rename(&staging, path)?;
    tracing::debug!(path = %path.display(), version = record.version, "state saved");
    Ok(())
}

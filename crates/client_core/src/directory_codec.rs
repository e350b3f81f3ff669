//! Decoding of the `showfile/directory` listing.

use serde::Deserialize;
use serde_json::Value;
use shared::{
    domain::{DirectoryEntry, ShowDirectory, ShowId},
    protocol::DirectoryPayload,
};
use tracing::debug;

use crate::error::DirectoryError;

/// Decodes the listing, yielding an empty directory for malformed input.
pub fn decode(raw: &Value) -> ShowDirectory {
    try_decode(raw).unwrap_or_default()
}

/// Decodes the listing, keeping the order in which the service emitted keys.
///
/// Entries whose value is neither a string nor a number are skipped.
pub fn try_decode(raw: &Value) -> Result<ShowDirectory, DirectoryError> {
    if !raw.is_object() {
        return Err(DirectoryError::NotAnObject);
    }
    let payload = DirectoryPayload::deserialize(raw).map_err(|_| DirectoryError::MissingShows)?;
    let shows = payload.shows.ok_or(DirectoryError::MissingShows)?;

    let entries = shows
        .into_iter()
        .filter_map(|(key, value)| {
            let show = match value {
                Value::String(id) => id,
                Value::Number(number) => number.to_string(),
                other => {
                    debug!(%key, value = %other, "skipping unusable directory entry");
                    return None;
                }
            };
            Some(DirectoryEntry {
                key,
                show: ShowId(show),
            })
        })
        .collect();

    Ok(ShowDirectory::new(entries))
}

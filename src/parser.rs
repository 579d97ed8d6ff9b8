//! JSON parser for facility rosters.

use anyhow::Result;
use std::collections::HashSet;

use crate::error::RosterError;
use crate::facility::Facility;

/// Decodes a JSON array of facility records and checks every record.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array of facilities, if a
/// record fails [`Facility::validate`], or if two records share an id.
pub fn parse_roster(bytes: &[u8]) -> Result<Vec<Facility>> {
    let facilities: Vec<Facility> = serde_json::from_slice(bytes)?;
    check_roster(&facilities)?;
    Ok(facilities)
}

/// Validates each record and rejects duplicate ids.
pub fn check_roster(facilities: &[Facility]) -> Result<(), RosterError> {
    let mut seen = HashSet::new();
    for f in facilities {
        f.validate()?;
        if !seen.insert(f.id.as_str()) {
            return Err(RosterError::DuplicateId(f.id.clone()));
        }
    }
    Ok(())
}

use crate::error::Result;
use crate::model::Snapshot;

pub fn format_json(snapshot: &Snapshot) -> Result<String> {
    Ok(snapshot.to_json()?)
}

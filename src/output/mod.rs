pub mod csv;

use anyhow::Result;
use serde::Serialize;

/// Default rendering for every command: pretty JSON of the result object.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

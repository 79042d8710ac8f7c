use crate::infrastructure::error::{CliError, Result};
use rally_session_core::SessionCommand;
use rally_session_net::{ClientMessage, WireMessage};
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::path::{Path, PathBuf};

/// JSON schemas of the wire types, keyed by file name
pub fn wire_schemas() -> Vec<(&'static str, RootSchema)> {
    vec![
        ("wire_message.schema.json", schema_for!(WireMessage)),
        ("session_command.schema.json", schema_for!(SessionCommand)),
        ("client_message.schema.json", schema_for!(ClientMessage)),
    ]
}

/// Write every schema into `dir`, returning the written paths
pub fn write_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::invalid_directory(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (file_name, schema) in wire_schemas() {
        let path = dir.join(file_name);
        std::fs::write(&path, serde_json::to_string_pretty(&schema)?)?;
        tracing::info!("📝 Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

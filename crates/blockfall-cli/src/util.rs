use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Writes `value` as pretty JSON plus a trailing newline to `path`, or to
/// stdout when no path is given.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    let (mut writer, target): (Box<dyn Write>, String) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };
    serde_json::to_writer_pretty(&mut writer, value)
        .and_then(|()| writeln!(writer).map_err(serde_json::Error::io))
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {target}"))
}

/// Reads a JSON document; `file_kind` names the file in error messages.
pub fn read_json_file<T>(file_kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

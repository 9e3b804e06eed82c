//! JSON configuration and result files

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};

/// Read a configuration document.
///
/// Missing fields fall back to the type's serde defaults. A document that
/// cannot be parsed is a configuration error, not an I/O error, because it
/// would otherwise corrupt every downstream figure.
pub fn read_config<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| Error::config("config", path.display(), e.to_string()))
}

/// Serialize a value as pretty-printed JSON
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Write a value as pretty-printed JSON to a file
pub fn write_json<T, P>(value: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

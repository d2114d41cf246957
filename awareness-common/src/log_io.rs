use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::snapshot::SimulationLog;

/// On-disk encodings of a [`SimulationLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Self-describing, large.
    Json,
    /// Compact binary.
    Bincode,
    /// Compact and cross-platform.
    MessagePack,
}

impl LogFormat {
    /// Parses a format name as written in `config.toml`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "bincode" | "bin" => Some(LogFormat::Bincode),
            "messagepack" | "msgpack" => Some(LogFormat::MessagePack),
            _ => None,
        }
    }

    /// Guesses the format of an existing file from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(LogFormat::Json),
            "bin" => Some(LogFormat::Bincode),
            "msgpack" => Some(LogFormat::MessagePack),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Bincode => "bin",
            LogFormat::MessagePack => "msgpack",
        }
    }
}

impl SimulationLog {
    /// Serializes the log into `path` using `format`.
    pub fn write_to(&self, path: &Path, format: LogFormat) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        match format {
            LogFormat::Json => serde_json::to_writer(&mut writer, self)
                .context("Failed to serialize log to JSON")?,
            LogFormat::Bincode => bincode::serialize_into(&mut writer, self)
                .context("Failed to serialize log to bincode")?,
            LogFormat::MessagePack => rmp_serde::encode::write(&mut writer, self)
                .context("Failed to serialize log to MessagePack")?,
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a log written by [`SimulationLog::write_to`].
    /// The format comes from the file extension.
    pub fn read_from(path: &Path) -> Result<Self> {
        let format = LogFormat::from_path(path).with_context(|| {
            format!("Cannot infer log format from file name '{}'", path.display())
        })?;
        let file = File::open(path)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
        let reader = BufReader::new(file);
        let log = match format {
            LogFormat::Json => serde_json::from_reader(reader)
                .context("Failed to parse JSON log")?,
            LogFormat::Bincode => bincode::deserialize_from(reader)
                .context("Failed to parse bincode log")?,
            LogFormat::MessagePack => rmp_serde::from_read(reader)
                .context("Failed to parse MessagePack log")?,
        };
        Ok(log)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

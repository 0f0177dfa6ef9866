//! JSONL output sink

use hpfeeds_core::events::CanonicalMessage;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// JSONL writer configuration
#[derive(Debug, Clone)]
pub struct JsonlWriterConfig {
    /// Output file path, stdout when absent
    pub path: Option<PathBuf>,

    /// Whether to append to an existing file
    pub append: bool,

    /// Pretty print JSON (one record then spans several lines)
    pub pretty: bool,

    /// Flush after each write
    pub flush_each: bool,
}

impl Default for JsonlWriterConfig {
    fn default() -> Self {
        Self {
            path: None,
            append: true,
            pretty: false,
            flush_each: true,
        }
    }
}

/// Writes each normalized message as one JSON record
pub struct JsonlWriter {
    config: JsonlWriterConfig,
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl JsonlWriter {
    pub fn open(config: JsonlWriterConfig) -> SinkResult<Self> {
        let target: Box<dyn Write + Send> = match &config.path {
            Some(path) => {
                let file = if config.append {
                    OpenOptions::new().create(true).append(true).open(path)?
                } else {
                    File::create(path)?
                };
                info!("JSONL writer writing to: {:?}", path);
                Box::new(file)
            }
            None => Box::new(io::stdout()),
        };

        Ok(Self {
            config,
            writer: BufWriter::new(target),
        })
    }

    pub fn write(&mut self, message: &CanonicalMessage) -> SinkResult<()> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut self.writer, message)?;
        } else {
            serde_json::to_writer(&mut self.writer, message)?;
        }
        self.writer.write_all(b"\n")?;

        if self.config.flush_each {
            self.writer.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> SinkResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

//! The normalize loop body: one input line in, zero or more records out

use crate::sink::JsonlWriter;
use crate::source;
use hpfeeds_core::{ErrorPolicy, Processor};
use tracing::{debug, warn};

/// Counters reported when a run ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Raw events read
    pub events: u64,
    /// Normalized messages written
    pub messages: u64,
    /// Input lines that were not raw-event records
    pub rejected: u64,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} events, {} messages, {} rejected lines",
            self.events, self.messages, self.rejected
        )
    }
}

/// Normalize one input line and write the results.
///
/// Blank lines are ignored and invalid records are counted and skipped.
/// Decoder faults only surface under [`ErrorPolicy::Strict`].
pub fn normalize_line(
    processor: &Processor,
    line: &str,
    policy: ErrorPolicy,
    sink: &mut JsonlWriter,
    summary: &mut Summary,
) -> anyhow::Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }

    let event = match source::parse_line(line) {
        Ok(event) => event,
        Err(e) => {
            warn!("Skipping input line: {}", e);
            summary.rejected += 1;
            return Ok(());
        }
    };
    summary.events += 1;

    let messages = processor.process_event(&event, policy)?;
    debug!(
        "{} from {}: {} messages",
        event.channel,
        event.sensor,
        messages.len()
    );

    for message in &messages {
        sink.write(message)?;
        summary.messages += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::JsonlWriterConfig;
    use hpfeeds_core::ProcessError;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (Processor, JsonlWriter, std::path::PathBuf) {
        let path = dir.path().join("normalized.jsonl");
        let sink = JsonlWriter::open(JsonlWriterConfig {
            path: Some(path.clone()),
            ..Default::default()
        })
        .unwrap();
        (Processor::new(hpfeeds_decode::default_registry()), sink, path)
    }

    fn raw(channel: &str, payload: Value) -> String {
        json!({"ident": "sensor-9", "channel": channel, "payload": payload.to_string()}).to_string()
    }

    #[test]
    fn test_lines_to_records() {
        let dir = TempDir::new().unwrap();
        let (processor, mut sink, path) = setup(&dir);
        let mut summary = Summary::default();

        let lines = [
            raw("kippo.sessions", json!({"peerIP": "203.0.113.6", "commands": ["id"]})),
            String::new(),
            "garbage".to_string(),
            r#"["sensor-9", "kippo.sessions", "{}"]"#.to_string(),
            raw("dionaea.connections", json!({"remote_host": "203.0.113.4"})),
            raw("unknown.channel", json!({})),
            raw("amun.events", json!("not an object")),
        ];
        for line in &lines {
            normalize_line(&processor, line, ErrorPolicy::Lenient, &mut sink, &mut summary)
                .unwrap();
        }

        assert_eq!(
            summary,
            Summary {
                events: 4,
                messages: 3,
                rejected: 2
            }
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["type"], "kippo.sessions");
        assert_eq!(records[1]["command"], "id");
        assert_eq!(records[2]["sensor"], "sensor-9");
        assert_eq!(records[2]["type"], "dionaea.connections");
    }

    #[test]
    fn test_strict_fault_aborts() {
        let dir = TempDir::new().unwrap();
        let (processor, mut sink, _) = setup(&dir);
        let mut summary = Summary::default();

        let line = raw("conpot.events", json!({"data_type": "modbus"}));
        let err = normalize_line(&processor, &line, ErrorPolicy::Strict, &mut sink, &mut summary)
            .unwrap_err();
        assert!(err.downcast_ref::<ProcessError>().is_some());
        assert_eq!(summary.events, 1);
        assert_eq!(summary.messages, 0);
    }
}

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only JSONL trace of step transitions, one record per transition.
pub struct PipelineLogger {
    run_id: Option<String>,
    file: Mutex<File>,
}

impl PipelineLogger {
    pub fn new(trace_dir: PathBuf) -> io::Result<Self> {
        create_dir_all(&trace_dir)?;
        let path = trace_dir.join("runs.jsonl");
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            run_id: None,
            file: Mutex::new(file),
        })
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Note: `flush` only pushes to OS buffers; it does not guarantee
    /// durability on disk.
    pub fn log_transition(&self, tag: &str, data: serde_json::Value) -> io::Result<()> {
        let mut record = serde_json::Map::new();
        record.insert(
            "step".to_string(),
            serde_json::Value::String(tag.to_string()),
        );
        record.insert("data".to_string(), data);

        if let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) {
            let millis = duration.as_millis() as u64;
            record.insert("ts".to_string(), serde_json::Value::Number(millis.into()));
        }

        if let Some(run_id) = &self.run_id {
            record.insert(
                "run_id".to_string(),
                serde_json::Value::String(run_id.clone()),
            );
        }

        let line =
            serde_json::to_string(&serde_json::Value::Object(record)).map_err(io::Error::other)?;
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("logger mutex poisoned"))?;
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(())
    }
}

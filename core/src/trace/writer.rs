use crate::prelude::{EngineError, EngineResult};
use crate::trace::sample::TrajectorySample;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Streaming XML trace writer with finalize-or-discard semantics.
///
/// Records arrive in non-decreasing tick order; a new `<timestep>` element
/// opens whenever the tick advances. Output is staged in a `.part` sibling
/// and only renamed to the target path by `finalize`, so an aborted run
/// never leaves a file claiming to be complete: dropping an unfinalized
/// writer removes the staged file.
///
/// All numeric fields use fixed two-decimal formatting, which makes two runs
/// of the same scenario byte-identical.
pub struct TraceWriter {
    out: BufWriter<File>,
    path: PathBuf,
    part_path: PathBuf,
    open_tick: Option<u64>,
    records: u64,
    finalized: bool,
}

impl TraceWriter {
    pub fn create(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let part_path = staging_path(&path);
        let file = File::create(&part_path).map_err(|source| EngineError::Io {
            path: part_path.clone(),
            source,
        })?;
        let mut writer = Self {
            out: BufWriter::new(file),
            path,
            part_path,
            open_tick: None,
            records: 0,
            finalized: false,
        };
        writer.emit("<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
        writer.emit("<mobility-trace>")?;
        Ok(writer)
    }

    /// Appends one record, opening a fresh timestep element when the tick
    /// advances past the currently open one.
    pub fn write(&mut self, sample: &TrajectorySample) -> EngineResult<()> {
        if self.open_tick != Some(sample.tick) {
            self.close_open_timestep()?;
            let line = format!("    <timestep time=\"{:.2}\">", sample.timestamp);
            self.emit(&line)?;
            self.open_tick = Some(sample.tick);
        }
        let line = format!(
            "        <vehicle id=\"{}\" x=\"{:.2}\" y=\"{:.2}\" z=\"{:.2}\" speed=\"{:.2}\" type=\"UAV\"/>",
            escape_attribute(&sample.uav_id),
            sample.x,
            sample.y,
            sample.altitude,
            sample.speed,
        );
        self.emit(&line)?;
        self.records += 1;
        Ok(())
    }

    /// Closes the document, flushes, and publishes the staged file to the
    /// target path. A run with no records still yields a well-formed trace.
    pub fn finalize(mut self) -> EngineResult<PathBuf> {
        self.close_open_timestep()?;
        self.emit("</mobility-trace>")?;
        self.out.flush().map_err(|e| self.io_error(e))?;
        fs::rename(&self.part_path, &self.path).map_err(|source| EngineError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.finalized = true;
        info!(
            "trace finalized: {} record(s) -> {}",
            self.records,
            self.path.display()
        );
        Ok(self.path.clone())
    }

    /// Explicitly abandons the trace. Drop performs the same cleanup on any
    /// early-exit path.
    pub fn discard(self) {
        info!("trace discarded after {} record(s)", self.records);
    }

    fn close_open_timestep(&mut self) -> EngineResult<()> {
        if self.open_tick.take().is_some() {
            self.emit("    </timestep>")?;
        }
        Ok(())
    }

    fn emit(&mut self, line: &str) -> EngineResult<()> {
        writeln!(self.out, "{}", line).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> EngineError {
        EngineError::Io {
            path: self.part_path.clone(),
            source,
        }
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        if !self.finalized {
            let _ = fs::remove_file(&self.part_path);
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(".part");
    PathBuf::from(staged)
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

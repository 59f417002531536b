//! Per-kind result files.
//!
//! Each container kind gets its own stream of Python-literal records:
//!
//! ```text
//! int_timings = [
//!     {'size': 8, 'insert': 0.0012, 'iterate': 0.0001, 'find': 0.0004},
//! ]
//! ```

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{BenchError, BenchResult, KeyShape, MapKind, Operation};

/// Reduced timings (ms) for one test case and one container kind.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
    pub size: usize,
    timings: Vec<(Operation, f64)>,
}

impl BenchmarkResult {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            timings: Vec::with_capacity(4),
        }
    }

    /// Record `ms` for `op`, replacing an earlier value for the same op.
    pub fn push(&mut self, op: Operation, ms: f64) {
        match self.timings.binary_search_by(|(o, _)| o.cmp(&op)) {
            Ok(idx) => self.timings[idx].1 = ms,
            Err(idx) => self.timings.insert(idx, (op, ms)),
        }
    }

    pub fn get(&self, op: Operation) -> Option<f64> {
        self.timings
            .iter()
            .find(|(o, _)| *o == op)
            .map(|(_, ms)| *ms)
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.timings.iter().map(|(op, _)| op.name()).collect()
    }

    pub fn to_literal(&self) -> String {
        let mut line = format!("{{'size': {}", self.size);
        for (op, ms) in &self.timings {
            let _ = write!(line, ", '{}': {}", op.name(), ms);
        }
        line.push('}');
        line
    }
}

/// One streaming destination of records.
pub struct ResultStream<W: Write = BufWriter<File>> {
    out: W,
    open_section: Option<&'static str>,
}

impl<W: Write> ResultStream<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            open_section: None,
        }
    }

    pub fn begin_section(&mut self, name: &'static str) -> io::Result<()> {
        self.end_section()?;
        writeln!(self.out, "{name} = [")?;
        self.open_section = Some(name);
        Ok(())
    }

    pub fn end_section(&mut self) -> io::Result<()> {
        if self.open_section.take().is_some() {
            write!(self.out, "]\n\n")?;
        }
        Ok(())
    }

    pub fn write_record(&mut self, result: &BenchmarkResult) -> io::Result<()> {
        writeln!(self.out, "    {},", result.to_literal())
    }

    /// Close any open section and flush.
    pub fn finish(&mut self) -> io::Result<()> {
        self.end_section()?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Drop for ResultStream<W> {
    fn drop(&mut self) {
        if let Err(e) = self.finish() {
            warn!("failed to flush result stream on drop: {e}");
        }
    }
}

/// The set of per-kind result files of a run.
///
/// All files are opened by [`ResultSink::create`] before any timing starts.
/// Dropping the sink, including on an error path, closes the open section
/// and flushes every file.
pub struct ResultSink {
    streams: Vec<(MapKind, PathBuf, ResultStream)>,
}

impl ResultSink {
    pub fn create(dir: &Path, kinds: &[MapKind]) -> BenchResult<Self> {
        fs::create_dir_all(dir).map_err(|source| BenchError::Output {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut streams: Vec<(MapKind, PathBuf, ResultStream)> = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if streams.iter().any(|(k, _, _)| *k == kind) {
                continue;
            }
            let path = dir.join(kind.file_name());
            let file = File::create(&path).map_err(|source| BenchError::Output {
                path: path.clone(),
                source,
            })?;
            debug!(kind = %kind, path = %path.display(), "opened result stream");
            streams.push((kind, path, ResultStream::new(BufWriter::new(file))));
        }
        Ok(Self { streams })
    }

    pub fn kinds(&self) -> impl Iterator<Item = MapKind> + '_ {
        self.streams.iter().map(|(kind, _, _)| *kind)
    }

    pub fn path(&self, kind: MapKind) -> Option<&Path> {
        self.streams
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map(|(_, path, _)| path.as_path())
    }

    pub fn begin_section(&mut self, shape: KeyShape) -> BenchResult<()> {
        for (_, _, stream) in &mut self.streams {
            stream.begin_section(shape.section())?;
        }
        Ok(())
    }

    pub fn end_section(&mut self) -> BenchResult<()> {
        for (_, _, stream) in &mut self.streams {
            stream.end_section()?;
        }
        Ok(())
    }

    /// Fail with [`BenchError::MissingStream`] unless every kind in `kinds`
    /// has an open stream.
    pub fn ensure_kinds(&self, kinds: &[MapKind]) -> BenchResult<()> {
        match kinds.iter().find(|kind| self.path(**kind).is_none()) {
            Some(&kind) => Err(BenchError::MissingStream(kind)),
            None => Ok(()),
        }
    }

    /// Append `result` to `kind`'s stream.
    pub fn record(&mut self, kind: MapKind, result: &BenchmarkResult) -> BenchResult<()> {
        let (_, _, stream) = self
            .streams
            .iter_mut()
            .find(|(k, _, _)| *k == kind)
            .ok_or(BenchError::MissingStream(kind))?;
        stream.write_record(result)?;
        Ok(())
    }

    pub fn finish(mut self) -> BenchResult<()> {
        for (_, _, stream) in &mut self.streams {
            stream.finish()?;
        }
        Ok(())
    }
}

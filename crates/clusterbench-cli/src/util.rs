use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clusterbench_engine::RandomizationConfig;
use tracing_subscriber::EnvFilter;

use crate::schema::record::{BlockPosition, ScenarioRecord};

/// Installs the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to warnings only. Events go to
/// stderr so they never mix with JSON on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads and validates a randomization config file.
pub fn read_config_file<P>(path: P) -> anyhow::Result<RandomizationConfig>
where
    P: AsRef<Path>,
{
    read_json_file("randomization config", path)
}

pub fn read_scenario_file<P>(path: P) -> anyhow::Result<ScenarioRecord>
where
    P: AsRef<Path>,
{
    read_json_file("scenario", path)
}

pub fn read_positions_file<P>(path: P) -> anyhow::Result<Vec<BlockPosition>>
where
    P: AsRef<Path>,
{
    read_json_file("block positions", path)
}

/// Prints a labelled bar chart to stderr.
pub fn print_histogram<I, S>(data: I)
where
    I: Iterator<Item = (S, u64)>,
    S: fmt::Display,
{
    let data = data.collect::<Vec<_>>();
    let max_count = data.iter().map(|(_, c)| *c).max().unwrap_or(1).max(1);
    let max_bar_width = 50;
    for (label, count) in &data {
        let bar_width = usize::try_from(count * max_bar_width / max_count).unwrap_or(0);
        eprintln!("{:>15} | {:<5} {}", label, count, "#".repeat(bar_width));
    }
}

//! Command-line entry point running HTML and CSS files through the versioning stage.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use same_file::is_same_file;

use res_version::{
  Document, DocumentContents, FingerprintCache, IgnoreMatching, VersionStage, Versioner,
  VersionerConfig,
};

#[derive(Debug, Parser)]
#[command(
  name = "res-version",
  version,
  about = "Append content fingerprints to asset references in HTML and CSS files"
)]
struct Cli {
  /// HTML and CSS files to process. Other files are copied unchanged.
  #[arg(required = true)]
  files: Vec<PathBuf>,

  /// Directory the processed files are written to.
  #[arg(long, value_name = "DIR")]
  out_dir: PathBuf,

  /// Directory output paths are computed relative to (defaults to the working directory).
  #[arg(long, value_name = "DIR")]
  base: Option<PathBuf>,

  /// Working directory (defaults to the current directory).
  #[arg(long, value_name = "DIR")]
  cwd: Option<PathBuf>,

  /// Directory that `/`-prefixed references resolve against.
  #[arg(long, value_name = "DIR")]
  root_dir: Option<String>,

  /// Regular expression for references to leave alone. May be repeated.
  #[arg(long = "ignore", value_name = "REGEX")]
  ignore: Vec<String>,

  /// Ignore a reference when any pattern matches, not only the last one.
  #[arg(long)]
  any_match: bool,

  /// Query parameter carrying the fingerprint.
  #[arg(long, value_name = "KEY")]
  query_key: Option<String>,

  /// JSON or YAML configuration file.
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Enable debug logging.
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let current = env::current_dir().context("failed to determine current directory")?;
  let cwd = match &cli.cwd {
    Some(dir) => absolutize(dir, &current),
    None => current,
  };

  let mut config = match &cli.config {
    Some(path) => VersionerConfig::from_path(&absolutize(path, &cwd))?,
    None => VersionerConfig::discover(&cwd)?,
  };
  if let Some(root_dir) = &cli.root_dir {
    config.root_dir = Some(root_dir.clone());
  }
  config.ignore.extend(cli.ignore.iter().cloned());
  if cli.any_match {
    config.ignore_matching = IgnoreMatching::AnyMatch;
  }
  if let Some(query_key) = &cli.query_key {
    config.query_key = query_key.clone();
  }
  let options = config.into_options()?;

  let cache = Arc::new(FingerprintCache::new());
  let stage = VersionStage::new(Versioner::new(options).with_cache(cache.clone()));

  let base = cli
    .base
    .as_deref()
    .map(|dir| absolutize(dir, &cwd))
    .unwrap_or_else(|| cwd.clone());
  let out_dir = absolutize(&cli.out_dir, &cwd);

  let documents = cli
    .files
    .iter()
    .map(|file| -> Result<Document> {
      let path = absolutize(file, &cwd);
      let bytes =
        fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
      Ok(Document::new(path, &cwd, bytes).with_base(&base))
    })
    .collect::<Result<Vec<_>>>()?;

  let output = stage.process_all(documents);
  for document in &output.processed {
    write_document(document, &out_dir)?;
  }

  tracing::info!(
    processed = output.processed.len(),
    fingerprints = cache.len(),
    out_dir = %out_dir.display(),
    "versioning complete"
  );

  if !output.rejected.is_empty() {
    bail!("{} document(s) could not be processed", output.rejected.len());
  }

  Ok(())
}

fn write_document(document: &Document, out_dir: &Path) -> Result<()> {
  let DocumentContents::Buffered(bytes) = &document.contents else {
    return Ok(());
  };

  let destination = out_dir.join(document.relative());
  if destination.exists()
    && is_same_file(&document.path, &destination)
      .with_context(|| format!("failed to compare {}", destination.display()))?
  {
    bail!(
      "refusing to overwrite source file {}; choose a different --out-dir",
      document.path.display()
    );
  }

  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  fs::write(&destination, bytes)
    .with_context(|| format!("failed to write {}", destination.display()))?;
  tracing::debug!(destination = %destination.display(), "wrote document");

  Ok(())
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    cwd.join(path)
  }
}

fn setup_logging(verbose: bool) {
  use tracing_subscriber::EnvFilter;

  let default = if verbose {
    "res_version=debug"
  } else {
    "res_version=info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

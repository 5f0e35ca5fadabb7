use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use gantry::Gantry;
use gantry_config::ConfigRequest;
use gantry_core::types::{BuildCommand, BuildMode};
use gantry_filesystem::os_file_system::OsFileSystem;
use tracing::{error, info};

#[derive(Parser)]
struct Args {
  /// Build mode, e.g. development or production
  #[arg(short, long, default_value = "development")]
  mode: String,

  /// Run as a one-shot build instead of a dev-server invocation
  #[arg(short, long)]
  build: bool,

  #[arg(short, long)]
  project_root: Option<PathBuf>,

  /// Directory to write processed stylesheets into; stdout when omitted
  #[arg(short, long)]
  out_dir: Option<PathBuf>,

  #[arg(trailing_var_arg = true)]
  stylesheets: Vec<PathBuf>,
}

fn main() {
  initialize_tracing();

  let args = Args::parse();
  run(args).unwrap_or_else(|e| {
    error!("Failed to run gantry: {}", e);
    std::process::exit(1);
  });
}

fn run(args: Args) -> anyhow::Result<()> {
  let project_root = match &args.project_root {
    Some(root) => root.clone(),
    None => std::env::current_dir()?,
  };

  let mode = match args.mode.as_str() {
    "development" => BuildMode::Development,
    "production" => BuildMode::Production,
    other => BuildMode::Other(other.to_string()),
  };

  let command = if args.build {
    BuildCommand::Build
  } else {
    BuildCommand::Serve
  };

  let mut gantry = Gantry::new(
    ConfigRequest {
      mode,
      command,
      project_root,
    },
    Arc::new(OsFileSystem),
  )?;

  if let Some(out_dir) = &args.out_dir {
    std::fs::create_dir_all(out_dir)?;
  }

  for path in &args.stylesheets {
    let css = gantry.process_stylesheet(path)?;

    match (&args.out_dir, path.file_name()) {
      (Some(out_dir), Some(file_name)) => {
        let out_path = out_dir.join(file_name);
        std::fs::write(&out_path, css)?;
        info!(path = %out_path.display(), "wrote post-processed stylesheet");
      }
      _ => print!("{css}"),
    }
  }

  Ok(())
}

fn initialize_tracing() {
  if std::env::var("RUST_LOG").is_err() {
    std::env::set_var("RUST_LOG", "info");
  }

  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();
}

//! goscaffold - scaffold a Go web service skeleton

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use goscaffold::commands;
use goscaffold::config::load_config;
use goscaffold::runner::SystemRunner;
use goscaffold::validation::Flags;

/// Flags that may also be written Go-style with a single dash (`-dir demo`)
const LONG_FLAGS: &[&str] = &["dir", "module", "env", "config"];

#[derive(Parser)]
#[command(name = "goscaffold")]
#[command(author, version, about = "Scaffold a Go web service: directories, module, dependencies and placeholder files")]
struct Cli {
    /// Directory name for the project (e.g. test)
    #[arg(long, default_value = "")]
    dir: String,

    /// Module name (e.g. github.com/acme/test)
    #[arg(long, default_value = "")]
    module: String,

    /// Env file type: env or json
    #[arg(long, default_value = "env")]
    env: String,

    /// Path to a config.toml overriding the built-in layout
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Rewrite `-dir`/`-dir=x` style flags to `--dir`/`--dir=x`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            out.push(arg);
            continue;
        }
        let rewritten = arg.to_str().and_then(|s| {
            if s == "--" {
                return None;
            }
            let body = s.strip_prefix('-').filter(|b| !b.starts_with('-'))?;
            let name = body.split('=').next().unwrap_or(body);
            LONG_FLAGS.contains(&name).then(|| OsString::from(format!("-{}", s)))
        });
        if arg == "--" {
            passthrough = true;
        }
        out.push(rewritten.unwrap_or(arg));
    }
    out
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let base = std::env::current_dir().context("Could not determine current directory")?;

    let flags = Flags {
        dir: cli.dir,
        module: cli.module,
        env: cli.env,
    };

    if let Err(e) = commands::scaffold(&SystemRunner, config, &flags, &base) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

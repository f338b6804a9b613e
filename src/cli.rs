//! CLI argument parsing for the man page generator.
//!
//! The surface is deliberately small: where to write and whether to gzip.
//! Everything else (input location, render date) is resolved in `config`.
use clap::Parser;
use std::path::PathBuf;

/// Output target used when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "output/yunohost";

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "actionsmap-man",
    version,
    about = "Generate the yunohost man page from the actions map",
    after_help = "Examples:\n  actionsmap-man\n  actionsmap-man -o /tmp/man/\n  actionsmap-man -z -o debian/yunohost.1.gz"
)]
pub struct RootArgs {
    /// Output file, or an existing directory to write `yunohost` into
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Compress the man page with gzip
    #[arg(short = 'z', long)]
    pub gzip: bool,
}

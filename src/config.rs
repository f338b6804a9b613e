//! Run configuration for the generator.
//!
//! Flags come from the CLI; the actions map location and the render date can
//! be overridden through the environment so packaging scripts do not need
//! extra flags.
use crate::cli::RootArgs;
use crate::render::RenderDate;
use crate::util::resolve_input_path;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Actions map location, relative to the crate directory.
pub const ACTIONSMAP_REL: &str = "../data/actionsmap/yunohost.yml";

/// Overrides [`ACTIONSMAP_REL`] with an explicit path.
pub const ACTIONSMAP_ENV: &str = "YUNOHOST_ACTIONSMAP";

/// Reproducible-builds timestamp; pins the date printed in the header.
pub const SOURCE_DATE_EPOCH_ENV: &str = "SOURCE_DATE_EPOCH";

/// Everything one generator run needs.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub actionsmap_path: PathBuf,
    pub output: PathBuf,
    pub gzip: bool,
    pub render_date: RenderDate,
}

impl GeneratorConfig {
    /// Build the config from parsed flags and the process environment.
    pub fn from_args(args: &RootArgs) -> Result<Self> {
        Self::from_parts(
            args,
            env::var_os(ACTIONSMAP_ENV),
            env::var(SOURCE_DATE_EPOCH_ENV).ok(),
        )
    }

    fn from_parts(
        args: &RootArgs,
        actionsmap_override: Option<OsString>,
        source_date_epoch: Option<String>,
    ) -> Result<Self> {
        let actionsmap_path = match actionsmap_override.filter(|value| !value.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => resolve_input_path(Path::new(ACTIONSMAP_REL)),
        };
        let today = match source_date_epoch.as_deref() {
            Some(value) if !value.trim().is_empty() => date_from_epoch(value)?,
            _ => Local::now().date_naive(),
        };
        Ok(Self {
            actionsmap_path,
            output: args.output.clone(),
            gzip: args.gzip,
            render_date: RenderDate::from_date(today),
        })
    }
}

fn date_from_epoch(value: &str) -> Result<NaiveDate> {
    let seconds: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("parse {SOURCE_DATE_EPOCH_ENV} {value:?}"))?;
    let timestamp = DateTime::<Utc>::from_timestamp(seconds, 0)
        .ok_or_else(|| anyhow!("{SOURCE_DATE_EPOCH_ENV} {seconds} is out of range"))?;
    Ok(timestamp.date_naive())
}

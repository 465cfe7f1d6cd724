use crate::args::CatalogArgs;
use anyhow::{Context, Result, bail};
use nwbpack_catalog::{ArtifactCatalog, SessionCatalog, SessionFilter};
use nwbpack_runtime::{Config, expand_tilde, resolve_config_path};
use std::path::PathBuf;

/// Everything a run needs, resolved from flags, environment, and config.
pub struct RunContext {
    pub config: Config,
    pub sessions: SessionCatalog,
    pub artifacts: ArtifactCatalog,
    pub filter: SessionFilter,
}

impl RunContext {
    pub fn from_args(args: &CatalogArgs) -> Result<Self> {
        let config_path = resolve_config_path(args.config.as_deref());
        let config = Config::load_from(&config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?;

        let source_root = resolve_root(
            args.source_dir.as_deref(),
            "NWBPACK_SOURCE_DIR",
            config.source_root.clone(),
            "source",
        )?;
        let output_root = resolve_root(
            args.output_dir.as_deref(),
            "NWBPACK_OUTPUT_DIR",
            config.output_root.clone(),
            "output",
        )?;

        let filter = build_filter(args)?;

        Ok(Self {
            config,
            sessions: SessionCatalog::new(source_root),
            artifacts: ArtifactCatalog::new(output_root),
            filter,
        })
    }
}

/// Resolution priority: explicit flag, environment variable, config file.
fn resolve_root(
    flag: Option<&str>,
    env_name: &str,
    from_config: Option<PathBuf>,
    which: &str,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(expand_tilde(path));
    }
    if let Ok(env_path) = std::env::var(env_name) {
        return Ok(expand_tilde(&env_path));
    }
    if let Some(path) = from_config {
        return Ok(path);
    }
    bail!(
        "no {} directory configured: pass --{}-dir, set {}, or add it to the config file",
        which,
        which,
        env_name
    )
}

fn build_filter(args: &CatalogArgs) -> Result<SessionFilter> {
    let mut filter = SessionFilter::default();

    if let Some(animals) = &args.animal {
        filter = filter.with_animals(animals);
    }
    if let Some(spec) = &args.from_date {
        filter.from_date = Some(SessionFilter::parse_date(spec)?);
    }
    if let Some(spec) = &args.to_date {
        filter.to_date = Some(SessionFilter::parse_date(spec)?);
    }
    if let Some(spec) = &args.session_type {
        filter.session_types = Some(SessionFilter::parse_types(spec)?);
    }

    Ok(filter)
}

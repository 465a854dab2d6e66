use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use autodirs::{DirList, Registry};
use camino::Utf8PathBuf;
use serde::Serialize;

use crate::cli::Cli;
use crate::config::{self, DEFAULT_CONFIG_FILE, DirsConfig};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ConfigPathSource {
    Explicit,
    Discovered,
}

impl ConfigPathSource {
    fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
        }
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfigPath {
    path: Utf8PathBuf,
    source: ConfigPathSource,
}

#[derive(Debug, Serialize)]
struct Report {
    base_dir: String,
    dirs: BTreeMap<String, String>,
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    let config = match ctx.resolve_config_path()? {
        Some(resolved) => {
            tracing::debug!(
                path = %resolved.path,
                source = resolved.source.as_str(),
                "loading config"
            );
            config::load_from_path(&resolved.path)?
        }
        None => DirsConfig::default(),
    };

    let plan = Plan::merge(config, cli.base_dir, cli.dirs);
    let registry = plan.execute()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&plan.names, &registry, ctx.json, &mut out)
}

#[derive(Debug)]
struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    json: bool,
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            json: cli.json,
        }
    }
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(dir) = &self.chdir {
            std::env::set_current_dir(dir)
                .with_context(|| format!("changing directory to {}", dir.display()))?;
        }
        Ok(())
    }

    fn resolve_config_path(&self) -> Result<Option<ResolvedConfigPath>> {
        if let Some(file) = &self.file {
            let path = Utf8PathBuf::from_path_buf(file.clone())
                .map_err(|_| anyhow!("config path is not valid UTF-8"))?;
            return Ok(Some(ResolvedConfigPath {
                path,
                source: ConfigPathSource::Explicit,
            }));
        }

        let cwd = std::env::current_dir().context("determining current directory")?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| anyhow!("current directory is not valid UTF-8"))?;
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            return Ok(Some(ResolvedConfigPath {
                path: candidate,
                source: ConfigPathSource::Discovered,
            }));
        }
        Ok(None)
    }
}

/// What to create and where, after folding the config and the command line together.
#[derive(Debug, PartialEq, Eq)]
struct Plan {
    base_dir: Option<String>,
    names: Vec<String>,
}

impl Plan {
    /// Command-line base dir overrides the config; names are config first, then
    /// command line, with duplicates dropped.
    fn merge(config: DirsConfig, base_dir: Option<String>, extra: Vec<String>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in config.dirs.into_iter().chain(extra) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self {
            base_dir: base_dir.or(config.base_dir),
            names,
        }
    }

    fn execute(&self) -> Result<Registry> {
        let dirs = DirList::from(self.names.as_slice());
        let registry = match &self.base_dir {
            Some(base_dir) => Registry::new(dirs, base_dir)
                .with_context(|| format!("ensuring directories under `{base_dir}`"))?,
            None => Registry::in_home(dirs).context("ensuring directories under home")?,
        };
        tracing::info!(
            base_dir = %registry.base_dir(),
            count = registry.len(),
            "directories ready"
        );
        Ok(registry)
    }
}

fn render(names: &[String], registry: &Registry, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let report = Report {
            base_dir: registry.base_dir().to_string(),
            dirs: names
                .iter()
                .filter_map(|name| registry.get(name).map(|path| (name.clone(), path.to_string())))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &report).context("serializing report")?;
        writeln!(out).context("writing report")?;
        return Ok(());
    }

    for name in names {
        if let Some(path) = registry.get(name) {
            writeln!(out, "{name}\t{path}").context("writing report")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn temp_base() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, base)
    }

    #[test]
    fn merge_prefers_cli_base_dir_and_dedupes_names() {
        let config = DirsConfig {
            base_dir: Some("~".to_owned()),
            dirs: vec!["cache".to_owned(), "logs".to_owned()],
        };
        let plan = Plan::merge(
            config,
            Some("ROOT".to_owned()),
            vec!["logs".to_owned(), "tmp".to_owned()],
        );
        assert_eq!(plan.base_dir.as_deref(), Some("ROOT"));
        assert_eq!(plan.names, ["cache", "logs", "tmp"]);
    }

    #[test]
    fn merge_falls_back_to_config_base_dir() {
        let config = DirsConfig {
            base_dir: Some("HOME".to_owned()),
            dirs: Vec::new(),
        };
        let plan = Plan::merge(config, None, Vec::new());
        assert_eq!(plan.base_dir.as_deref(), Some("HOME"));
        assert!(plan.names.is_empty());
    }

    #[test]
    fn execute_creates_and_renders_in_request_order() {
        let (_tmp, base) = temp_base();
        let plan = Plan {
            base_dir: Some(base.to_string()),
            names: vec!["zeta".to_owned(), "alpha/beta".to_owned()],
        };
        let registry = plan.execute().unwrap();
        assert!(base.join("zeta").is_dir());
        assert!(base.join("alpha").join("beta").is_dir());

        let mut out = Vec::new();
        render(&plan.names, &registry, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "zeta\t{}\nalpha/beta\t{}\n",
            base.join("zeta"),
            base.join("alpha/beta")
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn render_json_includes_base_and_dirs() {
        let (_tmp, base) = temp_base();
        let plan = Plan {
            base_dir: Some(base.to_string()),
            names: vec!["cache".to_owned()],
        };
        let registry = plan.execute().unwrap();

        let mut out = Vec::new();
        render(&plan.names, &registry, true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["base_dir"], base.as_str());
        assert_eq!(value["dirs"]["cache"], base.join("cache").as_str());
    }

    #[test]
    fn execute_surfaces_invalid_base_dir() {
        let plan = Plan {
            base_dir: Some("probably/an/invalid/path/9685456321".to_owned()),
            names: vec!["cache".to_owned()],
        };
        let err = plan.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<autodirs::Error>(),
            Some(autodirs::Error::InvalidBaseDirectory { .. })
        ));
    }

    #[test]
    fn explicit_config_file_wins() {
        let (_tmp, base) = temp_base();
        let cfg = base.join("explicit.toml");
        fs::write(&cfg, "dirs = [\"a\"]\n").unwrap();

        let ctx = CliContext {
            chdir: None,
            file: Some(cfg.as_std_path().to_path_buf()),
            json: false,
        };
        let resolved = ctx.resolve_config_path().unwrap().unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Explicit);
        assert!(resolved.path.ends_with("explicit.toml"));
    }

    #[test]
    #[serial]
    fn discovers_config_in_working_directory() {
        let (_tmp, base) = temp_base();
        fs::write(base.join(DEFAULT_CONFIG_FILE), "dirs = [\"cache\"]\n").unwrap();

        let old = std::env::current_dir().unwrap();
        let ctx = CliContext {
            chdir: Some(base.as_std_path().to_path_buf()),
            file: None,
            json: false,
        };
        ctx.apply_chdir().unwrap();
        let resolved = ctx.resolve_config_path().unwrap();
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(old).unwrap();

        let resolved = resolved.unwrap();
        assert_eq!(resolved.source, ConfigPathSource::Discovered);
        assert_eq!(resolved.path.as_std_path(), cwd.join(DEFAULT_CONFIG_FILE));
        let config = config::load_from_path(&resolved.path).unwrap();
        assert_eq!(config.dirs, ["cache"]);
    }

    #[test]
    #[serial]
    fn no_config_without_file_or_discovery() {
        let (_tmp, base) = temp_base();

        let old = std::env::current_dir().unwrap();
        let ctx = CliContext {
            chdir: Some(base.as_std_path().to_path_buf()),
            file: None,
            json: false,
        };
        ctx.apply_chdir().unwrap();
        let resolved = ctx.resolve_config_path().unwrap();
        std::env::set_current_dir(old).unwrap();

        assert!(resolved.is_none());
    }

    #[test]
    fn chdir_to_missing_directory_fails() {
        let (_tmp, base) = temp_base();
        let ctx = CliContext {
            chdir: Some(base.join("missing").into_std_path_buf()),
            file: None,
            json: false,
        };
        let err = ctx.apply_chdir().unwrap_err();
        assert!(format!("{err:#}").contains("changing directory"));
    }
}

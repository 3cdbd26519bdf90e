//! Project configuration (`dmake.toml`).
//!
//! Every key is optional. A project without a `dmake.toml` gets the classic
//! `lib/`, `cli/`, `test/` layout with GCC-style flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "dmake.toml";

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct DmakeConfig {
    pub project: ProjectConfig,
    pub layout: LayoutConfig,
    pub build: BuildConfig,
    pub output: OutputConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ProjectConfig {
    /// Primary binary name. Defaults to the project directory name.
    pub name: Option<String>,
    pub test_bin: Option<String>,
    pub man_source: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LayoutConfig {
    pub lib: String,
    pub cli: String,
    pub test: String,
    pub source_ext: String,
    pub object_ext: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            lib: "lib".to_string(),
            cli: "cli".to_string(),
            test: "test".to_string(),
            source_ext: "cpp".to_string(),
            object_ext: "o".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BuildConfig {
    pub compiler: String,
    pub cxxflags: Vec<String>,
    pub release_flags: Vec<String>,
    pub debug_flags: Vec<String>,
    pub install_prefix: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            cxxflags: [
                "-Wall",
                "-Wextra",
                "-pedantic",
                "-Wno-long-long",
                "-Wfloat-equal",
                "-Wcast-qual",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            release_flags: vec!["-O2".to_string(), "-DNDEBUG".to_string()],
            debug_flags: vec!["-g".to_string(), "-D_GLIBCXX_DEBUG".to_string()],
            install_prefix: "/usr/bin".to_string(),
        }
    }
}

impl BuildConfig {
    /// Full `CXXFLAGS` value for the selected profile.
    pub fn cxxflags_for(&self, release: bool) -> String {
        let profile = if release {
            &self.release_flags
        } else {
            &self.debug_flags
        };
        self.cxxflags
            .iter()
            .chain(profile.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub makefile: String,
    /// `None` means `<lib>/lib.pri`, an empty string disables the fragment.
    pub project_file: Option<String>,
    pub extra_headers: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            makefile: "Makefile".to_string(),
            project_file: None,
            extra_headers: Vec::new(),
        }
    }
}

impl DmakeConfig {
    pub fn binary_name(&self, project_root: &Path) -> String {
        if let Some(name) = &self.project.name {
            return name.clone();
        }
        project_root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "app".to_string())
    }

    pub fn test_binary_name(&self) -> String {
        self.project
            .test_bin
            .clone()
            .unwrap_or_else(|| "testrunner".to_string())
    }

    pub fn man_source(&self, binary: &str) -> String {
        self.project
            .man_source
            .clone()
            .unwrap_or_else(|| format!("man/{}.1.xml", binary))
    }

    pub fn project_file(&self) -> Option<String> {
        match &self.output.project_file {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(path.clone()),
            None => Some(format!("{}/lib.pri", self.layout.lib)),
        }
    }
}

/// Loads `dmake.toml` from `project_root`, falling back to defaults when absent.
pub fn load_config(project_root: &Path) -> Result<DmakeConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(DmakeConfig::default());
    }
    let config_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {} - check file permissions", CONFIG_FILE))?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<DmakeConfig> {
    toml::from_str(config_str).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors (missing quotes, brackets)",
            CONFIG_FILE
        )
    })
}

//! One generation run: scan the three trees and write both artifacts.

use crate::config::{DmakeConfig, load_config};
use crate::emit::{self, MakefileSettings, RuleReport, TranslationUnits};
use crate::error::GenerateError;
use crate::scan::{self, DiskReader, ForeignTrees};
use anyhow::Result;
use colored::*;
use std::fs;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub release: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

/// Per-tree totals of a finished run.
#[derive(Debug, Clone)]
pub struct TreeSummary {
    pub tree: String,
    pub units: usize,
    pub headers: usize,
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub makefile: PathBuf,
    pub project_file: Option<PathBuf>,
    pub trees: Vec<TreeSummary>,
    pub rules: Vec<RuleReport>,
}

pub fn generate(project_root: &Path, options: &GenerateOptions) -> Result<Summary> {
    let config = load_config(project_root)?;
    generate_with(project_root, &config, options)
}

pub fn generate_with(
    project_root: &Path,
    config: &DmakeConfig,
    options: &GenerateOptions,
) -> Result<Summary> {
    let layout = &config.layout;
    let trees = ForeignTrees::from_layout(layout)?;

    let units = TranslationUnits {
        lib: scan::enumerate(project_root, &layout.lib, &layout.source_ext),
        cli: scan::enumerate(project_root, &layout.cli, &layout.source_ext),
        test: scan::enumerate(project_root, &layout.test, &layout.source_ext),
    };
    if units.lib.is_empty() {
        return Err(GenerateError::NoSources {
            root: layout.lib.clone(),
        }
        .into());
    }
    for (tree, files) in [(&layout.cli, &units.cli), (&layout.test, &units.test)] {
        if files.is_empty() && options.verbose {
            eprintln!(
                "   {} No .{} files under {}/, skipping",
                "!".yellow(),
                layout.source_ext,
                tree
            );
        }
    }

    let project_file = match config.project_file() {
        Some(path) if !options.dry_run => {
            write_project_file(project_root, config, &units.lib, &path)
        }
        _ => None,
    };

    let settings = MakefileSettings::from_config(config, project_root, options.release);
    let reader = DiskReader::new(project_root);
    let makefile = project_root.join(&config.output.makefile);

    let rules = if options.dry_run {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        emit::emit_makefile(&mut out, &settings, &units, &reader, &trees)?
    } else {
        let write_err = |source| GenerateError::Write {
            path: makefile.clone(),
            source,
        };
        write_atomically(&makefile, |out| {
            emit::emit_makefile(out, &settings, &units, &reader, &trees)
        })
        .map_err(write_err)?
    };

    if options.verbose {
        for rule in &rules {
            eprintln!(
                "   {} {} ({} headers)",
                "+".green(),
                rule.object,
                rule.headers.len()
            );
        }
    }

    let summary = Summary {
        makefile,
        project_file,
        trees: summarize(config, &units, &rules),
        rules,
    };
    Ok(summary)
}

/// Writes the qmake fragment. Failures are reported and otherwise ignored.
fn write_project_file(
    project_root: &Path,
    config: &DmakeConfig,
    lib_sources: &[String],
    path: &str,
) -> Option<PathBuf> {
    let target = project_root.join(path);
    let headers = emit::library_headers(
        project_root,
        &config.layout.lib,
        lib_sources,
        &config.output.extra_headers,
    );

    let result = write_atomically(&target, |out| {
        emit::emit_project_file(out, &config.layout.lib, &headers, lib_sources)
    });

    match result {
        Ok(()) => Some(target),
        Err(e) => {
            eprintln!(
                "   {} Skipping project file {}: {}",
                "!".yellow(),
                target.display(),
                e
            );
            None
        }
    }
}

/// Writes `path` through a temporary file in the same directory, so a failed
/// run leaves the previous contents in place.
fn write_atomically<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<NamedTempFile>) -> io::Result<T>,
) -> io::Result<T> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut out = BufWriter::new(NamedTempFile::new_in(dir)?);
    let value = write(&mut out)?;
    let tmp = out.into_inner().map_err(|e| e.into_error())?;

    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn summarize(
    config: &DmakeConfig,
    units: &TranslationUnits,
    rules: &[RuleReport],
) -> Vec<TreeSummary> {
    let layout = &config.layout;
    let mut offset = 0;
    let mut trees = Vec::new();
    for (tree, files) in [
        (&layout.lib, &units.lib),
        (&layout.cli, &units.cli),
        (&layout.test, &units.test),
    ] {
        let tree_rules = &rules[offset..offset + files.len()];
        offset += files.len();

        let mut headers: Vec<&str> = tree_rules
            .iter()
            .flat_map(|r| r.headers.iter().map(String::as_str))
            .collect();
        headers.sort_unstable();
        headers.dedup();

        trees.push(TreeSummary {
            tree: tree.clone(),
            units: files.len(),
            headers: headers.len(),
        });
    }
    trees
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write(root: &Path, path: &str, contents: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }

    #[test]
    fn test_empty_library_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cli/main.cpp", "");

        let err = generate(dir.path(), &GenerateOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::NoSources { .. })
        ));
        assert!(!dir.path().join("Makefile").exists());
    }

    #[test]
    fn test_missing_test_tree_still_generates() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "#include \"a.h\"\n");
        write(dir.path(), "lib/a.h", "#include \"b.h\"\n");
        write(dir.path(), "lib/b.h", "");
        write(dir.path(), "cli/main.cpp", "#include \"a.h\"\n");

        let summary = generate(dir.path(), &GenerateOptions::default()).unwrap();
        let makefile = fs::read_to_string(dir.path().join("Makefile")).unwrap();

        assert!(makefile.contains("lib/a.o: lib/a.cpp lib/a.h lib/b.h\n"));
        assert!(makefile.contains("cli/main.o: cli/main.cpp lib/a.h lib/b.h\n"));
        assert!(makefile.contains("TESTOBJ =\n"));
        assert_eq!(summary.rules.len(), 2);
        assert_eq!(summary.trees[0].units, 1);
        assert_eq!(summary.trees[0].headers, 2);
        assert_eq!(summary.trees[2].units, 0);
    }

    #[test]
    fn test_project_file_written() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "");
        write(dir.path(), "lib/a.h", "");

        let summary = generate(dir.path(), &GenerateOptions::default()).unwrap();
        let pri = fs::read_to_string(dir.path().join("lib/lib.pri")).unwrap();
        assert!(pri.contains("HEADERS += $$PWD/a.h"));
        assert!(pri.contains("SOURCES += $$PWD/a.cpp"));
        assert_eq!(summary.project_file, Some(dir.path().join("lib/lib.pri")));
    }

    #[test]
    fn test_unwritable_project_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "");
        write(
            dir.path(),
            "dmake.toml",
            "[output]\nproject_file = \"missing/dir/lib.pri\"\n",
        );

        let summary = generate(dir.path(), &GenerateOptions::default()).unwrap();
        assert!(summary.project_file.is_none());
        assert!(dir.path().join("Makefile").exists());
    }

    #[test]
    fn test_unwritable_makefile_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "");
        write(
            dir.path(),
            "dmake.toml",
            "[output]\nmakefile = \"missing/dir/Makefile\"\n",
        );

        let err = generate(dir.path(), &GenerateOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerateError>(),
            Some(GenerateError::Write { .. })
        ));
    }

    #[test]
    fn test_failed_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Makefile");
        fs::write(&target, "old\n").unwrap();

        let result = write_atomically(&target, |out| {
            out.write_all(b"half a rule")?;
            Err::<(), _>(io::Error::other("disk full"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "old\n");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_makefile_replaced_in_full() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "");
        write(dir.path(), "Makefile", &"stale\n".repeat(10_000));

        generate(dir.path(), &GenerateOptions::default()).unwrap();
        let makefile = fs::read_to_string(dir.path().join("Makefile")).unwrap();
        assert!(makefile.starts_with("CXXFLAGS="));
        assert!(!makefile.contains("stale"));
    }

    #[test]
    fn test_release_flags() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.cpp", "");
        let options = GenerateOptions {
            release: true,
            ..Default::default()
        };
        generate(dir.path(), &options).unwrap();
        let makefile = fs::read_to_string(dir.path().join("Makefile")).unwrap();
        assert!(makefile.lines().next().unwrap().ends_with("-O2 -DNDEBUG"));
    }
}

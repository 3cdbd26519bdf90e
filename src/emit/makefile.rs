//! Makefile emission.
//!
//! The layout of the generated file is fixed: settings, object lists,
//! targets, then one rule per translation unit.

use crate::config::DmakeConfig;
use crate::scan::{self, DependencySet, ForeignTrees, SourceReader};
use std::io::{self, Write};
use std::path::Path;

const CONTINUATION_INDENT: usize = 14;

/// Shell flavour of the `clean`/`install` recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Everything the fixed parts of the Makefile refer to.
#[derive(Debug, Clone)]
pub struct MakefileSettings {
    pub cxx: String,
    pub cxxflags: String,
    pub install_prefix: String,
    pub binary: String,
    pub test_binary: String,
    pub man_source: String,
    pub lib_dir: String,
    pub cli_dir: String,
    pub test_dir: String,
    pub source_ext: String,
    pub object_ext: String,
    pub platform: Platform,
}

impl MakefileSettings {
    pub fn from_config(config: &DmakeConfig, project_root: &Path, release: bool) -> Self {
        let binary = config.binary_name(project_root);
        Self {
            cxx: config.build.compiler.clone(),
            cxxflags: config.build.cxxflags_for(release),
            install_prefix: config.build.install_prefix.clone(),
            man_source: config.man_source(&binary),
            binary,
            test_binary: config.test_binary_name(),
            lib_dir: config.layout.lib.clone(),
            cli_dir: config.layout.cli.clone(),
            test_dir: config.layout.test.clone(),
            source_ext: config.layout.source_ext.clone(),
            object_ext: config.layout.object_ext.clone(),
            platform: Platform::host(),
        }
    }
}

/// Translation units per tree, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct TranslationUnits {
    pub lib: Vec<String>,
    pub cli: Vec<String>,
    pub test: Vec<String>,
}

/// What was emitted for one translation unit.
#[derive(Debug, Clone)]
pub struct RuleReport {
    pub source: String,
    pub object: String,
    pub headers: Vec<String>,
}

pub fn emit_makefile<W: Write, R: SourceReader + ?Sized>(
    out: &mut W,
    settings: &MakefileSettings,
    units: &TranslationUnits,
    reader: &R,
    trees: &ForeignTrees,
) -> io::Result<Vec<RuleReport>> {
    emit_settings(out, settings)?;

    write!(out, "\n###### Object Files\n\n")?;
    emit_object_list(out, "LIBOBJ", &units.lib, &settings.object_ext)?;
    emit_object_list(out, "CLIOBJ", &units.cli, &settings.object_ext)?;
    emit_object_list(out, "TESTOBJ", &units.test, &settings.object_ext)?;

    write!(out, "\n###### Targets\n\n")?;
    emit_targets(out, settings)?;

    write!(out, "\n###### Build\n\n")?;
    let mut reports = Vec::new();
    for source in units.lib.iter().chain(&units.cli).chain(&units.test) {
        reports.push(emit_rule(out, source, settings, reader, trees)?);
    }
    Ok(reports)
}

fn emit_settings<W: Write>(out: &mut W, s: &MakefileSettings) -> io::Result<()> {
    writeln!(out, "CXXFLAGS={}", s.cxxflags)?;
    writeln!(out, "CXX={}", s.cxx)?;
    write!(out, "BIN=${{DESTDIR}}{}\n\n", s.install_prefix)?;
    writeln!(
        out,
        "# For 'make man': sudo apt-get install xsltproc docbook-xsl docbook-xml"
    )?;
    writeln!(
        out,
        "DB2MAN=/usr/share/sgml/docbook/stylesheet/xsl/nwalsh/manpages/docbook.xsl"
    )?;
    writeln!(
        out,
        "XP=xsltproc -''-nonet -''-param man.charmap.use.subset \"0\""
    )?;
    write!(out, "MAN_SOURCE={}\n\n", s.man_source)
}

/// `NAME =     a.o \` followed by indented continuation lines.
pub fn emit_object_list<W: Write>(
    out: &mut W,
    name: &str,
    sources: &[String],
    object_ext: &str,
) -> io::Result<()> {
    write!(out, "{} =", name)?;
    for (i, source) in sources.iter().enumerate() {
        let object = scan::object_file(source, object_ext);
        if i == 0 {
            write!(out, "     {}", object)?;
        } else {
            write!(out, " \\\n{}{}", " ".repeat(CONTINUATION_INDENT), object)?;
        }
    }
    write!(out, "\n\n")
}

fn emit_targets<W: Write>(out: &mut W, s: &MakefileSettings) -> io::Result<()> {
    let bin = &s.binary;
    let testbin = &s.test_binary;

    write!(out, "{}:\t$(LIBOBJ)\t$(CLIOBJ)\n", bin)?;
    write!(
        out,
        "\t$(CXX) $(CXXFLAGS) -o {} $(CLIOBJ) $(LIBOBJ) $(LDFLAGS)\n\n",
        bin
    )?;
    write!(out, "all:\t{}\t{}\n\n", bin, testbin)?;
    write!(out, "{}:\t$(TESTOBJ)\t$(LIBOBJ)\n", testbin)?;
    write!(
        out,
        "\t$(CXX) $(CXXFLAGS) -o {} $(TESTOBJ) $(LIBOBJ) $(LDFLAGS)\n\n",
        testbin
    )?;
    write!(out, "test:\tall\n\t./{}\n\n", testbin)?;
    writeln!(out, "clean:")?;

    let dirs = [&s.lib_dir, &s.cli_dir, &s.test_dir];
    match s.platform {
        Platform::Unix => {
            let objects: Vec<String> = dirs
                .iter()
                .map(|dir| format!("{}/*.{}", dir, s.object_ext))
                .collect();
            write!(out, "\trm -f {} {} {}\n\n", objects.join(" "), testbin, bin)?;
            write!(out, "man:\t$(MAN_SOURCE)\n")?;
            write!(out, "\t$(XP) $(DB2MAN) $(MAN_SOURCE)\n\n")?;
            write!(out, "install:\t{}\n", bin)?;
            write!(out, "\tinstall -d ${{BIN}}\n")?;
            write!(out, "\tinstall {} ${{BIN}}\n\n", bin)?;
        }
        Platform::Windows => {
            for dir in dirs {
                write!(out, "\tdel {}\\*.{}\n", dir.replace('/', "\\"), s.object_ext)?;
            }
            write!(out, "\tdel *.exe\n\n")?;
        }
    }
    Ok(())
}

/// Writes the rule for one translation unit and returns its dependency list.
pub fn emit_rule<W: Write, R: SourceReader + ?Sized>(
    out: &mut W,
    source: &str,
    settings: &MakefileSettings,
    reader: &R,
    trees: &ForeignTrees,
) -> io::Result<RuleReport> {
    let object = scan::object_file(source, &settings.object_ext);

    let mut deps = DependencySet::new().with_source_ext(&settings.source_ext);
    scan::collect_dependencies(source, &mut deps, reader, trees);

    write!(out, "{}: {}", object, source)?;
    for dep in deps.iter() {
        write!(out, " {}", dep)?;
    }
    write!(
        out,
        "\n\t$(CXX) $(CXXFLAGS) -I{} -c -o {} {}\n\n",
        settings.lib_dir, object, source
    )?;

    Ok(RuleReport {
        source: source.to_string(),
        object,
        headers: deps.into_vec(),
    })
}

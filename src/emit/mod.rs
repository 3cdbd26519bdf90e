//! Output writers for the generated Makefile and qmake fragment.

pub mod makefile;
pub mod project;

pub use makefile::{
    MakefileSettings, Platform, RuleReport, TranslationUnits, emit_makefile, emit_rule,
};
pub use project::{emit_project_file, library_headers};

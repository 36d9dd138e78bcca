//! Compilation options.
//!
//! [`CompileOptions`] is built either in code with the `with_*` methods or
//! loaded from a JSON file (`gssc --config`). Fields missing from the file
//! take their default values.

use std::path::Path;

use clap::ValueEnum;
use gss_core::substitution::{
    MinimalSubstitutionMap, SimpleSubstitutionMap, SplittingSubstitutionMap, SubstitutionMap,
};
use gss_core::{GssError, GssResult};
use serde::{Deserialize, Serialize};

/// How the compiled stylesheet is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Minimal whitespace (default).
    #[default]
    Compressed,
    /// Indented, one declaration per line.
    Pretty,
}

/// How CSS class names are renamed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenamingType {
    /// Keep every class name.
    #[default]
    None,
    /// Append `_` to each name.
    Debug,
    /// Shorten each `-`-separated part of a name independently.
    Closure,
    /// Shorten whole names.
    Minimal,
}

impl RenamingType {
    /// The substitution map implementing this renaming, or `None` when
    /// classes keep their names.
    ///
    /// Generated names never collide with a name in `reserved`.
    pub fn substitution_map(self, reserved: &[String]) -> Option<Box<dyn SubstitutionMap>> {
        match self {
            RenamingType::None => None,
            RenamingType::Debug => Some(Box::new(SimpleSubstitutionMap)),
            RenamingType::Closure => Some(Box::new(SplittingSubstitutionMap::new(
                MinimalSubstitutionMap::with_reserved(reserved.iter().cloned()),
            ))),
            RenamingType::Minimal => Some(Box::new(MinimalSubstitutionMap::with_reserved(
                reserved.iter().cloned(),
            ))),
        }
    }
}

/// Everything that changes how inputs are compiled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub output_format: OutputFormat,
    /// Condition names that hold when `@if` chains are eliminated.
    pub true_conditions: Vec<String>,
    pub rename: RenamingType,
    /// Class names left untouched by renaming.
    pub excluded_classes: Vec<String>,
    /// When false, at-rules of unrecognized type are errors.
    pub allow_unrecognized_at_rules: bool,
    /// When false, `@def` constants are left unexpanded.
    pub process_constants: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            output_format: OutputFormat::Compressed,
            true_conditions: Vec::new(),
            rename: RenamingType::None,
            excluded_classes: Vec::new(),
            allow_unrecognized_at_rules: false,
            process_constants: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> GssResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GssError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| GssError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_true_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.true_conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rename(mut self, rename: RenamingType) -> Self {
        self.rename = rename;
        self
    }

    pub fn with_excluded_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allow_unrecognized_at_rules(mut self, allow: bool) -> Self {
        self.allow_unrecognized_at_rules = allow;
        self
    }

    pub fn with_process_constants(mut self, process: bool) -> Self {
        self.process_constants = process;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let options = CompileOptions::default();
        assert_eq!(options.output_format, OutputFormat::Compressed);
        assert_eq!(options.rename, RenamingType::None);
        assert!(options.process_constants);
        assert!(!options.allow_unrecognized_at_rules);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"rename": "minimal", "true_conditions": ["IE"]}"#).unwrap();
        assert_eq!(options.rename, RenamingType::Minimal);
        assert_eq!(options.true_conditions, vec!["IE".to_string()]);
        assert_eq!(options.output_format, OutputFormat::Compressed);
        assert!(options.process_constants);
    }

    #[test]
    fn from_json_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = CompileOptions::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, GssError::Config { .. }));
    }

    #[test]
    fn from_json_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompileOptions::from_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, GssError::InputUnreadable { .. }));
    }

    #[test]
    fn renaming_maps() {
        assert!(RenamingType::None.substitution_map(&[]).is_none());
        let mut debug = RenamingType::Debug.substitution_map(&[]).unwrap();
        assert_eq!(debug.get("menu"), "menu_");
        let mut closure = RenamingType::Closure.substitution_map(&[]).unwrap();
        let first = closure.get("goog-menu");
        assert_eq!(first.split('-').count(), 2);
        assert_eq!(closure.get("goog-menu"), first);
    }
}

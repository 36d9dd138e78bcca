//! The compilation pipeline: parse, run every pass, print.
//!
//! Passes report problems to the [`ErrorManager`] they are given and keep
//! going, so one call surfaces every diagnostic it can. A `compile` that
//! returns `Ok` may still have recorded errors; callers check
//! [`ErrorManager::has_errors`] before trusting the output.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use gss_core::substitution::RecordingSubstitutionMap;
use gss_core::{ErrorManager, GssError, GssResult, SourceCode};
use gss_cst::passes::{
    CheckUnknownAtRules, CollectConstantDefinitions, CreateConditionalNodes,
    CreateDefinitionNodes, CreateStandardAtRuleNodes, CssClassRenaming,
    EliminateConditionalNodes, ReplaceConstantReferences,
};
use gss_cst::{parse_stylesheet, CompactPrinter, CssCompilerPass, CssTree, PrettyPrinter};
use tracing::{debug, info};

use crate::options::{CompileOptions, OutputFormat};

/// The printed stylesheet and, when classes were renamed, the renaming table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub css: String,
    /// Original class name to new class name.
    pub renaming_map: Option<BTreeMap<String, String>>,
}

/// Compile `inputs` as one stylesheet, in order.
///
/// Fails only when an input does not parse or the printer meets a node that
/// should have been resolved by a pass.
pub fn compile(
    inputs: &[Arc<SourceCode>],
    options: &CompileOptions,
    errors: &mut dyn ErrorManager,
) -> GssResult<CompileOutput> {
    let mut tree = parse_all(inputs)?;
    let renaming_map = run_passes(&mut tree, options, errors);
    let css = print(&tree, options.output_format)?;
    info!(
        inputs = inputs.len(),
        bytes = css.len(),
        errors = errors.has_errors(),
        "compiled"
    );
    Ok(CompileOutput { css, renaming_map })
}

/// Read each path and compile the files together.
pub fn compile_files<P: AsRef<Path>>(
    paths: &[P],
    options: &CompileOptions,
    errors: &mut dyn ErrorManager,
) -> GssResult<CompileOutput> {
    let sources = paths
        .iter()
        .map(|path| read_source(path.as_ref()))
        .collect::<GssResult<Vec<_>>>()?;
    compile(&sources, options, errors)
}

/// Load a file as a shared source buffer.
pub fn read_source(path: &Path) -> GssResult<Arc<SourceCode>> {
    let text = std::fs::read_to_string(path).map_err(|source| GssError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceCode::shared(path.display().to_string(), text))
}

fn parse_all(inputs: &[Arc<SourceCode>]) -> GssResult<CssTree> {
    let mut merged: Option<CssTree> = None;
    for source in inputs {
        let tree = parse_stylesheet(source)?;
        debug!(file = source.file_name(), "parsed");
        match merged.as_mut() {
            Some(existing) => existing.append(tree),
            None => merged = Some(tree),
        }
    }
    Ok(merged.unwrap_or_else(CssTree::empty))
}

fn run_passes(
    tree: &mut CssTree,
    options: &CompileOptions,
    errors: &mut dyn ErrorManager,
) -> Option<BTreeMap<String, String>> {
    CreateStandardAtRuleNodes::new(&mut *errors).run_pass(tree);
    CreateDefinitionNodes::new(&mut *errors).run_pass(tree);
    CreateConditionalNodes::new(&mut *errors).run_pass(tree);
    CheckUnknownAtRules::new(&mut *errors, options.allow_unrecognized_at_rules).run_pass(tree);
    EliminateConditionalNodes::new(&mut *errors, options.true_conditions.iter().cloned())
        .run_pass(tree);

    if options.process_constants {
        let definitions = CollectConstantDefinitions::collect(tree);
        ReplaceConstantReferences::new(&mut *errors, definitions).run_pass(tree);
    }

    let map = options.rename.substitution_map(&options.excluded_classes)?;
    let mut recording = RecordingSubstitutionMap::new(map);
    CssClassRenaming::new(&mut recording)
        .with_excluded_classes(options.excluded_classes.iter().cloned())
        .run_pass(tree);
    Some(recording.renaming_map())
}

fn print(tree: &CssTree, format: OutputFormat) -> GssResult<String> {
    let (css, failed) = match format {
        OutputFormat::Compressed => {
            let mut printer = CompactPrinter::new();
            printer.run(tree);
            let failed = printer.failed();
            (printer.into_output(), failed)
        }
        OutputFormat::Pretty => {
            let mut printer = PrettyPrinter::new();
            printer.run(tree);
            let failed = printer.failed();
            (printer.into_output(), failed)
        }
    };
    if failed {
        return Err(GssError::internal(
            "a conditional block was left in the tree at print time",
        ));
    }
    Ok(css)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenamingType;
    use gss_core::BasicErrorManager;

    fn compile_one(text: &str, options: &CompileOptions) -> (CompileOutput, BasicErrorManager) {
        let mut errors = BasicErrorManager::new();
        let output = compile(&[SourceCode::shared("test.gss", text)], options, &mut errors)
            .expect("compile");
        (output, errors)
    }

    #[test]
    fn inputs_are_concatenated_in_order() {
        let inputs = [
            SourceCode::shared("a.gss", "@def C red; .a { color: C }"),
            SourceCode::shared("b.gss", ".b { color: C }"),
        ];
        let mut errors = BasicErrorManager::new();
        let output = compile(&inputs, &CompileOptions::default(), &mut errors).unwrap();
        assert!(!errors.has_errors(), "{}", errors.render_all());
        assert_eq!(output.css, ".a{color:red}.b{color:red}");
        assert_eq!(output.renaming_map, None);
    }

    #[test]
    fn no_inputs_print_nothing() {
        let mut errors = BasicErrorManager::new();
        let output = compile(&[], &CompileOptions::default(), &mut errors).unwrap();
        assert_eq!(output.css, "");
    }

    #[test]
    fn parse_failure_is_an_error() {
        let mut errors = BasicErrorManager::new();
        let err = compile(
            &[SourceCode::shared("bad.gss", ".a { color: red")],
            &CompileOptions::default(),
            &mut errors,
        )
        .unwrap_err();
        assert!(matches!(err, GssError::Parse { .. }));
    }

    #[test]
    fn constants_can_be_left_alone() {
        let options = CompileOptions::default().with_process_constants(false);
        let (output, _) = compile_one("@def C red; .a { color: C }", &options);
        assert_eq!(output.css, ".a{color:C}");
    }

    #[test]
    fn conditions_select_a_branch() {
        let text = "@if (IE) { .a { x: 1 } } @else { .a { x: 2 } }";
        let (ie, _) = compile_one(
            text,
            &CompileOptions::default().with_true_conditions(["IE"]),
        );
        let (other, _) = compile_one(text, &CompileOptions::default());
        assert_eq!(ie.css, ".a{x:1}");
        assert_eq!(other.css, ".a{x:2}");
    }

    #[test]
    fn renaming_produces_a_map() {
        let options = CompileOptions::default()
            .with_rename(RenamingType::Debug)
            .with_excluded_classes(["keep"]);
        let (output, _) = compile_one(".menu .keep { x: 1 }", &options);
        assert_eq!(output.css, ".menu_ .keep{x:1}");
        let map = output.renaming_map.unwrap();
        assert_eq!(map.get("menu").map(String::as_str), Some("menu_"));
        assert!(!map.contains_key("keep"));
    }

    #[test]
    fn unknown_at_rules_are_checked() {
        let (_, errors) = compile_one("@custom x;", &CompileOptions::default());
        assert!(errors.has_errors());

        let allowed = CompileOptions::default().with_allow_unrecognized_at_rules(true);
        let (output, errors) = compile_one("@custom x;", &allowed);
        assert!(!errors.has_errors());
        assert_eq!(output.css, "@custom x;");
    }

    #[test]
    fn pretty_output() {
        let options = CompileOptions::default().with_output_format(OutputFormat::Pretty);
        let (output, _) = compile_one(".a{color:red}", &options);
        assert_eq!(output.css, ".a {\n  color: red;\n}\n");
    }
}

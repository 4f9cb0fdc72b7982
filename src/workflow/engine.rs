//! Workflow engine
//!
//! This module contains the engine that walks the input tree and converts
//! every eligible file.

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use log::{debug, info};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::config::Config;
use crate::discovery::{EligibilityPredicate, ScanOptions, ensure_input_root, scan_tree};
use crate::errors::{Error, Result, generic_error};
use crate::file_ops::{ensure_parent_dir, read_source, write_atomically};
use crate::path_gen::{ExtensionRule, PathMapper, relative_path};
use crate::transform::Transformer;

use super::context::{
    CancellationToken, FailureRecord, FileOutcome, PlannedOperation, RunSummary, Stage,
};
use super::progress::{LogProgress, ProgressListener};

/// Converts every eligible file below an input root into a mirrored output tree
///
/// Files are processed one after another unless more than one job is
/// configured, in which case a pool of exactly `jobs` threads bounds the
/// number of concurrent transformer calls. A failing file never stops the
/// run; only a missing input root does.
#[derive(Debug, Clone)]
pub struct TreeTransformer {
    mapper: PathMapper,
    scan_options: ScanOptions,
    lossy_decoding: bool,
    jobs: usize,
    cancellation: CancellationToken,
}

impl TreeTransformer {
    pub fn new(mapper: PathMapper) -> Self {
        TreeTransformer {
            mapper,
            scan_options: ScanOptions::default(),
            lossy_decoding: true,
            jobs: 1,
            cancellation: CancellationToken::new(),
        }
    }

    /// Builds an engine from the extension, traversal and job settings of `config`
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let rule = ExtensionRule::new(&config.eligible_extension, &config.output_extension_suffix);
        let scan_options = ScanOptions {
            exclude: config.exclude_patterns()?,
            skip_hidden: config.skip_hidden,
            ..ScanOptions::default()
        };
        if config.jobs == 0 {
            return Err(anyhow!("Jobs must be at least 1."));
        }

        Ok(TreeTransformer::new(PathMapper::new(rule))
            .with_scan_options(scan_options)
            .with_lossy_decoding(config.lossy_decoding)
            .with_jobs(config.jobs))
    }

    pub fn with_scan_options(mut self, scan_options: ScanOptions) -> Self {
        self.scan_options = scan_options;
        self
    }

    pub fn with_lossy_decoding(mut self, lossy_decoding: bool) -> Self {
        self.lossy_decoding = lossy_decoding;
        self
    }

    /// Sets the number of files processed concurrently; zero is treated as one
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Token that stops the run before the next file is started
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Converts the tree, logging progress through the `log` facade
    pub fn run(
        &self,
        input_root: &Path,
        output_root: &Path,
        predicate: &dyn EligibilityPredicate,
        transformer: &dyn Transformer,
    ) -> Result<RunSummary> {
        self.run_with_progress(input_root, output_root, predicate, transformer, &LogProgress)
    }

    /// Converts the tree, reporting the start and end of every file to `progress`
    ///
    /// # Errors
    /// Fails before touching any file if `input_root` is not an existing,
    /// readable directory. Per-file failures are recorded in the summary.
    pub fn run_with_progress(
        &self,
        input_root: &Path,
        output_root: &Path,
        predicate: &dyn EligibilityPredicate,
        transformer: &dyn Transformer,
        progress: &dyn ProgressListener,
    ) -> Result<RunSummary> {
        ensure_input_root(input_root)?;
        let scan = scan_tree(
            input_root,
            predicate,
            &self.scan_options_for(input_root, output_root),
        )?;

        info!(
            "Converting {} files from {} into {}",
            scan.files.len(),
            input_root.display(),
            output_root.display()
        );

        let process = |file: &PathBuf| {
            self.process_guarded(input_root, output_root, file, transformer, progress)
        };

        let outcomes: Vec<FileOutcome> = if self.jobs <= 1 {
            scan.files.iter().map(process).collect()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| generic_error(&format!("Failed to start worker pool: {e}")))?;
            pool.install(|| scan.files.par_iter().map(process).collect())
        };

        let mut summary = RunSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary.unreadable = scan
            .unreadable
            .iter()
            .map(|failure| {
                let relative = relative_path(input_root, &failure.path)
                    .unwrap_or_else(|_| failure.path.clone());
                FailureRecord::new(&relative, Stage::Discovered, &failure.error)
            })
            .collect();

        info!(
            "Finished processing {} files ({} converted, {} failed)",
            summary.processed, summary.succeeded, summary.failed
        );

        Ok(summary)
    }

    /// Lists what a run would do without reading, converting or writing anything
    pub fn plan(
        &self,
        input_root: &Path,
        output_root: &Path,
        predicate: &dyn EligibilityPredicate,
    ) -> Result<Vec<PlannedOperation>> {
        let scan = scan_tree(
            input_root,
            predicate,
            &self.scan_options_for(input_root, output_root),
        )?;

        Ok(scan
            .files
            .into_iter()
            .map(|file| {
                let destination = self
                    .mapper
                    .map(input_root, output_root, &file)
                    .map_err(|e| e.to_string());
                PlannedOperation {
                    source: file,
                    destination,
                }
            })
            .collect())
    }

    // An output root nested in the input root is never scanned, so earlier
    // outputs are not converted again.
    fn scan_options_for(&self, input_root: &Path, output_root: &Path) -> ScanOptions {
        let mut options = self.scan_options.clone();
        if let Some(nested) = nested_output_dir(input_root, output_root) {
            debug!("Not scanning output directory {}", output_root.display());
            options.skip_dirs.push(nested);
        }
        options
    }

    fn process_guarded(
        &self,
        input_root: &Path,
        output_root: &Path,
        file: &Path,
        transformer: &dyn Transformer,
        progress: &dyn ProgressListener,
    ) -> FileOutcome {
        let relative = relative_path(input_root, file).unwrap_or_else(|_| file.to_path_buf());

        if self.cancellation.is_cancelled() {
            let outcome = FileOutcome::Skipped {
                relative_path: relative,
            };
            progress.on_finish(&outcome);
            return outcome;
        }

        progress.on_start(&relative);
        let outcome = self.process_file(
            input_root,
            output_root,
            file,
            &relative,
            transformer,
            progress,
        );
        progress.on_finish(&outcome);
        outcome
    }

    fn process_file(
        &self,
        input_root: &Path,
        output_root: &Path,
        file: &Path,
        relative: &Path,
        transformer: &dyn Transformer,
        progress: &dyn ProgressListener,
    ) -> FileOutcome {
        let failed = |stage: Stage, error: Error| {
            FileOutcome::Failed(FailureRecord::new(relative, stage, &error))
        };

        let task = match self.mapper.task_for(input_root, output_root, file) {
            Ok(task) => task,
            Err(e) => return failed(Stage::Discovered, e),
        };
        if let Err(e) = ensure_parent_dir(task.output_path()) {
            return failed(Stage::Discovered, e);
        }

        let source_text = match read_source(task.input_path(), self.lossy_decoding) {
            Ok(text) => text,
            Err(e) => return failed(Stage::Discovered, e),
        };
        debug!(
            "Read {} bytes from {}",
            source_text.len(),
            task.input_path().display()
        );

        let converted = match transformer.transform(&source_text) {
            Ok(text) => text,
            Err(e) => return failed(Stage::Read, e),
        };
        progress.on_transformed(relative, &converted);

        if let Err(e) = write_atomically(task.output_path(), &converted) {
            return failed(Stage::Transformed, e);
        }

        FileOutcome::Written {
            bytes: converted.len(),
            task,
        }
    }
}

/// Returns the output root relative to the input root when it lies inside it
fn nested_output_dir(input_root: &Path, output_root: &Path) -> Option<PathBuf> {
    let relative = match output_root.strip_prefix(input_root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => {
            let input = input_root.canonicalize().ok()?;
            let output = output_root.canonicalize().ok()?;
            output.strip_prefix(&input).ok()?.to_path_buf()
        }
    };
    Some(relative).filter(|relative| !relative.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::discovery::ExtensionFilter;
    use crate::errors::ErrorKind;

    fn engine() -> TreeTransformer {
        TreeTransformer::new(PathMapper::new(ExtensionRule::new(".py", "_rustified.rs")))
    }

    #[test]
    fn test_run_converts_nested_tree() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir_all(input.join("pkg")).unwrap();
        fs::write(input.join("pkg/agent.py"), "class Agent: pass").unwrap();

        let upper = |text: &str| -> Result<String> { Ok(text.to_uppercase()) };
        let summary = engine()
            .run(&input, &output, &ExtensionFilter::new(".py"), &upper)
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(
            fs::read_to_string(output.join("pkg/agent_rustified.rs")).unwrap(),
            "CLASS AGENT: PASS"
        );
    }

    #[test]
    fn test_mapping_failure_is_recorded_at_discovery() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("README.md"), "# readme").unwrap();

        let everything = |_: &Path| true;
        let echo = |text: &str| -> Result<String> { Ok(text.to_string()) };
        let summary = engine()
            .run(&input, &dir.path().join("out"), &everything, &echo)
            .unwrap();

        assert_eq!(summary.failed, 1);
        let failure = summary.failure_for(Path::new("README.md")).unwrap();
        assert_eq!(failure.kind, ErrorKind::Path);
        assert_eq!(failure.stage, Stage::Discovered);
    }

    #[test]
    fn test_plan_does_not_touch_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("main.py"), "print(1)").unwrap();

        let plan = engine()
            .plan(&input, &output, &ExtensionFilter::new(".py"))
            .unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].destination, Ok(output.join("main_rustified.rs")));
        assert!(!output.exists());
    }

    #[test]
    fn test_nested_output_dir() {
        assert_eq!(
            nested_output_dir(Path::new("in"), Path::new("in/converted")),
            Some(PathBuf::from("converted"))
        );
        assert_eq!(nested_output_dir(Path::new("in"), Path::new("in-rustified")), None);
        assert_eq!(nested_output_dir(Path::new("in"), Path::new("in")), None);
    }

    #[test]
    fn test_nested_output_root_is_not_converted_again() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = input.join("converted");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.py"), "x = 1").unwrap();

        let engine = TreeTransformer::new(PathMapper::new(ExtensionRule::new(".py", "_rs.py")));
        let echo = |text: &str| -> Result<String> { Ok(text.to_string()) };
        let predicate = ExtensionFilter::new(".py");

        engine.run(&input, &output, &predicate, &echo).unwrap();
        let second = engine.run(&input, &output, &predicate, &echo).unwrap();

        assert_eq!(second.processed, 1);
        assert_eq!(second.outputs, vec![output.join("a_rs.py")]);
        assert!(!output.join("converted").exists());
    }
}

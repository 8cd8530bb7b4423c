use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::extraction::{self, ExtractOptions};
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::providers::google::GoogleTranslate;
use crate::translation::{Assembler, RenderMode, RunOptions, TranslationPipeline};

// @module: Application controller for document translation

/// Suffix of the optional table dump, appended to the document stem
pub const TABLE_DUMP_SUFFIX: &str = "_translation_table.json";

/// Outcome of a single document run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The artifact was written
    Written(PathBuf),
    /// The artifact already existed and overwriting was not forced
    Skipped(PathBuf),
}

/// Counters of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation provider shared by every run
    provider: Arc<dyn Provider>,
}

/// Base name of a document, used to keep per-document outputs apart
fn document_stem(input_file: &Path) -> String {
    input_file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string())
}

impl Controller {
    // @method: Create a controller talking to the configured endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let provider = Arc::new(GoogleTranslate::from_config(&config.translation));
        Ok(Self { config, provider })
    }

    /// Create a controller with an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn assembler(&self) -> Assembler {
        Assembler::new(
            &self.config.rendering.output_dir,
            &self.config.target_language,
            &self.config.rendering.title,
        )
    }

    /// Path of the HTML file a document is translated to
    pub fn output_path(&self, input_file: &Path) -> PathBuf {
        self.assembler()
            .output_path(input_file, self.config.render_mode)
    }

    /// Directory receiving the images of one document
    pub fn media_dir(&self, input_file: &Path) -> PathBuf {
        self.config.rendering.media_dir.join(document_stem(input_file))
    }

    /// Prefix of the image sources of one document, relative to its page
    pub fn image_base(&self, input_file: &Path) -> String {
        let base = self.config.rendering.image_base.trim_end_matches('/');
        let stem = document_stem(input_file);
        if base.is_empty() {
            stem
        } else {
            format!("{}/{}", base, stem)
        }
    }

    /// Path of the table dump of one document
    pub fn table_dump_path(&self, input_file: &Path) -> PathBuf {
        self.config
            .rendering
            .output_dir
            .join(format!("{}{}", document_stem(input_file), TABLE_DUMP_SUFFIX))
    }

    /// Translate one document into an HTML file
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<RunOutcome> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = self.output_path(&input_file);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, {} already exists (use -f to force overwrite)",
                input_file.display(),
                output_path.display()
            );
            return Ok(RunOutcome::Skipped(output_path));
        }

        // Extraction
        let extractor = extraction::extractor_for(&input_file)?;
        let options = match self.config.render_mode {
            RenderMode::Complex => ExtractOptions::html_with_images(self.media_dir(&input_file)),
            RenderMode::Simple => ExtractOptions::plain(),
        };
        let raw_text = extractor
            .extract(&input_file, &options)
            .with_context(|| format!("Failed to extract {}", input_file.display()))?;
        let extraction_time = start_time.elapsed();
        debug!("Extracted {} characters", raw_text.chars().count());

        // Translation
        let translation_start = Instant::now();
        let run_options = RunOptions {
            image_base: self.image_base(&input_file),
            ..RunOptions::from_config(&self.config)
        };
        let pipeline = TranslationPipeline::new(Arc::clone(&self.provider), run_options);
        let progress_bar = Self::progress_bar("segments");
        let callback_bar = progress_bar.clone();
        let output = pipeline
            .translate_text_with_progress(&raw_text, move |done, total| {
                callback_bar.set_length(total as u64);
                callback_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();
        let output = output?;
        let translation_time = translation_start.elapsed();

        if !output.unresolved.is_empty() {
            warn!(
                "{} placeholders could not be resolved in {}",
                output.unresolved.len(),
                input_file.display()
            );
        }

        // Assembly
        let artifact = self
            .assembler()
            .assemble(&output.body, &input_file, self.config.render_mode);
        artifact.write()?;

        if self.config.translation.dump_table {
            let dump_path = self.table_dump_path(&input_file);
            output.table.save_json(&dump_path)?;
            debug!("Translation table written to {}", dump_path.display());
        }

        info!(
            "Translation complete. Extraction: {} - Translation: {} - Total: {}",
            Self::format_duration(extraction_time),
            Self::format_duration(translation_time),
            Self::format_duration(start_time.elapsed())
        );

        Ok(RunOutcome::Written(artifact.path))
    }

    /// Run every `.docx` document below a directory
    /// Documents whose output already exists are skipped
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let documents = FileManager::find_files(&input_dir, "docx")?;
        if documents.is_empty() {
            return Err(anyhow!("No .docx documents found in directory: {:?}", input_dir));
        }

        let folder_pb = Self::progress_bar("files");
        folder_pb.set_length(documents.len() as u64);

        let mut summary = FolderSummary::default();
        for document in &documents {
            let file_name = document
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run(document.clone(), force_overwrite).await {
                Ok(RunOutcome::Written(_)) => summary.processed += 1,
                Ok(RunOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed: {} processed, {} skipped, {} errors - Duration: {}",
            summary.processed,
            summary.skipped,
            summary.errors,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn progress_bar(unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Format a duration in a human-readable form
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

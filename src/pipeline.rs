//! Print Pipeline - Single Entry Point
//!
//! One run: resolve images, build pairs, read the template, then render and
//! dispatch every pair in order. The first fault aborts the remainder; there
//! is no per-pair recovery and no retry anywhere.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::images::{read_image_entries, ImageResolver};
use crate::pairs::pair_records;
use crate::printer::{DymoError, LabelService};
use crate::records::read_label_records;
use crate::template::LabelTemplate;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input table error: {0}")]
    Table(#[from] csv::Error),

    #[error("Failed to fetch image '{0}': {1}")]
    ImageFetch(String, reqwest::Error),

    #[error("Image fetch task aborted: {0}")]
    FetchJoin(#[from] tokio::task::JoinError),

    #[error("Label service error: {0}")]
    Device(#[from] DymoError),

    #[error("Couldn't find a printer, and not in dry-run mode")]
    PrinterNotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where rendered labels go.
///
/// An explicit value threaded through configuration; there is no global
/// dry-run flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Rasterize each label and write it to the output directory.
    DryRun,
    /// Submit each label to the first discovered printer.
    Print,
}

impl Default for RunMode {
    fn default() -> Self {
        Self::DryRun
    }
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub labels_csv: PathBuf,
    pub images_csv: PathBuf,
    pub template: PathBuf,
    pub output_dir: PathBuf,
    pub mode: RunMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            labels_csv: PathBuf::from("input/labels.csv"),
            images_csv: PathBuf::from("input/images.csv"),
            template: PathBuf::from("template.dymo"),
            output_dir: PathBuf::from("output"),
            mode: RunMode::DryRun,
        }
    }
}

/// What one completed run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub mode: RunMode,
    pub labels: usize,
    pub printer: Option<String>,
}

/// The print pipeline - single entry point for a run.
pub struct PrintPipeline<S: LabelService> {
    service: S,
    resolver: ImageResolver,
    config: PipelineConfig,
}

impl<S: LabelService> PrintPipeline<S> {
    pub fn new(service: S, config: PipelineConfig) -> Self {
        Self {
            service,
            resolver: ImageResolver::default(),
            config,
        }
    }

    /// Run the pipeline to completion, or abort on the first fault.
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        let entries = read_image_entries(&self.config.images_csv)?;
        let images = self.resolver.resolve(entries).await?;
        info!(images = images.len(), "image dictionary resolved");

        let records = read_label_records(&self.config.labels_csv)?;
        let pairs = pair_records(&records);
        info!(records = records.len(), pairs = pairs.len(), "label pairs built");

        let template =
            LabelTemplate::new(tokio::fs::read_to_string(&self.config.template).await?);

        // Live mode needs a device before any label is dispatched.
        let printer = match self.config.mode {
            RunMode::Print => Some(
                self.service
                    .first_printer()
                    .await?
                    .ok_or(PipelineError::PrinterNotFound)?,
            ),
            RunMode::DryRun => {
                tokio::fs::create_dir_all(&self.config.output_dir).await?;
                None
            }
        };

        for (index, pair) in pairs.iter().enumerate() {
            let label = template.render(pair, &images);
            match &printer {
                Some(name) => {
                    self.service.print_label(name, &label).await?;
                    info!(index, printer = %name, "label printed");
                }
                None => {
                    let png = self.service.render_label(&label).await?;
                    let path = self.config.output_dir.join(format!("label_{index}.png"));
                    tokio::fs::write(&path, &png).await?;
                    info!(index, path = %path.display(), "label written");
                }
            }
        }

        Ok(RunSummary {
            mode: self.config.mode,
            labels: pairs.len(),
            printer,
        })
    }
}

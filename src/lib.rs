//! LabelForge Core - Thermal Label Compiler
//!
//! # Pipeline Guarantees
//! 1. A pair is never emitted with an empty top
//! 2. The image dictionary is fully resolved before any rendering starts
//! 3. Labels are rendered and dispatched strictly in input order
//! 4. The same inputs render the same output
//! 5. Live mode aborts before any submission when no printer is found

pub mod records;
pub mod pairs;
pub mod images;
pub mod template;
pub mod printer;
pub mod pipeline;

pub use records::LabelRecord;
pub use pairs::{pair_records, LabelPair};
pub use images::{ImageDictionary, ImageEntry, ImageResolver};
pub use template::LabelTemplate;
pub use printer::{DymoError, DymoWebService, LabelService};
pub use pipeline::{PipelineConfig, PipelineError, PrintPipeline, RunMode, RunSummary};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

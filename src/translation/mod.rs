/*!
 * Translation of extracted document text into an HTML body.
 *
 * The work of a run is split into several submodules:
 *
 * - `segmenter`: Extraction of unique translatable units
 * - `batch`: Concurrent provider calls building the table
 * - `table`: The ordered translation table
 * - `substitution`: Applying the table to the raw text
 * - `placeholders`: Image and font token resolution
 * - `assembler`: HTML page and output path
 * - `pipeline`: The stages above chained for one run
 */

// Re-export main types for easier usage
pub use self::assembler::{Artifact, Assembler, RenderMode};
pub use self::batch::TableBuilder;
pub use self::pipeline::{RunOptions, RunOutput, TranslationPipeline};
pub use self::placeholders::{FontPolicy, PlaceholderResolver, Resolution};
pub use self::segmenter::{Granularity, Segmenter};
pub use self::table::{TableEntry, TranslationTable};

// Submodules
pub mod assembler;
pub mod batch;
pub mod pipeline;
pub mod placeholders;
pub mod segmenter;
pub mod substitution;
pub mod table;

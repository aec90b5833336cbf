/*! Dependency reports for auditors and tools.
 *
 * A closure map is hard to eyeball. These emitters lay it out the way reviewers expect to read it:
 * one row per variable with the names it may depend on, as a plain text table for the terminal,
 * a Markdown table for reports, or JSON for other tools.
 */

pub mod config;
pub mod dependency_table;
pub mod emitter;
pub mod output;

pub use config::{EmitterConfig, VerbosityLevel};
pub use dependency_table::{DependencyEmitter, DependencyRow, DependencyTable};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
pub use output::{JsonFormatter, MarkdownFormatter, OutputFormat, OutputFormatter, TextFormatter};

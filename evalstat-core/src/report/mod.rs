//! Human-readable reports and file export.

pub mod console;
pub mod export;

pub use console::{generate_report, render_report};
pub use export::{export_csv, export_json, summary_to_csv};

//! Review output. The only sink is a Markdown report on disk.

pub mod report;

pub use report::{render_report, write_report};

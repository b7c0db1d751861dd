//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod generate;
mod inspect;
mod output;

pub use check::{CheckReport, TableSummary};
pub use generate::{GenerateReport, GenerationResult};
pub use inspect::InspectReport;
pub use output::{Report, TerminalOutput};

#[cfg(test)]
pub use output::BufferOutput;

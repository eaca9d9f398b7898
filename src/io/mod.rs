//! IO modules - operator and file interfaces
//!
//! This module contains all external IO operations:
//! - `console` - Line-oriented operator commands and text rendering
//! - `receipts` - Paid-session receipts to file (JSONL format)

pub mod console;
pub mod receipts;

// Re-export commonly used types
pub use console::{execute, spawn_line_reader, Command, Outcome};
pub use receipts::ReceiptLog;

//! Table modules - extend Database with per-table methods
//!
//! Each module adds `impl Database` blocks for a specific table.

mod contact_submissions; // contact_submissions

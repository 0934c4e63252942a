//! Output module for presenting search results
//!
//! This module handles:
//! - Rendering the result table for the console
//! - Exporting the full table, numeric price included, as CSV

mod csv_export;
mod display;

pub use csv_export::{csv_file_name, write_csv, write_csv_to};
pub use display::{print_table, render_table};

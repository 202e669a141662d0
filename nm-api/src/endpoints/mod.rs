//! API endpoint modules organized by category.

pub mod databases;
pub mod pages;

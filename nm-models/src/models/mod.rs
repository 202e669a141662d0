//! Entity models.

pub mod message;
pub mod page;

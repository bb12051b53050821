//! Data models for ReviewWatch

mod homework;
mod response;

pub use homework::*;
pub use response::*;

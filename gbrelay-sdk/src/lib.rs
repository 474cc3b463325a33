#![forbid(unsafe_code)]

pub mod objects;
pub mod signature;

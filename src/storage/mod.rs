// Storage layer: bucket/path references to fetchable URLs

pub mod resolver;

pub use resolver::*;

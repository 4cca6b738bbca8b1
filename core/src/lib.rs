pub mod checks;
pub mod determinism;
pub mod fix;
pub mod model;
pub mod report;
pub mod run;
pub mod scoring;
pub mod sources;
pub mod text;

pub mod error;

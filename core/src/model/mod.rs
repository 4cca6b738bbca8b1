pub mod chunk;
pub mod report;
pub mod violation;

pub use chunk::{Chunk, Claim, Language, Source, TypedSource, Verdict, Verification};
pub use report::{ClaimAudit, RunReport};
pub use violation::{check_ids, Category, Severity, Violation, RUN_LEVEL};

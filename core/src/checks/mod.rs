//! The four check families.
//!
//! Every family reads claims and the shared context and returns findings; none
//! of them mutates input, so they can run in any order.

pub mod consistency;
pub mod extraction;
pub mod semantic;
pub mod structural;

use crate::model::Language;
use crate::sources::SourceRegistry;

/// Read-only inputs computed once per run and shared by every check.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub registry: &'a SourceRegistry,
    pub transcript_language: Language,
}

impl<'a> CheckContext<'a> {
    pub fn new(registry: &'a SourceRegistry, transcript_language: Language) -> Self {
        Self {
            registry,
            transcript_language,
        }
    }
}

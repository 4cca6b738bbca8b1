pub mod domain;
pub mod registry;

pub use domain::normalize_domain;
pub use registry::{RegistryOrigin, SourceRegistry, Tier, SIDECAR_FILE};

pub mod json_canonical;
pub mod run_id;

pub use json_canonical::to_canonical_bytes;
pub use run_id::{input_fingerprint, run_id_from_fingerprint, sha256_hex};

//! Selection policy
//! ================
//!
//! The rules that decide which hub models qualify ([`filter`]), which file of a
//! model is downloaded ([`resolve`]), and what local name it is configured
//! under ([`naming`]). Everything here is pure string logic over lower-cased
//! ids except [`resolve::resolve_artifact`], which asks the catalog for the
//! file listing.

pub mod filter;
pub mod naming;
pub mod resolve;

pub use filter::{CandidateFilter, LARGE_SIZE_MARKERS, SMALL_SIZE_MARKERS};
pub use naming::local_model_name;
pub use resolve::{
    resolve_artifact, select_artifact, ARTIFACT_EXTENSION, FALLBACK_QUANTIZATIONS,
    PRIMARY_QUANTIZATION,
};

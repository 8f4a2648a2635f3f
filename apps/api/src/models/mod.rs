pub mod candidate;
pub mod job;

pub use candidate::{CandidateProfile, StructuredProfile};
pub use job::JobDescription;

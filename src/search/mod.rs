pub mod candidates;
pub mod selection;

pub use candidates::{CandidateStream, SelfSelection, DEFAULT_SELF_SELECTION_TOLERANCE};
pub use selection::{find_suitable_candidate, CandidateSearch, SearchCriteria, SearchOutcome};

pub mod matcher;
pub mod normalize;
pub mod policy;
pub mod similarity;

pub use matcher::{MatchFault, MatchOutcome, PoCandidate, PoMatcher};
pub use policy::{MATCH_POLICY_V1, MatchPolicy, TOLERANCE_POLICY_V1, TolerancePolicy};
pub use similarity::{FuzzyMatcher, Strategy};

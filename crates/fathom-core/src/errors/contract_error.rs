/// Violations of the answer/evidence citation contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("claim {claim} cites [{index}] but the evidence set has {evidence_len} entries")]
    CitationOutOfRange {
        claim: usize,
        index: usize,
        evidence_len: usize,
    },

    #[error("claim {claim} has no citations")]
    UncitedClaim { claim: usize },

    #[error("answer was synthesised from evidence {actual}, expected {expected}")]
    EvidenceMismatch { expected: String, actual: String },
}

/// Controller state machine errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("illegal transition from {from} on {event}")]
    IllegalTransition { from: String, event: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NarrationError {
    #[error("segment index {index} out of range (playlist has {len} segments)")]
    InvalidIndex { index: usize, len: usize },

    #[error("sequencer has been disposed")]
    Disposed,
}

/// Classification of a lookup failure.
///
/// Callers in the input pipeline fold both kinds into the same visible
/// outcome; the distinction is kept for logging.
///
/// | Kind | Meaning |
/// |------|---------|
/// | `Transport` | Service could not answer (network, timeout, 5xx, rate limit) |
/// | `SemanticInvalid` | Service answered and said the symbol does not exist |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// Network or provider failure. Retrying later may succeed.
    Transport,

    /// The symbol or query was rejected by the service.
    SemanticInvalid,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::SemanticInvalid => write!(f, "semantic"),
        }
    }
}

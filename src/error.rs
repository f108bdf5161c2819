/// Error codes visible to the caller of the authenticator service.
///
/// This set is exhaustive for the protocol engine; every internal failure
/// that is not one of the specific conditions is normalized to `Unknown`
/// at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fido2ErrorCode {
    #[error("not supported")]
    NotSupported,
    #[error("unknown error")]
    Unknown,
    #[error("credential excluded")]
    CredentialExcluded,
    #[error("not allowed")]
    NotAllowed,
    #[error("no credentials")]
    NoCredentials,
}

/// Outcome of a failed authenticator call.
///
/// Cancellation is a distinct abort outcome, never coerced into one of the
/// enumerated error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fido2Error {
    #[error("operation aborted by caller")]
    Aborted,
    #[error(transparent)]
    Code(#[from] Fido2ErrorCode),
}

pub type Result<T, E = Fido2Error> = std::result::Result<T, E>;

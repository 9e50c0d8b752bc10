//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(e.into())
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        Self::Infra(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Resolver { .. } => exitcode::UNAVAILABLE,
                InfraError::Application(e) => match e {
                    ApplicationError::Domain(
                        DomainError::InvalidDid { .. } | DomainError::InvalidDomainName { .. },
                    ) => exitcode::USAGE,
                    ApplicationError::Domain(_) => exitcode::DATAERR,
                    ApplicationError::NotFound(_) => exitcode::NOINPUT,
                    ApplicationError::Lookup { .. } => exitcode::UNAVAILABLE,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => exitcode::IOERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_errors_when_mapping_exit_codes_then_follow_sysexits() {
        let bad_did: CliError = DomainError::InvalidDid {
            did: "x".into(),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(bad_did.exit_code(), exitcode::USAGE);

        let bad_record: CliError = DomainError::NoValidRecord("_did.x.".into()).into();
        assert_eq!(bad_record.exit_code(), exitcode::DATAERR);

        let missing: CliError = ApplicationError::NotFound(PathBuf::from("doc.json")).into();
        assert_eq!(missing.exit_code(), exitcode::NOINPUT);

        let config: CliError = ApplicationError::Config {
            message: "broken".into(),
        }
        .into();
        assert_eq!(config.exit_code(), exitcode::CONFIG);

        let bad_base: CliError = DomainError::InvalidDomainName {
            name: "-x".into(),
            reason: "bad label".into(),
        }
        .into();
        assert_eq!(bad_base.exit_code(), exitcode::USAGE);

        let io: CliError = InfraError::io(
            "write zone",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        )
        .into();
        assert_eq!(io.exit_code(), exitcode::IOERR);

        let resolver: CliError = InfraError::Resolver {
            message: "no nameservers".into(),
        }
        .into();
        assert_eq!(resolver.exit_code(), exitcode::UNAVAILABLE);
    }
}

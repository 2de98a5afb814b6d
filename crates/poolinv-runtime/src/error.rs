use miette::Diagnostic;
use thiserror::Error;

/// Runtime error type for pool subsystem operations
#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    /// The native management subsystem could not be opened
    #[error("Pool management subsystem unavailable: {message}")]
    #[diagnostic(
        code(poolinv::runtime::subsystem_unavailable),
        help("Check that the ZFS kernel module is loaded and the control device (usually /dev/zfs) is readable by this user")
    )]
    SubsystemUnavailable {
        #[allow(unused)]
        message: String,
    },

    /// The pool iteration primitive reported failure
    #[error("Pool iteration failed: {message}")]
    #[diagnostic(
        code(poolinv::runtime::iteration_failed),
        help("Run `zpool list` by hand to see whether the subsystem can enumerate pools")
    )]
    IterationFailed {
        #[allow(unused)]
        message: String,
    },

    /// A single pool property could not be read
    #[error("Failed to read property '{property}' of pool '{pool}': {message}")]
    #[diagnostic(
        code(poolinv::runtime::property_query_failed),
        help("Some properties (e.g. dedupditto) are not reported by every ZFS release. The field falls back to its default")
    )]
    PropertyQueryFailed {
        #[allow(unused)]
        pool: String,
        #[allow(unused)]
        property: String,
        #[allow(unused)]
        message: String,
    },

    /// Command execution failed
    #[error("Command '{command}' failed with exit code {exit_code}")]
    #[diagnostic(code(poolinv::runtime::command_failed), help("stderr: {stderr}"))]
    CommandFailed {
        #[allow(unused)]
        command: String,
        #[allow(unused)]
        exit_code: i32,
        #[allow(unused)]
        stderr: String,
    },

    /// Core library error
    #[error(transparent)]
    #[diagnostic(transparent)]
    CoreError(#[from] poolinv_core::PoolinvError),
}

/// Result type alias for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

impl RuntimeError {
    pub fn subsystem_unavailable(message: impl Into<String>) -> Self {
        Self::SubsystemUnavailable {
            message: message.into(),
        }
    }

    pub fn iteration_failed(message: impl Into<String>) -> Self {
        Self::IterationFailed {
            message: message.into(),
        }
    }

    pub fn property_query_failed(
        pool: impl Into<String>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::PropertyQueryFailed {
            pool: pool.into(),
            property: property.into(),
            message: message.into(),
        }
    }

    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Short description without the variant prefix
    pub fn detail(&self) -> String {
        match self {
            Self::SubsystemUnavailable { message }
            | Self::IterationFailed { message }
            | Self::PropertyQueryFailed { message, .. } => message.clone(),
            Self::CommandFailed {
                command, stderr, ..
            } if !stderr.trim().is_empty() => format!("{}: {}", command, stderr.trim()),
            other => other.to_string(),
        }
    }
}

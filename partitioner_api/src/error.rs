use std::fmt::{Debug, Write};
use std::{borrow::Cow, panic::Location};

use serde::{Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::devicegraph::error::DeviceGraphBuildError;

/// The partitioner failed to start.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum InitializationError {
    #[error("Failed to set up logging")]
    Logger,
}

/// User provided input was invalid.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidInputError {
    #[error("Failed to load configuration file from '{path}'")]
    LoadConfiguration { path: String },
    #[error("Failed to load device graph description from '{path}'")]
    LoadDeviceGraph { path: String },
    #[error("Invalid device graph: {0}")]
    InvalidDeviceGraph(#[from] DeviceGraphBuildError),
}

/// Each variant of `ErrorKind` corresponds to a different category of error.
#[derive(Debug, Eq, thiserror::Error, IntoStaticStr, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The partitioner failed to start.
    #[error(transparent)]
    Initialization(#[from] InitializationError),

    /// The partitioner was provided invalid user input.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
}

#[derive(Debug)]
struct PartitionerErrorInner {
    kind: ErrorKind,
    location: &'static Location<'static>,
    source: Option<anyhow::Error>,
    context: Vec<(Cow<'static, str>, &'static Location<'static>)>,
}

pub struct PartitionerError(Box<PartitionerErrorInner>);
impl PartitionerError {
    #[track_caller]
    pub fn new(kind: impl Into<ErrorKind>) -> Self {
        Self::with_source(kind.into(), None)
    }

    #[track_caller]
    fn with_source(kind: ErrorKind, source: Option<anyhow::Error>) -> Self {
        PartitionerError(Box::new(PartitionerErrorInner {
            kind,
            location: Location::caller(),
            source,
            context: Vec::new(),
        }))
    }

    /// Returns a reference to the inner ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    /// Returns the category of the error, e.g. `invalid-input`.
    pub fn category(&self) -> &'static str {
        (&self.0.kind).into()
    }
}

pub trait ReportError<T, K> {
    /// Convert this error into a structured PartitionerError.
    fn structured(self, kind: K) -> Result<T, PartitionerError>;
}

impl<T, K> ReportError<T, K> for Option<T>
where
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, PartitionerError> {
        match self {
            Some(t) => Ok(t),
            None => Err(PartitionerError::with_source(kind.into(), None)),
        }
    }
}

impl<T, E, K> ReportError<T, K> for Result<T, E>
where
    E: Into<anyhow::Error>,
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, PartitionerError> {
        match self {
            Ok(o) => Ok(o),
            Err(e) => Err(PartitionerError::with_source(kind.into(), Some(e.into()))),
        }
    }
}

pub trait PartitionerResultExt<T> {
    /// Attach a context message to the error.
    fn message(self, context: impl Into<Cow<'static, str>>) -> Result<T, PartitionerError>;
}

impl<T> PartitionerResultExt<T> for Result<T, PartitionerError> {
    #[track_caller]
    fn message(mut self, context: impl Into<Cow<'static, str>>) -> Result<T, PartitionerError> {
        if let Err(ref mut e) = self {
            e.0.context.push((context.into(), Location::caller()));
        }
        self
    }
}

/// Writes a possibly multi-line entry of a numbered list.
fn write_entry(f: &mut std::fmt::Formatter<'_>, index: usize, text: &str) -> std::fmt::Result {
    for (i, line) in text.split('\n').enumerate() {
        if i == 0 {
            write!(f, "{: >5}: ", index)?;
        } else {
            f.write_str("\n       ")?;
        }
        f.write_str(line)?;
    }
    Ok(())
}

impl Debug for PartitionerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.0.kind,
            self.0.location.file(),
            self.0.location.line()
        )?;

        if !self.0.context.is_empty() {
            writeln!(f, "\n\nContext:")?;
            for (i, (context, location)) in self.0.context.iter().enumerate() {
                write_entry(f, i, context)?;
                writeln!(f, " at {}:{}", location.file(), location.line())?;
            }
        }

        if let Some(ref source) = self.0.source {
            writeln!(f, "\n\nCaused by:")?;
            for (i, e) in source.chain().enumerate() {
                write_entry(f, i, &e.to_string())?;
                f.write_char('\n')?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    use crate::devicegraph::types::DeviceKind;

    #[test]
    fn test_error_debug() {
        let error = Err::<(), _>(anyhow::anyhow!("z"))
            .context("x\ny")
            .structured(InvalidInputError::LoadConfiguration { path: "w".into() })
            .unwrap_err();
        assert_eq!(
            format!("{:?}", error),
            format!(
                "Failed to load configuration file from 'w' at {}:{}\n\nCaused by:\n    0: x\n       y\n    1: z\n",
                error.0.location.file(),
                error.0.location.line(),
            ),
        );
    }

    #[test]
    fn test_error_context() {
        let error = None::<()>
            .structured(InitializationError::Logger)
            .message("Logger already registered")
            .unwrap_err();
        assert_eq!(error.category(), "initialization");
        let rendered = format!("{:?}", error);
        assert!(rendered.starts_with("Failed to set up logging at "));
        assert!(rendered.contains("Context:\n    0: Logger already registered at "));
        assert!(!rendered.contains("Caused by"));
    }

    #[test]
    fn test_error_from_build_error() {
        let error = PartitionerError::new(InvalidInputError::from(
            DeviceGraphBuildError::EmptyDeviceName(DeviceKind::Disk),
        ));
        assert_eq!(error.category(), "invalid-input");
        assert_eq!(
            error.kind(),
            &ErrorKind::InvalidInput(InvalidInputError::InvalidDeviceGraph(
                DeviceGraphBuildError::EmptyDeviceName(DeviceKind::Disk)
            ))
        );
        assert_eq!(
            format!("{:?}", error),
            format!(
                "Invalid device graph: A device of kind 'disk' has an empty name at {}:{}",
                error.0.location.file(),
                error.0.location.line(),
            ),
        );
    }
}

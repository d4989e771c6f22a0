use std::{io, path::PathBuf, process::ExitStatus};

use barcode::BarcodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RdmError {
    #[error("Invalid parameters: {0}")]
    SchemaValidation(String),

    #[error("Invalid distance matrix input: {0}")]
    StagingConflict(String),

    #[error("Invalid distance matrix location {0:?}: {1}")]
    InvalidLocation(PathBuf, String),

    #[error("Unable to access distance matrix at {0:?}: {1}")]
    InputAccess(PathBuf, io::Error),

    #[error(transparent)]
    MalformedBarcode(#[from] BarcodeError),

    #[error("Not all expected output files {expected:?} were found in {folder:?}")]
    MissingOutput { folder: PathBuf, expected: Vec<String> },

    #[error("Unable to create directory at {0:?}: {1}")]
    DirectoryCreate(PathBuf, io::Error),

    #[error("Unable to remove {0:?} left by a previous run: {1}")]
    Cleanup(PathBuf, io::Error),

    #[error("Unable to stage {0:?} into {1:?}: {2}")]
    Stage(PathBuf, PathBuf, io::Error),

    #[error("Unable to link remote folder on computer {0}, only localhost is reachable")]
    UnreachableComputer(String),

    #[error("Failed to start {0} with arguments {1:?}: {2}")]
    CommandExecutionFail(String, Vec<String>, io::Error),

    #[error("{0} exited with {1}")]
    CommandExitStatus(String, ExitStatus),
}

impl From<serde_yaml::Error> for RdmError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::SchemaValidation(value.to_string())
    }
}

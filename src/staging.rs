//! Where the distance matrix comes from and how the job sees it.
//!
//! A local file is copied into the working directory under its own name. A
//! remote folder already present on the computer is linked into the working
//! directory as [`REMOTE_FOLDER_LINK`], and the matrix is read through it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::RdmError, serde_default::default_distance_matrix_file};

pub const REMOTE_FOLDER_LINK: &str = "remote_folder/";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, RdmError> {
        let path = path.as_ref().to_path_buf();
        if path.file_name().is_none() {
            return Err(RdmError::InvalidLocation(path, "not a file path".to_string()));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RemoteReference {
    pub computer: String,
    pub remote_path: PathBuf,
    #[serde(default = "default_distance_matrix_file")]
    pub file_name: String,
}

impl RemoteReference {
    /// `file_name` is reduced to its base name, `remote_path` must be absolute.
    pub fn new<C: Into<String>>(
        computer: C,
        remote_path: PathBuf,
        file_name: &str,
    ) -> Result<Self, RdmError> {
        if !remote_path.is_absolute() {
            return Err(RdmError::InvalidLocation(
                remote_path,
                "remote folder must be an absolute path".to_string(),
            ));
        }
        let file_name = Path::new(file_name)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                RdmError::InvalidLocation(
                    remote_path.join(file_name),
                    "no distance matrix file name".to_string(),
                )
            })?;
        Ok(Self {
            computer: computer.into(),
            remote_path,
            file_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum DistanceMatrixInput {
    Local(LocalFile),
    Remote(RemoteReference),
}

impl DistanceMatrixInput {
    /// Exactly one of the two inputs has to be given.
    pub fn select(
        local: Option<LocalFile>,
        remote: Option<RemoteReference>,
    ) -> Result<Self, RdmError> {
        match (local, remote) {
            (Some(local), None) => Ok(Self::Local(local)),
            (None, Some(remote)) => Ok(Self::Remote(remote)),
            (Some(_), Some(_)) => Err(RdmError::StagingConflict(
                "provide either a distance matrix file or a remote folder, not both".to_string(),
            )),
            (None, None) => Err(RdmError::StagingConflict(
                "need to provide either a distance matrix file or a remote folder".to_string(),
            )),
        }
    }

    /// Path of the matrix relative to the job working directory.
    pub fn command_line_path(&self) -> String {
        match self {
            Self::Local(local) => local.file_name(),
            Self::Remote(remote) => format!("{}{}", REMOTE_FOLDER_LINK, remote.file_name),
        }
    }
}

//! Submission side of a Rips distance matrix calculation.

use std::path::{Path, PathBuf};

use barcode::BarcodeTable;
use log::info;
use serde::Serialize;

use crate::{
    error::RdmError,
    parameters::RipsParameters,
    parser::RipsParser,
    staging::{DistanceMatrixInput, REMOTE_FOLDER_LINK},
};

/// What an orchestrator needs from a plugin: the command line, the files to
/// bring back and a way to read them once they are back.
pub trait JobPlugin {
    type Parameters;
    type Input;
    type Output;

    fn command_line(&self, parameters: &Self::Parameters, input: &Self::Input) -> Vec<String>;

    fn output_artifacts(&self, parameters: &Self::Parameters) -> (Vec<String>, Vec<String>);

    fn parse_retrieved(
        &self,
        parameters: &Self::Parameters,
        folder: &Path,
    ) -> Result<Vec<(String, Self::Output)>, RdmError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeInfo {
    pub code: String,
    pub cmdline_params: Vec<String>,
}

/// Everything needed to run the job in a fresh working directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPlan {
    /// `(absolute source path, name in the working directory)`
    pub local_copy_list: Vec<(PathBuf, String)>,
    /// `(computer, remote path, name in the working directory)`
    pub remote_copy_list: Vec<(String, PathBuf, String)>,
    pub remote_symlink_list: Vec<(String, PathBuf, String)>,
    pub retrieve_list: Vec<String>,
    pub codes: Vec<CodeInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct RipsDistanceMatrix {
    parser: RipsParser,
}

impl RipsDistanceMatrix {
    pub fn new(max_life: Option<f64>) -> Self {
        Self {
            parser: RipsParser::new(max_life),
        }
    }

    pub fn prepare_for_submission(
        &self,
        parameters: &RipsParameters,
        input: &DistanceMatrixInput,
        code: &str,
    ) -> Result<SubmissionPlan, RdmError> {
        let mut plan = SubmissionPlan {
            local_copy_list: vec![],
            remote_copy_list: vec![],
            remote_symlink_list: vec![],
            retrieve_list: parameters.output_files(),
            codes: vec![CodeInfo {
                code: code.to_string(),
                cmdline_params: self.command_line(parameters, input),
            }],
        };
        match input {
            DistanceMatrixInput::Local(local) => {
                let source = std::fs::canonicalize(local.path())
                    .map_err(|err| RdmError::InputAccess(local.path().to_path_buf(), err))?;
                plan.local_copy_list.push((source, local.file_name()));
            }
            DistanceMatrixInput::Remote(remote) => {
                plan.remote_symlink_list.push((
                    remote.computer.clone(),
                    remote.remote_path.clone(),
                    REMOTE_FOLDER_LINK.to_string(),
                ));
            }
        }
        info!(
            "prepared submission for {} with {} local and {} linked inputs",
            code,
            plan.local_copy_list.len(),
            plan.remote_symlink_list.len()
        );
        Ok(plan)
    }
}

impl JobPlugin for RipsDistanceMatrix {
    type Parameters = RipsParameters;
    type Input = DistanceMatrixInput;
    type Output = BarcodeTable;

    fn command_line(&self, parameters: &RipsParameters, input: &DistanceMatrixInput) -> Vec<String> {
        parameters.command_line_tokens(input)
    }

    fn output_artifacts(&self, parameters: &RipsParameters) -> (Vec<String>, Vec<String>) {
        parameters.output_artifacts()
    }

    fn parse_retrieved(
        &self,
        parameters: &RipsParameters,
        folder: &Path,
    ) -> Result<Vec<(String, BarcodeTable)>, RdmError> {
        self.parser.parse_retrieved(parameters, folder)
    }
}

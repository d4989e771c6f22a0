//! Runs a [`SubmissionPlan`] on this machine.
//!
//! Stands in for the scheduler when the tool is installed locally: the inputs
//! are staged into a working directory, every code is started there one after
//! another and the directory is handed back for parsing.

use std::{
    fs::File,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, info};
use tempfile::{tempdir, TempDir};

use crate::{
    calculation::SubmissionPlan,
    error::RdmError,
    utils::fs::{link_folder, remove_entry},
};

pub const STDOUT_FILE: &str = "stdout.log";
pub const STDERR_FILE: &str = "stderr.log";

pub enum WorkingDirectory {
    /// Removed when dropped.
    Temporary(TempDir),
    Fixed(PathBuf),
}

impl WorkingDirectory {
    pub fn path(&self) -> &Path {
        match self {
            Self::Temporary(directory) => directory.path(),
            Self::Fixed(directory) => directory,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalRunner {
    executable: PathBuf,
    working_directory: Option<PathBuf>,
}

impl LocalRunner {
    pub fn new<P: Into<PathBuf>>(executable: P) -> Self {
        Self {
            executable: executable.into(),
            working_directory: None,
        }
    }

    /// Keep the job files in `directory` instead of a temporary directory.
    ///
    /// The directory may hold a previous run: its staged inputs, logs and
    /// retrieved outputs are removed before the new run starts.
    pub fn working_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    pub fn run(&self, plan: &SubmissionPlan) -> Result<WorkingDirectory, RdmError> {
        let working_directory = match &self.working_directory {
            Some(directory) => {
                std::fs::create_dir_all(directory)
                    .map_err(|err| RdmError::DirectoryCreate(directory.clone(), err))?;
                clear_previous_run(directory, plan)?;
                WorkingDirectory::Fixed(directory.clone())
            }
            None => WorkingDirectory::Temporary(
                tempdir().map_err(|err| RdmError::DirectoryCreate(std::env::temp_dir(), err))?,
            ),
        };
        let directory = working_directory.path();
        info!("staging job in {:?}", directory);

        for (source, name) in &plan.local_copy_list {
            let target = directory.join(name);
            std::fs::copy(source, &target)
                .map_err(|err| RdmError::Stage(source.clone(), target.clone(), err))?;
            debug!("copied {:?} to {:?}", source, target);
        }
        for (computer, remote_path, link) in &plan.remote_symlink_list {
            if computer != "localhost" {
                return Err(RdmError::UnreachableComputer(computer.clone()));
            }
            let target = directory.join(link.trim_end_matches('/'));
            link_folder(remote_path, &target)
                .map_err(|err| RdmError::Stage(remote_path.clone(), target.clone(), err))?;
            debug!("linked {:?} as {:?}", remote_path, target);
        }

        for code in &plan.codes {
            let program = self.executable.to_string_lossy().to_string();
            let stdout_path = directory.join(STDOUT_FILE);
            let stdout = File::create(&stdout_path)
                .map_err(|err| RdmError::Stage(stdout_path.clone(), stdout_path.clone(), err))?;
            let stderr_path = directory.join(STDERR_FILE);
            let stderr = File::create(&stderr_path)
                .map_err(|err| RdmError::Stage(stderr_path.clone(), stderr_path.clone(), err))?;
            info!("running {} {}", code.code, code.cmdline_params.join(" "));
            let exit_status = Command::new(&self.executable)
                .args(&code.cmdline_params)
                .current_dir(directory)
                .stdin(Stdio::null())
                .stdout(Stdio::from(stdout))
                .stderr(Stdio::from(stderr))
                .status()
                .map_err(|err| {
                    RdmError::CommandExecutionFail(program.clone(), code.cmdline_params.clone(), err)
                })?;
            if !exit_status.success() {
                return Err(RdmError::CommandExitStatus(program, exit_status));
            }
        }

        Ok(working_directory)
    }
}

fn clear_previous_run(directory: &Path, plan: &SubmissionPlan) -> Result<(), RdmError> {
    let staged = plan
        .local_copy_list
        .iter()
        .map(|(_, name)| name.as_str())
        .chain(
            plan.remote_symlink_list
                .iter()
                .map(|(_, _, link)| link.trim_end_matches('/')),
        )
        .chain(plan.retrieve_list.iter().map(|name| name.as_str()))
        .chain([STDOUT_FILE, STDERR_FILE]);
    for name in staged {
        let path = directory.join(name);
        if remove_entry(&path).map_err(|err| RdmError::Cleanup(path.clone(), err))? {
            debug!("removed {:?} left by a previous run", path);
        }
    }
    Ok(())
}

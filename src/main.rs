use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use gudhi_rdm::{
    barcode::BarcodeTable,
    calculation::{JobPlugin, RipsDistanceMatrix},
    parameters::RipsParameters,
    report::barcode_report,
    runner::{LocalRunner, WorkingDirectory},
    serde_default::default_distance_matrix_file,
    staging::{DistanceMatrixInput, LocalFile, RemoteReference},
};
use log::{info, Level};
use simple_logger::init_with_level;

/// Prepare, run and parse GUDHI Rips complex calculations on distance matrices
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Print debug messages
    #[clap(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    operation: Operation,
}

#[derive(clap::Args)]
struct JobInput {
    /// Parameter file, YAML or JSON
    #[clap(short = 'i')]
    parameters: PathBuf,
    /// Distance matrix file copied into the working directory
    #[clap(long)]
    distance_matrix: Option<PathBuf>,
    /// Absolute path of a folder holding the distance matrix
    #[clap(long)]
    remote_folder: Option<PathBuf>,
    /// Computer the remote folder lives on
    #[clap(long, default_value = "localhost")]
    remote_computer: String,
    /// Name of the distance matrix inside the remote folder
    #[clap(long, default_value_t = default_distance_matrix_file())]
    remote_file: String,
}

impl JobInput {
    fn load(&self) -> Result<(RipsParameters, DistanceMatrixInput)> {
        let parameters = read_parameters(&self.parameters)?;
        let local = self
            .distance_matrix
            .as_ref()
            .map(LocalFile::new)
            .transpose()?;
        let remote = self
            .remote_folder
            .as_ref()
            .map(|folder| {
                RemoteReference::new(&self.remote_computer, folder.clone(), &self.remote_file)
            })
            .transpose()?;
        Ok((parameters, DistanceMatrixInput::select(local, remote)?))
    }
}

#[derive(Subcommand)]
enum Operation {
    /// Validate a parameter file and print it with defaults filled in
    Validate {
        #[clap(short = 'i')]
        parameters: PathBuf,
    },
    /// Print the command line arguments for the tool
    Cmdline {
        #[command(flatten)]
        input: JobInput,
        /// Print as a JSON array instead of one argument per line
        #[clap(long)]
        json: bool,
    },
    /// Print the submission plan as JSON
    Prepare {
        #[command(flatten)]
        input: JobInput,
        /// Label of the code running the tool
        #[clap(long, default_value = "rips_distance_matrix_persistence")]
        code: String,
    },
    /// Parse barcode files matched by a pattern
    Barcode {
        /// Barcode file path pattern
        #[clap(short = 'i')]
        input_filepath: String,
        /// Replace infinite lifetimes with this value
        #[clap(long)]
        max_life: Option<f64>,
        /// Print the life lines of one dimension instead of a summary
        #[clap(short, long)]
        dimension: Option<u32>,
        /// Plain text output
        #[clap(long)]
        plain: bool,
    },
    /// Run the tool locally and parse its output
    Run {
        #[command(flatten)]
        input: JobInput,
        /// Path of the rips_distance_matrix_persistence executable
        #[clap(short, long, default_value = "rips_distance_matrix_persistence")]
        executable: PathBuf,
        /// Keep job files here instead of a temporary directory
        #[clap(short, long)]
        working_directory: Option<PathBuf>,
        /// Replace infinite lifetimes with this value
        #[clap(long)]
        max_life: Option<f64>,
    },
}

impl Operation {
    fn operate(self) -> Result<()> {
        match self {
            Self::Validate { parameters } => {
                let parameters = read_parameters(&parameters)?;
                println!("{}", serde_json::to_string_pretty(&parameters)?);
            }
            Self::Cmdline { input, json } => {
                let (parameters, input) = input.load()?;
                let tokens = parameters.command_line_tokens(&input);
                if json {
                    println!("{}", serde_json::to_string(&tokens)?);
                } else {
                    println!("{}", tokens.join("\n"));
                }
            }
            Self::Prepare { input, code } => {
                let (parameters, input) = input.load()?;
                let plan =
                    RipsDistanceMatrix::default().prepare_for_submission(&parameters, &input, &code)?;
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
            Self::Barcode {
                input_filepath,
                max_life,
                dimension,
                plain,
            } => {
                let matched_paths = glob(&input_filepath)
                    .with_context(|| format!("Invalid file match pattern: {}", input_filepath))?;
                for entry in matched_paths {
                    let path = entry.with_context(|| "Unable to read path matched")?;
                    let table = BarcodeTable::parse_file(&path, max_life)
                        .with_context(|| format!("Failed to parse barcode file {:?}", path))?;
                    println!("{}", barcode_report(&path, &table, dimension, plain)?);
                }
            }
            Self::Run {
                input,
                executable,
                working_directory,
                max_life,
            } => {
                let (parameters, input) = input.load()?;
                let plugin = RipsDistanceMatrix::new(max_life);
                let code = executable.to_string_lossy().to_string();
                let plan = plugin.prepare_for_submission(&parameters, &input, &code)?;
                let mut runner = LocalRunner::new(&executable);
                if let Some(directory) = working_directory {
                    runner = runner.working_directory(directory);
                }
                let directory = runner
                    .run(&plan)
                    .with_context(|| format!("Failed to run {:?}", executable))?;
                let parsed = plugin.parse_retrieved(&parameters, directory.path())?;
                for (link, table) in &parsed {
                    println!("{}", serde_json::to_string_pretty(&(link, table.summary()))?);
                }
                if let WorkingDirectory::Fixed(path) = &directory {
                    info!("job files kept in {:?}", path);
                }
            }
        }
        Ok(())
    }
}

fn read_parameters(path: &PathBuf) -> Result<RipsParameters> {
    let file =
        File::open(path).with_context(|| format!("Failed to open parameter file {:?}", path))?;
    RipsParameters::from_reader(file)
        .with_context(|| format!("Invalid parameter file {:?}", path))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_with_level(if args.verbose { Level::Debug } else { Level::Info })?;
    args.operation.operate()
}

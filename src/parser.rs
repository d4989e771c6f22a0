use std::path::Path;

use barcode::BarcodeTable;
use log::{error, info};

use crate::{error::RdmError, parameters::RipsParameters};

/// Turns the folder retrieved after a job into parsed barcodes.
#[derive(Debug, Clone, Default)]
pub struct RipsParser {
    /// Clamp for infinite lifetimes, see [`BarcodeTable::parse`].
    pub max_life: Option<f64>,
}

impl RipsParser {
    pub fn new(max_life: Option<f64>) -> Self {
        Self { max_life }
    }

    /// Parse every expected output file and pair it with its link name.
    pub fn parse_retrieved(
        &self,
        parameters: &RipsParameters,
        folder: &Path,
    ) -> Result<Vec<(String, BarcodeTable)>, RdmError> {
        let output_files = parameters.output_files();
        let missing = || RdmError::MissingOutput {
            folder: folder.to_path_buf(),
            expected: output_files.clone(),
        };
        if !folder.is_dir() {
            error!("No retrieved folder found at {:?}", folder);
            return Err(missing());
        }
        if output_files.iter().any(|name| !folder.join(name).is_file()) {
            error!("Not all expected output files {:?} were found", output_files);
            return Err(missing());
        }
        output_files
            .iter()
            .zip(parameters.output_links())
            .map(|(name, link)| {
                let table = BarcodeTable::parse_file(folder.join(name), self.max_life)?;
                info!("{} parsed as {} with {} features", name, link, table.len());
                Ok::<_, RdmError>((link, table))
            })
            .collect()
    }
}

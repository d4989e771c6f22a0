//! Command line parameters of `rips_distance_matrix_persistence`.
//!
//! Parameters are read from a free form YAML/JSON mapping and checked against
//! a fixed schema:
//!
//! | key             | type    | required | default       |
//! |-----------------|---------|----------|---------------|
//! | output-file     | string  | no       | `out.barcode` |
//! | max-edge-length | float   | yes      |               |
//! | cpx-dimension   | integer | no       | 3             |
//! | field-charac    | integer | no       | omitted       |
//! | min-persistence | float   | no       | 0             |

use std::io::Read;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{
    error::RdmError,
    serde_default::{default_cpx_dimension, default_min_persistence, default_output_file},
    staging::DistanceMatrixInput,
};

/// Link name the parsed barcode is registered under.
pub const RIPS_COMPLEX_LINK: &str = "rips_complex";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RipsParameters {
    #[serde(default = "default_output_file")]
    pub output_file: String,
    pub max_edge_length: f64,
    #[serde(default = "default_cpx_dimension")]
    pub cpx_dimension: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_charac: Option<i64>,
    #[serde(default = "default_min_persistence")]
    pub min_persistence: f64,
}

impl RipsParameters {
    /// Check `config` against the schema and fill in the defaults.
    pub fn validate(config: &Value) -> Result<Self, RdmError> {
        let config = match config {
            Value::Null => Value::Mapping(Default::default()),
            Value::Mapping(_) => config.clone(),
            other => {
                return Err(RdmError::SchemaValidation(format!(
                    "expected a mapping of parameters, found {:?}",
                    other
                )))
            }
        };
        let parameters: Self = serde_yaml::from_value(config)?;
        debug!("validated parameters {:?}", parameters);
        Ok(parameters)
    }

    /// Read a YAML (or JSON) document and validate it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RdmError> {
        let config: Value = serde_yaml::from_reader(reader)?;
        Self::validate(&config)
    }

    /// The validated set as `(key, rendered value)` pairs in schema order.
    ///
    /// Whole floats lose their fraction (`min-persistence: 0.0` renders as
    /// `0`); the tool parses both forms to the same value.
    pub fn options(&self) -> Vec<(&'static str, String)> {
        let mut options = vec![
            ("output-file", self.output_file.clone()),
            ("max-edge-length", self.max_edge_length.to_string()),
            ("cpx-dimension", self.cpx_dimension.to_string()),
        ];
        if let Some(field_charac) = self.field_charac {
            options.push(("field-charac", field_charac.to_string()));
        }
        options.push(("min-persistence", self.min_persistence.to_string()));
        options
    }

    /// `--key value` pairs followed by the distance matrix path.
    ///
    /// Values use `Display` of the underlying number, which never switches to
    /// exponent notation (`4.2`, `0`, `0.0001`).
    pub fn command_line_tokens(&self, input: &DistanceMatrixInput) -> Vec<String> {
        let mut tokens = self
            .options()
            .into_iter()
            .flat_map(|(key, value)| [format!("--{}", key), value])
            .collect::<Vec<_>>();
        tokens.push(input.command_line_path());
        tokens
    }

    pub fn output_files(&self) -> Vec<String> {
        vec![self.output_file.clone()]
    }

    pub fn output_links(&self) -> Vec<String> {
        vec![RIPS_COMPLEX_LINK.to_string()]
    }

    pub fn output_artifacts(&self) -> (Vec<String>, Vec<String>) {
        (self.output_files(), self.output_links())
    }

    pub fn to_mapping(&self) -> Result<Value, RdmError> {
        Ok(serde_yaml::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::staging::{LocalFile, RemoteReference};

    fn validate(document: &str) -> Result<RipsParameters, RdmError> {
        RipsParameters::validate(&serde_yaml::from_str(document).unwrap())
    }

    #[test]
    fn defaults_are_filled() {
        let parameters = validate("max-edge-length: 4.2").unwrap();
        assert_eq!(
            parameters,
            RipsParameters {
                output_file: "out.barcode".to_string(),
                max_edge_length: 4.2,
                cpx_dimension: 3,
                field_charac: None,
                min_persistence: 0.,
            }
        );
        let mapping = parameters.to_mapping().unwrap();
        assert!(mapping.get("field-charac").is_none());
        assert_eq!(mapping.get("cpx-dimension"), Some(&Value::from(3)));
    }

    #[test]
    fn missing_max_edge_length() {
        let error = validate("{}").unwrap_err();
        assert!(matches!(error, RdmError::SchemaValidation(_)));
        assert!(error.to_string().contains("max-edge-length"));
        assert!(matches!(
            RipsParameters::validate(&Value::Null),
            Err(RdmError::SchemaValidation(_))
        ));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let error = validate("{max-edge-length: 1.0, bogus: 1}").unwrap_err();
        assert!(matches!(error, RdmError::SchemaValidation(_)));
        assert!(error.to_string().contains("bogus"));
    }

    #[test]
    fn types_are_checked() {
        assert!(validate("max-edge-length: far").is_err());
        assert!(validate("{max-edge-length: 1.0, cpx-dimension: 2.5}").is_err());
        assert!(validate("{max-edge-length: 1.0, field-charac: two}").is_err());
        assert!(validate("[1, 2]").is_err());
        let parameters = validate("{max-edge-length: 4, field-charac: 11}").unwrap();
        assert_eq!(parameters.max_edge_length, 4.);
        assert_eq!(parameters.field_charac, Some(11));
    }

    #[test]
    fn tokens_for_local_file() {
        let parameters = validate("max-edge-length: 4.2").unwrap();
        let input = DistanceMatrixInput::Local(LocalFile::new("data/distance.matrix").unwrap());
        assert_eq!(
            parameters.command_line_tokens(&input),
            vec![
                "--output-file",
                "out.barcode",
                "--max-edge-length",
                "4.2",
                "--cpx-dimension",
                "3",
                "--min-persistence",
                "0",
                "distance.matrix",
            ]
        );
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        let parameters = validate("{max-edge-length: 2.0, min-persistence: 0.0}").unwrap();
        let options = parameters.options();
        assert_eq!(options[1], ("max-edge-length", "2".to_string()));
        assert_eq!(options[3], ("min-persistence", "0".to_string()));
    }

    #[test]
    fn tokens_for_remote_reference() {
        let parameters =
            validate("{max-edge-length: 4.2, field-charac: 3, min-persistence: 0.0001}").unwrap();
        let reference =
            RemoteReference::new("localhost", PathBuf::from("/scratch/job"), "distance.matrix")
                .unwrap();
        let tokens = parameters.command_line_tokens(&DistanceMatrixInput::Remote(reference));
        assert_eq!(tokens.last().unwrap(), "remote_folder/distance.matrix");
        assert_eq!(tokens[6..8], ["--field-charac", "3"]);
        assert_eq!(tokens[8..10], ["--min-persistence", "0.0001"]);
        assert_eq!(tokens.len(), 11);
    }

    #[test]
    fn output_artifacts_follow_output_file() {
        let parameters = validate("max-edge-length: 4.2").unwrap();
        assert_eq!(
            parameters.output_artifacts(),
            (vec!["out.barcode".to_string()], vec!["rips_complex".to_string()])
        );
        let parameters = validate("{max-edge-length: 4.2, output-file: rips.barcode}").unwrap();
        assert_eq!(parameters.output_files(), vec!["rips.barcode".to_string()]);
    }
}

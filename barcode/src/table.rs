use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use log::debug;
use serde::Serialize;

use crate::{error::BarcodeError, float};

/// One row of a barcode file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feature {
    pub dimension: u32,
    #[serde(with = "float")]
    pub birth: f64,
    #[serde(with = "float")]
    pub death: f64,
    /// The feature never dies. Kept after the death value has been clamped.
    pub essential: bool,
}

impl Feature {
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSummary {
    pub dimension: u32,
    pub features: usize,
    pub essential: usize,
    /// Sum of `death - birth` over the features with a finite death.
    #[serde(with = "float")]
    pub total_persistence: f64,
}

/// Parsed barcode file. Rows keep the order of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarcodeTable {
    features: Vec<Feature>,
    #[serde(with = "float::option")]
    max_life: Option<f64>,
}

/// A `(birth, death)` pair that keeps infinite deaths when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifeLine(#[serde(with = "float")] pub f64, #[serde(with = "float")] pub f64);

impl From<(f64, f64)> for LifeLine {
    fn from((birth, death): (f64, f64)) -> Self {
        Self(birth, death)
    }
}

impl BarcodeTable {
    /// Parse whitespace separated barcode rows from `source`.
    ///
    /// When `max_life` is given every infinite value, `-inf` included, is
    /// replaced by it, otherwise infinities are kept as they are. Blank lines
    /// and lines starting with `#` are skipped, columns after the fourth are
    /// ignored.
    pub fn parse<R: Read>(source: R, max_life: Option<f64>) -> Result<Self, BarcodeError> {
        let reader = BufReader::new(source);
        let mut features = vec![];
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            features.push(parse_row(index + 1, line, max_life)?);
        }
        debug!("parsed {} barcode features", features.len());
        Ok(Self { features, max_life })
    }

    pub fn parse_file<P: AsRef<Path>>(path: P, max_life: Option<f64>) -> Result<Self, BarcodeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BarcodeError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(file, max_life)
    }

    pub fn rows(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The value infinite lifetimes were clamped to, if any.
    pub fn max_life(&self) -> Option<f64> {
        self.max_life
    }

    pub fn dimensions(&self) -> BTreeSet<u32> {
        self.features.iter().map(|feature| feature.dimension).collect()
    }

    /// `(birth, death)` pairs of one dimension, in file order.
    pub fn life_lines(&self, dimension: u32) -> Vec<(f64, f64)> {
        self.features
            .iter()
            .filter(|feature| feature.dimension == dimension)
            .map(|feature| (feature.birth, feature.death))
            .collect()
    }

    pub fn summary(&self) -> Vec<DimensionSummary> {
        let mut summaries: BTreeMap<u32, DimensionSummary> = BTreeMap::new();
        for feature in &self.features {
            let summary = summaries
                .entry(feature.dimension)
                .or_insert_with(|| DimensionSummary {
                    dimension: feature.dimension,
                    features: 0,
                    essential: 0,
                    total_persistence: 0.,
                });
            summary.features += 1;
            if feature.essential {
                summary.essential += 1;
            } else if feature.persistence().is_finite() {
                summary.total_persistence += feature.persistence();
            }
        }
        summaries.into_values().collect()
    }
}

fn parse_row(line: usize, content: &str, max_life: Option<f64>) -> Result<Feature, BarcodeError> {
    let columns = content.split_whitespace().collect::<Vec<_>>();
    if columns.len() < 4 {
        return Err(BarcodeError::Malformed {
            line,
            reason: format!("expected at least 4 columns, found {}", columns.len()),
        });
    }
    let dimension = parse_dimension(columns[1]).ok_or_else(|| BarcodeError::Malformed {
        line,
        reason: format!("invalid dimension {:?}", columns[1]),
    })?;
    let birth = parse_value(line, "birth", columns[2])?;
    let death = parse_value(line, "death", columns[3])?;
    let essential = death == f64::INFINITY;
    let clamp = |value: f64| match max_life {
        Some(max_life) if value.is_infinite() => max_life,
        _ => value,
    };
    Ok(Feature {
        dimension,
        birth: clamp(birth),
        death: clamp(death),
        essential,
    })
}

fn parse_dimension(field: &str) -> Option<u32> {
    field.parse::<u32>().ok().or_else(|| {
        let value = field.parse::<f64>().ok()?;
        if value >= 0. && value.fract() == 0. && value <= u32::MAX as f64 {
            Some(value as u32)
        } else {
            None
        }
    })
}

fn parse_value(line: usize, column: &str, field: &str) -> Result<f64, BarcodeError> {
    match field.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(BarcodeError::Malformed {
            line,
            reason: format!("invalid {} value {:?}", column, field),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
2  0 0 2.4379
2  0 0 inf
2  1 4.06 inf
2  1 3.2 3.9
2  2 4.1 4.15
2  2 4.02 inf
";

    #[test]
    fn clamp_infinite_death() {
        let table = BarcodeTable::parse("0 0 0 2.4379\n0 1 0 inf\n".as_bytes(), Some(4.2)).unwrap();
        assert_eq!(table.life_lines(1), vec![(0., 4.2)]);
        assert_eq!(table.life_lines(0), vec![(0., 2.4379)]);
        assert_eq!(table.max_life(), Some(4.2));
    }

    #[test]
    fn keep_infinite_death_without_clamp() {
        let table = BarcodeTable::parse("0 0 0 2.4379\n0 1 0 inf\n".as_bytes(), None).unwrap();
        let life_lines = table.life_lines(1);
        assert_eq!(life_lines.len(), 1);
        assert_eq!(life_lines[0].0, 0.);
        assert_eq!(life_lines[0].1, f64::INFINITY);
    }

    #[test]
    fn life_lines_keep_file_order() {
        let table = BarcodeTable::parse(SAMPLE.as_bytes(), Some(4.2)).unwrap();
        assert_eq!(table.life_lines(0)[0], (0., 2.4379));
        assert_eq!(table.life_lines(1)[0], (4.06, 4.2));
        assert_eq!(table.life_lines(1)[1], (3.2, 3.9));
        assert_eq!(table.life_lines(2)[1], (4.02, 4.2));
        assert!(table.life_lines(3).is_empty());
    }

    #[test]
    fn clamp_negative_infinity() {
        let table = BarcodeTable::parse("0 1 -inf inf\n0 1 0 -inf\n".as_bytes(), Some(4.2)).unwrap();
        assert_eq!(table.life_lines(1), vec![(4.2, 4.2), (0., 4.2)]);
        assert!(table.rows()[0].essential);
        assert!(!table.rows()[1].essential);
    }

    #[test]
    fn infinite_values_serialize_as_text() {
        let table = BarcodeTable::parse("0 1 0.5 inf\n".as_bytes(), None).unwrap();
        let life_lines = table
            .life_lines(1)
            .into_iter()
            .map(LifeLine::from)
            .collect::<Vec<_>>();
        assert_eq!(serde_json::to_string(&life_lines).unwrap(), r#"[[0.5,"inf"]]"#);
        let row = serde_json::to_value(table.rows()[0]).unwrap();
        assert_eq!(row["death"], "inf");
        assert_eq!(row["birth"], 0.5);
        let table = BarcodeTable::parse("0 1 0.5 inf\n".as_bytes(), Some(4.2)).unwrap();
        assert_eq!(
            serde_json::to_string(&LifeLine::from(table.life_lines(1)[0])).unwrap(),
            "[0.5,4.2]"
        );
    }

    #[test]
    fn dimensions_are_distinct() {
        let table = BarcodeTable::parse(SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(table.dimensions(), BTreeSet::from([0, 1, 2]));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn short_row_is_rejected() {
        let result = BarcodeTable::parse("0 0 0 1.5\n0 1\n".as_bytes(), None);
        match result {
            Err(BarcodeError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn non_numeric_field_is_rejected() {
        assert!(matches!(
            BarcodeTable::parse("0 0 zero 1.5\n".as_bytes(), None),
            Err(BarcodeError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            BarcodeTable::parse("0 -1 0 1.5\n".as_bytes(), None),
            Err(BarcodeError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            BarcodeTable::parse("0 1 0 nan\n".as_bytes(), None),
            Err(BarcodeError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn extra_columns_blank_and_comment_lines() {
        let source = "# field dim birth death\n\n0 1.0 0.5 1.5 trailing\n   \n";
        let table = BarcodeTable::parse(source.as_bytes(), None).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].dimension, 1);
        assert_eq!(table.life_lines(1), vec![(0.5, 1.5)]);
    }

    #[test]
    fn summary_counts_essential_features() {
        let table = BarcodeTable::parse(SAMPLE.as_bytes(), Some(4.2)).unwrap();
        let summary = table.summary();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].dimension, 0);
        assert_eq!(summary[0].features, 2);
        assert_eq!(summary[0].essential, 1);
        assert!((summary[0].total_persistence - 2.4379).abs() < 1e-9);
        assert_eq!(summary[1].essential, 1);
        assert!((summary[1].total_persistence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn parse_file_reports_missing_path() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing.barcode");
        assert!(matches!(
            BarcodeTable::parse_file(&path, None),
            Err(BarcodeError::Open { .. })
        ));
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(BarcodeTable::parse_file(&path, None).unwrap().len(), 6);
    }
}

//! Text rendered by the `barcode` and `run` commands.

use std::path::Path;

use barcode::{BarcodeTable, LifeLine};

/// Life lines of `dimension`, or the per dimension summary when it is `None`.
///
/// Plain output is one line per entry after a `# path` header, otherwise a
/// single JSON line. Infinite values are written as `inf` in both forms.
pub fn barcode_report(
    path: &Path,
    table: &BarcodeTable,
    dimension: Option<u32>,
    plain: bool,
) -> Result<String, serde_json::Error> {
    let report = match (dimension, plain) {
        (Some(dimension), true) => [format!("# {}", path.to_string_lossy())]
            .into_iter()
            .chain(
                table
                    .life_lines(dimension)
                    .into_iter()
                    .map(|(birth, death)| format!("{} {}", birth, death)),
            )
            .collect::<Vec<_>>()
            .join("\n"),
        (Some(dimension), false) => {
            let life_lines = table
                .life_lines(dimension)
                .into_iter()
                .map(LifeLine::from)
                .collect::<Vec<_>>();
            serde_json::to_string(&(path, dimension, life_lines))?
        }
        (None, true) => [format!("# {}", path.to_string_lossy())]
            .into_iter()
            .chain(table.summary().into_iter().map(|summary| {
                format!(
                    "{} {} {} {}",
                    summary.dimension,
                    summary.features,
                    summary.essential,
                    summary.total_persistence
                )
            }))
            .collect::<Vec<_>>()
            .join("\n"),
        (None, false) => serde_json::to_string(&(path, table.summary()))?,
    };
    Ok(report)
}

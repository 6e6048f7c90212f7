use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::errors::{HoverError, HoverResult};

/// Read a CSV or Parquet file into a frame, picked by extension.
pub fn read_frame(path: &Path) -> HoverResult<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" | "tsv" => {
            let separator = if extension == "tsv" { b'\t' } else { b',' };
            LazyCsvReader::new(path)
                .with_has_header(true)
                .with_separator(separator)
                .with_infer_schema_length(Some(100_000))
                .finish()?
                .collect()?
        }
        "parquet" | "pq" => ParquetReader::new(File::open(path)?).finish()?,
        _ => return Err(HoverError::UnsupportedFile(path.display().to_string())),
    };
    info!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded frame");
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buckets.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "xMin,yMin,count").unwrap();
        writeln!(file, "0,0,5").unwrap();
        writeln!(file, "0,10,0").unwrap();
        drop(file);

        let df = read_frame(&path).unwrap();
        assert_eq!(df.shape(), (2, 3));
    }

    #[test]
    fn test_read_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buckets.parquet");
        let mut df = df! {
            "xMin" => [0.0, 0.0],
            "yMin" => [0.0, 10.0],
            "count" => [1.0, 2.0],
        }
        .unwrap();
        ParquetWriter::new(File::create(&path).unwrap()).finish(&mut df).unwrap();

        let loaded = read_frame(&path).unwrap();
        assert!(loaded.equals(&df));
    }

    #[test]
    fn test_unknown_extension() {
        let err = read_frame(Path::new("buckets.xlsx")).unwrap_err();
        assert!(matches!(err, HoverError::UnsupportedFile(_)));
    }
}

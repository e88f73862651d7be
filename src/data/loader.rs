use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::error::LoadError;
use super::model::RawDataset;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited log file into untyped rows.
///
/// The delimiter is picked from the extension: `.tsv` is tab separated,
/// anything else (normally `.csv` or `.log`) is comma separated. A header
/// row is required. Fields are trimmed; rows may be shorter or longer than
/// the header, which is left for the normalizer to judge.
pub fn load_file(path: &Path) -> Result<RawDataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter_for(path))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    let mut unreadable = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(record),
            Err(e) if e.is_io_error() => return Err(csv_error(path, e)),
            // Invalid UTF-8 and the like: the row can never coerce.
            Err(_) => unreadable += 1,
        }
    }

    if unreadable > 0 {
        log::debug!("{}: skipped {unreadable} unreadable rows", path.display());
    }
    if rows.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        rows.len(),
        headers.iter().collect::<Vec<_>>(),
        path.display()
    );

    Ok(RawDataset {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Build a dataset from in-memory rows, trimmed like a loaded file.
#[cfg(test)]
pub(crate) fn from_rows<I, R>(path: &Path, headers: &[&str], rows: I) -> RawDataset
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<str>,
{
    RawDataset {
        path: path.to_path_buf(),
        headers: StringRecord::from(headers.to_vec()),
        rows: rows
            .into_iter()
            .map(|row| row.into_iter().map(|f| f.as_ref().trim().to_string()).collect())
            .collect(),
    }
}

fn delimiter_for(path: &Path) -> u8 {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "tsv" => b'\t',
        _ => b',',
    }
}

fn csv_error(path: &Path, err: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_header_and_rows_in_file_order() {
        let file = write_temp(".csv", b"JOB_NUMBER,TERM,DURATION\n2,40,7000\n1, 40 ,5000\n");

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.headers, vec!["JOB_NUMBER", "TERM", "DURATION"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0], vec!["2", "40", "7000"]);
        assert_eq!(ds.rows[1], vec!["1", "40", "5000"]);
        assert_eq!(ds.column_index("DURATION"), Some(2));
    }

    #[test]
    fn tsv_extension_uses_tab_delimiter() {
        let file = write_temp(".tsv", b"DATETIME\tMEM\tCPU\n2023-01-01 00:00:00\t1.5\t2.5\n");

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.rows[0], vec!["2023-01-01 00:00:00", "1.5", "2.5"]);
    }

    #[test]
    fn ragged_rows_are_kept_for_the_normalizer() {
        let file = write_temp(".csv", b"A,B,C\n1,2\n1,2,3,4\n");

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].len(), 2);
        assert_eq!(ds.rows[1].len(), 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }), "{err:?}");
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_temp(".csv", b"");

        let err = load_file(file.path()).unwrap_err();

        assert!(matches!(err, LoadError::Empty { .. }), "{err:?}");
    }

    #[test]
    fn header_only_file_is_rejected() {
        let file = write_temp(".csv", b"JOB_NUMBER,TERM,DURATION\n");

        let err = load_file(file.path()).unwrap_err();

        assert!(matches!(err, LoadError::Empty { .. }), "{err:?}");
    }

    #[test]
    fn invalid_utf8_rows_are_skipped() {
        let file = write_temp(".csv", b"A,B\n1,\xff\xfe\n3,4\n");

        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.rows[0], vec!["3", "4"]);
    }

    #[test]
    fn from_rows_trims_fields() {
        let ds = from_rows(Path::new("mem"), &["A", "B"], [[" 1", "2 "]]);

        assert_eq!(ds.rows[0], vec!["1", "2"]);
    }
}

//! run report: one row per processed folder, flushed as produced
use {
    color_eyre::eyre::{Context, Result},
    serde::{Serialize, Serializer},
    std::{fmt, fs::File, path::Path},
};

/// link recorded when no folder matched the old name
pub const NOT_FOUND_LINK: &str = "Folder Not Found";
/// link recorded for the `null-shared` magic rows
pub const SHARED_LINK: &str = "TO CHECK - SHARED";

/// What happened to one input row. The wire strings are kept exactly as the
/// downstream spreadsheets expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// renamed and moved
    Moved,
    /// moved after the conflict resolver supplied an alternate name
    MovedRenamed,
    /// renamed, but every move attempt hit a name conflict
    RenamedOnly,
    /// rename refused, nothing changed
    Failed,
    /// no folder matched the old name (or the row was declined)
    NotFound,
}

impl RowOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            RowOutcome::Moved => "Y",
            RowOutcome::MovedRenamed => "Y - modified name",
            RowOutcome::RenamedOnly => "Renamed but did not Move due to conflict",
            RowOutcome::Failed => "N - Failed please try manually",
            RowOutcome::NotFound => "N",
        }
    }

    /// the folder ended up in the destination
    pub fn is_moved(self) -> bool {
        matches!(self, RowOutcome::Moved | RowOutcome::MovedRenamed)
    }
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RowOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One line of the results CSV.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    #[serde(rename = "oldName")]
    pub old_name: String,
    #[serde(rename = "newName")]
    pub new_name: String,
    pub success: RowOutcome,
    #[serde(rename = "urlLink")]
    pub url_link: String,
}

/// Appends result rows to the report file, flushing after every row so an
/// interrupted run still leaves a valid report of everything finished so far.
pub struct ResultWriter {
    inner: csv::Writer<File>,
}

impl ResultWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let inner = csv::Writer::from_path(path)
            .with_context(|| format!("cannot create results file {}", path.display()))?;
        Ok(Self { inner })
    }

    pub fn append(&mut self, row: &ResultRow) -> Result<()> {
        self.inner.serialize(row).context("writing result row failed")?;
        self.inner.flush().context("flushing results file failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(outcome: RowOutcome, link: &str) -> ResultRow {
        ResultRow {
            old_name: "BIO101".into(),
            new_name: "Biology 101".into(),
            success: outcome,
            url_link: link.into(),
        }
    }

    #[test]
    fn outcome_strings_match_legacy_report() {
        assert_eq!(RowOutcome::Moved.as_str(), "Y");
        assert_eq!(RowOutcome::MovedRenamed.as_str(), "Y - modified name");
        assert_eq!(
            RowOutcome::RenamedOnly.as_str(),
            "Renamed but did not Move due to conflict"
        );
        assert_eq!(RowOutcome::Failed.as_str(), "N - Failed please try manually");
        assert_eq!(RowOutcome::NotFound.as_str(), "N");
    }

    #[test]
    fn rows_are_readable_before_the_writer_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut writer = ResultWriter::create(&path).unwrap();

        writer.append(&row(RowOutcome::NotFound, NOT_FOUND_LINK)).unwrap();

        // flushed per row: visible on disk while the writer is still open
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("oldName,newName,success,urlLink\n"));
        assert!(contents.contains("BIO101,Biology 101,N,Folder Not Found"));
        drop(writer);
    }

    #[test]
    fn rows_keep_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut writer = ResultWriter::create(&path).unwrap();

        writer.append(&row(RowOutcome::Moved, "https://x/1")).unwrap();
        writer.append(&row(RowOutcome::Failed, "https://x/2")).unwrap();
        drop(writer);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("https://x/1"));
        assert!(lines[2].contains("https://x/2"));
    }
}

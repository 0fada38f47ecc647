//! the batch loop: locate, rename, move, record
use {
    crate::{
        client::FolderApi,
        locate,
        models::FolderRef,
        report::{NOT_FOUND_LINK, ResultRow, ResultWriter, RowOutcome, SHARED_LINK},
        ui::Prompt,
    },
    color_eyre::eyre::{Context, Result},
    serde::Deserialize,
    std::path::PathBuf,
    tracing::{info, warn},
};

/// Rows whose old name is this magic value belong to shared folders that need
/// manual checking; their report link is pre-set accordingly.
const SHARED_MARKER: &str = "null-shared";

/// One line of the input CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "oldName")]
    pub old_name: String,
    #[serde(rename = "newName")]
    pub new_name: String,
}

/// Bounded retry budget for the conflict resolver. No backoff: every attempt
/// waits on the operator anyway.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

/// Everything the batch loop needs up front, passed in explicitly.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_csv: PathBuf,
    pub results_csv: PathBuf,
    /// ask before mutating each row
    pub double_verify: bool,
    pub retry: RetryPolicy,
    /// `https://<server>`, used to build the session-list links
    pub site_base: String,
}

/// Totals reported after the run; the results CSV is the authoritative record.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub rows: usize,
    pub moved: usize,
}

pub struct BatchProcessor<'a> {
    api: &'a dyn FolderApi,
    prompt: &'a mut dyn Prompt,
    config: BatchConfig,
    destination: FolderRef,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(
        api: &'a dyn FolderApi,
        prompt: &'a mut dyn Prompt,
        config: BatchConfig,
        destination: FolderRef,
    ) -> Self {
        Self {
            api,
            prompt,
            config,
            destination,
        }
    }

    /// Process the whole input CSV, appending one result row per input row in
    /// input order. Rows are flushed as they are produced, so an interrupted
    /// run keeps everything finished so far. Transport and auth failures
    /// propagate and end the run; per-row conflicts only mark their row.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut reader = csv::Reader::from_path(&self.config.input_csv).with_context(|| {
            format!("cannot open input file {}", self.config.input_csv.display())
        })?;
        let mut writer = ResultWriter::create(&self.config.results_csv)?;

        let mut summary = RunSummary::default();
        for row in reader.deserialize() {
            let row: CsvRow = row.context("input row is malformed")?;
            info!(old = %row.old_name, new = %row.new_name, "processing row");

            let result = self.process_row(&row).await?;
            info!(outcome = %result.success, "row done");
            writer.append(&result)?;

            summary.rows += 1;
            if result.success.is_moved() {
                summary.moved += 1;
            }
        }

        Ok(summary)
    }

    /// Handle one row: locate the folder by its old name, rename it, move it
    /// into the destination, and resolve conflicts with operator help.
    async fn process_row(&mut self, row: &CsvRow) -> Result<ResultRow> {
        // The shared marker pre-sets the link; it survives unless the row
        // actually reaches the rename/move path.
        let mut url_link = if row.old_name == SHARED_MARKER {
            SHARED_LINK.to_string()
        } else {
            NOT_FOUND_LINK.to_string()
        };

        let Some(folder) = locate::find_unique(self.api, self.prompt, &row.old_name).await? else {
            return Ok(self.result(row, RowOutcome::NotFound, url_link));
        };

        if self.config.double_verify {
            let go = self.prompt.confirm(
                &format!("Rename \"{}\" to \"{}\" and move it?", folder.name, row.new_name),
                true,
            )?;
            if !go {
                info!(folder = %folder.name, "row declined by operator");
                return Ok(self.result(row, RowOutcome::NotFound, url_link));
            }
        }

        url_link = self.session_url(&folder.id);

        let renamed = self.api.update_name(&folder.id, &row.new_name).await?;
        if !renamed {
            warn!(
                folder = %folder.name,
                "rename refused, a sibling already carries the new name"
            );
            return Ok(self.result(row, RowOutcome::Failed, url_link));
        }

        let moved = self
            .api
            .update_parent(&folder.id, &self.destination.id, &self.destination.name)
            .await?;
        let outcome = if moved {
            RowOutcome::Moved
        } else {
            warn!(
                folder = %row.new_name,
                destination = %self.destination.name,
                "move refused, the destination already has a folder with that name"
            );
            if self.resolve_conflict(&folder.id, &row.new_name).await? {
                RowOutcome::MovedRenamed
            } else {
                RowOutcome::RenamedOnly
            }
        };

        Ok(self.result(row, outcome, url_link))
    }

    /// Bounded operator-assisted retry after a move conflict: ask once whether
    /// to try alternate names at all, then up to `max_attempts` rename+move
    /// rounds. Gives up leaving the folder renamed but unmoved.
    async fn resolve_conflict(&mut self, folder_id: &str, conflicting_name: &str) -> Result<bool> {
        let retry = self
            .prompt
            .confirm("Would you like to rename and try again?", true)?;
        if !retry {
            return Ok(false);
        }

        println!("The conflicting name is: {conflicting_name}");
        for attempt in 1..=self.config.retry.max_attempts {
            let alternate = self
                .prompt
                .line("Please enter the new name EXACTLY as you want to call the folder:")?;

            if !self.api.update_name(folder_id, &alternate).await? {
                warn!(name = %alternate, attempt, "alternate name also conflicts");
                continue;
            }
            if self
                .api
                .update_parent(folder_id, &self.destination.id, &self.destination.name)
                .await?
            {
                return Ok(true);
            }
            warn!(name = %alternate, attempt, "destination still refuses the move");
        }

        Ok(false)
    }

    fn session_url(&self, folder_id: &str) -> String {
        format!(
            "{}/Panopto/Pages/Sessions/List.aspx#folderID={folder_id}",
            self.config.site_base
        )
    }

    fn result(&self, row: &CsvRow, success: RowOutcome, url_link: String) -> ResultRow {
        ResultRow {
            old_name: row.old_name.clone(),
            new_name: row.new_name.clone(),
            success,
            url_link,
        }
    }
}

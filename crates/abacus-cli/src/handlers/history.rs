//! History command handler

use abacus::core::history::{encode_history, Ledger};
use abacus::store::{FileStore, KeyValueStore};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use crate::{HistoryAction, HistoryArgs};

/// Opens the ledger named by the configuration
#[must_use]
pub fn open_ledger(config: &CliConfig) -> Ledger<FileStore> {
    Ledger::load(
        FileStore::new(&config.store),
        config.session.storage_key.clone(),
    )
    .with_limit(config.session.history_limit)
}

/// `[index] line` rows, newest first
#[must_use]
pub fn list_rows<S: KeyValueStore>(ledger: &Ledger<S>) -> Vec<(usize, String)> {
    ledger
        .iter_rev()
        .map(|(index, entry)| (index, entry.line()))
        .collect()
}

/// Deletes one entry, failing when `index` is out of range
pub fn delete_entry<S: KeyValueStore>(ledger: &mut Ledger<S>, index: usize) -> CliResult<String> {
    let len = ledger.len();
    ledger
        .delete(index)
        .map(|entry| entry.line())
        .ok_or_else(|| {
            CliError::invalid_argument(format!(
                "no history entry at index {index} ({len} entries)"
            ))
        })
}

/// Fails with the last storage error if a mutation could not be written
pub fn check_persisted<S: KeyValueStore>(ledger: &mut Ledger<S>) -> CliResult<()> {
    ledger.take_write_error().map_or(Ok(()), |e| Err(e.into()))
}

/// Execute the history command
pub fn execute_history(
    config: &CliConfig,
    args: &HistoryArgs,
    reporter: &Reporter,
) -> CliResult<()> {
    let mut ledger = open_ledger(config);
    let action = args
        .action
        .clone()
        .unwrap_or(HistoryAction::List { json: false });

    match action {
        HistoryAction::List { json: true } => {
            reporter.result(&encode_history(ledger.entries()));
        }
        HistoryAction::List { json: false } => {
            if ledger.is_empty() {
                reporter.success("history is empty");
            }
            for (index, line) in list_rows(&ledger) {
                reporter.history_line(index, &line);
            }
        }
        HistoryAction::Delete { index } => {
            let line = delete_entry(&mut ledger, index)?;
            check_persisted(&mut ledger)?;
            reporter.success(&format!("deleted {line}"));
        }
        HistoryAction::Clear => {
            let removed = ledger.len();
            ledger.clear();
            check_persisted(&mut ledger)?;
            reporter.success(&format!("cleared {removed} entries"));
        }
    }
    Ok(())
}

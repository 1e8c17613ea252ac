//! Press command handler

use abacus::core::history::HistoryEntry;
use abacus::core::token::Token;
use abacus::core::CalcError;
use abacus::prelude::{Calculator, FileStore, KeyValueStore, NullRenderer, Outcome, Renderer};

use super::history::check_persisted;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use crate::PressArgs;

/// What a run of button presses produced
#[derive(Debug, Clone, PartialEq)]
pub struct PressReport {
    /// Display text after the last press
    pub display: String,
    /// Operand and operator still waiting for `=`, e.g. `4 +`
    pub expression: Option<String>,
    /// Calculations appended to the history, oldest first
    pub recorded: Vec<HistoryEntry>,
    /// Calculations that failed
    pub failures: Vec<CalcError>,
}

/// Parses every label before pressing anything
pub fn parse_labels(labels: &[String]) -> CliResult<Vec<Token>> {
    labels
        .iter()
        .map(|label| label.parse::<Token>().map_err(Into::into))
        .collect()
}

/// Presses `tokens` in order on an open session
pub fn apply_tokens<S, R>(calculator: &mut Calculator<S, R>, tokens: &[Token]) -> PressReport
where
    S: KeyValueStore,
    R: Renderer,
{
    let mut recorded = Vec::new();
    let mut failures = Vec::new();

    for &token in tokens {
        match calculator.press(token) {
            Outcome::Completed(entry) => recorded.push(entry),
            Outcome::Failed(err) => failures.push(err),
            Outcome::Unchanged | Outcome::Updated => {}
        }
    }

    PressReport {
        display: calculator.display(),
        expression: calculator.pending_expression(),
        recorded,
        failures,
    }
}

/// Execute the press command
pub fn execute_press(config: &CliConfig, args: &PressArgs, reporter: &Reporter) -> CliResult<()> {
    let tokens = parse_labels(&args.labels)?;

    let store = FileStore::new(&config.store);
    let mut calculator = Calculator::with_config(store, NullRenderer, config.session.clone());
    reporter.info(&format!(
        "{} history entries in {}",
        calculator.history().len(),
        config.store.display()
    ));

    let report = apply_tokens(&mut calculator, &tokens);

    for entry in &report.recorded {
        reporter.success(&format!("recorded {entry}"));
    }
    for err in &report.failures {
        reporter.failure(&err.to_string());
    }

    match (&report.expression, args.expression) {
        (Some(expression), true) => reporter.result(&format!("{expression} | {}", report.display)),
        _ => reporter.result(&report.display),
    }
    check_persisted(calculator.ledger_mut())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use abacus::prelude::MemoryStore;
    use crate::CliError;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    fn run(items: &[&str]) -> PressReport {
        let tokens = parse_labels(&labels(items)).unwrap();
        let mut calculator = Calculator::new(MemoryStore::new(), NullRenderer);
        apply_tokens(&mut calculator, &tokens)
    }

    #[test]
    fn test_parse_labels() {
        let tokens = parse_labels(&labels(&["1", "+/-", "AC"])).unwrap();
        assert_eq!(tokens, vec![Token::Digit(1), Token::ToggleSign, Token::Clear]);
    }

    #[test]
    fn test_parse_labels_rejects_unknown() {
        let err = parse_labels(&labels(&["1", "sqrt"])).unwrap_err();
        assert!(matches!(err, CliError::Calc(CalcError::UnknownToken(ref l)) if l == "sqrt"));
    }

    #[test]
    fn test_addition() {
        let report = run(&["5", "+", "3", "="]);
        assert_eq!(report.display, "8");
        assert_eq!(report.expression, None);
        assert_eq!(report.recorded.len(), 1);
        assert_eq!(report.recorded[0].line(), "5 + 3 = 8.0000");
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_division_by_zero() {
        let report = run(&["9", "/", "0", "="]);
        assert_eq!(report.display, "Error");
        assert!(report.recorded.is_empty());
        assert_eq!(report.failures, vec![CalcError::DivisionByZero]);
    }

    #[test]
    fn test_pending_expression() {
        let report = run(&["4", "+"]);
        assert_eq!(report.display, "4");
        assert_eq!(report.expression.as_deref(), Some("4 +"));
    }

    #[test]
    fn test_chaining_records_each_step() {
        let report = run(&["2", "+", "3", "*", "4", "="]);
        assert_eq!(report.display, "20");
        assert_eq!(report.recorded.len(), 2);
    }

    #[test]
    fn test_execute_press_persists() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CliConfig::new().with_store(dir.path().join("h.json"));
        let args = PressArgs {
            labels: labels(&["6", "*", "7", "="]),
            expression: false,
        };
        execute_press(&config, &args, &Reporter::new(crate::Verbosity::Quiet)).unwrap();

        let reopened = Calculator::new(FileStore::new(&config.store), NullRenderer);
        assert_eq!(reopened.history()[0].line(), "6 * 7 = 42.0000");
    }

    #[test]
    fn test_execute_press_unknown_label_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CliConfig::new().with_store(dir.path().join("h.json"));
        let args = PressArgs {
            labels: labels(&["1", "+", "1", "=", "x"]),
            expression: false,
        };
        assert!(execute_press(&config, &args, &Reporter::default()).is_err());
        assert!(!config.store.exists());
    }

    #[test]
    fn test_execute_press_reports_unwritable_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CliConfig::new().with_store(dir.path());
        let args = PressArgs {
            labels: labels(&["2", "+", "2", "="]),
            expression: false,
        };
        let err = execute_press(&config, &args, &Reporter::new(crate::Verbosity::Quiet))
            .unwrap_err();
        assert!(matches!(err, crate::CliError::Store(_)));
    }
}

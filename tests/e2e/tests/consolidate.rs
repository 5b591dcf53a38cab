//! E2E тесты для CLI инструмента `consolidate`.
//!
//! Бинарник запускается во временной директории, конфигурация передаётся
//! через переменные окружения, как в боевом запуске.

use std::{fs, path::Path};

use assert_cmd::Command;
use e2e_tests::fixture;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

const HEADER: &str =
    "transaction_time,transaction_type,transaction_amount,transaction_to,transaction_from";

/// Переменные, которые не должны протекать из окружения разработчика.
const CONFIG_VARS: [&str; 9] = [
    "OUTPUT_FILE_NAME",
    "TRANSACTION_TIME_TO_FORMAT",
    "CSV_FILES_AND_PARSERS",
    "CUSTOM_PARSERS",
    "TRANSACTION_TIME_HEADER",
    "TRANSACTION_TYPE_HEADER",
    "TRANSACTION_AMOUNT_HEADER",
    "TRANSACTION_TO_HEADER",
    "TRANSACTION_FROM_HEADER",
];

/// Создать команду для запуска consolidate в директории `dir`.
///
/// `cargo_bin` deprecated из-за edge case с custom build directories,
/// но это единственный способ для кросс-крейтовых бинарников.
#[expect(deprecated)]
fn consolidate(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("consolidate").unwrap();
    cmd.current_dir(dir);
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Временная директория с копиями указанных фикстур.
fn workspace_with(fixtures: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    for name in fixtures {
        fs::copy(fixture(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn read_output(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

// ============================================================================
// Успешные запуски
// ============================================================================

#[test]
fn test_default_configuration_merges_three_banks() {
    let dir = workspace_with(&["bank1.csv", "bank2.csv", "bank3.csv"]);

    consolidate(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Consolidated 6 record(s) from 3 file(s)"));

    let expected = format!(
        "{HEADER}\n\
         01.10.2019,remove,99.10,182,198\n\
         02.10.2019,add,2000.10,188,198\n\
         03.10.2019,remove,99.99,182,198\n\
         04.10.2019,add,2123.99,198,188\n\
         05.10.2019,remove,5.7,182,198\n\
         06.10.2019,add,1060.8,198,188\n"
    );
    assert_eq!(read_output(dir.path(), "combined.csv"), expected);
}

#[test]
fn test_two_sources_in_configured_order() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("test_csv_1.csv"),
        "timestamp,type,amount,to,from\nOct 1 2019,remove,99.10,182,198\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("test_csv_2.csv"),
        "date,transaction,amounts,to,from\n03-10-2019,remove,99.99,182,198\n",
    )
    .unwrap();

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", r#"{"test_csv_1.csv":"Parser1","test_csv_2.csv":"Parser2"}"#)
        .assert()
        .success();

    assert_eq!(
        read_output(dir.path(), "combined.csv"),
        format!("{HEADER}\n01.10.2019,remove,99.10,182,198\n03.10.2019,remove,99.99,182,198\n")
    );
}

#[test]
fn test_rerun_produces_identical_output() {
    let dir = workspace_with(&["bank1.csv", "bank2.csv", "bank3.csv"]);

    consolidate(dir.path()).assert().success();
    let first = fs::read(dir.path().join("combined.csv")).unwrap();
    consolidate(dir.path()).assert().success();
    let second = fs::read(dir.path().join("combined.csv")).unwrap();

    assert_eq!(first, second, "повторный запуск должен перезаписать файл, а не дописать");
}

#[test]
fn test_output_options_from_environment() {
    let dir = workspace_with(&["bank3.csv"]);

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", r#"{"bank3.csv":"Parser3"}"#)
        .env("OUTPUT_FILE_NAME", "merged.csv")
        .env("TRANSACTION_TIME_TO_FORMAT", "%Y-%m-%d")
        .env("TRANSACTION_TIME_HEADER", "date")
        .env("TRANSACTION_AMOUNT_HEADER", "sum")
        .assert()
        .success();

    let content = read_output(dir.path(), "merged.csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("date,transaction_type,sum,transaction_to,transaction_from")
    );
    assert_eq!(lines.next(), Some("2019-10-05,remove,5.7,182,198"));
    assert!(!dir.path().join("combined.csv").exists());
}

#[test]
fn test_custom_layout_from_environment() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bank4.csv"), "when;what;sum;to;from\n2019/10/07;add;12.5;1;2\n")
        .unwrap();

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", r#"{"bank4.csv":"Bank4"}"#)
        .env(
            "CUSTOM_PARSERS",
            r#"{"Bank4":{"date_format":"%Y/%m/%d","type_index":1,"amount":{"single":2},
                "to_index":3,"from_index":4,"delimiter":";"}}"#,
        )
        .assert()
        .success();

    assert!(read_output(dir.path(), "combined.csv").ends_with("\n07.10.2019,add,12.5,1,2\n"));
}

#[test]
fn test_flags_override_defaults() {
    let dir = workspace_with(&["bank2.csv"]);

    consolidate(dir.path())
        .args(["--files", r#"{"bank2.csv":"B"}"#, "--output", "out.csv"])
        .assert()
        .success();

    assert!(read_output(dir.path(), "out.csv").contains("04.10.2019,add,2123.99,198,188"));
}

// ============================================================================
// Тесты обработки ошибок
// ============================================================================

#[test]
fn test_malformed_row_fails_with_diagnostics() {
    let dir = workspace_with(&["bank1_malformed.csv"]);

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", r#"{"bank1_malformed.csv":"Parser1"}"#)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bank1_malformed.csv"))
        .stderr(predicate::str::contains("Oct 2 2019,99.10,182"));
}

#[test]
fn test_unknown_variant_fails() {
    let dir = workspace_with(&["bank1.csv"]);

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", r#"{"bank1.csv":"Parser4"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parser variant 'Parser4'"));

    assert!(!dir.path().join("combined.csv").exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempdir().unwrap();

    consolidate(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bank1.csv"));
}

#[test]
fn test_invalid_mapping_json() {
    let dir = tempdir().unwrap();

    consolidate(dir.path())
        .env("CSV_FILES_AND_PARSERS", "bank1.csv=Parser1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_invalid_output_date_format() {
    let dir = workspace_with(&["bank1.csv", "bank2.csv", "bank3.csv"]);

    consolidate(dir.path())
        .env("TRANSACTION_TIME_TO_FORMAT", "%d.%K")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid output date format"));
}

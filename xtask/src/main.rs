//! # xtask - Автоматизация сборки проекта
//!
//! См. [`HELP_TEXT`] для полного списка доступных команд.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use xshell::{Shell, cmd};

/// Текст справки для команды xtask.
pub const HELP_TEXT: &str = r#"xtask

Использование:
  cargo run -p xtask -- <команда>

Команды:
  help         Показать это сообщение
  fmt          Запустить rustfmt
  fmt-check    Проверить форматирование (CI)
  clippy       Запустить clippy (воркспейс)
  test         Запустить тесты через nextest (воркспейс)
  ci           Запустить fmt-check + clippy + test (профиль CI)
  demo [DIR]   Собрать combined.csv из фикстур bank1..bank3 в DIR (по умолчанию target/demo)

Примечание:
  cargo-nextest устанавливается автоматически при первом запуске тестов
"#;

/// Фикстуры, на которых работает конфигурация по умолчанию.
const SAMPLE_FILES: [&str; 3] = ["bank1.csv", "bank2.csv", "bank3.csv"];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "help".to_string());

    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cmd.as_str() {
        "help" | "-h" | "--help" => {
            println!("{HELP_TEXT}");
            Ok(())
        }
        "fmt" => Ok(cmd!(sh, "cargo +nightly fmt --all").run()?),
        "fmt-check" => Ok(cmd!(sh, "cargo +nightly fmt --all -- --check").run()?),
        "clippy" => Ok(cmd!(sh, "cargo +nightly clippy --workspace -- -D warnings").run()?),
        "test" => {
            ensure_nextest(&sh)?;
            // e2e тесты запускают бинарник consolidate
            cmd!(sh, "cargo build --workspace").run()?;
            cmd!(sh, "cargo nextest run --workspace").run()?;
            // nextest не поддерживает doctests
            cmd!(sh, "cargo test --workspace --doc").run()?;
            Ok(())
        }
        "ci" => {
            ensure_nextest(&sh)?;
            cmd!(sh, "cargo +nightly fmt --all -- --check").run()?;
            cmd!(sh, "cargo +nightly clippy --workspace -- -D warnings").run()?;
            cmd!(sh, "cargo build --workspace").run()?;
            cmd!(sh, "cargo nextest run --workspace --profile ci").run()?;
            cmd!(sh, "cargo test --workspace --doc").run()?;
            Ok(())
        }
        "demo" => demo(&sh, args.next()),
        other => bail!("Неизвестная команда: {other}\n\nЗапустите: cargo run -p xtask -- help"),
    }
}

/// Копирует фикстуры в `dir` и запускает там `consolidate` с настройками по умолчанию.
fn demo(sh: &Shell, dir: Option<String>) -> Result<()> {
    let root = project_root()?;
    let dir = dir.map_or_else(|| root.join("target/demo"), PathBuf::from);
    let fixtures = root.join("tests/e2e/fixtures");

    sh.create_dir(&dir)?;
    for name in SAMPLE_FILES {
        sh.copy_file(fixtures.join(name), dir.join(name))
            .with_context(|| format!("не удалось скопировать {name}"))?;
    }

    cmd!(sh, "cargo build -p consolidate").run()?;
    let binary = root.join("target/debug/consolidate");

    let _guard = sh.push_dir(&dir);
    cmd!(sh, "{binary}").env("RUST_LOG", "info").run()?;

    let combined = sh.read_file(dir.join("combined.csv"))?;
    println!("{combined}");
    Ok(())
}

/// Корень воркспейса (родитель директории xtask).
fn project_root() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().map(PathBuf::from).context("xtask должен лежать внутри воркспейса")
}

/// Установить cargo-nextest, если его нет.
fn ensure_nextest(sh: &Shell) -> Result<()> {
    if cmd!(sh, "cargo nextest --version").quiet().ignore_stdout().ignore_stderr().run().is_err() {
        eprintln!("cargo-nextest не найден, устанавливаю...");
        cmd!(sh, "cargo install cargo-nextest --locked").run()?;
    }
    Ok(())
}

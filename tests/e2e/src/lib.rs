//! # e2e-tests - End-to-end тесты CLI инструмента `consolidate`
//!
//! ## Фикстуры
//!
//! Тестовые файлы расположены в `fixtures/`:
//! - `bank1.csv`: раскладка `Parser1` (`Oct 1 2019`)
//! - `bank2.csv`: раскладка `Parser2` (`03-10-2019`)
//! - `bank3.csv`: раскладка `Parser3` (`5 Oct 2019`, сумма в двух полях)
//! - `bank1_malformed.csv`: раскладка `Parser1` с укороченной строкой

use std::path::PathBuf;

/// Получить путь к директории фикстур.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Получить путь к фикстуре по имени файла.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

//! Конфигурация запуска.
//!
//! [`Config`] собирается один раз при старте (бинарник `consolidate` заполняет
//! его из флагов и переменных окружения) и передаётся по ссылке в
//! [`Consolidator`](crate::consolidate::Consolidator). Код разбора сам
//! окружение не читает.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};

use crate::{
    error::{ConsolidateError, Result},
    layout::{LayoutRegistry, Variant, is_valid_strftime},
};

/// Выходной файл по умолчанию.
pub const DEFAULT_OUTPUT_FILE: &str = "combined.csv";

/// Выходной формат даты по умолчанию, `dd.mm.yyyy`.
pub const DEFAULT_OUTPUT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Названия колонок в заголовке выходного файла.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    pub time: String,
    pub tx_type: String,
    pub amount: String,
    pub to: String,
    pub from: String,
}

impl Default for Headers {
    fn default() -> Self {
        Self {
            time: "transaction_time".to_string(),
            tx_type: "transaction_type".to_string(),
            amount: "transaction_amount".to_string(),
            to: "transaction_to".to_string(),
            from: "transaction_from".to_string(),
        }
    }
}

impl Headers {
    /// Названия в порядке выходных колонок.
    #[must_use]
    pub fn as_record(&self) -> [&str; 5] {
        [&self.time, &self.tx_type, &self.amount, &self.to, &self.from]
    }
}

/// Упорядоченное соответствие «входной файл: имя раскладки».
///
/// Файлы обрабатываются в порядке добавления. При разборе JSON порядок
/// ключей объекта сохраняется, повторные ключи отклоняются.
///
/// ```
/// use bankcsv::config::FileAssignment;
///
/// let files = FileAssignment::from_json(r#"{"b.csv": "Parser2", "a.csv": "Parser1"}"#).unwrap();
/// let names: Vec<_> = files.iter().map(|(path, layout)| (path.to_str().unwrap(), layout)).collect();
/// assert_eq!(names, [("b.csv", "Parser2"), ("a.csv", "Parser1")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileAssignment {
    entries: Vec<(PathBuf, String)>,
}

impl FileAssignment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Три учебных файла с тремя встроенными раскладками.
    #[must_use]
    pub fn sample() -> Self {
        Variant::ALL.into_iter().enumerate().fold(Self::new(), |files, (idx, variant)| {
            files.with(format!("bank{}.csv", idx + 1), variant.name())
        })
    }

    /// Разбирает JSON-объект «имя файла: имя раскладки».
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|source| ConsolidateError::InvalidJson { what: "CSV_FILES_AND_PARSERS", source })
    }

    /// Добавляет файл в конец.
    #[must_use]
    pub fn with(mut self, path: impl Into<PathBuf>, layout: impl Into<String>) -> Self {
        self.push(path, layout);
        self
    }

    pub fn push(&mut self, path: impl Into<PathBuf>, layout: impl Into<String>) {
        self.entries.push((path.into(), layout.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.entries.iter().map(|(path, layout)| (path.as_path(), layout.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for FileAssignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FileAssignmentVisitor)
    }
}

struct FileAssignmentVisitor;

impl<'de> Visitor<'de> for FileAssignmentVisitor {
    type Value = FileAssignment;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping file names to parser names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut files = FileAssignment::new();
        let mut seen = HashSet::new();

        while let Some((path, layout)) = map.next_entry::<String, String>()? {
            if !seen.insert(path.clone()) {
                return Err(de::Error::custom(format!("duplicate file '{path}'")));
            }
            files.push(path, layout);
        }
        Ok(files)
    }
}

/// Всё, что нужно одному запуску консолидации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Выходной файл, перезаписывается при каждом запуске.
    pub output_path: PathBuf,
    /// Формат даты в выходном файле (strftime).
    pub output_date_format: String,
    pub headers: Headers,
    pub files: FileAssignment,
    pub layouts: LayoutRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            output_date_format: DEFAULT_OUTPUT_DATE_FORMAT.to_string(),
            headers: Headers::default(),
            files: FileAssignment::sample(),
            layouts: LayoutRegistry::builtin(),
        }
    }
}

impl Config {
    /// Проверяет выходной формат даты и наличие всех назначенных раскладок.
    ///
    /// # Ошибки
    ///
    /// [`ConsolidateError::Config`] при некорректном формате даты,
    /// [`ConsolidateError::UnknownVariant`] при незарегистрированной раскладке.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_strftime(&self.output_date_format) {
            return Err(ConsolidateError::Config(format!(
                "invalid output date format '{}'",
                self.output_date_format
            )));
        }
        for (_, layout) in self.files.iter() {
            self.layouts.resolve(layout)?;
        }
        Ok(())
    }
}

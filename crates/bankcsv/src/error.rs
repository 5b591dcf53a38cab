//! Ошибки разбора строк и консолидации.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::validation::ValidationError;

/// Файл и исходная строка, в которой обнаружена ошибка.
///
/// Входит в каждую ошибку уровня строки, чтобы оператор мог найти
/// проблемную запись без повторного запуска.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLocation {
    /// Имя входного файла.
    pub filename: String,
    /// Поля строки, склеенные обратно через разделитель.
    pub row: String,
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} line '{}'", self.filename, self.row)
    }
}

/// Ошибка извлечения канонического поля из одной строки.
///
/// Любая такая ошибка прерывает консолидацию целиком.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// В строке нет запрошенного поля.
    #[error("{location} is incorrect, missing field #{index} (row has {len} field(s))")]
    MalformedRow {
        /// Где встретилась строка.
        location: RowLocation,
        /// Запрошенный индекс поля.
        index: usize,
        /// Фактическое число полей.
        len: usize,
    },

    /// Дата не соответствует входному формату или не существует в календаре.
    #[error("{location}: date '{value}' does not match format '{format}': {reason}")]
    DateFormat {
        /// Где встретилась строка.
        location: RowLocation,
        /// Значение поля даты.
        value: String,
        /// Ожидаемый формат strftime.
        format: String,
        /// Причина от разборщика дат.
        reason: String,
    },

    /// Тип транзакции вне допустимого набора.
    #[error("{location}: invalid transaction type '{value}', expected 'add' or 'remove'")]
    InvalidType {
        /// Где встретилась строка.
        location: RowLocation,
        /// Значение поля типа.
        value: String,
    },

    /// Числовое поле не разбирается как десятичное число.
    #[error("{location}: field {field} is not a number: '{value}'")]
    InvalidNumeric {
        /// Где встретилась строка.
        location: RowLocation,
        /// Имя канонического поля.
        field: &'static str,
        /// Значение поля.
        value: String,
    },
}

impl ParseError {
    /// Дополняет ошибку валидации местом строки.
    pub fn from_validation(err: ValidationError, location: RowLocation) -> Self {
        match err {
            ValidationError::InvalidType(value) => Self::InvalidType { location, value },
            ValidationError::InvalidNumeric { field, value } => {
                Self::InvalidNumeric { location, field, value }
            }
        }
    }

    /// Место строки, в которой произошла ошибка.
    #[must_use]
    pub fn location(&self) -> &RowLocation {
        match self {
            Self::MalformedRow { location, .. }
            | Self::DateFormat { location, .. }
            | Self::InvalidType { location, .. }
            | Self::InvalidNumeric { location, .. } => location,
        }
    }
}

/// Удобный alias для Result с ParseError.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Ошибка запуска консолидации.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// Конфигурация ссылается на незарегистрированную раскладку.
    #[error("unknown parser variant '{0}'")]
    UnknownVariant(String),

    /// Некорректное значение конфигурации.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON в конфигурации не разбирается.
    #[error("invalid {what} JSON: {source}")]
    InvalidJson {
        /// Какой параметр конфигурации.
        what: &'static str,
        /// Ошибка serde_json.
        #[source]
        source: serde_json::Error,
    },

    /// Ошибка ввода/вывода при работе с файлом.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Путь к файлу.
        path: PathBuf,
        /// Исходная ошибка.
        #[source]
        source: std::io::Error,
    },

    /// Ошибка записи выходного CSV.
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    /// Строка входного файла не прошла разбор.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ConsolidateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Удобный alias для Result с ConsolidateError.
pub type Result<T> = std::result::Result<T, ConsolidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> RowLocation {
        RowLocation { filename: "bank1.csv".to_string(), row: "Oct 1 2019,99.10,182".to_string() }
    }

    #[test]
    fn malformed_row_message_names_file_and_row() {
        let err = ParseError::MalformedRow { location: location(), index: 4, len: 3 };
        let msg = err.to_string();
        assert!(msg.contains("bank1.csv"));
        assert!(msg.contains("Oct 1 2019,99.10,182"));
        assert!(msg.contains("missing field #4"));
    }

    #[test]
    fn validation_errors_keep_their_kind() {
        let err = ParseError::from_validation(
            ValidationError::InvalidNumeric { field: "transaction_to", value: "abc".to_string() },
            location(),
        );
        assert!(matches!(err, ParseError::InvalidNumeric { field: "transaction_to", .. }));
        assert_eq!(err.location().filename, "bank1.csv");

        let err =
            ParseError::from_validation(ValidationError::InvalidType("99.10".into()), location());
        assert!(matches!(err, ParseError::InvalidType { ref value, .. } if value == "99.10"));
    }

    #[test]
    fn parse_error_is_transparent_inside_consolidate_error() {
        let inner = ParseError::InvalidType { location: location(), value: "x".to_string() };
        let expected = inner.to_string();
        let err = ConsolidateError::from(inner);
        assert_eq!(err.to_string(), expected);
    }
}

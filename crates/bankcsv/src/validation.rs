//! Общие проверки полей, которые применяет каждый парсер.

use thiserror::Error;

use crate::record::TransactionType;

/// Ошибки, возникающие при валидации значения поля.
///
/// Не содержат имени файла и строки: парсер добавляет их через
/// [`ParseError::from_validation`](crate::error::ParseError::from_validation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Недопустимый тип транзакции: '{0}' (ожидается add или remove)")]
    InvalidType(String),
    #[error("Поле {field} не является числом: '{value}'")]
    InvalidNumeric { field: &'static str, value: String },
}

/// Проверяет, что тип транзакции ровно `add` или `remove`.
///
/// # Пример
///
/// ```
/// use bankcsv::{record::TransactionType, validation::validate_transaction_type};
///
/// assert_eq!(validate_transaction_type("add"), Ok(TransactionType::Add));
/// assert!(validate_transaction_type("ADD").is_err());
/// ```
pub fn validate_transaction_type(value: &str) -> Result<TransactionType, ValidationError> {
    value.parse()
}

/// Проверяет, что значение разбирается как конечное число с плавающей точкой.
///
/// `inf` и `NaN` отклоняются: в выходном файле сумма и номера счетов
/// должны оставаться обычными десятичными числами.
pub fn validate_numeric(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(()),
        _ => Err(ValidationError::InvalidNumeric { field, value: value.to_string() }),
    }
}

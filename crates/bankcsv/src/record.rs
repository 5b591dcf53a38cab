//! Каноническая запись транзакции.

use std::{fmt, str::FromStr};

use crate::validation::ValidationError;

/// Тип транзакции в выходном файле.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Зачисление.
    Add,
    /// Списание.
    Remove,
}

impl TransactionType {
    /// Возвращает строковое представление типа транзакции.
    ///
    /// # Пример
    /// ```
    /// use bankcsv::record::TransactionType;
    /// assert_eq!(TransactionType::Remove.as_str(), "remove");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    /// Регистр важен: `Add` и `REMOVE` не принимаются.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(ValidationError::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Нормализованная запись из пяти полей, общая для всех банков.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Дата в выходном формате.
    pub time: String,
    /// Тип транзакции.
    pub tx_type: TransactionType,
    /// Сумма, десятичное число.
    pub amount: String,
    /// Счёт получателя.
    pub to: String,
    /// Счёт отправителя.
    pub from: String,
}

impl CanonicalRecord {
    /// Поля в порядке выходных колонок.
    #[must_use]
    pub fn fields(&self) -> [&str; 5] {
        [&self.time, self.tx_type.as_str(), &self.amount, &self.to, &self.from]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_parsing_is_case_sensitive() {
        assert_eq!("add".parse::<TransactionType>(), Ok(TransactionType::Add));
        assert_eq!("remove".parse::<TransactionType>(), Ok(TransactionType::Remove));
        assert_eq!(
            "Add".parse::<TransactionType>(),
            Err(ValidationError::InvalidType("Add".to_string()))
        );
    }

    #[test]
    fn fields_follow_output_column_order() {
        let record = CanonicalRecord {
            time: "01.10.2019".to_string(),
            tx_type: TransactionType::Remove,
            amount: "99.10".to_string(),
            to: "182".to_string(),
            from: "198".to_string(),
        };
        assert_eq!(record.fields(), ["01.10.2019", "remove", "99.10", "182", "198"]);
    }
}

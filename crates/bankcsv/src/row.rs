//! Разбиение сырой строки на позиционные поля.

use tracing::warn;

use crate::error::{ParseError, ParseResult, RowLocation};

/// Разделитель полей во входных файлах по умолчанию.
pub const DEFAULT_DELIMITER: char = ',';

/// Одна строка входного файла, разбитая на поля.
///
/// Длина строки не проверяется при разбиении: у разных банков разное
/// число колонок, поэтому ошибка возникает только при обращении к
/// отсутствующему полю через [`RawRow::field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    fields: Vec<String>,
    delimiter: char,
}

impl RawRow {
    /// Разбивает строку по разделителю и обрезает пробелы по краям каждого поля.
    ///
    /// Завершающие `\r` и `\n` отбрасываются. Пробелы внутри поля сохраняются.
    ///
    /// ```
    /// use bankcsv::row::RawRow;
    ///
    /// let row = RawRow::split("5 Oct 2019, add ,5,44\r\n", ',');
    /// assert_eq!(row.field(0, "bank3.csv").unwrap(), "5 Oct 2019");
    /// assert_eq!(row.field(1, "bank3.csv").unwrap(), "add");
    /// assert!(row.field(4, "bank3.csv").is_err());
    /// ```
    pub fn split(line: &str, delimiter: char) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields = line.split(delimiter).map(|field| field.trim().to_string()).collect();
        Self { fields, delimiter }
    }

    /// Возвращает поле по индексу.
    ///
    /// # Ошибки
    ///
    /// [`ParseError::MalformedRow`], если полей меньше, чем `index + 1`.
    pub fn field(&self, index: usize, filename: &str) -> ParseResult<&str> {
        self.fields.get(index).map(String::as_str).ok_or_else(|| {
            let location = self.location(filename);
            warn!(%location, index, len = self.fields.len(), "row is missing field(s)");
            ParseError::MalformedRow { location, index, len: self.fields.len() }
        })
    }

    /// Поля, склеенные обратно через разделитель.
    #[must_use]
    pub fn raw(&self) -> String {
        let mut buf = [0u8; 4];
        self.fields.join(&*self.delimiter.encode_utf8(&mut buf))
    }

    /// Место строки для сообщений об ошибках.
    #[must_use]
    pub fn location(&self, filename: &str) -> RowLocation {
        RowLocation { filename: filename.to_string(), row: self.raw() }
    }
}

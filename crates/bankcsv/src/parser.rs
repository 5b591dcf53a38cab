//! Извлечение канонических полей из строки по раскладке банка.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::{
    config::DEFAULT_OUTPUT_DATE_FORMAT,
    error::{ParseError, ParseResult, RowLocation},
    layout::{AmountLayout, ParserDescriptor, Variant},
    record::{CanonicalRecord, TransactionType},
    row::RawRow,
    validation::{ValidationError, validate_numeric, validate_transaction_type},
};

/// Парсер строк одного входного файла.
///
/// Перед чтением каждой строки парсер нужно «зарядить» через
/// [`set_line`](Self::set_line); все `get_*` работают с последней
/// заряженной строкой. Имя файла задаётся один раз через
/// [`set_filename`](Self::set_filename) и попадает во все ошибки.
///
/// # Пример
///
/// ```
/// use bankcsv::{layout::Variant, parser::BankParser, record::TransactionType};
///
/// let mut parser = BankParser::for_variant(Variant::Parser1);
/// parser.set_filename("bank1.csv");
/// parser.set_line("Oct 1 2019,remove,99.10,182,198");
///
/// assert_eq!(parser.get_transaction_time().unwrap(), "01.10.2019");
/// assert_eq!(parser.get_transaction_type().unwrap(), TransactionType::Remove);
/// assert_eq!(parser.get_transaction_amount().unwrap(), "99.10");
/// assert_eq!(parser.get_transaction_to().unwrap(), "182");
/// assert_eq!(parser.get_transaction_from().unwrap(), "198");
/// ```
#[derive(Debug, Clone)]
pub struct BankParser {
    descriptor: ParserDescriptor,
    output_date_format: String,
    current_filename: String,
    elements: Option<RawRow>,
}

impl BankParser {
    /// Создаёт парсер для раскладки и выходного формата даты (strftime).
    pub fn new(descriptor: ParserDescriptor, output_date_format: impl Into<String>) -> Self {
        Self {
            descriptor,
            output_date_format: output_date_format.into(),
            current_filename: String::new(),
            elements: None,
        }
    }

    /// Парсер встроенной раскладки с выходным форматом `%d.%m.%Y`.
    pub fn for_variant(variant: Variant) -> Self {
        Self::new(variant.descriptor().clone(), DEFAULT_OUTPUT_DATE_FORMAT)
    }

    /// Запоминает имя текущего файла для диагностики.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.current_filename = filename.into();
    }

    #[must_use]
    pub fn current_filename(&self) -> &str {
        &self.current_filename
    }

    /// Заряжает парсер новой строкой, заменяя предыдущую.
    pub fn set_line(&mut self, line: &str) {
        self.elements = Some(RawRow::split(line, self.descriptor.delimiter));
    }

    /// Дата из поля 0, переформатированная в выходной формат.
    ///
    /// # Ошибки
    ///
    /// [`ParseError::DateFormat`], если дата не соответствует входному формату,
    /// не существует (например, 30 февраля) или не выражается выходным форматом.
    pub fn get_transaction_time(&self) -> ParseResult<String> {
        let value = self.element(0)?;
        let input_format = &self.descriptor.date_format;

        let date = NaiveDate::parse_from_str(value, input_format).map_err(|err| {
            self.date_error(value, input_format, err.to_string())
        })?;

        let mut formatted = String::new();
        write!(formatted, "{}", date.format(&self.output_date_format)).map_err(|_| {
            self.date_error(
                value,
                &self.output_date_format,
                "output format cannot render a date".to_string(),
            )
        })?;
        Ok(formatted)
    }

    /// Тип транзакции, строго `add` или `remove`.
    pub fn get_transaction_type(&self) -> ParseResult<TransactionType> {
        let value = self.element(self.descriptor.type_index)?;
        validate_transaction_type(value).map_err(|err| self.invalid(err))
    }

    /// Сумма транзакции.
    ///
    /// Для раздельной раскладки целая и дробная части склеиваются через `.`:
    /// поля `"5"` и `"44"` дают `"5.44"`. Пустая часть считается ошибкой,
    /// иначе `"5"` и `""` превратились бы в `"5."`.
    pub fn get_transaction_amount(&self) -> ParseResult<String> {
        let amount = match self.descriptor.amount {
            AmountLayout::Single(index) => self.element(index)?.to_string(),
            AmountLayout::Split { units, fraction } => {
                let (units, fraction) = (self.element(units)?, self.element(fraction)?);
                let amount = format!("{units}.{fraction}");
                if units.is_empty() || fraction.is_empty() {
                    return Err(self.invalid(ValidationError::InvalidNumeric {
                        field: "transaction_amount",
                        value: amount,
                    }));
                }
                amount
            }
        };
        validate_numeric("transaction_amount", &amount).map_err(|err| self.invalid(err))?;
        Ok(amount)
    }

    /// Счёт получателя, должен быть числом.
    pub fn get_transaction_to(&self) -> ParseResult<String> {
        self.numeric_element("transaction_to", self.descriptor.to_index)
    }

    /// Счёт отправителя, должен быть числом.
    pub fn get_transaction_from(&self) -> ParseResult<String> {
        self.numeric_element("transaction_from", self.descriptor.from_index)
    }

    /// Все пять полей в порядке: время, тип, сумма, получатель, отправитель.
    ///
    /// Останавливается на первой ошибке.
    pub fn record(&self) -> ParseResult<CanonicalRecord> {
        Ok(CanonicalRecord {
            time: self.get_transaction_time()?,
            tx_type: self.get_transaction_type()?,
            amount: self.get_transaction_amount()?,
            to: self.get_transaction_to()?,
            from: self.get_transaction_from()?,
        })
    }

    fn element(&self, index: usize) -> ParseResult<&str> {
        match &self.elements {
            Some(row) => row.field(index, &self.current_filename),
            // Строка ещё не заряжена
            None => Err(ParseError::MalformedRow { location: self.location(), index, len: 0 }),
        }
    }

    fn numeric_element(&self, field: &'static str, index: usize) -> ParseResult<String> {
        let value = self.element(index)?;
        validate_numeric(field, value).map_err(|err| self.invalid(err))?;
        Ok(value.to_string())
    }

    fn location(&self) -> RowLocation {
        match &self.elements {
            Some(row) => row.location(&self.current_filename),
            None => RowLocation { filename: self.current_filename.clone(), row: String::new() },
        }
    }

    fn invalid(&self, err: ValidationError) -> ParseError {
        ParseError::from_validation(err, self.location())
    }

    fn date_error(&self, value: &str, format: &str, reason: String) -> ParseError {
        ParseError::DateFormat {
            location: self.location(),
            value: value.to_string(),
            format: format.to_string(),
            reason,
        }
    }
}

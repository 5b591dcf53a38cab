//! Библиотека консолидации банковских выписок.
//!
//! Каждый банк выгружает транзакции в CSV со своим порядком колонок и своим
//! форматом даты. Этот крейт приводит такие строки к единой канонической
//! записи из пяти полей и собирает их в один CSV-файл:
//!
//! - [`row`]: разбиение строки на поля с ленивой проверкой длины
//! - [`layout`]: описания раскладок колонок (встроенные `Parser1`..`Parser3` и
//!   пользовательские)
//! - [`parser`]: [`BankParser`](parser::BankParser), извлекающий поля по раскладке
//! - [`validation`]: общие проверки типа транзакции и числовых полей
//! - [`consolidate`]: запись объединённого файла
//!
//! # Быстрый старт
//!
//! ```
//! use bankcsv::prelude::*;
//!
//! let mut parser = BankParser::for_variant(Variant::Parser3);
//! parser.set_filename("bank3.csv");
//! parser.set_line("5 Oct 2019,add,5,44,182,198");
//!
//! let record = parser.record().unwrap();
//! assert_eq!(record.time, "05.10.2019");
//! assert_eq!(record.tx_type, TransactionType::Add);
//! assert_eq!(record.amount, "5.44");
//! ```

pub mod config;
pub mod consolidate;
pub mod error;
pub mod layout;
pub mod parser;
pub mod record;
pub mod row;
pub mod validation;

/// Часто используемые типы одним импортом.
pub mod prelude {
    pub use crate::{
        config::{
            Config, DEFAULT_OUTPUT_DATE_FORMAT, DEFAULT_OUTPUT_FILE, FileAssignment, Headers,
        },
        consolidate::{ConsolidationReport, Consolidator},
        error::{ConsolidateError, ParseError, Result},
        layout::{AmountLayout, LayoutRegistry, ParserDescriptor, Variant},
        parser::BankParser,
        record::{CanonicalRecord, TransactionType},
    };
}

//! Сборка нескольких выписок в один CSV-файл.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use tracing::{debug, info, trace};

use crate::{
    config::Config,
    error::{ConsolidateError, Result},
    parser::BankParser,
};

/// Итог успешной консолидации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConsolidationReport {
    /// Сколько входных файлов обработано.
    pub files: usize,
    /// Сколько строк записано (без заголовка).
    pub records: usize,
}

/// Объединяет входные файлы по конфигурации.
///
/// Файлы обрабатываются строго по порядку [`FileAssignment`](crate::config::FileAssignment),
/// строки внутри файла идут в исходном порядке. Первая ошибочная строка прерывает
/// весь запуск.
///
/// # Пример
///
/// ```no_run
/// use bankcsv::prelude::*;
///
/// let config = Config::default();
/// let report = Consolidator::new(&config).run().expect("consolidation failed");
/// println!("{} record(s)", report.records);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Consolidator<'a> {
    config: &'a Config,
}

impl<'a> Consolidator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Пишет объединённый файл в `config.output_path`, перезаписывая его.
    ///
    /// Конфигурация проверяется до создания выходного файла, поэтому
    /// неизвестная раскладка не оставляет после себя пустой файл.
    pub fn run(&self) -> Result<ConsolidationReport> {
        self.config.validate()?;

        let path = &self.config.output_path;
        let output = File::create(path).map_err(ConsolidateError::io(path))?;
        let report = self.consolidate_into(output)?;

        info!(
            output = %path.display(),
            files = report.files,
            records = report.records,
            "consolidation finished"
        );
        Ok(report)
    }

    /// Пишет заголовок и строки всех файлов в произвольный writer.
    pub fn consolidate_into<W: Write>(&self, output: W) -> Result<ConsolidationReport> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(output);
        writer.write_record(self.config.headers.as_record())?;

        let mut report = ConsolidationReport::default();
        for (path, layout) in self.config.files.iter() {
            let descriptor = self.config.layouts.resolve(layout)?;
            let mut parser =
                BankParser::new(descriptor.clone(), self.config.output_date_format.as_str());
            parser.set_filename(path.display().to_string());

            debug!(file = %path.display(), layout, "opening input file");
            let input = File::open(path).map_err(ConsolidateError::io(path))?;
            let records = process_file(BufReader::new(input), &mut parser, &mut writer)?;
            info!(file = %path.display(), layout, records, "file consolidated");

            report.files += 1;
            report.records += records;
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(report)
    }
}

/// Переносит строки одного источника в выходной CSV.
///
/// Первая строка источника считается заголовком и отбрасывается, пустые
/// строки пропускаются. Возвращает число записанных строк.
///
/// # Пример
///
/// ```
/// use bankcsv::{consolidate::process_file, layout::Variant, parser::BankParser};
///
/// let input = "date,transaction,amounts,to,from\n03-10-2019,remove,99.99,182,198\n";
/// let mut parser = BankParser::for_variant(Variant::Parser2);
/// let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
///
/// let count = process_file(input.as_bytes(), &mut parser, &mut writer).unwrap();
/// assert_eq!(count, 1);
/// assert_eq!(writer.into_inner().unwrap(), b"03.10.2019,remove,99.99,182,198\n");
/// ```
pub fn process_file<R: BufRead, W: Write>(
    reader: R,
    parser: &mut BankParser,
    writer: &mut csv::Writer<W>,
) -> Result<usize> {
    let source = Path::new(parser.current_filename()).to_path_buf();
    let mut lines = reader.lines();

    // Заголовок источника не нужен
    match lines.next() {
        Some(header) => {
            header.map_err(ConsolidateError::io(&source))?;
        }
        None => return Ok(0),
    }

    let mut records = 0;
    for line in lines {
        let line = line.map_err(ConsolidateError::io(&source))?;
        if line.trim().is_empty() {
            continue;
        }

        parser.set_line(&line);
        let record = parser.record()?;
        trace!(file = %source.display(), ?record, "row normalized");

        writer.write_record(record.fields())?;
        records += 1;
    }
    Ok(records)
}

//! Раскладки колонок поддерживаемых банковских выписок.
//!
//! Раскладка это просто данные ([`ParserDescriptor`]), которые читает один
//! общий [`BankParser`](crate::parser::BankParser). Три раскладки встроены
//! ([`Variant`]), остальные регистрируются в [`LayoutRegistry`] при запуске.

use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map::Entry},
    fmt,
    str::FromStr,
};

use chrono::format::{Item, StrftimeItems};
use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, Visitor},
};

use crate::{
    error::{ConsolidateError, Result},
    row::DEFAULT_DELIMITER,
};

/// Где в строке лежит сумма транзакции.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountLayout {
    /// Вся сумма в одном поле.
    Single(usize),
    /// Целая и дробная части в двух полях, склеиваются через `.`.
    Split {
        /// Индекс поля с целой частью.
        units: usize,
        /// Индекс поля с дробной частью.
        fraction: usize,
    },
}

/// Позиции полей и формат даты одной выписки.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserDescriptor {
    /// Формат даты в поле 0 (strftime).
    pub date_format: Cow<'static, str>,
    /// Индекс поля с типом транзакции.
    pub type_index: usize,
    pub amount: AmountLayout,
    /// Индекс счёта получателя.
    pub to_index: usize,
    /// Индекс счёта отправителя.
    pub from_index: usize,
    /// Разделитель полей.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

// "Oct 1 2019"
static PARSER1: ParserDescriptor = ParserDescriptor {
    date_format: Cow::Borrowed("%b %d %Y"),
    type_index: 1,
    amount: AmountLayout::Single(2),
    to_index: 3,
    from_index: 4,
    delimiter: DEFAULT_DELIMITER,
};

// "03-10-2019"
static PARSER2: ParserDescriptor = ParserDescriptor {
    date_format: Cow::Borrowed("%d-%m-%Y"),
    type_index: 1,
    amount: AmountLayout::Single(2),
    to_index: 3,
    from_index: 4,
    delimiter: DEFAULT_DELIMITER,
};

// "5 Oct 2019", сумма разбита на евро и центы
static PARSER3: ParserDescriptor = ParserDescriptor {
    date_format: Cow::Borrowed("%d %b %Y"),
    type_index: 1,
    amount: AmountLayout::Split { units: 2, fraction: 3 },
    to_index: 4,
    from_index: 5,
    delimiter: DEFAULT_DELIMITER,
};

/// Встроенные раскладки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `Oct 1 2019,remove,99.10,182,198`
    Parser1,
    /// `03-10-2019,remove,99.99,182,198`
    Parser2,
    /// `5 Oct 2019,add,5,44,182,198`
    Parser3,
}

impl Variant {
    /// Все встроенные раскладки по порядку.
    pub const ALL: [Variant; 3] = [Self::Parser1, Self::Parser2, Self::Parser3];

    /// Имя раскладки в `CSV_FILES_AND_PARSERS`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Parser1 => "Parser1",
            Self::Parser2 => "Parser2",
            Self::Parser3 => "Parser3",
        }
    }

    /// Короткий псевдоним: `A`, `B` или `C`.
    #[must_use]
    pub const fn alias(&self) -> &'static str {
        match self {
            Self::Parser1 => "A",
            Self::Parser2 => "B",
            Self::Parser3 => "C",
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static ParserDescriptor {
        match self {
            Self::Parser1 => &PARSER1,
            Self::Parser2 => &PARSER2,
            Self::Parser3 => &PARSER3,
        }
    }
}

impl FromStr for Variant {
    type Err = ConsolidateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name() == s || variant.alias() == s)
            .ok_or_else(|| ConsolidateError::UnknownVariant(s.to_string()))
    }
}

/// `true`, если в формате только известные спецификаторы strftime.
pub(crate) fn is_valid_strftime(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Реестр раскладок, доступных по имени из конфигурации.
///
/// Встроенные [`Variant`] известны всегда, пользовательские добавляются
/// через [`LayoutRegistry::register`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutRegistry {
    custom: BTreeMap<String, ParserDescriptor>,
}

impl LayoutRegistry {
    /// Реестр только со встроенными раскладками.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Разбирает пользовательские раскладки из JSON-объекта «имя: описание».
    ///
    /// Повтор имени в объекте считается ошибкой.
    ///
    /// ```
    /// use bankcsv::layout::{AmountLayout, LayoutRegistry};
    ///
    /// let registry = LayoutRegistry::from_json(
    ///     r#"{"Bank4": {"date_format": "%Y/%m/%d", "type_index": 1,
    ///        "amount": {"split": {"units": 2, "fraction": 3}},
    ///        "to_index": 4, "from_index": 5, "delimiter": ";"}}"#,
    /// )
    /// .unwrap();
    ///
    /// let bank4 = registry.resolve("Bank4").unwrap();
    /// assert_eq!(bank4.amount, AmountLayout::Split { units: 2, fraction: 3 });
    /// assert_eq!(bank4.delimiter, ';');
    /// assert!(registry.resolve("Parser1").is_ok());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let CustomLayouts(layouts) = serde_json::from_str(json)
            .map_err(|source| ConsolidateError::InvalidJson { what: "CUSTOM_PARSERS", source })?;

        let mut registry = Self::builtin();
        for (name, descriptor) in layouts {
            registry.register(name, descriptor)?;
        }
        Ok(registry)
    }

    /// Добавляет пользовательскую раскладку.
    ///
    /// # Ошибки
    ///
    /// [`ConsolidateError::Config`], если имя занято встроенной раскладкой
    /// или формат даты не является корректной строкой strftime.
    pub fn register(&mut self, name: impl Into<String>, descriptor: ParserDescriptor) -> Result<()> {
        let name = name.into();
        if name.parse::<Variant>().is_ok() {
            return Err(ConsolidateError::Config(format!(
                "custom layout '{name}' shadows a built-in layout"
            )));
        }
        if !is_valid_strftime(&descriptor.date_format) {
            return Err(ConsolidateError::Config(format!(
                "layout '{name}' has invalid date format '{}'",
                descriptor.date_format
            )));
        }
        self.custom.insert(name, descriptor);
        Ok(())
    }

    /// Ищет раскладку по имени, сначала среди встроенных.
    ///
    /// # Ошибки
    ///
    /// [`ConsolidateError::UnknownVariant`], если такой раскладки нет.
    pub fn resolve(&self, name: &str) -> Result<&ParserDescriptor> {
        if let Ok(variant) = name.parse::<Variant>() {
            return Ok(variant.descriptor());
        }
        self.custom.get(name).ok_or_else(|| ConsolidateError::UnknownVariant(name.to_string()))
    }

    /// Имена пользовательских раскладок в алфавитном порядке.
    pub fn custom_names(&self) -> impl Iterator<Item = &str> {
        self.custom.keys().map(String::as_str)
    }
}

/// Содержимое `CUSTOM_PARSERS`.
struct CustomLayouts(BTreeMap<String, ParserDescriptor>);

impl<'de> Deserialize<'de> for CustomLayouts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(CustomLayoutsVisitor)
    }
}

struct CustomLayoutsVisitor;

impl<'de> Visitor<'de> for CustomLayoutsVisitor {
    type Value = CustomLayouts;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping layout names to layout descriptions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
        let mut layouts = BTreeMap::new();

        while let Some((name, descriptor)) = map.next_entry::<String, ParserDescriptor>()? {
            match layouts.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(de::Error::custom(format!("duplicate layout '{}'", entry.key())));
                }
                Entry::Vacant(entry) => {
                    entry.insert(descriptor);
                }
            }
        }
        Ok(CustomLayouts(layouts))
    }
}

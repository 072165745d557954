//! Long-form localized dates.
//!
//! Photo dates are shown the way a person would write them in the album's
//! language: `15 января 2024 г.` rather than `2024-01-15`. The locale comes
//! from `[dates] locale` in `config.toml`.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    En,
    #[default]
    Ru,
    De,
    Fr,
    Es,
}

// Russian months are genitive, as written after a day number.
const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const MONTHS_RU: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня", "июля", "августа", "сентября",
    "октября", "ноября", "декабря",
];
const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];
const MONTHS_FR: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];
const MONTHS_ES: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
    "octubre", "noviembre", "diciembre",
];

impl DateLocale {
    /// BCP 47 tag, used for the page's `lang` attribute.
    pub fn language_tag(self) -> &'static str {
        match self {
            DateLocale::En => "en",
            DateLocale::Ru => "ru",
            DateLocale::De => "de",
            DateLocale::Fr => "fr",
            DateLocale::Es => "es",
        }
    }

    fn month_name(self, date: NaiveDate) -> &'static str {
        let months = match self {
            DateLocale::En => &MONTHS_EN,
            DateLocale::Ru => &MONTHS_RU,
            DateLocale::De => &MONTHS_DE,
            DateLocale::Fr => &MONTHS_FR,
            DateLocale::Es => &MONTHS_ES,
        };
        months[date.month0() as usize]
    }

    /// Day, month name and year in this locale's long form.
    pub fn format_long(self, date: NaiveDate) -> String {
        let day = date.day();
        let month = self.month_name(date);
        let year = date.year();
        match self {
            DateLocale::En => format!("{month} {day}, {year}"),
            DateLocale::Ru => format!("{day} {month} {year} г."),
            DateLocale::De => format!("{day}. {month} {year}"),
            DateLocale::Fr => format!("{day} {month} {year}"),
            DateLocale::Es => format!("{day} de {month} de {year}"),
        }
    }
}

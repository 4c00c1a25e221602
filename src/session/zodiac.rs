use chrono::{Datelike, NaiveDate};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Sign for a birth date, using the tropical boundaries the practice works with.
    pub fn from_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());
        match (month, day) {
            (3, 21..) | (4, ..=19) => ZodiacSign::Aries,
            (4, 20..) | (5, ..=20) => ZodiacSign::Taurus,
            (5, 21..) | (6, ..=20) => ZodiacSign::Gemini,
            (6, 21..) | (7, ..=22) => ZodiacSign::Cancer,
            (7, 23..) | (8, ..=22) => ZodiacSign::Leo,
            (8, 23..) | (9, ..=22) => ZodiacSign::Virgo,
            (9, 23..) | (10, ..=22) => ZodiacSign::Libra,
            (10, 23..) | (11, ..=21) => ZodiacSign::Scorpio,
            (11, 22..) | (12, ..=21) => ZodiacSign::Sagittarius,
            (12, 22..) | (1, ..=19) => ZodiacSign::Capricorn,
            (1, 20..) | (2, ..=18) => ZodiacSign::Aquarius,
            _ => ZodiacSign::Pisces,
        }
    }

    /// Portuguese display name, as stored on session records
    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Áries",
            ZodiacSign::Taurus => "Touro",
            ZodiacSign::Gemini => "Gêmeos",
            ZodiacSign::Cancer => "Câncer",
            ZodiacSign::Leo => "Leão",
            ZodiacSign::Virgo => "Virgem",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Escorpião",
            ZodiacSign::Sagittarius => "Sagitário",
            ZodiacSign::Capricorn => "Capricórnio",
            ZodiacSign::Aquarius => "Aquário",
            ZodiacSign::Pisces => "Peixes",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

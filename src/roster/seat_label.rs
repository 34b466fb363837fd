//! seat_label.rs
//!
//! Разбор и сравнение меток мест вида `31`, `31_A`, `31-b`, `31C`.
//!
//! Грамматика: `DIGIT+ ( ('_' | '-')? ALPHA )?`, цифры и буквы только ASCII.
//! Всё, что под грамматику не подходит, не считается ошибкой: такая метка
//! становится `ParsedSeat::Fallback` (номер 0, без суффикса) и при сортировке
//! оказывается в начале списка.

use std::cmp::Ordering;

/// Результат разбора метки места.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedSeat {
    /// Метка разобрана: числовой номер и необязательная буква (в верхнем регистре).
    Parsed { number: u64, suffix: Option<char> },
    /// Метка не соответствует грамматике.
    Fallback,
}

impl ParsedSeat {
    pub fn parse(label: &str) -> Self {
        let bytes = label.as_bytes();
        let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return ParsedSeat::Fallback;
        }

        let number = bytes[..digits].iter().fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        });

        let mut rest = &bytes[digits..];
        if rest.is_empty() {
            return ParsedSeat::Parsed { number, suffix: None };
        }
        if let [b'_' | b'-', tail @ ..] = rest {
            rest = tail;
        }

        match rest {
            [letter] if letter.is_ascii_alphabetic() => ParsedSeat::Parsed {
                number,
                suffix: Some(char::from(letter.to_ascii_uppercase())),
            },
            _ => ParsedSeat::Fallback,
        }
    }

    pub fn number(&self) -> u64 {
        match self {
            ParsedSeat::Parsed { number, .. } => *number,
            ParsedSeat::Fallback => 0,
        }
    }

    pub fn suffix(&self) -> Option<char> {
        match self {
            ParsedSeat::Parsed { suffix, .. } => *suffix,
            ParsedSeat::Fallback => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ParsedSeat::Fallback)
    }

    /// Ключ сортировки: `None` (без суффикса) меньше любой буквы.
    pub fn sort_key(&self) -> (u64, Option<char>) {
        (self.number(), self.suffix())
    }
}

/// Полный порядок на метках мест: сначала номер, затем суффикс.
pub fn compare_seat_labels(a: &str, b: &str) -> Ordering {
    ParsedSeat::parse(a)
        .sort_key()
        .cmp(&ParsedSeat::parse(b).sort_key())
}

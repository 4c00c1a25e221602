use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

use super::SessionRecord;

/// A client whose birthday falls on the checked day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Birthday {
    pub name: String,
    pub age: i32,
}

/// Age reached on `today` if it is the anniversary of `birth`.
pub fn birthday_age(birth: NaiveDate, today: NaiveDate) -> Option<i32> {
    if birth.day() == today.day() && birth.month() == today.month() {
        Some(today.year() - birth.year())
    } else {
        None
    }
}

/// Clients with a birthday on `today`, one entry per (name, birth date).
pub fn birthdays_on(records: &[SessionRecord], today: NaiveDate) -> Vec<Birthday> {
    let mut seen = BTreeSet::new();
    let mut found = Vec::new();

    for record in records {
        let (Some(name), Some(birth)) = (record.name(), record.birth_day()) else {
            continue;
        };
        let Some(age) = birthday_age(birth, today) else {
            continue;
        };
        if seen.insert((name.to_string(), birth)) {
            found.push(Birthday {
                name: name.to_string(),
                age,
            });
        }
    }

    found
}

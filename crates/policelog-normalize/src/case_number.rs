//! Qualifying-row filter based on the year-prefixed case number.

use once_cell::sync::Lazy;
use regex::Regex;

static CASE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})-\d").unwrap());

/// Accepts case numbers shaped like `YY-NNNN` whose year is active.
#[derive(Debug, Clone)]
pub struct CaseNumberFilter {
    years: Vec<u8>,
}

impl CaseNumberFilter {
    pub fn new(years: impl Into<Vec<u8>>) -> Self {
        Self {
            years: years.into(),
        }
    }

    pub fn years(&self) -> &[u8] {
        &self.years
    }

    pub fn matches(&self, cell: &str) -> bool {
        CASE_NUMBER_RE
            .captures(cell.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|year| year.as_str().parse::<u8>().ok())
            .map(|year| self.years.contains(&year))
            .unwrap_or(false)
    }
}

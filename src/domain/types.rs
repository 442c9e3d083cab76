//! Shared domain enumerations.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of posts shown per list page.
///
/// Only the enumerated sizes are representable; anything else has to be
/// rejected (or replaced by the default) at the boundary where it enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Twenty,
    Fifty,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page size must be one of 5, 10, 20 or 50 (got `{0}`)")]
pub struct InvalidPageSize(pub String);

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
    ];

    pub fn from_value(value: u64) -> Option<Self> {
        match value {
            5 => Some(PageSize::Five),
            10 => Some(PageSize::Ten),
            20 => Some(PageSize::Twenty),
            50 => Some(PageSize::Fifty),
            _ => None,
        }
    }

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }

    pub fn is_default(self) -> bool {
        self == PageSize::default()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for PageSize {
    type Err = InvalidPageSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(PageSize::from_value)
            .ok_or_else(|| InvalidPageSize(s.to_string()))
    }
}

impl Serialize for PageSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.get() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_enumerated_sizes_parse() {
        assert_eq!("5".parse::<PageSize>(), Ok(PageSize::Five));
        assert_eq!(" 50 ".parse::<PageSize>(), Ok(PageSize::Fifty));
        assert!("7".parse::<PageSize>().is_err());
        assert!("0".parse::<PageSize>().is_err());
        assert!("ten".parse::<PageSize>().is_err());
        assert_eq!(PageSize::from_value(20), Some(PageSize::Twenty));
        assert_eq!(PageSize::from_value(100), None);
    }

    #[test]
    fn default_is_five() {
        assert_eq!(PageSize::default().get(), 5);
        assert!(PageSize::Five.is_default());
        assert!(!PageSize::Ten.is_default());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&PageSize::Twenty).expect("serialize");
        assert_eq!(json, "20");
    }
}

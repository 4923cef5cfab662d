use std::fmt;
use std::str::FromStr;

use super::{Category, Kind, Transaction, ValidationError};

const ALL: &str = "all";

/// Narrows transactions by kind. Parses from `all`, `income` or `expense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(Kind),
}

impl TypeFilter {
    pub fn matches(&self, kind: Kind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => *wanted == kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str(ALL),
            TypeFilter::Only(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

/// Narrows transactions by category. Any value other than `all` selects a
/// single category, including free-text ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL),
            CategoryFilter::Only(category) => fmt::Display::fmt(category, f),
        }
    }
}

/// The pair of predicates selecting which transactions are displayed.
/// Totals are never affected by it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionFilter {
    pub kind: TypeFilter,
    pub category: CategoryFilter,
}

impl TransactionFilter {
    pub fn new(kind: TypeFilter, category: CategoryFilter) -> Self {
        Self { kind, category }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.matches(transaction.kind()) && self.category.matches(transaction.category())
    }

    pub fn is_all(&self) -> bool {
        self.kind == TypeFilter::All && self.category == CategoryFilter::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_filter() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("ALL".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!(
            "income".parse::<TypeFilter>(),
            Ok(TypeFilter::Only(Kind::Income))
        );
        assert!("savings".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn test_parse_category_filter() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "food".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Food))
        );
        assert_eq!(
            "Gifts".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(Category::Custom("Gifts".into())))
        );
    }

    #[test]
    fn test_filter_display_roundtrip() {
        let filter = TypeFilter::Only(Kind::Expense);
        assert_eq!(filter.to_string().parse::<TypeFilter>(), Ok(filter));
        assert_eq!(CategoryFilter::All.to_string(), "all");
        assert_eq!(CategoryFilter::Only(Category::Bills).to_string(), "bills");
    }

    #[test]
    fn test_default_filter_is_all() {
        assert!(TransactionFilter::default().is_all());
        assert!(!TransactionFilter::new(TypeFilter::Only(Kind::Income), CategoryFilter::All).is_all());
    }
}

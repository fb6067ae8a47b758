use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Fixed classification tag attached to an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Transactions,
    Invoices,
    Emails,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected transactions, invoices or emails)")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 3] = [Category::Transactions, Category::Invoices, Category::Emails];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Transactions => "transactions",
            Category::Invoices => "invoices",
            Category::Emails => "emails",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Transactions => "Transactions",
            Category::Invoices => "Invoices",
            Category::Emails => "Emails",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Category::Transactions => "CSV or Excel files containing transaction data",
            Category::Invoices => "PDF or image invoices for analysis",
            Category::Emails => "Email archives in JSON or text format",
        }
    }

    pub fn accepted_extensions(self) -> &'static [&'static str] {
        match self {
            Category::Transactions => &["csv", "xlsx", "xls"],
            Category::Invoices => &["pdf", "png", "jpg", "jpeg"],
            Category::Emails => &["json", "txt", "eml"],
        }
    }

    /// Advisory extension check; the store never rejects a file on this basis.
    pub fn accepts(self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.accepted_extensions()
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

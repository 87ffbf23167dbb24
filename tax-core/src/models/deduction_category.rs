use serde::{Deserialize, Serialize};

/// Deduction categories the calculator and the limit store know by name.
///
/// Allowances on a request carry free-form category strings; this enum only
/// recognizes them. Names are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionCategory {
    #[serde(rename = "personal")]
    Personal,
    #[serde(rename = "k-receipt")]
    KReceipt,
    #[serde(rename = "donation")]
    Donation,
}

impl DeductionCategory {
    pub fn all() -> &'static [DeductionCategory] {
        &[Self::Personal, Self::KReceipt, Self::Donation]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::KReceipt => "k-receipt",
            Self::Donation => "donation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "personal" => Some(Self::Personal),
            "k-receipt" => Some(Self::KReceipt),
            "donation" => Some(Self::Donation),
            _ => None,
        }
    }

    /// JSON key used when reporting an updated limit for this category.
    pub fn response_key(&self) -> &'static str {
        match self {
            Self::Personal => "personalDeduction",
            Self::KReceipt => "kReceipt",
            Self::Donation => "donation",
        }
    }
}

impl std::fmt::Display for DeductionCategory {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/*
[INPUT]:  Stall menu (fillings, sauces) and lifecycle status vocabulary
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - fixed menu and status definitions
[UPDATE]: When the menu or a lifecycle status changes
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Filling variants, declared in canonical label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filling {
    Sosis,
    Cumi,
    Kepiting,
    Keju,
    Kornet,
    /// Octopus, the premium filling
    Gurita,
}

impl Filling {
    pub const ALL: [Filling; 6] = [
        Filling::Sosis,
        Filling::Cumi,
        Filling::Kepiting,
        Filling::Keju,
        Filling::Kornet,
        Filling::Gurita,
    ];

    /// Every variant except the premium one; the "mixed" wording only applies to these.
    pub const STANDARD: [Filling; 5] = [
        Filling::Sosis,
        Filling::Cumi,
        Filling::Kepiting,
        Filling::Keju,
        Filling::Kornet,
    ];

    pub fn is_premium(self) -> bool {
        matches!(self, Filling::Gurita)
    }

    pub fn id(self) -> &'static str {
        match self {
            Filling::Sosis => "sosis",
            Filling::Cumi => "cumi",
            Filling::Kepiting => "kepiting",
            Filling::Keju => "keju",
            Filling::Kornet => "kornet",
            Filling::Gurita => "gurita",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filling::Sosis => "Sosis",
            Filling::Cumi => "Cumi",
            Filling::Kepiting => "Kepiting",
            Filling::Keju => "Keju",
            Filling::Kornet => "Kornet",
            Filling::Gurita => "Gurita",
        }
    }
}

impl fmt::Display for Filling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filling {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Filling::ALL
            .into_iter()
            .find(|filling| filling.id().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown filling: {value}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sauce {
    Sambel,
    Tomat,
    Mayonaise,
}

impl Sauce {
    pub const ALL: [Sauce; 3] = [Sauce::Sambel, Sauce::Tomat, Sauce::Mayonaise];

    pub fn label(self) -> &'static str {
        match self {
            Sauce::Sambel => "Saus Sambel",
            Sauce::Tomat => "Saus Tomat",
            Sauce::Mayonaise => "Mayonaise",
        }
    }
}

impl fmt::Display for Sauce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kitchen progress of a single committed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingStatus {
    #[default]
    Pending,
    Done,
}

impl CookingStatus {
    pub fn toggled(self) -> Self {
        match self {
            CookingStatus::Pending => CookingStatus::Done,
            CookingStatus::Done => CookingStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Display order of the grouped queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupOrder {
    #[default]
    Ascending,
    Descending,
}

/// How a served order leaves the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalMode {
    /// Held until the operator confirms
    #[default]
    Confirm,
    /// Deleted when a cancellable countdown reaches zero
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
}

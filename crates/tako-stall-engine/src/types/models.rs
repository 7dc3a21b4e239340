/*
[INPUT]:  Compositions from the filling/sauce inputs and menu configuration
[OUTPUT]: Draft line items, committed queue lines and derived order groups
[POS]:    Data layer - order line definitions shared by cart and queue
[UPDATE]: When line item fields or group projection fields change
*/

use std::fmt;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CookingStatus, PaymentStatus};
use crate::config::MenuConfig;
use crate::filling::FillingCounts;
use crate::sauce::SauceSelection;

/// Customer-facing order number. Assigned once per new order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueNumber(u32);

impl QueueNumber {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// `None` once the counter is exhausted; numbers are never handed out twice.
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for QueueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique line identifier with no meaning beyond list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(Uuid);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineKind {
    Food {
        fillings: FillingCounts,
        sauces: SauceSelection,
        /// Katsuobushi topping
        garnish: bool,
    },
    Drink,
}

/// A composed line, either staged in the draft cart or copied into the queue.
///
/// Food lines always carry `quantity == 1`; extra portions are extra lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub kind: LineKind,
}

impl LineItem {
    pub fn food(
        menu: &MenuConfig,
        fillings: &FillingCounts,
        sauces: &SauceSelection,
        garnish: bool,
    ) -> Self {
        Self {
            id: LineId::new(),
            name: fillings.smart_name(&menu.item_name),
            quantity: 1,
            price: fillings.price(menu),
            kind: LineKind::Food {
                fillings: fillings.clone(),
                sauces: sauces.clone(),
                garnish,
            },
        }
    }

    pub fn drink(menu: &MenuConfig, quantity: u32) -> Self {
        Self {
            id: LineId::new(),
            name: menu.drink_label(quantity),
            quantity,
            price: menu.drink_price * Decimal::from(quantity),
            kind: LineKind::Drink,
        }
    }

    pub fn is_drink(&self) -> bool {
        matches!(self.kind, LineKind::Drink)
    }

    /// Fold `extra` units into a drink line, regenerating its name and price.
    pub(crate) fn add_drink_units(&mut self, menu: &MenuConfig, extra: u32) {
        let quantity = self.quantity.saturating_add(extra);
        self.quantity = quantity;
        self.name = menu.drink_label(quantity);
        self.price = menu.drink_price * Decimal::from(quantity);
    }

    /// Same composition under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: LineId::new(),
            ..self.clone()
        }
    }
}

/// A line in the permanent queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedLine {
    pub line: LineItem,
    pub queue_number: QueueNumber,
    pub customer_name: String,
    pub created_at: DateTime<Local>,
    pub cooking: CookingStatus,
    pub payment: PaymentStatus,
}

impl CommittedLine {
    pub fn is_paid(&self) -> bool {
        self.payment == PaymentStatus::Paid
    }

    pub fn created_at_label(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

/// All committed lines sharing a queue number. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderGroup {
    pub queue_number: QueueNumber,
    pub customer_name: String,
    pub created_at: DateTime<Local>,
    pub lines: Vec<CommittedLine>,
    pub total: Decimal,
}

impl OrderGroup {
    pub fn is_paid(&self) -> bool {
        self.lines.iter().all(CommittedLine::is_paid)
    }

    pub fn is_cooked(&self) -> bool {
        self.lines
            .iter()
            .all(|line| line.cooking == CookingStatus::Done)
    }

    pub fn created_at_label(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }
}

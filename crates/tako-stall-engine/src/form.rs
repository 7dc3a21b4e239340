/*
[INPUT]:  Operator taps on fillings, sauces, garnish and the drink counter
[OUTPUT]: The composition the next add-to-cart turns into draft lines
[POS]:    Compose layer - the editable form in front of the draft cart
[UPDATE]: When compose inputs change
*/

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MenuConfig;
use crate::filling::{FillingCounts, FillingSelector};
use crate::sauce::SauceSelection;
use crate::types::{LineItem, LineKind};

/// Fillings, sauces, garnish and drink quantity being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeForm {
    fillings: FillingSelector,
    sauces: SauceSelection,
    garnish: bool,
    drink_quantity: u32,
}

impl ComposeForm {
    pub fn new(portion_size: u8) -> Self {
        Self {
            fillings: FillingSelector::new(portion_size),
            sauces: SauceSelection::default(),
            garnish: false,
            drink_quantity: 0,
        }
    }

    pub fn fillings(&self) -> &FillingSelector {
        &self.fillings
    }

    pub fn fillings_mut(&mut self) -> &mut FillingSelector {
        &mut self.fillings
    }

    pub fn sauces(&self) -> &SauceSelection {
        &self.sauces
    }

    pub fn sauces_mut(&mut self) -> &mut SauceSelection {
        &mut self.sauces
    }

    pub fn garnish(&self) -> bool {
        self.garnish
    }

    pub fn toggle_garnish(&mut self) -> bool {
        self.garnish = !self.garnish;
        self.garnish
    }

    pub fn drink_quantity(&self) -> u32 {
        self.drink_quantity
    }

    pub fn increment_drink(&mut self) -> u32 {
        self.drink_quantity = self.drink_quantity.saturating_add(1);
        self.drink_quantity
    }

    /// Floor is zero. Returns false when already there.
    pub fn decrement_drink(&mut self) -> bool {
        if self.drink_quantity == 0 {
            return false;
        }
        self.drink_quantity -= 1;
        true
    }

    /// True when neither a filling nor a drink is chosen.
    pub fn is_empty(&self) -> bool {
        self.fillings.counts().is_empty() && self.drink_quantity == 0
    }

    /// Price of everything the form would add.
    pub fn price(&self, menu: &MenuConfig) -> Decimal {
        self.fillings.price(menu) + menu.drink_price * Decimal::from(self.drink_quantity)
    }

    pub fn reset(&mut self) {
        self.fillings.reset();
        self.sauces.reset();
        self.garnish = false;
        self.drink_quantity = 0;
    }

    /// Replace the form contents with a stored line's composition.
    pub fn load_line(&mut self, line: &LineItem) {
        self.reset();
        match &line.kind {
            LineKind::Food {
                fillings,
                sauces,
                garnish,
            } => {
                self.fillings.load(fillings);
                self.sauces = sauces.clone();
                self.garnish = *garnish;
            }
            LineKind::Drink => self.drink_quantity = line.quantity,
        }
    }

    pub fn snapshot(&self, menu: &MenuConfig) -> FormSnapshot {
        FormSnapshot {
            fillings: self.fillings.counts().clone(),
            filling_total: self.fillings.total(),
            remaining: self.fillings.remaining(),
            mixed_preset: self.fillings.is_mixed_preset(),
            preview_name: self.fillings.smart_name(&menu.item_name),
            detail: self.fillings.counts().detail_string(),
            sauces: self.sauces.clone(),
            garnish: self.garnish,
            drink_quantity: self.drink_quantity,
            price: self.price(menu),
        }
    }
}

/// Render view of the compose form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub fillings: FillingCounts,
    pub filling_total: u32,
    pub remaining: u32,
    pub mixed_preset: bool,
    pub preview_name: String,
    pub detail: String,
    pub sauces: SauceSelection,
    pub garnish: bool,
    pub drink_quantity: u32,
    pub price: Decimal,
}

/*
[INPUT]:  Operator sauce toggles (per sauce, separate packaging, all)
[OUTPUT]: Selected/separate flags and the summary the renderer draws
[POS]:    Compose layer - sauce configuration
[UPDATE]: When sauces or packaging rules change
*/

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Sauce;

/// Selected sauces and which of them are packaged separately.
///
/// A sauce can only be separate while it is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SauceSelection {
    selected: BTreeSet<Sauce>,
    separate: BTreeSet<Sauce>,
}

/// How a sauce selection is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "sauces", rename_all = "snake_case")]
pub enum SauceSummary {
    NoSauce,
    /// Every selected sauce is packaged separately; shown as one chip
    AllSeparate,
    /// (sauce, packaged separately)
    PerSauce(Vec<(Sauce, bool)>),
}

impl SauceSelection {
    pub fn is_selected(&self, sauce: Sauce) -> bool {
        self.selected.contains(&sauce)
    }

    pub fn is_separate(&self, sauce: Sauce) -> bool {
        self.separate.contains(&sauce)
    }

    pub fn selected(&self) -> impl Iterator<Item = Sauce> + '_ {
        self.selected.iter().copied()
    }

    pub fn all_selected(&self) -> bool {
        Sauce::ALL.iter().all(|sauce| self.selected.contains(sauce))
    }

    pub fn toggle_sauce(&mut self, sauce: Sauce) {
        if !self.selected.remove(&sauce) {
            self.selected.insert(sauce);
        } else {
            self.separate.remove(&sauce);
        }
    }

    /// Flip separate packaging. Returns false (no-op) for an unselected sauce.
    pub fn toggle_separate(&mut self, sauce: Sauce) -> bool {
        if !self.is_selected(sauce) {
            return false;
        }
        if !self.separate.remove(&sauce) {
            self.separate.insert(sauce);
        }
        true
    }

    /// Deselect everything when all sauces are on, otherwise select all.
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.selected.clear();
            self.separate.clear();
        } else {
            self.selected.extend(Sauce::ALL);
        }
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.separate.clear();
    }

    pub fn summary(&self) -> SauceSummary {
        if self.selected.is_empty() {
            return SauceSummary::NoSauce;
        }
        if self.selected.iter().all(|sauce| self.separate.contains(sauce)) {
            return SauceSummary::AllSeparate;
        }
        SauceSummary::PerSauce(
            self.selected
                .iter()
                .map(|sauce| (*sauce, self.separate.contains(sauce)))
                .collect(),
        )
    }
}

/*
[INPUT]:  Operator +/- taps per filling variant, mixed preset requests
[OUTPUT]: Bounded filling counts, portion price and generated item name
[POS]:    Compose layer - filling selection and naming rules
[UPDATE]: When naming or pricing rules change
*/

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MenuConfig;
use crate::types::Filling;

/// Filling variant -> count. Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillingCounts(BTreeMap<Filling, u8>);

impl FillingCounts {
    pub fn get(&self, filling: Filling) -> u8 {
        self.0.get(&filling).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, filling: Filling, count: u8) {
        if count == 0 {
            self.0.remove(&filling);
        } else {
            self.0.insert(filling, count);
        }
    }

    pub fn total(&self) -> u32 {
        self.0.values().map(|count| u32::from(*count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Variants with a positive count, in canonical label order.
    pub fn active(&self) -> impl Iterator<Item = Filling> + '_ {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(filling, _)| *filling)
    }

    /// Flat per-portion price; only a full portion of the premium filling costs more.
    pub fn price(&self, menu: &MenuConfig) -> Decimal {
        if self.is_empty() {
            return Decimal::ZERO;
        }
        if self.get(Filling::Gurita) == menu.portion_size {
            menu.premium_price
        } else {
            menu.food_price
        }
    }

    /// Human-readable item name derived from the active variants.
    ///
    /// Rules, first match wins:
    /// 1. nothing active: `Plain <item>`
    /// 2. premium active: `Full <premium> <item>` when it is alone, otherwise
    ///    every active label is listed (`<item> with ...`)
    /// 3. standard variants only: all five is `Mixed <item>`, three or four is
    ///    `Mixed <item> without <missing labels>`
    /// 4. anything else lists the active labels
    pub fn smart_name(&self, item: &str) -> String {
        let active: Vec<Filling> = self.active().collect();

        if active.is_empty() {
            return format!("Plain {item}");
        }

        if active.iter().any(|filling| filling.is_premium()) {
            if active.len() == 1 {
                return format!("Full {} {item}", active[0].label());
            }
            return format!("{item} with {}", join_labels(active.iter().copied()));
        }

        let all_standard = active
            .iter()
            .all(|filling| Filling::STANDARD.contains(filling));
        if all_standard {
            if active.len() == Filling::STANDARD.len() {
                return format!("Mixed {item}");
            }
            if active.len() >= 3 {
                let missing = Filling::STANDARD
                    .into_iter()
                    .filter(|filling| !active.contains(filling));
                return format!("Mixed {item} without {}", join_labels(missing));
            }
        }

        format!("{item} with {}", join_labels(active.iter().copied()))
    }

    /// Kitchen detail such as `Sosis(2), Keju(3)`.
    pub fn detail_string(&self) -> String {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(filling, count)| format!("{}({count})", filling.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(Filling, u8)> for FillingCounts {
    fn from_iter<I: IntoIterator<Item = (Filling, u8)>>(iter: I) -> Self {
        let mut counts = FillingCounts::default();
        for (filling, count) in iter {
            counts.set(filling, count);
        }
        counts
    }
}

fn join_labels(fillings: impl Iterator<Item = Filling>) -> String {
    fillings
        .map(Filling::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bounded filling picker for one portion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillingSelector {
    counts: FillingCounts,
    mixed_preset: bool,
    portion_size: u8,
}

impl FillingSelector {
    pub fn new(portion_size: u8) -> Self {
        Self {
            counts: FillingCounts::default(),
            mixed_preset: false,
            portion_size,
        }
    }

    pub fn counts(&self) -> &FillingCounts {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.total()
    }

    /// Fillings that can still be added to this portion.
    pub fn remaining(&self) -> u32 {
        u32::from(self.portion_size).saturating_sub(self.total())
    }

    /// True while the counts come from [`FillingSelector::apply_mixed_preset`] untouched.
    pub fn is_mixed_preset(&self) -> bool {
        self.mixed_preset
    }

    /// Add one of `filling`. Returns false when the portion is already full.
    pub fn increment(&mut self, filling: Filling) -> bool {
        self.mixed_preset = false;
        if self.total() >= u32::from(self.portion_size) {
            return false;
        }
        let count = self.counts.get(filling);
        self.counts.set(filling, count.saturating_add(1));
        true
    }

    /// Remove one of `filling`. Returns false when it is already at zero.
    pub fn decrement(&mut self, filling: Filling) -> bool {
        self.mixed_preset = false;
        match self.counts.get(filling) {
            0 => false,
            count => {
                self.counts.set(filling, count - 1);
                true
            }
        }
    }

    /// One of each standard filling, no premium.
    pub fn apply_mixed_preset(&mut self) {
        self.counts = Filling::STANDARD.into_iter().map(|filling| (filling, 1)).collect();
        self.counts.set(Filling::Gurita, 0);
        self.mixed_preset = true;
    }

    pub fn reset(&mut self) {
        self.counts = FillingCounts::default();
        self.mixed_preset = false;
    }

    /// Replace the selection with a stored composition (edit flow).
    pub(crate) fn load(&mut self, counts: &FillingCounts) {
        self.counts = counts.clone();
        self.mixed_preset = false;
    }

    pub fn price(&self, menu: &MenuConfig) -> Decimal {
        self.counts.price(menu)
    }

    pub fn smart_name(&self, item: &str) -> String {
        self.counts.smart_name(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn counts(entries: &[(Filling, u8)]) -> FillingCounts {
        entries.iter().copied().collect()
    }

    #[rstest]
    #[case(&[], "Plain Takoyaki")]
    #[case(&[(Filling::Gurita, 5)], "Full Gurita Takoyaki")]
    #[case(&[(Filling::Gurita, 2)], "Full Gurita Takoyaki")]
    #[case(
        &[(Filling::Sosis, 1), (Filling::Cumi, 1), (Filling::Kepiting, 1), (Filling::Keju, 1), (Filling::Kornet, 1)],
        "Mixed Takoyaki"
    )]
    #[case(
        &[(Filling::Sosis, 1), (Filling::Cumi, 1), (Filling::Kepiting, 1), (Filling::Keju, 1)],
        "Mixed Takoyaki without Kornet"
    )]
    #[case(
        &[(Filling::Sosis, 2), (Filling::Keju, 2), (Filling::Kornet, 1)],
        "Mixed Takoyaki without Cumi, Kepiting"
    )]
    #[case(&[(Filling::Sosis, 1), (Filling::Keju, 1)], "Takoyaki with Sosis, Keju")]
    #[case(&[(Filling::Cumi, 5)], "Takoyaki with Cumi")]
    #[case(
        &[(Filling::Gurita, 1), (Filling::Sosis, 1), (Filling::Cumi, 1), (Filling::Keju, 1)],
        "Takoyaki with Sosis, Cumi, Keju, Gurita"
    )]
    fn smart_name_rules(#[case] entries: &[(Filling, u8)], #[case] expected: &str) {
        assert_eq!(counts(entries).smart_name("Takoyaki"), expected);
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[(Filling::Gurita, 5)], 20)]
    #[case(&[(Filling::Gurita, 4)], 15)]
    #[case(&[(Filling::Gurita, 4), (Filling::Keju, 1)], 15)]
    #[case(&[(Filling::Sosis, 1)], 15)]
    #[case(&[(Filling::Sosis, 5)], 15)]
    fn price_rules(#[case] entries: &[(Filling, u8)], #[case] expected: i64) {
        let menu = MenuConfig::default();
        assert_eq!(counts(entries).price(&menu), Decimal::from(expected));
    }

    #[test]
    fn increment_stops_at_portion_size() {
        let mut selector = FillingSelector::new(5);
        for _ in 0..5 {
            assert!(selector.increment(Filling::Keju));
        }
        assert!(!selector.increment(Filling::Sosis));
        assert_eq!(selector.total(), 5);
        assert_eq!(selector.remaining(), 0);
    }

    #[test]
    fn decrement_never_goes_negative() {
        let mut selector = FillingSelector::new(5);
        assert!(!selector.decrement(Filling::Cumi));
        assert_eq!(selector.counts().get(Filling::Cumi), 0);
    }

    #[test]
    fn random_walk_keeps_total_in_bounds() {
        let mut selector = FillingSelector::new(5);
        let mut seed: u32 = 17;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let filling = Filling::ALL[(seed >> 8) as usize % Filling::ALL.len()];
            if (seed >> 4) % 3 == 0 {
                selector.decrement(filling);
            } else {
                selector.increment(filling);
            }
            assert!(selector.total() <= 5);
        }
    }

    #[test]
    fn mixed_preset_sets_standard_fillings() {
        let mut selector = FillingSelector::new(5);
        selector.increment(Filling::Gurita);
        selector.apply_mixed_preset();

        assert!(selector.is_mixed_preset());
        assert_eq!(selector.counts().get(Filling::Gurita), 0);
        assert_eq!(selector.total(), 5);
        assert_eq!(selector.smart_name("Takoyaki"), "Mixed Takoyaki");

        selector.decrement(Filling::Kornet);
        assert!(!selector.is_mixed_preset());
        assert_eq!(selector.smart_name("Takoyaki"), "Mixed Takoyaki without Kornet");
    }

    #[test]
    fn manual_change_exits_preset_even_when_rejected() {
        let mut selector = FillingSelector::new(5);
        selector.apply_mixed_preset();
        assert!(!selector.increment(Filling::Gurita));
        assert!(!selector.is_mixed_preset());
    }

    #[test]
    fn reset_clears_everything() {
        let mut selector = FillingSelector::new(5);
        selector.apply_mixed_preset();
        selector.reset();
        assert_eq!(selector.total(), 0);
        assert!(!selector.is_mixed_preset());
        assert_eq!(selector.smart_name("Takoyaki"), "Plain Takoyaki");
    }

    #[test]
    fn detail_string_lists_counts() {
        let detail = counts(&[(Filling::Keju, 3), (Filling::Sosis, 2)]).detail_string();
        assert_eq!(detail, "Sosis(2), Keju(3)");
    }
}

/*
[INPUT]:  Menu names, prices and queue policy (usually from the station YAML file)
[OUTPUT]: Validated engine configuration
[POS]:    Configuration layer - engine settings
[UPDATE]: When adding new pricing or queue policy options
*/

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::types::{GroupOrder, QueueNumber, RemovalMode};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

/// Menu names and prices
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuConfig {
    /// Name of the customizable food item
    #[serde(default = "default_item_name")]
    pub item_name: String,
    #[serde(default = "default_drink_name")]
    pub drink_name: String,
    /// Flat price of one portion
    #[serde(default = "default_food_price")]
    pub food_price: Decimal,
    /// Price of a full portion of the premium filling only
    #[serde(default = "default_premium_price")]
    pub premium_price: Decimal,
    #[serde(default = "default_drink_price")]
    pub drink_price: Decimal,
    /// Maximum fillings per portion
    #[serde(default = "default_portion_size")]
    pub portion_size: u8,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            item_name: default_item_name(),
            drink_name: default_drink_name(),
            food_price: default_food_price(),
            premium_price: default_premium_price(),
            drink_price: default_drink_price(),
            portion_size: default_portion_size(),
        }
    }
}

impl MenuConfig {
    pub fn drink_label(&self, quantity: u32) -> String {
        format!("{} ({}x)", self.drink_name, quantity)
    }
}

/// Queue numbering, display and removal policy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QueueConfig {
    #[serde(default = "default_first_queue_number")]
    pub first_queue_number: u32,
    #[serde(default)]
    pub group_order: GroupOrder,
    #[serde(default)]
    pub removal: RemovalMode,
    /// Ticks before a countdown removal deletes the order
    #[serde(default = "default_countdown_ticks")]
    pub countdown_ticks: u8,
    #[serde(default = "default_notice_display_ms")]
    pub notice_display_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            first_queue_number: default_first_queue_number(),
            group_order: GroupOrder::default(),
            removal: RemovalMode::default(),
            countdown_ticks: default_countdown_ticks(),
            notice_display_ms: default_notice_display_ms(),
        }
    }
}

impl QueueConfig {
    pub fn first_queue_number(&self) -> QueueNumber {
        QueueNumber::new(self.first_queue_number)
    }

    pub fn notice_display(&self) -> Duration {
        Duration::from_millis(self.notice_display_ms)
    }
}

fn default_item_name() -> String {
    "Takoyaki".to_string()
}

fn default_drink_name() -> String {
    "Mineral Water".to_string()
}

fn default_food_price() -> Decimal {
    Decimal::from(15)
}

fn default_premium_price() -> Decimal {
    Decimal::from(20)
}

fn default_drink_price() -> Decimal {
    Decimal::from(5)
}

fn default_portion_size() -> u8 {
    5
}

fn default_first_queue_number() -> u32 {
    1
}

fn default_countdown_ticks() -> u8 {
    3
}

fn default_notice_display_ms() -> u64 {
    2000
}

impl EngineConfig {
    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.menu.portion_size == 0 {
            return Err(EngineError::Config("portion_size must be positive".to_string()));
        }
        if self.menu.item_name.trim().is_empty() {
            return Err(EngineError::Config("item_name cannot be empty".to_string()));
        }
        if self.menu.food_price.is_sign_negative()
            || self.menu.premium_price.is_sign_negative()
            || self.menu.drink_price.is_sign_negative()
        {
            return Err(EngineError::Config("prices cannot be negative".to_string()));
        }
        if self.queue.first_queue_number == 0 {
            return Err(EngineError::Config(
                "first_queue_number must be positive".to_string(),
            ));
        }
        if self.queue.removal == RemovalMode::Countdown && self.queue.countdown_ticks == 0 {
            return Err(EngineError::Config(
                "countdown_ticks must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stall_menu() {
        let config = EngineConfig::default();
        assert_eq!(config.menu.food_price, Decimal::from(15));
        assert_eq!(config.menu.premium_price, Decimal::from(20));
        assert_eq!(config.menu.drink_price, Decimal::from(5));
        assert_eq!(config.menu.portion_size, 5);
        assert_eq!(config.queue.countdown_ticks, 3);
        assert_eq!(config.queue.notice_display(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_countdown() {
        let mut config = EngineConfig::default();
        config.queue.removal = RemovalMode::Countdown;
        config.queue.countdown_ticks = 0;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }
}

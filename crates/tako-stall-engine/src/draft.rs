/*
[INPUT]:  Compositions from the compose form, line edit/duplicate/remove requests
[OUTPUT]: Ordered draft lines plus the explicit draft mode
[POS]:    Staging layer - lines not yet committed to the queue
[UPDATE]: When cart merge rules or draft modes change
*/

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MenuConfig;
use crate::error::{EngineError, Result};
use crate::filling::FillingCounts;
use crate::sauce::SauceSelection;
use crate::types::{LineId, LineItem, QueueNumber};

/// The queued order a draft will replace on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTarget {
    pub queue_number: QueueNumber,
    pub customer_name: String,
}

/// What the next add/commit does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DraftMode {
    #[default]
    Normal,
    /// A draft line is loaded into the compose form; the next add replaces it.
    EditingLine {
        line_id: LineId,
        order: Option<OrderTarget>,
    },
    /// The cart holds the pulled-back lines of a queued order.
    EditingOrder(OrderTarget),
}

impl DraftMode {
    pub fn order_target(&self) -> Option<&OrderTarget> {
        match self {
            DraftMode::Normal => None,
            DraftMode::EditingLine { order, .. } => order.as_ref(),
            DraftMode::EditingOrder(target) => Some(target),
        }
    }

    pub fn editing_line(&self) -> Option<LineId> {
        match self {
            DraftMode::EditingLine { line_id, .. } => Some(*line_id),
            _ => None,
        }
    }

    fn with_line(self, line_id: LineId) -> Self {
        DraftMode::EditingLine {
            line_id,
            order: self.into_order_target(),
        }
    }

    fn without_line(self) -> Self {
        match self.into_order_target() {
            Some(target) => DraftMode::EditingOrder(target),
            None => DraftMode::Normal,
        }
    }

    fn into_order_target(self) -> Option<OrderTarget> {
        match self {
            DraftMode::Normal => None,
            DraftMode::EditingLine { order, .. } => order,
            DraftMode::EditingOrder(target) => Some(target),
        }
    }
}

/// Staging list of composed lines.
#[derive(Debug, Clone, Default)]
pub struct DraftCart {
    lines: Vec<LineItem>,
    mode: DraftMode,
}

impl DraftCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, line_id: LineId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.id == line_id)
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|line| line.price).sum()
    }

    fn position(&self, line_id: LineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == line_id)
    }

    fn drink_position(&self) -> Option<usize> {
        self.lines.iter().position(LineItem::is_drink)
    }

    /// Append a food line, or overwrite the line under edit keeping its id.
    pub fn add_food_line(
        &mut self,
        menu: &MenuConfig,
        fillings: &FillingCounts,
        sauces: &SauceSelection,
        garnish: bool,
    ) -> Result<LineId> {
        if fillings.is_empty() {
            return Err(EngineError::NothingToAdd);
        }

        let line = LineItem::food(menu, fillings, sauces, garnish);
        if let Some(edit_id) = self.mode.editing_line() {
            self.finish_line_edit();
            if let Some(index) = self.position(edit_id) {
                self.lines[index] = LineItem { id: edit_id, ..line };
                return Ok(edit_id);
            }
        }

        let id = line.id;
        self.lines.push(line);
        Ok(id)
    }

    /// Add drink units, merging into the single drink line when one exists.
    pub fn add_or_increment_drink(&mut self, menu: &MenuConfig, quantity: u32) -> Result<LineId> {
        if quantity == 0 {
            return Err(EngineError::NothingToAdd);
        }

        if let Some(edit_id) = self.mode.editing_line() {
            self.finish_line_edit();
            if let Some(index) = self.position(edit_id) {
                let other_drink = self
                    .lines
                    .iter()
                    .position(|line| line.is_drink() && line.id != edit_id);
                match other_drink {
                    Some(drink_index) => {
                        // the edited line folds into the existing drink line
                        self.lines[drink_index].add_drink_units(menu, quantity);
                        let drink_id = self.lines[drink_index].id;
                        self.lines.remove(index);
                        return Ok(drink_id);
                    }
                    None => {
                        self.lines[index] = LineItem {
                            id: edit_id,
                            ..LineItem::drink(menu, quantity)
                        };
                        return Ok(edit_id);
                    }
                }
            }
        }

        if let Some(index) = self.drink_position() {
            self.lines[index].add_drink_units(menu, quantity);
            return Ok(self.lines[index].id);
        }

        let line = LineItem::drink(menu, quantity);
        let id = line.id;
        self.lines.push(line);
        Ok(id)
    }

    /// Copy a line under a new id; drinks merge into the drink line instead.
    pub fn duplicate(&mut self, menu: &MenuConfig, line_id: LineId) -> Result<LineId> {
        let original = self
            .get(line_id)
            .cloned()
            .ok_or(EngineError::UnknownLine(line_id))?;

        if original.is_drink() {
            let index = self.drink_position().ok_or(EngineError::UnknownLine(line_id))?;
            self.lines[index].add_drink_units(menu, original.quantity);
            return Ok(self.lines[index].id);
        }

        let copy = original.duplicate();
        let id = copy.id;
        self.lines.push(copy);
        Ok(id)
    }

    pub fn remove(&mut self, line_id: LineId) -> Result<LineItem> {
        let index = self
            .position(line_id)
            .ok_or(EngineError::UnknownLine(line_id))?;
        let removed = self.lines.remove(index);

        if self.mode.editing_line() == Some(line_id) {
            self.finish_line_edit();
        }
        if self.lines.is_empty() {
            if let Some(target) = self.mode.order_target() {
                tracing::warn!(
                    queue_number = %target.queue_number,
                    "draft emptied during order edit; original lines are not restored"
                );
                self.mode = DraftMode::Normal;
            }
        }
        Ok(removed)
    }

    /// Mark a line as being edited; the caller copies its composition into the form.
    pub fn load_for_edit(&mut self, line_id: LineId) -> Result<&LineItem> {
        let index = self
            .position(line_id)
            .ok_or(EngineError::UnknownLine(line_id))?;
        self.mode = std::mem::take(&mut self.mode).with_line(line_id);
        Ok(&self.lines[index])
    }

    /// Drop the line edit context, leaving any order edit in place.
    pub fn finish_line_edit(&mut self) {
        self.mode = std::mem::take(&mut self.mode).without_line();
    }

    /// Stage the pulled-back lines of a queued order for full replacement.
    pub fn begin_order_edit(&mut self, target: OrderTarget, lines: Vec<LineItem>) -> Result<()> {
        if let Some(active) = self.mode.order_target() {
            return Err(EngineError::OrderEditActive {
                active: active.queue_number,
            });
        }

        self.lines.extend(lines);
        self.mode = match std::mem::take(&mut self.mode) {
            DraftMode::EditingLine { line_id, .. } => DraftMode::EditingLine {
                line_id,
                order: Some(target),
            },
            _ => DraftMode::EditingOrder(target),
        };
        Ok(())
    }

    /// Hand every line over for commit and return to normal mode.
    pub(crate) fn drain(&mut self) -> (Vec<LineItem>, DraftMode) {
        let lines = std::mem::take(&mut self.lines);
        let mode = std::mem::take(&mut self.mode);
        (lines, mode)
    }
}

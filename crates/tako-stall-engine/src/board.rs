/*
[INPUT]:  Operator commands from the station or a renderer
[OUTPUT]: Engine state transitions, notices and a serializable read-out
[POS]:    Facade layer - single owner of form, draft, queue and removal gate
[UPDATE]: When operator commands or read-outs change
*/

use std::time::Instant;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::draft::{DraftCart, DraftMode, OrderTarget};
use crate::error::{EngineError, Result};
use crate::form::{ComposeForm, FormSnapshot};
use crate::lifecycle::{AbortReason, RemovalGate, RemovalRequest, TickOutcome};
use crate::notice::{Notice, NoticeBoard};
use crate::queue::{default_customer_name, CommitReceipt, OrderQueue};
use crate::sauce::SauceSummary;
use crate::types::{
    CookingStatus, Filling, LineId, LineItem, OrderGroup, PaymentStatus, QueueNumber, Sauce,
    Severity,
};

/// Source of notice timestamps. Must be the clock notices are later read with.
pub type Clock = fn() -> Instant;

/// The whole order lifecycle for one stall.
///
/// Every operation runs to completion; callers that share a board across
/// tasks serialize access (see the station crate).
#[derive(Debug)]
pub struct OrderBoard {
    config: EngineConfig,
    form: ComposeForm,
    customer_name: String,
    draft: DraftCart,
    queue: OrderQueue,
    removals: RemovalGate,
    notices: NoticeBoard,
    clock: Clock,
}

impl OrderBoard {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, Instant::now)
    }

    /// Board whose notices are stamped by `clock` instead of the wall clock.
    pub fn with_clock(config: EngineConfig, clock: Clock) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            form: ComposeForm::new(config.menu.portion_size),
            customer_name: String::new(),
            draft: DraftCart::new(),
            queue: OrderQueue::new(config.queue.first_queue_number()),
            removals: RemovalGate::new(config.queue.removal, config.queue.countdown_ticks),
            notices: NoticeBoard::new(config.queue.notice_display()),
            clock,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn form(&self) -> &ComposeForm {
        &self.form
    }

    pub fn draft(&self) -> &DraftCart {
        &self.draft
    }

    pub fn queue(&self) -> &OrderQueue {
        &self.queue
    }

    pub fn removals(&self) -> &RemovalGate {
        &self.removals
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let now = (self.clock)();
        self.notices.raise_at(severity, message, now);
    }

    /// Surface a rejection to the operator when it is one they can act on.
    fn reject<T>(&mut self, err: EngineError) -> Result<T> {
        if err.is_user_facing() {
            let message = match &err {
                EngineError::NothingToAdd => "Choose a filling or a drink first".to_string(),
                EngineError::EmptyDraft => "The cart is empty".to_string(),
                EngineError::LineEditInProgress { .. } => {
                    "Finish updating the cart item first".to_string()
                }
                EngineError::Unpaid(queue_number) => {
                    format!("Order #{queue_number} is not fully paid yet")
                }
                EngineError::OrderEditActive { active } => {
                    format!("Save order #{active} before editing another one")
                }
                other => other.to_string(),
            };
            self.notify(Severity::Warning, message);
        }
        tracing::warn!(error = %err, "operation rejected");
        Err(err)
    }

    // ---- compose form ----

    pub fn increment_filling(&mut self, filling: Filling) -> bool {
        let changed = self.form.fillings_mut().increment(filling);
        tracing::debug!(filling = %filling, changed, "filling incremented");
        changed
    }

    pub fn decrement_filling(&mut self, filling: Filling) -> bool {
        let changed = self.form.fillings_mut().decrement(filling);
        tracing::debug!(filling = %filling, changed, "filling decremented");
        changed
    }

    pub fn apply_mixed_preset(&mut self) {
        self.form.fillings_mut().apply_mixed_preset();
    }

    pub fn toggle_sauce(&mut self, sauce: Sauce) {
        self.form.sauces_mut().toggle_sauce(sauce);
    }

    pub fn toggle_separate(&mut self, sauce: Sauce) -> bool {
        self.form.sauces_mut().toggle_separate(sauce)
    }

    pub fn toggle_all_sauces(&mut self) {
        self.form.sauces_mut().toggle_all();
    }

    pub fn toggle_garnish(&mut self) -> bool {
        self.form.toggle_garnish()
    }

    pub fn increment_drink(&mut self) -> u32 {
        self.form.increment_drink()
    }

    pub fn decrement_drink(&mut self) -> bool {
        self.form.decrement_drink()
    }

    /// Clear the form and drop any line edit. The customer name is kept.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.draft.finish_line_edit();
    }

    /// Set the name field. Returns false while it is locked by an order edit.
    pub fn set_customer_name(&mut self, name: impl Into<String>) -> bool {
        if self.draft.mode().order_target().is_some() {
            return false;
        }
        self.customer_name = name.into();
        true
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    // ---- draft cart ----

    /// Turn the form into draft lines.
    ///
    /// While a line is loaded for edit the form replaces that line. Otherwise
    /// the drink quantity is added first, then the food composition.
    pub fn add_to_cart(&mut self) -> Result<Vec<LineId>> {
        let menu = &self.config.menu;

        if let Some(edit_id) = self.draft.mode().editing_line() {
            let updated = if self.form.drink_quantity() > 0 {
                self.draft
                    .add_or_increment_drink(menu, self.form.drink_quantity())
            } else {
                self.draft.add_food_line(
                    menu,
                    self.form.fillings().counts(),
                    self.form.sauces(),
                    self.form.garnish(),
                )
            };
            let id = match updated {
                Ok(id) => id,
                Err(err) => return self.reject(err),
            };
            self.form.reset();
            tracing::debug!(line_id = %edit_id, "draft line updated");
            self.notify(Severity::Success, "Cart item updated");
            return Ok(vec![id]);
        }

        let mut added = Vec::with_capacity(2);
        if self.form.drink_quantity() > 0 {
            added.push(
                self.draft
                    .add_or_increment_drink(menu, self.form.drink_quantity())?,
            );
        }
        if !self.form.fillings().counts().is_empty() {
            added.push(self.draft.add_food_line(
                menu,
                self.form.fillings().counts(),
                self.form.sauces(),
                self.form.garnish(),
            )?);
        }
        if added.is_empty() {
            return self.reject(EngineError::NothingToAdd);
        }

        self.form.reset();
        tracing::debug!(lines = added.len(), draft = self.draft.len(), "added to cart");
        self.notify(Severity::Success, "Added to cart");
        Ok(added)
    }

    pub fn duplicate_line(&mut self, line_id: LineId) -> Result<LineId> {
        self.draft.duplicate(&self.config.menu, line_id)
    }

    pub fn remove_line(&mut self, line_id: LineId) -> Result<LineItem> {
        let was_edited = self.draft.mode().editing_line() == Some(line_id);
        let removed = self.draft.remove(line_id)?;
        if was_edited {
            self.form.reset();
        }
        Ok(removed)
    }

    /// Copy a draft line into the form; the next add replaces it.
    pub fn load_line_for_edit(&mut self, line_id: LineId) -> Result<()> {
        let line = self.draft.load_for_edit(line_id)?.clone();
        self.form.load_line(&line);
        self.notify(
            Severity::Info,
            format!("Editing {}. Press update when done", line.name),
        );
        Ok(())
    }

    // ---- commit ----

    pub fn commit(&mut self) -> Result<CommitReceipt> {
        self.commit_at(Local::now())
    }

    pub fn commit_at(&mut self, now: DateTime<Local>) -> Result<CommitReceipt> {
        let receipt = match self.queue.commit(&mut self.draft, &self.customer_name, now) {
            Ok(receipt) => receipt,
            Err(err) => return self.reject(err),
        };
        if !receipt.replaced {
            self.customer_name.clear();
        }
        let message = if receipt.replaced {
            format!("Order #{} updated", receipt.queue_number)
        } else {
            format!("Order #{} sent to the kitchen", receipt.queue_number)
        };
        self.notify(Severity::Success, message);
        Ok(receipt)
    }

    // ---- lifecycle ----

    pub fn toggle_cooking(&mut self, line_id: LineId) -> Result<CookingStatus> {
        let status = self.queue.toggle_cooking(line_id)?;
        tracing::debug!(line_id = %line_id, status = ?status, "cooking toggled");
        Ok(status)
    }

    pub fn toggle_payment(&mut self, queue_number: QueueNumber) -> Result<PaymentStatus> {
        let status = self.queue.toggle_group_payment(queue_number)?;
        match status {
            PaymentStatus::Paid => {
                self.notify(Severity::Success, format!("Order #{queue_number} paid"))
            }
            PaymentStatus::Unpaid => self.notify(
                Severity::Info,
                format!("Payment for order #{queue_number} cancelled"),
            ),
        }
        Ok(status)
    }

    pub fn request_removal(&mut self, queue_number: QueueNumber) -> Result<RemovalRequest> {
        match self.removals.request(&self.queue, queue_number) {
            Ok(request) => Ok(request),
            Err(err) => self.reject(err),
        }
    }

    pub fn confirm_removal(&mut self) -> Result<QueueNumber> {
        let (queue_number, _) = match self.removals.confirm(&mut self.queue) {
            Ok(removed) => removed,
            Err(err) => return self.reject(err),
        };
        self.notify(Severity::Success, format!("Order #{queue_number} served"));
        Ok(queue_number)
    }

    pub fn cancel_removal(&mut self, queue_number: QueueNumber) -> bool {
        self.removals.cancel(queue_number)
    }

    /// Advance every countdown by one tick.
    pub fn tick(&mut self) -> Vec<TickOutcome> {
        let outcomes = self.removals.tick(&mut self.queue);
        for outcome in &outcomes {
            self.announce(outcome);
        }
        outcomes
    }

    /// Advance one group's countdown, if `generation` is still the live one.
    pub fn countdown_tick(&mut self, queue_number: QueueNumber, generation: u64) -> TickOutcome {
        let outcome = self
            .removals
            .tick_one(&mut self.queue, queue_number, generation);
        self.announce(&outcome);
        outcome
    }

    fn announce(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Removed { queue_number, .. } => {
                self.notify(Severity::Success, format!("Order #{queue_number} served"))
            }
            TickOutcome::Aborted {
                queue_number,
                reason: AbortReason::Unpaid,
            } => self.notify(
                Severity::Warning,
                format!("Order #{queue_number} is not fully paid yet"),
            ),
            _ => {}
        }
    }

    // ---- edit existing order ----

    /// Pull every line of a queued order back into the draft for full replacement.
    ///
    /// The originals leave the queue immediately; abandoning the edit loses them.
    pub fn edit_whole_group(&mut self, queue_number: QueueNumber) -> Result<usize> {
        if let Some(active) = self.draft.mode().order_target() {
            let active = active.queue_number;
            return self.reject(EngineError::OrderEditActive { active });
        }
        let group = self
            .queue
            .group(queue_number)
            .ok_or(EngineError::UnknownQueueNumber(queue_number))?;

        let lines: Vec<LineItem> = group
            .lines
            .iter()
            .map(|committed| committed.line.duplicate())
            .collect();
        let count = lines.len();
        let target = OrderTarget {
            queue_number,
            customer_name: group.customer_name.clone(),
        };
        self.draft.begin_order_edit(target, lines)?;
        self.removals.cancel(queue_number);
        self.queue.remove_group(queue_number);

        tracing::info!(queue_number = %queue_number, lines = count, "order pulled back for edit");
        self.notify(
            Severity::Info,
            format!("Order #{queue_number} moved to the cart for editing"),
        );
        Ok(count)
    }

    // ---- read-outs ----

    pub fn groups(&self) -> Vec<OrderGroup> {
        self.queue.groups(self.config.queue.group_order)
    }

    pub fn next_queue_number(&self) -> QueueNumber {
        self.queue.next_queue_number()
    }

    pub fn edit_target(&self) -> Option<&OrderTarget> {
        self.draft.mode().order_target()
    }

    pub fn is_editing_order(&self) -> bool {
        self.edit_target().is_some()
    }

    /// Number the next commit will carry.
    pub fn target_queue_number(&self) -> QueueNumber {
        self.edit_target()
            .map(|target| target.queue_number)
            .unwrap_or_else(|| self.next_queue_number())
    }

    /// Name the next commit will carry, before title-casing.
    pub fn display_name(&self) -> String {
        if let Some(target) = self.edit_target() {
            return target.customer_name.clone();
        }
        if self.customer_name.trim().is_empty() {
            default_customer_name(self.next_queue_number())
        } else {
            self.customer_name.clone()
        }
    }

    pub fn commit_label(&self) -> String {
        match self.edit_target() {
            Some(target) => format!("Save changes #{}", target.queue_number),
            None => format!("Send order #{}", self.next_queue_number()),
        }
    }

    pub fn countdown_remaining(&self, queue_number: QueueNumber) -> Option<u8> {
        self.removals.countdown_remaining(queue_number)
    }

    pub fn pending_confirmation(&self) -> Option<QueueNumber> {
        self.removals.pending_confirmation()
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notices.take()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }

    pub fn expire_notices(&mut self, now: Instant) -> bool {
        self.notices.expire(now)
    }

    pub fn snapshot(&self, now: Instant) -> BoardSnapshot {
        BoardSnapshot {
            form: self.form.snapshot(&self.config.menu),
            sauce_summary: self.form.sauces().summary(),
            customer_name: self.customer_name.clone(),
            display_name: self.display_name(),
            name_locked: self.is_editing_order(),
            draft: self.draft.lines().to_vec(),
            draft_mode: self.draft.mode().clone(),
            draft_total: self.draft.total(),
            commit_label: self.commit_label(),
            next_queue_number: self.next_queue_number(),
            target_queue_number: self.target_queue_number(),
            groups: self.groups(),
            pending_confirmation: self.pending_confirmation(),
            countdowns: self.removals.active_countdowns(),
            notice: self.notice(now).cloned(),
        }
    }
}

/// Everything a renderer draws, in one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub form: FormSnapshot,
    pub sauce_summary: SauceSummary,
    pub customer_name: String,
    pub display_name: String,
    pub name_locked: bool,
    pub draft: Vec<LineItem>,
    pub draft_mode: DraftMode,
    pub draft_total: Decimal,
    pub commit_label: String,
    pub next_queue_number: QueueNumber,
    pub target_queue_number: QueueNumber,
    pub groups: Vec<OrderGroup>,
    pub pending_confirmation: Option<QueueNumber>,
    pub countdowns: Vec<(QueueNumber, u8)>,
    pub notice: Option<Notice>,
}

impl BoardSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

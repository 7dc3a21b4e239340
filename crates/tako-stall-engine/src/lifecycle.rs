/*
[INPUT]:  Cooking/payment toggles, removal requests, countdown ticks, cancellations
[OUTPUT]: Per-line cooking status, per-group payment status, gated group removal
[POS]:    Lifecycle layer - order state machine after commit
[UPDATE]: When status transitions or removal gating change
*/

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;

use crate::error::{EngineError, Result};
use crate::queue::OrderQueue;
use crate::types::{CookingStatus, LineId, PaymentStatus, QueueNumber, RemovalMode};

impl OrderQueue {
    /// Flip a line between pending and done. No ordering constraints apply.
    pub fn toggle_cooking(&mut self, line_id: LineId) -> Result<CookingStatus> {
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.line.id == line_id)
            .ok_or(EngineError::UnknownLine(line_id))?;
        line.cooking = line.cooking.toggled();
        Ok(line.cooking)
    }

    /// Returns whether every line of the group is paid.
    pub fn is_group_paid(&self, queue_number: QueueNumber) -> Result<bool> {
        let mut lines = self
            .lines
            .iter()
            .filter(|line| line.queue_number == queue_number)
            .peekable();
        if lines.peek().is_none() {
            return Err(EngineError::UnknownQueueNumber(queue_number));
        }
        Ok(lines.all(|line| line.is_paid()))
    }

    /// Mark every line paid, or revert all to unpaid when the group is already paid.
    pub fn toggle_group_payment(&mut self, queue_number: QueueNumber) -> Result<PaymentStatus> {
        let next = if self.is_group_paid(queue_number)? {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::Paid
        };
        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.queue_number == queue_number)
        {
            line.payment = next;
        }
        tracing::info!(queue_number = %queue_number, status = ?next, "group payment toggled");
        Ok(next)
    }
}

/// Handle to an in-flight countdown removal. Cancelling it stops the countdown.
#[derive(Debug, Clone)]
pub struct RemovalHandle {
    queue_number: QueueNumber,
    generation: u64,
    token: CancellationToken,
}

impl RemovalHandle {
    pub fn queue_number(&self) -> QueueNumber {
        self.queue_number
    }

    /// Identifies this countdown among every countdown ever started for the group.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Accepted removal request.
#[derive(Debug, Clone)]
pub enum RemovalRequest {
    /// Held until [`RemovalGate::confirm`] or [`RemovalGate::cancel`]
    AwaitingConfirmation(QueueNumber),
    CountdownStarted(RemovalHandle),
    /// A countdown for this group is already running; nothing new was started
    AlreadyCounting {
        queue_number: QueueNumber,
        remaining: u8,
    },
}

/// Why a countdown ended without deleting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The group left the queue before the countdown finished
    GroupGone,
    /// A line was marked unpaid while counting down
    Unpaid,
}

/// Result of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Counting {
        queue_number: QueueNumber,
        remaining: u8,
    },
    Removed {
        queue_number: QueueNumber,
        lines: usize,
    },
    Aborted {
        queue_number: QueueNumber,
        reason: AbortReason,
    },
    /// No live countdown for that group (cancelled, finished or never started)
    Ignored,
}

#[derive(Debug)]
struct Countdown {
    remaining: u8,
    generation: u64,
    token: CancellationToken,
}

/// Gate between "served" and deletion. A group only leaves the queue once
/// all of its lines are paid, either after confirmation or after a countdown.
#[derive(Debug)]
pub struct RemovalGate {
    mode: RemovalMode,
    countdown_ticks: u8,
    pending_confirmation: Option<QueueNumber>,
    countdowns: BTreeMap<QueueNumber, Countdown>,
    next_generation: u64,
}

impl RemovalGate {
    pub fn new(mode: RemovalMode, countdown_ticks: u8) -> Self {
        Self {
            mode,
            countdown_ticks,
            pending_confirmation: None,
            countdowns: BTreeMap::new(),
            next_generation: 0,
        }
    }

    pub fn mode(&self) -> RemovalMode {
        self.mode
    }

    pub fn pending_confirmation(&self) -> Option<QueueNumber> {
        self.pending_confirmation
    }

    pub fn countdown_remaining(&self, queue_number: QueueNumber) -> Option<u8> {
        self.countdowns
            .get(&queue_number)
            .map(|countdown| countdown.remaining)
    }

    pub fn active_countdowns(&self) -> Vec<(QueueNumber, u8)> {
        self.countdowns
            .iter()
            .map(|(queue_number, countdown)| (*queue_number, countdown.remaining))
            .collect()
    }

    /// Start removing a group. Refused unless every line is paid.
    pub fn request(&mut self, queue: &OrderQueue, queue_number: QueueNumber) -> Result<RemovalRequest> {
        if let Some(countdown) = self.countdowns.get(&queue_number) {
            return Ok(RemovalRequest::AlreadyCounting {
                queue_number,
                remaining: countdown.remaining,
            });
        }
        if !queue.is_group_paid(queue_number)? {
            tracing::warn!(queue_number = %queue_number, "removal refused: order not fully paid");
            return Err(EngineError::Unpaid(queue_number));
        }

        match self.mode {
            RemovalMode::Confirm => {
                self.pending_confirmation = Some(queue_number);
                Ok(RemovalRequest::AwaitingConfirmation(queue_number))
            }
            RemovalMode::Countdown => {
                let token = CancellationToken::new();
                let generation = self.next_generation;
                self.next_generation += 1;
                self.countdowns.insert(
                    queue_number,
                    Countdown {
                        remaining: self.countdown_ticks,
                        generation,
                        token: token.clone(),
                    },
                );
                tracing::info!(
                    queue_number = %queue_number,
                    generation,
                    ticks = self.countdown_ticks,
                    "removal countdown started"
                );
                Ok(RemovalRequest::CountdownStarted(RemovalHandle {
                    queue_number,
                    generation,
                    token,
                }))
            }
        }
    }

    /// Delete the group awaiting confirmation.
    pub fn confirm(&mut self, queue: &mut OrderQueue) -> Result<(QueueNumber, usize)> {
        let queue_number = self
            .pending_confirmation
            .take()
            .ok_or(EngineError::NoPendingRemoval)?;
        if !queue.is_group_paid(queue_number)? {
            return Err(EngineError::Unpaid(queue_number));
        }
        let removed = queue.remove_group(queue_number).len();
        tracing::info!(queue_number = %queue_number, lines = removed, "order removed");
        Ok((queue_number, removed))
    }

    /// Drop a pending confirmation or stop a countdown for the group.
    /// Returns false when nothing was in flight.
    pub fn cancel(&mut self, queue_number: QueueNumber) -> bool {
        let mut cancelled = false;
        if self.pending_confirmation == Some(queue_number) {
            self.pending_confirmation = None;
            cancelled = true;
        }
        if let Some(countdown) = self.countdowns.remove(&queue_number) {
            countdown.token.cancel();
            cancelled = true;
        }
        if cancelled {
            tracing::info!(queue_number = %queue_number, "removal cancelled");
        }
        cancelled
    }

    /// Advance every live countdown by one tick.
    pub fn tick(&mut self, queue: &mut OrderQueue) -> Vec<TickOutcome> {
        let live: Vec<(QueueNumber, u64)> = self
            .countdowns
            .iter()
            .map(|(queue_number, countdown)| (*queue_number, countdown.generation))
            .collect();
        live.into_iter()
            .map(|(queue_number, generation)| self.tick_one(queue, queue_number, generation))
            .filter(|outcome| *outcome != TickOutcome::Ignored)
            .collect()
    }

    /// Advance the countdown started as `generation` for this group.
    ///
    /// Ticks from an older countdown of the same group are ignored. The token
    /// is checked before any side effect.
    pub fn tick_one(
        &mut self,
        queue: &mut OrderQueue,
        queue_number: QueueNumber,
        generation: u64,
    ) -> TickOutcome {
        let Some(countdown) = self.countdowns.get_mut(&queue_number) else {
            return TickOutcome::Ignored;
        };
        if countdown.generation != generation {
            tracing::debug!(
                queue_number = %queue_number,
                generation,
                live = countdown.generation,
                "tick from a replaced countdown"
            );
            return TickOutcome::Ignored;
        }
        if countdown.token.is_cancelled() {
            self.countdowns.remove(&queue_number);
            return TickOutcome::Ignored;
        }
        if !queue.contains(queue_number) {
            countdown.token.cancel();
            self.countdowns.remove(&queue_number);
            return TickOutcome::Aborted {
                queue_number,
                reason: AbortReason::GroupGone,
            };
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        if countdown.remaining > 0 {
            return TickOutcome::Counting {
                queue_number,
                remaining: countdown.remaining,
            };
        }

        countdown.token.cancel();
        self.countdowns.remove(&queue_number);
        if !matches!(queue.is_group_paid(queue_number), Ok(true)) {
            tracing::warn!(queue_number = %queue_number, "countdown finished on unpaid order");
            return TickOutcome::Aborted {
                queue_number,
                reason: AbortReason::Unpaid,
            };
        }
        let lines = queue.remove_group(queue_number).len();
        tracing::info!(queue_number = %queue_number, lines, "order removed after countdown");
        TickOutcome::Removed {
            queue_number,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::draft::DraftCart;
    use chrono::Local;

    fn queue_with_orders(count: usize) -> OrderQueue {
        let menu = MenuConfig::default();
        let mut queue = OrderQueue::new(QueueNumber::new(1));
        for _ in 0..count {
            let mut cart = DraftCart::new();
            cart.add_or_increment_drink(&menu, 1).expect("add drink");
            let food = crate::filling::FillingCounts::from_iter([(crate::types::Filling::Keju, 1)]);
            cart.add_food_line(&menu, &food, &Default::default(), false)
                .expect("add food");
            queue.commit(&mut cart, "", Local::now()).expect("commit");
        }
        queue
    }

    const FIRST: QueueNumber = QueueNumber::new(1);

    #[test]
    fn cooking_toggles_per_line() {
        let mut queue = queue_with_orders(1);
        let line_id = queue.lines()[0].line.id;
        assert_eq!(queue.toggle_cooking(line_id), Ok(CookingStatus::Done));
        assert_eq!(queue.lines()[1].cooking, CookingStatus::Pending);
        assert_eq!(queue.toggle_cooking(line_id), Ok(CookingStatus::Pending));
    }

    #[test]
    fn payment_toggle_twice_restores_unpaid() {
        let mut queue = queue_with_orders(1);
        assert_eq!(queue.toggle_group_payment(FIRST), Ok(PaymentStatus::Paid));
        assert_eq!(queue.is_group_paid(FIRST), Ok(true));
        assert_eq!(queue.toggle_group_payment(FIRST), Ok(PaymentStatus::Unpaid));
        assert!(queue.lines().iter().all(|line| !line.is_paid()));
    }

    #[test]
    fn partially_paid_group_becomes_fully_paid() {
        let mut queue = queue_with_orders(1);
        queue.lines[0].payment = PaymentStatus::Paid;
        assert_eq!(queue.is_group_paid(FIRST), Ok(false));
        assert_eq!(queue.toggle_group_payment(FIRST), Ok(PaymentStatus::Paid));
        assert!(queue.lines().iter().all(|line| line.is_paid()));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let mut queue = queue_with_orders(1);
        let missing = QueueNumber::new(9);
        assert_eq!(
            queue.toggle_group_payment(missing),
            Err(EngineError::UnknownQueueNumber(missing))
        );
    }

    #[test]
    fn confirm_removal_requires_payment() {
        let mut queue = queue_with_orders(2);
        let mut gate = RemovalGate::new(RemovalMode::Confirm, 3);

        let err = gate.request(&queue, FIRST).expect_err("unpaid");
        assert_eq!(err, EngineError::Unpaid(FIRST));
        assert_eq!(gate.pending_confirmation(), None);

        queue.toggle_group_payment(FIRST).expect("pay");
        assert!(matches!(
            gate.request(&queue, FIRST),
            Ok(RemovalRequest::AwaitingConfirmation(n)) if n == FIRST
        ));
        assert_eq!(gate.confirm(&mut queue), Ok((FIRST, 2)));
        assert!(!queue.contains(FIRST));
        assert_eq!(queue.lines().len(), 2);
        assert_eq!(gate.confirm(&mut queue), Err(EngineError::NoPendingRemoval));
    }

    #[test]
    fn cancelled_confirmation_has_no_side_effect() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Confirm, 3);
        queue.toggle_group_payment(FIRST).expect("pay");
        gate.request(&queue, FIRST).expect("request");

        assert!(gate.cancel(FIRST));
        assert_eq!(gate.confirm(&mut queue), Err(EngineError::NoPendingRemoval));
        assert!(queue.contains(FIRST));
    }

    #[test]
    fn countdown_removes_after_three_ticks() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 3);
        queue.toggle_group_payment(FIRST).expect("pay");

        let handle = match gate.request(&queue, FIRST).expect("request") {
            RemovalRequest::CountdownStarted(handle) => handle,
            other => panic!("unexpected request outcome: {other:?}"),
        };
        assert_eq!(gate.countdown_remaining(FIRST), Some(3));

        assert_eq!(
            gate.tick(&mut queue),
            vec![TickOutcome::Counting { queue_number: FIRST, remaining: 2 }]
        );
        gate.tick(&mut queue);
        assert!(queue.contains(FIRST));
        assert_eq!(
            gate.tick(&mut queue),
            vec![TickOutcome::Removed { queue_number: FIRST, lines: 2 }]
        );
        assert!(queue.is_empty());
        assert!(handle.is_cancelled());
        assert!(gate.tick(&mut queue).is_empty());
    }

    #[test]
    fn second_trigger_does_not_restart_countdown() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 3);
        queue.toggle_group_payment(FIRST).expect("pay");

        gate.request(&queue, FIRST).expect("first request");
        gate.tick(&mut queue);
        assert!(matches!(
            gate.request(&queue, FIRST),
            Ok(RemovalRequest::AlreadyCounting { remaining: 2, .. })
        ));
        assert_eq!(gate.active_countdowns(), vec![(FIRST, 2)]);
    }

    #[test]
    fn cancelled_handle_prevents_deletion() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 2);
        queue.toggle_group_payment(FIRST).expect("pay");

        let RemovalRequest::CountdownStarted(handle) = gate.request(&queue, FIRST).expect("request")
        else {
            panic!("countdown expected");
        };
        gate.tick(&mut queue);
        handle.cancel();

        assert_eq!(
            gate.tick_one(&mut queue, FIRST, handle.generation()),
            TickOutcome::Ignored
        );
        assert!(queue.contains(FIRST));
        assert_eq!(gate.countdown_remaining(FIRST), None);
    }

    #[test]
    fn tick_from_replaced_countdown_is_ignored() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 3);
        queue.toggle_group_payment(FIRST).expect("pay");

        let RemovalRequest::CountdownStarted(first) = gate.request(&queue, FIRST).expect("request")
        else {
            panic!("countdown expected");
        };
        assert!(gate.cancel(FIRST));
        let RemovalRequest::CountdownStarted(second) =
            gate.request(&queue, FIRST).expect("re-request")
        else {
            panic!("countdown expected");
        };
        assert_ne!(first.generation(), second.generation());

        // a tick the first ticker sent before it saw the cancellation
        assert_eq!(
            gate.tick_one(&mut queue, FIRST, first.generation()),
            TickOutcome::Ignored
        );
        assert_eq!(gate.countdown_remaining(FIRST), Some(3));
        assert!(!second.is_cancelled());

        assert_eq!(
            gate.tick_one(&mut queue, FIRST, second.generation()),
            TickOutcome::Counting { queue_number: FIRST, remaining: 2 }
        );
    }

    #[test]
    fn manual_deletion_between_ticks_aborts() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 3);
        queue.toggle_group_payment(FIRST).expect("pay");
        gate.request(&queue, FIRST).expect("request");

        queue.remove_group(FIRST);
        assert_eq!(
            gate.tick(&mut queue),
            vec![TickOutcome::Aborted {
                queue_number: FIRST,
                reason: AbortReason::GroupGone
            }]
        );
    }

    #[test]
    fn unpaid_at_zero_aborts() {
        let mut queue = queue_with_orders(1);
        let mut gate = RemovalGate::new(RemovalMode::Countdown, 1);
        queue.toggle_group_payment(FIRST).expect("pay");
        gate.request(&queue, FIRST).expect("request");
        queue.toggle_group_payment(FIRST).expect("unpay");

        assert_eq!(
            gate.tick(&mut queue),
            vec![TickOutcome::Aborted {
                queue_number: FIRST,
                reason: AbortReason::Unpaid
            }]
        );
        assert!(queue.contains(FIRST));
    }
}

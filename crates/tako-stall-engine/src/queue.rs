/*
[INPUT]:  Draft cart contents, customer name field, commit timestamp
[OUTPUT]: Stamped queue lines, queue number allocation, grouped order projection
[POS]:    Queue layer - commit and grouping of the permanent order queue
[UPDATE]: When commit stamping or group projection changes
*/

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::draft::{DraftCart, DraftMode};
use crate::error::{EngineError, Result};
use crate::types::{
    CommittedLine, CookingStatus, GroupOrder, LineId, OrderGroup, PaymentStatus, QueueNumber,
};

/// Summary of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitReceipt {
    pub queue_number: QueueNumber,
    pub customer_name: String,
    pub lines: usize,
    pub total: Decimal,
    /// True when the commit replaced a pulled-back order instead of opening a new one
    pub replaced: bool,
}

/// Permanent queue of committed lines plus the queue number counter.
#[derive(Debug, Clone)]
pub struct OrderQueue {
    pub(crate) lines: Vec<CommittedLine>,
    next_queue_number: QueueNumber,
}

impl OrderQueue {
    pub fn new(first_queue_number: QueueNumber) -> Self {
        Self {
            lines: Vec::new(),
            next_queue_number: first_queue_number,
        }
    }

    pub fn lines(&self) -> &[CommittedLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number the next new order will receive.
    pub fn next_queue_number(&self) -> QueueNumber {
        self.next_queue_number
    }

    pub fn contains(&self, queue_number: QueueNumber) -> bool {
        self.lines
            .iter()
            .any(|line| line.queue_number == queue_number)
    }

    pub fn line(&self, line_id: LineId) -> Option<&CommittedLine> {
        self.lines.iter().find(|line| line.line.id == line_id)
    }

    pub fn group(&self, queue_number: QueueNumber) -> Option<OrderGroup> {
        group_by_queue_number(&self.lines, GroupOrder::Ascending)
            .into_iter()
            .find(|group| group.queue_number == queue_number)
    }

    pub fn groups(&self, order: GroupOrder) -> Vec<OrderGroup> {
        group_by_queue_number(&self.lines, order)
    }

    /// Move every draft line into the queue under one queue number.
    ///
    /// New orders take the next queue number and advance the counter. A draft
    /// staged by a whole-order edit reuses the target number and name, so the
    /// counter stays put.
    pub fn commit(
        &mut self,
        draft: &mut DraftCart,
        customer_name: &str,
        now: DateTime<Local>,
    ) -> Result<CommitReceipt> {
        if draft.is_empty() {
            return Err(EngineError::EmptyDraft);
        }
        if let Some(line_id) = draft.mode().editing_line() {
            return Err(EngineError::LineEditInProgress { line_id });
        }

        let following = self.next_queue_number.next();
        if following.is_none() && draft.mode().order_target().is_none() {
            tracing::warn!(last = %self.next_queue_number, "queue numbers exhausted");
            return Err(EngineError::QueueExhausted {
                last: self.next_queue_number,
            });
        }

        let (lines, mode) = draft.drain();
        let (queue_number, customer_name, replaced) = match mode {
            DraftMode::EditingOrder(target) => (
                target.queue_number,
                format_customer_name(&target.customer_name),
                true,
            ),
            DraftMode::Normal | DraftMode::EditingLine { .. } => {
                let queue_number = self.next_queue_number;
                let name = if customer_name.trim().is_empty() {
                    default_customer_name(queue_number)
                } else {
                    format_customer_name(customer_name)
                };
                if let Some(following) = following {
                    self.next_queue_number = following;
                }
                (queue_number, name, false)
            }
        };

        let total: Decimal = lines.iter().map(|line| line.price).sum();
        let count = lines.len();
        self.lines.extend(lines.into_iter().map(|line| CommittedLine {
            line,
            queue_number,
            customer_name: customer_name.clone(),
            created_at: now,
            cooking: CookingStatus::Pending,
            payment: PaymentStatus::Unpaid,
        }));

        tracing::info!(
            queue_number = %queue_number,
            customer = %customer_name,
            lines = count,
            total = %total,
            replaced,
            "order committed"
        );

        Ok(CommitReceipt {
            queue_number,
            customer_name,
            lines: count,
            total,
            replaced,
        })
    }

    /// Delete every line of a group in one step.
    pub fn remove_group(&mut self, queue_number: QueueNumber) -> Vec<CommittedLine> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.lines)
            .into_iter()
            .partition(|line| line.queue_number == queue_number);
        self.lines = kept;
        removed
    }
}

/// Project a flat line list into per-order groups.
///
/// Name and creation time come from the first line of each group; the
/// total is the sum of line prices.
pub fn group_by_queue_number(lines: &[CommittedLine], order: GroupOrder) -> Vec<OrderGroup> {
    let mut groups: BTreeMap<QueueNumber, OrderGroup> = BTreeMap::new();

    for line in lines {
        let group = groups
            .entry(line.queue_number)
            .or_insert_with(|| OrderGroup {
                queue_number: line.queue_number,
                customer_name: line.customer_name.clone(),
                created_at: line.created_at,
                lines: Vec::new(),
                total: Decimal::ZERO,
            });
        group.total += line.line.price;
        group.lines.push(line.clone());
    }

    match order {
        GroupOrder::Ascending => groups.into_values().collect(),
        GroupOrder::Descending => groups.into_values().rev().collect(),
    }
}

pub fn default_customer_name(queue_number: QueueNumber) -> String {
    format!("Customer #{queue_number}")
}

/// Title-case a customer name: lower-case everything, then upper-case the
/// first character of every word.
pub fn format_customer_name(raw: &str) -> String {
    let mut formatted = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.trim().chars() {
        let word_char = ch.is_alphanumeric() || ch == '_';
        if word_char && at_word_start {
            formatted.extend(ch.to_uppercase());
        } else {
            formatted.extend(ch.to_lowercase());
        }
        at_word_start = !word_char;
    }
    formatted
}

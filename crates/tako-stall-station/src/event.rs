/*
[INPUT]:  Operator commands, housekeeping ticks, countdown ticks
[OUTPUT]: Station event vocabulary and the command dispatcher
[POS]:    Event layer - everything the station loop reacts to
[UPDATE]: When adding operator commands
*/

use tako_stall_engine::{
    EngineError, Filling, LineId, OrderBoard, QueueNumber, RemovalHandle, RemovalRequest, Sauce,
};

/// One operator action, as sent by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationCommand {
    IncrementFilling(Filling),
    DecrementFilling(Filling),
    MixedPreset,
    ToggleSauce(Sauce),
    ToggleSeparate(Sauce),
    ToggleAllSauces,
    ToggleGarnish,
    IncrementDrink,
    DecrementDrink,
    ResetForm,
    SetCustomerName(String),

    AddToCart,
    DuplicateLine(LineId),
    RemoveLine(LineId),
    EditLine(LineId),
    Commit,

    ToggleCooking(LineId),
    TogglePayment(QueueNumber),
    RequestRemoval(QueueNumber),
    ConfirmRemoval,
    CancelRemoval(QueueNumber),
    EditOrder(QueueNumber),

    DismissNotice,
}

/// All events processed by the station loop
#[derive(Debug, Clone)]
pub enum StationEvent {
    /// Periodic housekeeping tick (notice expiry, snapshot refresh)
    Tick,

    Command(StationCommand),

    /// One countdown period elapsed for the countdown started as `generation`
    CountdownTick {
        queue_number: QueueNumber,
        generation: u64,
    },

    /// Station should shut down
    Shutdown,
}

/// Types that can apply operator commands
pub trait CommandHandler {
    /// Apply one command. A started countdown hands back its handle so the
    /// caller can drive it.
    fn apply(&mut self, command: StationCommand) -> Result<Option<RemovalHandle>, EngineError>;
}

impl CommandHandler for OrderBoard {
    fn apply(&mut self, command: StationCommand) -> Result<Option<RemovalHandle>, EngineError> {
        use StationCommand::*;

        match command {
            IncrementFilling(filling) => {
                self.increment_filling(filling);
            }
            DecrementFilling(filling) => {
                self.decrement_filling(filling);
            }
            MixedPreset => self.apply_mixed_preset(),
            ToggleSauce(sauce) => self.toggle_sauce(sauce),
            ToggleSeparate(sauce) => {
                self.toggle_separate(sauce);
            }
            ToggleAllSauces => self.toggle_all_sauces(),
            ToggleGarnish => {
                self.toggle_garnish();
            }
            IncrementDrink => {
                self.increment_drink();
            }
            DecrementDrink => {
                self.decrement_drink();
            }
            ResetForm => self.reset_form(),
            SetCustomerName(name) => {
                self.set_customer_name(name);
            }
            AddToCart => {
                self.add_to_cart()?;
            }
            DuplicateLine(line_id) => {
                self.duplicate_line(line_id)?;
            }
            RemoveLine(line_id) => {
                self.remove_line(line_id)?;
            }
            EditLine(line_id) => self.load_line_for_edit(line_id)?,
            Commit => {
                self.commit()?;
            }
            ToggleCooking(line_id) => {
                self.toggle_cooking(line_id)?;
            }
            TogglePayment(queue_number) => {
                self.toggle_payment(queue_number)?;
            }
            RequestRemoval(queue_number) => {
                if let RemovalRequest::CountdownStarted(handle) = self.request_removal(queue_number)? {
                    return Ok(Some(handle));
                }
            }
            ConfirmRemoval => {
                self.confirm_removal()?;
            }
            CancelRemoval(queue_number) => {
                self.cancel_removal(queue_number);
            }
            EditOrder(queue_number) => {
                self.edit_whole_group(queue_number)?;
            }
            DismissNotice => self.dismiss_notice(),
        }
        Ok(None)
    }
}

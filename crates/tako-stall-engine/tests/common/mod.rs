/*
[INPUT]:  Engine configuration variants used across scenarios
[OUTPUT]: Shared board fixtures and order helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tako-stall-engine tests

use tako_stall_engine::{EngineConfig, Filling, OrderBoard, QueueNumber, RemovalMode};

/// Board with default menu and confirm-style removal
pub fn board() -> OrderBoard {
    OrderBoard::new(EngineConfig::default()).expect("default config is valid")
}

/// Board whose removals run on a countdown
#[allow(dead_code)]
pub fn countdown_board(ticks: u8) -> OrderBoard {
    let mut config = EngineConfig::default();
    config.queue.removal = RemovalMode::Countdown;
    config.queue.countdown_ticks = ticks;
    OrderBoard::new(config).expect("countdown config is valid")
}

/// Compose one food portion plus `drinks` waters and commit them under `name`
pub fn place_order(board: &mut OrderBoard, fillings: &[Filling], drinks: u32, name: &str) -> QueueNumber {
    for filling in fillings {
        board.increment_filling(*filling);
    }
    for _ in 0..drinks {
        board.increment_drink();
    }
    board.add_to_cart().expect("composition should be addable");
    board.set_customer_name(name);
    board.commit().expect("commit should succeed").queue_number
}

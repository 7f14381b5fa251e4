use crate::*;
pub use random::*;

mod random;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout;
}

/// Layout that is already known, mostly useful to replay a game or to script one in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinefieldGenerator {
    layout: MineLayout,
}

impl FixedMinefieldGenerator {
    pub fn new(layout: MineLayout) -> Self {
        Self { layout }
    }
}

impl MinefieldGenerator for FixedMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        if self.layout.game_config() != config {
            log::warn!(
                "Fixed layout {:?} does not match requested {:?}, using the layout as is",
                self.layout.game_config(),
                config
            );
        }
        self.layout
    }
}

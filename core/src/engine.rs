use alloc::collections::BTreeSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    InProgress,
    Busted,
    CashedOut,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Busted | Self::CashedOut)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Everything that changes while a grid is being played, kept apart from the immutable [`MineLayout`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealState {
    revealed: BTreeSet<Coord2>,
    gems_revealed: CellCount,
    multiplier: f64,
    state: SessionState,
    triggered_mine: Option<Coord2>,
}

impl RevealState {
    pub fn new(table: &PayoutTable) -> Self {
        Self {
            revealed: BTreeSet::new(),
            gems_revealed: 0,
            multiplier: table.house_edge(),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn revealed(&self) -> &BTreeSet<Coord2> {
        &self.revealed
    }

    pub fn is_revealed(&self, coords: Coord2) -> bool {
        self.revealed.contains(&coords)
    }

    pub fn gems_revealed(&self) -> CellCount {
        self.gems_revealed
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_finished()
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    /// Ends the game at the current multiplier, which is returned.
    pub fn cash_out(&mut self) -> Result<f64> {
        self.check_in_progress()?;
        if self.gems_revealed == 0 {
            return Err(GameError::NothingToCashOut);
        }
        self.state = SessionState::CashedOut;
        Ok(self.multiplier)
    }
}

/// Creates a `size × size` grid with `mine_count` mines drawn from `rng`, together with the mine positions.
pub fn create_grid<R: Rng + ?Sized>(
    size: Coord,
    mine_count: CellCount,
    rng: &mut R,
) -> Result<(MineLayout, BTreeSet<Coord2>)> {
    let config = GameConfig::new(size, mine_count)?;
    let layout = place_mines(config, rng);
    let mine_positions = layout.mine_positions();
    Ok((layout, mine_positions))
}

/// Reveals `coords` on `layout`, recording the result in `reveal_state`.
///
/// A failed call leaves `reveal_state` untouched.
pub fn reveal(
    layout: &MineLayout,
    reveal_state: &mut RevealState,
    coords: Coord2,
    table: &PayoutTable,
) -> Result<RevealOutcome> {
    let coords = layout.validate_coords(coords)?;
    reveal_state.check_in_progress()?;

    if !reveal_state.revealed.insert(coords) {
        return Err(GameError::AlreadyRevealed);
    }

    if layout.contains_mine(coords) {
        log::debug!("Reveal {:?}: mine, session busted", coords);
        reveal_state.triggered_mine = Some(coords);
        reveal_state.state = SessionState::Busted;
        return Ok(RevealOutcome::Busted);
    }

    reveal_state.gems_revealed += 1;
    let multiplier = table.multiplier(
        reveal_state.gems_revealed,
        layout.mine_count(),
        layout.size(),
    );
    reveal_state.multiplier = multiplier;
    log::debug!(
        "Reveal {:?}: gem {} of {}, multiplier {}",
        coords,
        reveal_state.gems_revealed,
        layout.safe_cell_count(),
        multiplier
    );

    if reveal_state.gems_revealed == layout.safe_cell_count() {
        Ok(RevealOutcome::Cleared { multiplier })
    } else {
        Ok(RevealOutcome::Gem { multiplier })
    }
}

/// One player's game: the grid, how far it has been played, and what is at stake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesSession {
    mine_layout: MineLayout,
    reveal_state: RevealState,
    bet: u32,
    payout_table: PayoutTable,
}

impl MinesSession {
    pub fn new(mine_layout: MineLayout, bet: u32) -> Result<Self> {
        Self::with_payout_table(mine_layout, bet, PayoutTable::default())
    }

    pub fn with_payout_table(mine_layout: MineLayout, bet: u32, payout_table: PayoutTable) -> Result<Self> {
        if bet == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        let config = mine_layout.game_config();
        GameConfig::new(config.size, config.mines)?;
        log::debug!(
            "New session: {}x{} grid, {} mines, bet {}",
            mine_layout.size(),
            mine_layout.size(),
            mine_layout.mine_count(),
            bet
        );
        Ok(Self {
            reveal_state: RevealState::new(&payout_table),
            mine_layout,
            bet,
            payout_table,
        })
    }

    /// Generates a fresh grid for `config` and opens a session on it.
    pub fn start<G: MinefieldGenerator>(config: GameConfig, generator: G, bet: u32) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        Self::new(generator.generate(config), bet)
    }

    pub fn layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn reveal_state(&self) -> &RevealState {
        &self.reveal_state
    }

    pub fn payout_table(&self) -> &PayoutTable {
        &self.payout_table
    }

    pub fn state(&self) -> SessionState {
        self.reveal_state.state()
    }

    pub fn is_finished(&self) -> bool {
        self.reveal_state.is_terminal()
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn multiplier(&self) -> f64 {
        self.reveal_state.multiplier()
    }

    pub fn gems_revealed(&self) -> CellCount {
        self.reveal_state.gems_revealed()
    }

    /// Whether every safe cell has been found; the natural point to cash out.
    pub fn is_cleared(&self) -> bool {
        self.gems_revealed() == self.mine_layout.safe_cell_count()
    }

    /// What cashing out right now would pay.
    pub fn payout(&self) -> f64 {
        payout(f64::from(self.bet), self.multiplier())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        reveal(
            &self.mine_layout,
            &mut self.reveal_state,
            coords,
            &self.payout_table,
        )
    }

    /// Ends the session and returns the winnings.
    pub fn cash_out(&mut self) -> Result<f64> {
        let multiplier = self.reveal_state.cash_out()?;
        let winnings = payout(f64::from(self.bet), multiplier);
        log::debug!(
            "Cash out after {} gems at {}x: {}",
            self.gems_revealed(),
            multiplier,
            winnings
        );
        Ok(winnings)
    }
}

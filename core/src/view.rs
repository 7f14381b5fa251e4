use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Player-visible snapshot of a session, meant to be rendered by whatever front end drives the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord,
    pub mine_count: CellCount,
    pub tiles: Array2<TileView>,
    pub state: SessionState,
    pub gems_revealed: CellCount,
    pub multiplier: f64,
}

impl BoardView {
    /// Only what the player has uncovered so far: gems and the mine that ended the game.
    pub fn from_session(session: &MinesSession) -> Self {
        Self::build(session, false)
    }

    /// Same as [`BoardView::from_session`], but once the session is over every mine is shown.
    pub fn from_session_exposed(session: &MinesSession) -> Self {
        Self::build(session, session.is_finished())
    }

    fn build(session: &MinesSession, expose_mines: bool) -> Self {
        let layout = session.layout();
        let reveal_state = session.reveal_state();
        let size = layout.size();
        let mut tiles = Array2::from_elem((size, size).to_nd_index(), TileView::Hidden);

        for coords in iter_positions(size) {
            let is_mine = layout.contains_mine(coords);
            tiles[coords.to_nd_index()] = match (reveal_state.is_revealed(coords), is_mine) {
                (true, false) => TileView::Gem,
                (true, true) => TileView::Mine,
                (false, true) if expose_mines => TileView::Mine,
                (false, _) => TileView::Hidden,
            };
        }

        Self {
            size,
            mine_count: layout.mine_count(),
            tiles,
            state: session.state(),
            gems_revealed: reveal_state.gems_revealed(),
            multiplier: reveal_state.multiplier(),
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> TileView {
        self.tiles[coords.to_nd_index()]
    }

    pub fn hidden_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_hidden()).count()
    }
}

impl MinesSession {
    pub fn view(&self) -> BoardView {
        BoardView::from_session(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord, mines: &[Coord2]) -> MinesSession {
        MinesSession::new(MineLayout::from_mine_coords(size, mines).unwrap(), 10).unwrap()
    }

    #[test]
    fn fresh_session_is_all_hidden() {
        let view = session(4, &[(0, 0), (3, 3)]).view();

        assert_eq!(view.size, 4);
        assert_eq!(view.mine_count, 2);
        assert_eq!(view.hidden_count(), 16);
        assert_eq!(view.state, SessionState::InProgress);
        assert_eq!(view.multiplier, 0.96);
    }

    #[test]
    fn gems_show_and_mines_stay_hidden_while_playing() {
        let mut session = session(3, &[(0, 0)]);
        session.reveal((1, 2)).unwrap();

        let view = BoardView::from_session_exposed(&session);

        assert_eq!(view.tile_at((1, 2)), TileView::Gem);
        assert_eq!(view.tile_at((0, 0)), TileView::Hidden);
        assert_eq!(view.gems_revealed, 1);
        assert_eq!(view.hidden_count(), 8);
    }

    #[test]
    fn busted_view_shows_triggered_mine() {
        let mut session = session(3, &[(0, 0), (2, 2)]);
        session.reveal((1, 1)).unwrap();
        session.reveal((2, 2)).unwrap();

        let view = session.view();
        assert_eq!(view.tile_at((2, 2)), TileView::Mine);
        assert_eq!(view.tile_at((0, 0)), TileView::Hidden);
        assert_eq!(view.state, SessionState::Busted);

        let exposed = BoardView::from_session_exposed(&session);
        assert_eq!(exposed.tile_at((0, 0)), TileView::Mine);
        assert_eq!(exposed.tile_at((0, 1)), TileView::Hidden);
    }
}

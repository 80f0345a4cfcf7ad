use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
///
/// Won and Lost are terminal; only `restart` produces a fresh InProgress board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Everything a presentation adapter needs to re-render after a reveal: the
/// cells that changed, what happened, and where the game stands.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub changed: Vec<(Coord2, CellState)>,
    pub status: GameStatus,
}

/// Authoritative game state for one board, from first reveal to win or loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEngine {
    layout: MineLayout,
    grid: Array2<CellState>,
    revealed_count: CellCount,
    flags_remaining: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl BoardEngine {
    pub fn new(config: BoardConfig, seed: u64) -> Self {
        Self::with_layout(UniformLayoutGenerator::new(seed).generate(config))
    }

    pub fn with_layout(layout: MineLayout) -> Self {
        let size = layout.size();
        let flags_remaining = layout.mine_count();
        Self {
            grid: Array2::default(size.grid_index()),
            revealed_count: 0,
            flags_remaining,
            status: Default::default(),
            triggered_mine: None,
            layout,
        }
    }

    /// Discards the board wholesale and regenerates from the same config.
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(self.layout.board_config(), seed);
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn board_config(&self) -> BoardConfig {
        self.layout.board_config()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    /// Remaining flag budget, for a "Flags: N" readout.
    pub fn flags_remaining(&self) -> CellCount {
        self.flags_remaining
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.grid[coords.grid_index()]
    }

    /// The mine that ended the game, while the others are merely exposed.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use CellState::*;
        use FlagOutcome::*;

        let coords = self.layout.validate_coords(coords)?;

        if self.status.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.grid[coords.grid_index()] {
            Hidden if self.flags_remaining == 0 => NoChange,
            Hidden => {
                self.grid[coords.grid_index()] = Flagged;
                self.flags_remaining -= 1;
                Placed
            }
            Flagged => {
                self.grid[coords.grid_index()] = Hidden;
                self.flags_remaining += 1;
                Removed
            }
            _ => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.layout.validate_coords(coords)?;

        if self.status.is_finished() || !self.grid[coords.grid_index()].is_hidden() {
            return Ok(self.unchanged());
        }

        Ok(self.reveal_hidden(coords))
    }

    fn unchanged(&self) -> RevealReport {
        RevealReport {
            outcome: RevealOutcome::NoChange,
            changed: Vec::new(),
            status: self.status,
        }
    }

    fn reveal_hidden(&mut self, coords: Coord2) -> RevealReport {
        if self.layout[coords] {
            let changed = self.expose_board(coords);
            return RevealReport {
                outcome: RevealOutcome::Exploded,
                changed,
                status: self.status,
            };
        }

        let mut changed = Vec::new();
        self.reveal_safe(coords, &mut changed);

        let outcome = if self.revealed_count == self.layout.safe_cell_count() {
            self.status = GameStatus::Won;
            log::debug!("all safe cells revealed, game won");
            RevealOutcome::Won
        } else {
            RevealOutcome::Safe
        };

        RevealReport {
            outcome,
            changed,
            status: self.status,
        }
    }

    /// Reveals one safe cell and flood-fills outward from a zero-adjacency
    /// cell: each hidden neighbor is revealed, and zero cells keep the front
    /// growing. The worklist only ever admits hidden cells, so every visit
    /// shrinks the hidden set and the loop terminates.
    fn reveal_safe(&mut self, coords: Coord2, changed: &mut Vec<(Coord2, CellState)>) {
        use CellState::*;

        let adjacent_mines = self.layout.adjacent_mine_count(coords);
        self.grid[coords.grid_index()] = Revealed(adjacent_mines);
        self.revealed_count += 1;
        changed.push((coords, Revealed(adjacent_mines)));
        log::debug!("revealed cell at {:?}, adjacent mines: {}", coords, adjacent_mines);

        if adjacent_mines != 0 {
            return;
        }

        let mut visited = BTreeSet::from([coords]);
        let mut to_visit: VecDeque<_> = self
            .layout
            .iter_adjacent(coords)
            .filter(|&pos| self.grid[pos.grid_index()].is_hidden())
            .collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            // skip flagged or already revealed cells
            if !self.grid[visit_coords.grid_index()].is_hidden() {
                log::trace!("skipping cell at {:?}", visit_coords);
                continue;
            }

            let visit_adjacent_mines = self.layout.adjacent_mine_count(visit_coords);
            self.grid[visit_coords.grid_index()] = Revealed(visit_adjacent_mines);
            self.revealed_count += 1;
            changed.push((visit_coords, Revealed(visit_adjacent_mines)));
            log::trace!(
                "flood revealed cell at {:?}, adjacent mines: {}",
                visit_coords,
                visit_adjacent_mines
            );

            if visit_adjacent_mines == 0 {
                to_visit.extend(
                    self.layout
                        .iter_adjacent(visit_coords)
                        .filter(|&pos| self.grid[pos.grid_index()].is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// End-of-game sweep after a mine is hit: every mine is exposed and every
    /// untouched safe cell is locked against further interaction. Revealed
    /// and flagged safe cells keep their state.
    fn expose_board(&mut self, triggered: Coord2) -> Vec<(Coord2, CellState)> {
        use CellState::*;

        self.status = GameStatus::Lost;
        self.triggered_mine = Some(triggered);
        log::debug!("mine hit at {:?}, exposing remaining board", triggered);

        let mut changed = Vec::new();
        let (rows, cols) = self.layout.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let next = match (self.layout[coords], self.grid[coords.grid_index()]) {
                    (true, _) => ExposedMine,
                    (false, Hidden) => Locked,
                    (false, _) => continue,
                };
                self.grid[coords.grid_index()] = next;
                changed.push((coords, next));
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn reveal_mine_exposes_board_and_locks_safe_cells() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));

        assert_eq!(engine.reveal((0, 0)).unwrap().outcome, RevealOutcome::Safe);
        assert_eq!(engine.toggle_flag((0, 1)).unwrap(), FlagOutcome::Placed);

        let report = engine.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Exploded);
        assert_eq!(report.status, GameStatus::Lost);
        assert_eq!(engine.triggered_mine(), Some((1, 1)));
        assert_eq!(engine.cell_at((1, 1)), CellState::ExposedMine);
        // revealed and flagged safe cells keep their state
        assert_eq!(engine.cell_at((0, 0)), CellState::Revealed(1));
        assert_eq!(engine.cell_at((0, 1)), CellState::Flagged);
        // the six untouched safe cells are locked
        for coords in [(0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert_eq!(engine.cell_at(coords), CellState::Locked);
        }
        assert_eq!(report.changed.len(), 7);
        assert!(report.changed.contains(&((1, 1), CellState::ExposedMine)));
    }

    #[test]
    fn finished_game_ignores_further_moves() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));
        engine.reveal((1, 1)).unwrap();

        let report = engine.reveal((2, 2)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert!(report.changed.is_empty());
        assert_eq!(report.status, GameStatus::Lost);
        assert_eq!(engine.toggle_flag((2, 2)).unwrap(), FlagOutcome::NoChange);
    }

    #[test]
    fn flood_fill_reveals_zero_region_and_numbered_border() {
        let mut engine = BoardEngine::with_layout(layout((9, 1), &[(4, 0)]));

        let report = engine.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Safe);
        assert_eq!(report.changed.len(), 4);
        for coords in [(0, 0), (1, 0), (2, 0)] {
            assert_eq!(engine.cell_at(coords), CellState::Revealed(0));
        }
        assert_eq!(engine.cell_at((3, 0)), CellState::Revealed(1));
        // nothing beyond the numbered border is touched
        for row in 5..9 {
            assert_eq!(engine.cell_at((row, 0)), CellState::Hidden);
        }
        assert_eq!(engine.status(), GameStatus::InProgress);
    }

    #[test]
    fn flood_fill_does_not_cross_flagged_cells() {
        let mut engine = BoardEngine::with_layout(layout((9, 1), &[(4, 0)]));
        engine.toggle_flag((1, 0)).unwrap();

        let report = engine.reveal((0, 0)).unwrap();

        assert_eq!(report.changed, [((0, 0), CellState::Revealed(0))].to_vec());
        assert_eq!(engine.cell_at((1, 0)), CellState::Flagged);
        assert_eq!(engine.cell_at((2, 0)), CellState::Hidden);
    }

    #[test]
    fn flood_fill_to_win() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(2, 2)]));

        let report = engine.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(engine.status(), GameStatus::Won);
        assert_eq!(engine.cell_at((0, 0)), CellState::Revealed(0));
        assert_eq!(engine.cell_at((1, 1)), CellState::Revealed(1));
        assert_eq!(engine.cell_at((2, 2)), CellState::Hidden);
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut engine = BoardEngine::with_layout(layout((2, 2), &[(0, 0)]));

        let report = engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.cell_at((1, 1)), CellState::Revealed(1));
        assert_eq!(report.changed.len(), 1);
        assert_eq!(report.status, GameStatus::InProgress);
    }

    #[test]
    fn reveal_is_idempotent_on_revealed_cells() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));
        assert_eq!(engine.reveal((0, 0)).unwrap().outcome, RevealOutcome::Safe);

        let report = engine.reveal((0, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert!(report.changed.is_empty());
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));
        engine.toggle_flag((1, 1)).unwrap();

        let report = engine.reveal((1, 1)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::NoChange);
        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.cell_at((1, 1)), CellState::Flagged);
    }

    #[test]
    fn winning_leaves_mines_and_flags_untouched() {
        let mut engine = BoardEngine::with_layout(layout((2, 1), &[(0, 0)]));
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), FlagOutcome::Placed);

        let report = engine.reveal((1, 0)).unwrap();

        assert_eq!(report.outcome, RevealOutcome::Won);
        assert_eq!(report.changed, [((1, 0), CellState::Revealed(1))].to_vec());
        assert_eq!(engine.cell_at((0, 0)), CellState::Flagged);
        assert_eq!(engine.flags_remaining(), 0);
    }

    #[test]
    fn flag_budget_is_bounded_by_mine_count() {
        let mut engine = BoardEngine::with_layout(layout((2, 2), &[(0, 0)]));
        assert_eq!(engine.flags_remaining(), 1);

        assert_eq!(engine.toggle_flag((0, 1)).unwrap(), FlagOutcome::Placed);
        assert_eq!(engine.flags_remaining(), 0);

        // budget exhausted, further flags are inert
        assert_eq!(engine.toggle_flag((1, 0)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.cell_at((1, 0)), CellState::Hidden);

        assert_eq!(engine.toggle_flag((0, 1)).unwrap(), FlagOutcome::Removed);
        assert_eq!(engine.flags_remaining(), 1);
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut engine = BoardEngine::with_layout(layout((2, 2), &[(0, 0)]));
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), FlagOutcome::NoChange);
        assert_eq!(engine.flags_remaining(), 1);
    }

    #[test]
    fn out_of_bounds_coordinates_are_rejected() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));

        assert_eq!(engine.reveal((3, 0)), Err(GameError::OutOfBounds));
        assert_eq!(engine.toggle_flag((0, 3)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn restart_resets_to_a_fresh_in_progress_board() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));
        engine.toggle_flag((0, 0)).unwrap();
        engine.reveal((1, 1)).unwrap();
        assert_eq!(engine.status(), GameStatus::Lost);

        engine.restart(99);

        assert_eq!(engine.status(), GameStatus::InProgress);
        assert_eq!(engine.flags_remaining(), 1);
        assert_eq!(engine.total_mines(), 1);
        assert_eq!(engine.triggered_mine(), None);
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(engine.cell_at((row, col)), CellState::Hidden);
            }
        }
    }

    #[test]
    fn saved_game_restores_identically() {
        let mut engine = BoardEngine::with_layout(layout((3, 3), &[(1, 1)]));
        engine.reveal((0, 0)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        let saved = serde_json::to_string(&engine).unwrap();
        let restored: BoardEngine = serde_json::from_str(&saved).unwrap();

        assert_eq!(restored, engine);
    }
}

use std::collections::VecDeque;

use crate::Coords;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords },
    HitWall,
    HitSelf,
}

/// The snake's body, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new(start: Coords) -> Self {
        Snake { body: VecDeque::from(vec![start]) }
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Coords]) -> Self {
        Snake { body: cells.iter().copied().collect() }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Pushes a new head one cell along `heading`. On a crash the body is left
    /// untouched. The self check runs against the body as it is before the
    /// move, so the current tail still counts as occupied.
    pub fn advance(&mut self, heading: Direction, width: i32, height: i32) -> MoveResult {
        let (hx, hy) = self.head();
        let (dx, dy) = heading.delta();
        let new_head = (hx + dx, hy + dy);

        if new_head.0 < 0 || new_head.1 < 0 || new_head.0 >= width || new_head.1 >= height {
            return HitWall;
        }

        if self.body.contains(&new_head) {
            return HitSelf;
        }

        self.body.push_front(new_head);
        Moved { new_head }
    }

    pub fn drop_tail(&mut self) -> Option<Coords> {
        // Never shrink below the head
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    pub fn contains(&self, pos: &Coords) -> bool {
        self.body.contains(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_symmetric() {
        for dir in [Up, Down, Left, Right] {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
            let (dx, dy) = dir.delta();
            assert_eq!(dir.opposite().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn advance_pushes_head_in_front() {
        let mut snake = Snake::new((3, 3));
        assert_eq!(snake.advance(Down, 10, 10), Moved { new_head: (3, 4) });
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(3, 4), (3, 3)]);

        assert_eq!(snake.drop_tail(), Some((3, 3)));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), (3, 4));
    }

    #[test]
    fn advance_detects_every_wall() {
        let cases = [((0, 5), Left), ((9, 5), Right), ((5, 0), Up), ((5, 9), Down)];
        for (start, dir) in cases {
            let mut snake = Snake::new(start);
            assert_eq!(snake.advance(dir, 10, 10), HitWall, "{:?} from {:?}", dir, start);
            assert_eq!(snake.len(), 1);
            assert_eq!(snake.head(), start);
        }
    }

    #[test]
    fn current_tail_counts_as_occupied() {
        // Head at (1,0), body curls down and left so the tail sits right below the head.
        let mut snake = Snake::from_cells(&[(1, 0), (0, 0), (0, 1), (1, 1)]);
        assert_eq!(snake.advance(Down, 5, 5), HitSelf);
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn single_cell_never_drops_its_head() {
        let mut snake = Snake::new((0, 0));
        assert_eq!(snake.drop_tail(), None);
        assert_eq!(snake.len(), 1);
    }
}

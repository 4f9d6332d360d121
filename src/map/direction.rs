use glam::{IVec2, Vec2};

/// A cardinal direction on the lane grid.
///
/// World Y grows upward, so `Up` increases the row index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Order in which neighbouring cells are considered; breaks ties between equally good moves.
pub const NEIGHBOR_ORDER: [Direction; 4] = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The direction with its axes swapped: horizontal becomes vertical and vice versa.
    pub fn turned(&self) -> Direction {
        match self {
            Direction::Right => Direction::Up,
            Direction::Left => Direction::Down,
            Direction::Up => Direction::Right,
            Direction::Down => Direction::Left,
        }
    }

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }

    pub fn as_vec2(&self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Converts a unit grid offset back into a direction.
    pub fn from_offset(offset: IVec2) -> Option<Direction> {
        match (offset.x, offset.y) {
            (0, 1) => Some(Direction::Up),
            (0, -1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Sprite rotation, in degrees, for an entity facing this way.
    pub fn rotation_degrees(&self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Up => 90.0,
            Direction::Left => 180.0,
            Direction::Down => 270.0,
        }
    }

    /// Name of the walking animation trigger for this heading.
    pub fn walk_trigger(&self) -> &'static str {
        match self {
            Direction::Up => "walk_top",
            Direction::Down => "walk_bottom",
            Direction::Left => "walk_left",
            Direction::Right => "walk_right",
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => IVec2::Y,
            Direction::Down => -IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

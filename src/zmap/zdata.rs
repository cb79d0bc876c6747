/// Room id reserved for "no room": out of bounds or unwalkable.
pub const NO_ROOM: u8 = 0;

/// One layer of a height-field column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZData {
    pub z: f32,
    pub room_id: u8,
}

impl ZData {
    pub const fn new(z: f32, room_id: u8) -> Self {
        Self { z, room_id }
    }

    /// Sentinel below every recorded layer.
    pub const fn floor() -> Self {
        Self::new(f32::NEG_INFINITY, NO_ROOM)
    }

    /// Sentinel above every recorded layer.
    pub const fn ceiling() -> Self {
        Self::new(f32::INFINITY, NO_ROOM)
    }

    pub fn is_sentinel(&self) -> bool {
        self.z.is_infinite()
    }

    pub fn has_room(&self) -> bool {
        self.room_id != NO_ROOM
    }
}

/// The layers bracketing a query height: the walkable floor at or below it
/// and the ceiling above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub floor: ZData,
    pub ceiling: ZData,
}

impl Bracket {
    pub const fn new(floor: ZData, ceiling: ZData) -> Self {
        Self { floor, ceiling }
    }

    pub const fn unbounded() -> Self {
        Self::new(ZData::floor(), ZData::ceiling())
    }

    /// Headroom between floor and ceiling.
    pub fn gap(&self) -> f32 {
        self.ceiling.z - self.floor.z
    }
}

impl Default for Bracket {
    fn default() -> Self {
        Self::unbounded()
    }
}

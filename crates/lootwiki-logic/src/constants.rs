//! Game and site constants — baseline stats, level growth, limits.
//!
//! Plain constants with no database dependency. Both the SpacetimeDB
//! server and the native simtest use these.

/// Derived stats of a level-0 character with no allocated points.
pub mod baseline {
    pub const HP: f64 = 100.0;
    pub const MP: f64 = 50.0;
    pub const ATTACK: f64 = 10.0;
    pub const MAGIC_ATTACK: f64 = 10.0;
    pub const DEFENSE: f64 = 5.0;
    pub const CRIT_RATE: f64 = 5.0;
    pub const CRIT_DAMAGE: f64 = 150.0;
    pub const ATTACK_SPEED: f64 = 100.0;
    pub const MOVE_SPEED: f64 = 100.0;
}

/// Flat growth added once per level (linear, not compounding).
pub mod level_growth {
    pub const HP: f64 = 10.0;
    pub const MP: f64 = 5.0;
    pub const ATTACK: f64 = 2.0;
    pub const MAGIC_ATTACK: f64 = 2.0;
    pub const DEFENSE: f64 = 1.0;
}

/// Defaults for the site configuration singleton.
pub mod limits {
    pub const MIN_LEVEL: u32 = 1;
    pub const DEFAULT_MAX_LEVEL: u32 = 100;
    pub const DEFAULT_MAX_POINTS_PER_STAT: u32 = 300;
    pub const DEFAULT_MAX_TITLE_LEN: usize = 120;
    pub const MAX_DESCRIPTION_LEN: usize = 4_000;
    pub const MAX_GUIDE_BODY_LEN: usize = 60_000;
    pub const MAX_DISPLAY_NAME_LEN: usize = 32;
}

/// Vote value as stored on a vote row.
pub mod vote_values {
    pub const UP: i8 = 1;
    pub const DOWN: i8 = -1;
}

//! SpacetimeDB table definitions for the community site.
//!
//! Enum-valued columns (class, vote target kind) are stored as `u8` ids
//! from `lootwiki-logic`; vote values as the signed unit `+1 / -1`.

use lootwiki_logic::constants::limits;
use lootwiki_logic::planner::PlannerLimits;
use lootwiki_logic::stats::DerivedStats;
use lootwiki_logic::votes::VoteCounters;
use spacetimedb::{table, Identity, Timestamp};

// ============================================================================
// SITE CONFIGURATION
// ============================================================================

/// Site configuration singleton (id always 0)
#[table(name = site_config, public)]
#[derive(Clone)]
pub struct SiteConfig {
    #[primary_key]
    pub id: u32,
    /// Identity that published the module; may edit this row.
    pub admin: Identity,
    pub max_level: u32,
    pub max_points_per_stat: u32,
    pub max_title_len: u32,
    pub allow_self_vote: bool,
}

impl SiteConfig {
    pub fn with_defaults(admin: Identity) -> Self {
        let planner = PlannerLimits::default();
        Self {
            id: 0,
            admin,
            max_level: planner.max_level,
            max_points_per_stat: planner.max_points_per_stat,
            max_title_len: limits::DEFAULT_MAX_TITLE_LEN as u32,
            allow_self_vote: false,
        }
    }

    pub fn planner_limits(&self) -> PlannerLimits {
        PlannerLimits {
            max_level: self.max_level,
            max_points_per_stat: self.max_points_per_stat,
        }
    }
}

// ============================================================================
// USERS
// ============================================================================

/// Registered account. Callers without one are anonymous and cannot author or vote.
#[table(name = user_account, public)]
pub struct UserAccount {
    #[primary_key]
    pub identity: Identity,
    pub display_name: String,
    pub created_at: Timestamp,
}

// ============================================================================
// BUILDS
// ============================================================================

/// Planned character build
#[table(name = build, public)]
#[derive(Clone)]
pub struct Build {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub owner: Identity,
    pub title: String,
    pub description: String,
    pub class_id: u8,
    pub level: u32,
    pub vig: u32,
    pub int: u32,
    pub str: u32,
    pub dex: u32,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Build {
    pub fn counters(&self) -> VoteCounters {
        VoteCounters::new(self.upvotes, self.downvotes)
    }

    pub fn set_counters(&mut self, counters: VoteCounters) {
        self.upvotes = counters.upvotes;
        self.downvotes = counters.downvotes;
    }
}

/// Derived stats of a build, refreshed whenever the build changes
#[table(name = build_stats, public)]
pub struct BuildStats {
    #[primary_key]
    pub build_id: u64,
    pub hp: f64,
    pub mp: f64,
    pub attack: f64,
    pub magic_attack: f64,
    pub defense: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub attack_speed: f64,
    pub move_speed: f64,
}

impl BuildStats {
    pub fn from_derived(build_id: u64, s: &DerivedStats) -> Self {
        Self {
            build_id,
            hp: s.hp,
            mp: s.mp,
            attack: s.attack,
            magic_attack: s.magic_attack,
            defense: s.defense,
            crit_rate: s.crit_rate,
            crit_damage: s.crit_damage,
            attack_speed: s.attack_speed,
            move_speed: s.move_speed,
        }
    }
}

// ============================================================================
// GUIDES
// ============================================================================

/// Community guide; body is markdown source
#[table(name = guide, public)]
#[derive(Clone)]
pub struct Guide {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[index(btree)]
    pub author: Identity,
    pub title: String,
    pub body: String,
    /// Build the guide walks through, `NO_BUILD` if none.
    #[index(btree)]
    pub build_id: u64,
    pub upvotes: u32,
    pub downvotes: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `Guide::build_id` value for a guide that links no build. Auto-inc ids start at 1.
pub const NO_BUILD: u64 = 0;

/// Column value for an optional build link.
pub fn build_link(build_id: Option<u64>) -> u64 {
    build_id.unwrap_or(NO_BUILD)
}

/// Optional build link from its column value.
pub fn linked_build(column: u64) -> Option<u64> {
    (column != NO_BUILD).then_some(column)
}

impl Guide {
    pub fn linked_build(&self) -> Option<u64> {
        linked_build(self.build_id)
    }

    pub fn counters(&self) -> VoteCounters {
        VoteCounters::new(self.upvotes, self.downvotes)
    }

    pub fn set_counters(&mut self, counters: VoteCounters) {
        self.upvotes = counters.upvotes;
        self.downvotes = counters.downvotes;
    }
}

// ============================================================================
// VOTES
// ============================================================================

/// One user's vote on one target. `key` is `voter:kind:target_id`, so a
/// voter holds at most one row per target.
#[table(name = vote, public)]
pub struct Vote {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    #[unique]
    pub key: String,
    pub voter: Identity,
    pub target_kind: u8,
    #[index(btree)]
    pub target_id: u64,
    pub value: i8,
    pub cast_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lootwiki_logic::classes::CharacterClass;
    use lootwiki_logic::stats::{project, StatAllocation};

    #[test]
    fn test_site_config_defaults() {
        let admin = Identity::from_byte_array([7; 32]);
        let config = SiteConfig::with_defaults(admin);
        assert_eq!(config.id, 0);
        assert_eq!(config.admin, admin);
        assert_eq!(config.max_level, limits::DEFAULT_MAX_LEVEL);
        assert_eq!(config.max_points_per_stat, limits::DEFAULT_MAX_POINTS_PER_STAT);
        assert_eq!(config.max_title_len as usize, limits::DEFAULT_MAX_TITLE_LEN);
        assert!(!config.allow_self_vote);
        assert_eq!(config.planner_limits(), PlannerLimits::default());
    }

    #[test]
    fn test_planner_limits_follow_edited_config() {
        let mut config = SiteConfig::with_defaults(Identity::ZERO);
        config.max_level = 60;
        config.max_points_per_stat = 99;
        let planner = config.planner_limits();
        assert_eq!(planner.max_level, 60);
        assert_eq!(planner.max_points_per_stat, 99);
        assert!(planner.validate(61, &StatAllocation::default()).is_err());
        assert!(planner.validate(60, &StatAllocation::new(99, 0, 0, 0)).is_ok());
    }

    #[test]
    fn test_build_stats_copy_every_field() {
        let alloc = StatAllocation::new(10, 5, 20, 40);
        let derived = project(CharacterClass::Ninja, 25, &alloc).unwrap();
        let row = BuildStats::from_derived(42, &derived);
        assert_eq!(row.build_id, 42);
        assert_eq!(row.hp, 450.0);
        assert_eq!(row.mp, 195.0);
        assert_eq!(row.attack, 100.0);
        assert_eq!(row.magic_attack, 63.75);
        assert_eq!(row.defense, 32.5);
        assert_eq!(row.crit_rate, 15.0);
        assert_eq!(row.crit_damage, 170.0);
        assert_eq!(row.attack_speed, 120.0);
        assert_eq!(row.move_speed, 108.0);
    }

    #[test]
    fn test_build_link_column() {
        assert_eq!(build_link(None), NO_BUILD);
        assert_eq!(build_link(Some(9)), 9);
        assert_eq!(linked_build(NO_BUILD), None);
        assert_eq!(linked_build(9), Some(9));
        assert_eq!(linked_build(build_link(Some(3))), Some(3));
    }
}

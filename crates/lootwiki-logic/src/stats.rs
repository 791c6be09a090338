//! Stat projection: class + level + point allocation → derived stats.
//!
//! Projection is a pure function:
//!
//! 1. start from the [`baseline`](crate::constants::baseline) record,
//! 2. add flat [`level_growth`](crate::constants::level_growth) once per level,
//! 3. add `points × multiplier` for every entry in the class's
//!    [`scaling`] sub-table of each allocation point,
//! 4. round every field to two decimals, half away from zero.
//!
//! ```
//! use lootwiki_logic::classes::CharacterClass;
//! use lootwiki_logic::stats::{project, StatAllocation};
//!
//! let stats = project(CharacterClass::Warrior, 1, &StatAllocation::default()).unwrap();
//! assert_eq!(stats.hp, 110.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::classes::{scaling, CharacterClass, DerivedStat, StatPoint};
use crate::constants::{baseline, level_growth, limits};
use crate::error::LogicError;

/// Points a player has placed into each attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatAllocation {
    pub vig: u32,
    pub int: u32,
    pub str: u32,
    pub dex: u32,
}

impl StatAllocation {
    pub fn new(vig: u32, int: u32, str: u32, dex: u32) -> Self {
        Self { vig, int, str, dex }
    }

    /// Build from signed request values, rejecting negative points.
    pub fn from_signed(vig: i64, int: i64, str: i64, dex: i64) -> Result<Self, LogicError> {
        let check = |point: StatPoint, v: i64| -> Result<u32, LogicError> {
            u32::try_from(v).map_err(|_| {
                LogicError::invalid(format!("{} points out of range: {v}", point.name()))
            })
        };
        Ok(Self {
            vig: check(StatPoint::Vig, vig)?,
            int: check(StatPoint::Int, int)?,
            str: check(StatPoint::Str, str)?,
            dex: check(StatPoint::Dex, dex)?,
        })
    }

    pub fn get(&self, point: StatPoint) -> u32 {
        match point {
            StatPoint::Vig => self.vig,
            StatPoint::Int => self.int,
            StatPoint::Str => self.str,
            StatPoint::Dex => self.dex,
        }
    }

    pub fn set(&mut self, point: StatPoint, value: u32) {
        match point {
            StatPoint::Vig => self.vig = value,
            StatPoint::Int => self.int = value,
            StatPoint::Str => self.str = value,
            StatPoint::Dex => self.dex = value,
        }
    }

    /// Sum of all allocated points.
    pub fn total(&self) -> u64 {
        StatPoint::ALL.iter().map(|p| self.get(*p) as u64).sum()
    }
}

/// Nine combat stats produced by [`project`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
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

impl DerivedStats {
    /// The fixed starting record before level growth and allocation.
    pub fn baseline() -> Self {
        Self {
            hp: baseline::HP,
            mp: baseline::MP,
            attack: baseline::ATTACK,
            magic_attack: baseline::MAGIC_ATTACK,
            defense: baseline::DEFENSE,
            crit_rate: baseline::CRIT_RATE,
            crit_damage: baseline::CRIT_DAMAGE,
            attack_speed: baseline::ATTACK_SPEED,
            move_speed: baseline::MOVE_SPEED,
        }
    }

    pub fn get(&self, stat: DerivedStat) -> f64 {
        match stat {
            DerivedStat::Hp => self.hp,
            DerivedStat::Mp => self.mp,
            DerivedStat::Attack => self.attack,
            DerivedStat::MagicAttack => self.magic_attack,
            DerivedStat::Defense => self.defense,
            DerivedStat::CritRate => self.crit_rate,
            DerivedStat::CritDamage => self.crit_damage,
            DerivedStat::AttackSpeed => self.attack_speed,
            DerivedStat::MoveSpeed => self.move_speed,
        }
    }

    fn slot(&mut self, stat: DerivedStat) -> &mut f64 {
        match stat {
            DerivedStat::Hp => &mut self.hp,
            DerivedStat::Mp => &mut self.mp,
            DerivedStat::Attack => &mut self.attack,
            DerivedStat::MagicAttack => &mut self.magic_attack,
            DerivedStat::Defense => &mut self.defense,
            DerivedStat::CritRate => &mut self.crit_rate,
            DerivedStat::CritDamage => &mut self.crit_damage,
            DerivedStat::AttackSpeed => &mut self.attack_speed,
            DerivedStat::MoveSpeed => &mut self.move_speed,
        }
    }

    fn rounded(mut self) -> Self {
        for stat in DerivedStat::ALL {
            let v = self.slot(stat);
            *v = round2(*v);
        }
        self
    }

    /// Field-wise `self - other`, rounded like a projection.
    ///
    /// Used to compare two builds: positive fields are where `self` is ahead.
    pub fn diff(&self, other: &DerivedStats) -> DerivedStats {
        let mut out = *self;
        for stat in DerivedStat::ALL {
            *out.slot(stat) -= other.get(stat);
        }
        out.rounded()
    }
}

/// Round to two decimals, ties away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Project derived stats for a class, level (≥ 1) and allocation.
pub fn project(
    class: CharacterClass,
    level: u32,
    allocation: &StatAllocation,
) -> Result<DerivedStats, LogicError> {
    if level < limits::MIN_LEVEL {
        return Err(LogicError::invalid(format!(
            "level must be at least {}, got {level}",
            limits::MIN_LEVEL
        )));
    }

    let mut stats = DerivedStats::baseline();

    let lvl = level as f64;
    stats.hp += level_growth::HP * lvl;
    stats.mp += level_growth::MP * lvl;
    stats.attack += level_growth::ATTACK * lvl;
    stats.magic_attack += level_growth::MAGIC_ATTACK * lvl;
    stats.defense += level_growth::DEFENSE * lvl;

    for point in StatPoint::ALL {
        let points = allocation.get(point);
        if points == 0 {
            continue;
        }
        for &(stat, mult) in scaling(class, point) {
            *stats.slot(stat) += points as f64 * mult;
        }
    }

    Ok(stats.rounded())
}

/// [`project`] with a signed level, as received from request arguments.
pub fn project_signed(
    class: CharacterClass,
    level: i64,
    allocation: &StatAllocation,
) -> Result<DerivedStats, LogicError> {
    let level = u32::try_from(level)
        .map_err(|_| LogicError::invalid(format!("level out of range: {level}")))?;
    project(class, level, allocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn zero() -> StatAllocation {
        StatAllocation::default()
    }

    #[test]
    fn test_warrior_level_one_no_points() {
        let s = project(CharacterClass::Warrior, 1, &zero()).unwrap();
        assert_eq!(s.hp, 110.0);
        assert_eq!(s.mp, 55.0);
        assert_eq!(s.attack, 12.0);
        assert_eq!(s.magic_attack, 12.0);
        assert_eq!(s.defense, 6.0);
        assert_eq!(s.crit_rate, 5.0);
        assert_eq!(s.crit_damage, 150.0);
        assert_eq!(s.attack_speed, 100.0);
        assert_eq!(s.move_speed, 100.0);
    }

    #[test]
    fn test_level_growth_is_linear() {
        let l10 = project(CharacterClass::Ninja, 10, &zero()).unwrap();
        let l20 = project(CharacterClass::Ninja, 20, &zero()).unwrap();
        assert_eq!(l20.hp - l10.hp, 100.0);
        assert_eq!(l20.mp - l10.mp, 50.0);
        assert_eq!(l20.defense - l10.defense, 10.0);
        // Not scaled by level
        assert_eq!(l20.crit_rate, l10.crit_rate);
    }

    #[test]
    fn test_zero_level_rejected() {
        assert!(matches!(
            project(CharacterClass::Shaman, 0, &zero()),
            Err(LogicError::InvalidArgument(_))
        ));
        assert!(project_signed(CharacterClass::Shaman, -3, &zero()).is_err());
        assert!(project_signed(CharacterClass::Shaman, 3, &zero()).is_ok());
    }

    #[test]
    fn test_negative_points_rejected() {
        assert!(matches!(
            StatAllocation::from_signed(1, -1, 0, 0),
            Err(LogicError::InvalidArgument(_))
        ));
        assert_eq!(
            StatAllocation::from_signed(1, 2, 3, 4),
            Ok(StatAllocation::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn test_warrior_mid_build() {
        let alloc = StatAllocation::new(20, 0, 30, 10);
        let s = project(CharacterClass::Warrior, 10, &alloc).unwrap();
        assert_eq!(s.hp, 500.0);
        assert_eq!(s.mp, 100.0);
        assert_eq!(s.attack, 105.0);
        assert_eq!(s.magic_attack, 30.0);
        assert_eq!(s.defense, 25.0);
        assert_eq!(s.crit_rate, 6.0);
        assert_eq!(s.crit_damage, 165.0);
        assert_eq!(s.attack_speed, 102.5);
        assert_eq!(s.move_speed, 100.0);
    }

    #[test]
    fn test_fractional_multipliers_round_to_cents() {
        let alloc = StatAllocation::new(3, 33, 1, 7);
        let s = project(CharacterClass::Necromancer, 7, &alloc).unwrap();
        assert!((s.defense - 12.9).abs() < EPS);
        assert!((s.crit_rate - 6.05).abs() < EPS);
        assert!((s.crit_damage - 163.2).abs() < EPS);
        assert!((s.move_speed - 100.7).abs() < EPS);
        for stat in DerivedStat::ALL {
            assert_eq!(round2(s.get(stat)), s.get(stat));
        }
    }

    #[test]
    fn test_round2_ties_away_from_zero() {
        assert_eq!(round2(1.005_f64 + 1e-12), 1.01);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_deterministic() {
        let alloc = StatAllocation::new(4, 8, 15, 16);
        for class in CharacterClass::ALL {
            assert_eq!(project(class, 23, &alloc), project(class, 23, &alloc));
        }
    }

    #[test]
    fn test_allocation_total_and_set() {
        let mut a = StatAllocation::new(1, 2, 3, 4);
        assert_eq!(a.total(), 10);
        a.set(StatPoint::Dex, 40);
        assert_eq!(a.get(StatPoint::Dex), 40);
        assert_eq!(a.total(), 46);
    }

    #[test]
    fn test_diff() {
        let a = project(CharacterClass::Ninja, 5, &StatAllocation::new(10, 0, 0, 0)).unwrap();
        let b = project(CharacterClass::Ninja, 5, &zero()).unwrap();
        let d = a.diff(&b);
        assert_eq!(d.hp, 100.0);
        assert_eq!(d.defense, 2.5);
        assert_eq!(d.mp, 0.0);
        assert_eq!(b.diff(&a).hp, -100.0);
    }

    #[test]
    fn test_serialized_field_names() {
        let s = project(CharacterClass::Shaman, 1, &zero()).unwrap();
        let v = serde_json::to_value(s).unwrap();
        assert_eq!(v["magicAttack"], 12.0);
        assert_eq!(v["critDamage"], 150.0);
        assert!(v.get("magic_attack").is_none());
    }
}

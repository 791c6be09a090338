//! Character classes and the per-class scaling table.
//!
//! Each class turns allocation points into derived stats through a
//! sparse table: a point only feeds the derived stats listed for it.
//! All multipliers are non-negative, so adding points never lowers a
//! derived stat.
//!
//! | Class | vig | int | str | dex |
//! |-------|-----|-----|-----|-----|
//! | Warrior | hp 15, def 0.5 | mp 3, matk 0.5 | atk 2.5, cdmg 0.5 | crit 0.1, aspd 0.25 |
//! | Ninja | hp 10, def 0.25 | mp 4, matk 0.75 | atk 2, cdmg 1 | crit 0.25, aspd 0.5, move 0.2 |
//! | Shaman | hp 12, mp 2, def 0.4 | mp 8, matk 2.5 | atk 1.25 | crit 0.1, aspd 0.3 |
//! | Necromancer | hp 8, def 0.3 | mp 10, matk 3, cdmg 0.4 | atk 1 | crit 0.15, aspd 0.2, move 0.1 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogicError;

/// Playable class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterClass {
    Warrior = 0,
    Ninja = 1,
    Shaman = 2,
    Necromancer = 3,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Warrior,
        CharacterClass::Ninja,
        CharacterClass::Shaman,
        CharacterClass::Necromancer,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CharacterClass::Warrior => "WARRIOR",
            CharacterClass::Ninja => "NINJA",
            CharacterClass::Shaman => "SHAMAN",
            CharacterClass::Necromancer => "NECROMANCER",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogicError::invalid(format!("unknown class {s:?}")))
    }
}

/// One of the four attributes a player distributes points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatPoint {
    Vig,
    Int,
    Str,
    Dex,
}

impl StatPoint {
    pub const ALL: [StatPoint; 4] = [StatPoint::Vig, StatPoint::Int, StatPoint::Str, StatPoint::Dex];

    pub fn name(self) -> &'static str {
        match self {
            StatPoint::Vig => "vig",
            StatPoint::Int => "int",
            StatPoint::Str => "str",
            StatPoint::Dex => "dex",
        }
    }
}

/// Combat statistic produced by projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DerivedStat {
    Hp,
    Mp,
    Attack,
    MagicAttack,
    Defense,
    CritRate,
    CritDamage,
    AttackSpeed,
    MoveSpeed,
}

impl DerivedStat {
    pub const ALL: [DerivedStat; 9] = [
        DerivedStat::Hp,
        DerivedStat::Mp,
        DerivedStat::Attack,
        DerivedStat::MagicAttack,
        DerivedStat::Defense,
        DerivedStat::CritRate,
        DerivedStat::CritDamage,
        DerivedStat::AttackSpeed,
        DerivedStat::MoveSpeed,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DerivedStat::Hp => "hp",
            DerivedStat::Mp => "mp",
            DerivedStat::Attack => "attack",
            DerivedStat::MagicAttack => "magicAttack",
            DerivedStat::Defense => "defense",
            DerivedStat::CritRate => "critRate",
            DerivedStat::CritDamage => "critDamage",
            DerivedStat::AttackSpeed => "attackSpeed",
            DerivedStat::MoveSpeed => "moveSpeed",
        }
    }
}

/// A derived stat and how much one allocated point adds to it.
pub type ScalingEntry = (DerivedStat, f64);

/// Scaling sub-table for one class and one allocation point.
pub fn scaling(class: CharacterClass, point: StatPoint) -> &'static [ScalingEntry] {
    use CharacterClass::*;
    use DerivedStat::*;
    use StatPoint::*;

    match (class, point) {
        (Warrior, Vig) => &[(Hp, 15.0), (Defense, 0.5)],
        (Warrior, Int) => &[(Mp, 3.0), (MagicAttack, 0.5)],
        (Warrior, Str) => &[(Attack, 2.5), (CritDamage, 0.5)],
        (Warrior, Dex) => &[(CritRate, 0.1), (AttackSpeed, 0.25)],

        (Ninja, Vig) => &[(Hp, 10.0), (Defense, 0.25)],
        (Ninja, Int) => &[(Mp, 4.0), (MagicAttack, 0.75)],
        (Ninja, Str) => &[(Attack, 2.0), (CritDamage, 1.0)],
        (Ninja, Dex) => &[(CritRate, 0.25), (AttackSpeed, 0.5), (MoveSpeed, 0.2)],

        (Shaman, Vig) => &[(Hp, 12.0), (Mp, 2.0), (Defense, 0.4)],
        (Shaman, Int) => &[(Mp, 8.0), (MagicAttack, 2.5)],
        (Shaman, Str) => &[(Attack, 1.25)],
        (Shaman, Dex) => &[(CritRate, 0.1), (AttackSpeed, 0.3)],

        (Necromancer, Vig) => &[(Hp, 8.0), (Defense, 0.3)],
        (Necromancer, Int) => &[(Mp, 10.0), (MagicAttack, 3.0), (CritDamage, 0.4)],
        (Necromancer, Str) => &[(Attack, 1.0)],
        (Necromancer, Dex) => &[(CritRate, 0.15), (AttackSpeed, 0.2), (MoveSpeed, 0.1)],
    }
}

/// Per-point multiplier of `stat` for `class`, 0.0 when not listed.
pub fn multiplier(class: CharacterClass, point: StatPoint, stat: DerivedStat) -> f64 {
    scaling(class, point)
        .iter()
        .find(|(s, _)| *s == stat)
        .map_or(0.0, |(_, m)| *m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parse() {
        assert_eq!("WARRIOR".parse::<CharacterClass>(), Ok(CharacterClass::Warrior));
        assert_eq!("necromancer".parse::<CharacterClass>(), Ok(CharacterClass::Necromancer));
        assert_eq!(" Ninja ".parse::<CharacterClass>(), Ok(CharacterClass::Ninja));
        assert!(matches!(
            "PALADIN".parse::<CharacterClass>(),
            Err(LogicError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_class_ids() {
        for class in CharacterClass::ALL {
            assert_eq!(CharacterClass::from_id(class.id()), Some(class));
        }
        assert_eq!(CharacterClass::from_id(4), None);
    }

    #[test]
    fn test_all_multipliers_non_negative() {
        for class in CharacterClass::ALL {
            for point in StatPoint::ALL {
                for (stat, m) in scaling(class, point) {
                    assert!(*m >= 0.0, "{class} {} {} = {m}", point.name(), stat.name());
                }
            }
        }
    }

    #[test]
    fn test_no_duplicate_entries() {
        for class in CharacterClass::ALL {
            for point in StatPoint::ALL {
                let entries = scaling(class, point);
                for (i, (a, _)) in entries.iter().enumerate() {
                    assert!(entries[i + 1..].iter().all(|(b, _)| b != a));
                }
            }
        }
    }

    #[test]
    fn test_every_class_scales_hp_from_vig() {
        for class in CharacterClass::ALL {
            assert!(multiplier(class, StatPoint::Vig, DerivedStat::Hp) > 0.0);
        }
    }

    #[test]
    fn test_sparse_lookup() {
        assert_eq!(
            multiplier(CharacterClass::Warrior, StatPoint::Str, DerivedStat::Attack),
            2.5
        );
        assert_eq!(
            multiplier(CharacterClass::Warrior, StatPoint::Str, DerivedStat::MoveSpeed),
            0.0
        );
        assert_eq!(
            multiplier(CharacterClass::Shaman, StatPoint::Vig, DerivedStat::Mp),
            2.0
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&CharacterClass::Necromancer).unwrap();
        assert_eq!(json, "\"NECROMANCER\"");
        let json = serde_json::to_string(&DerivedStat::MagicAttack).unwrap();
        assert_eq!(json, "\"magicAttack\"");
    }
}

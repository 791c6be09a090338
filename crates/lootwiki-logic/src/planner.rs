//! Build planner caps.
//!
//! [`project`](crate::stats::project) accepts any level ≥ 1 and any
//! allocation; the planner additionally bounds both so published
//! builds stay within what the game allows. Limits come from the site
//! configuration and default to [`limits`](crate::constants::limits).

use serde::{Deserialize, Serialize};

use crate::classes::StatPoint;
use crate::constants::limits;
use crate::error::LogicError;
use crate::stats::StatAllocation;

/// Upper bounds applied to a planned build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerLimits {
    pub max_level: u32,
    pub max_points_per_stat: u32,
}

impl Default for PlannerLimits {
    fn default() -> Self {
        Self {
            max_level: limits::DEFAULT_MAX_LEVEL,
            max_points_per_stat: limits::DEFAULT_MAX_POINTS_PER_STAT,
        }
    }
}

impl PlannerLimits {
    /// Check a level and allocation against these caps.
    pub fn validate(&self, level: u32, allocation: &StatAllocation) -> Result<(), LogicError> {
        if !(limits::MIN_LEVEL..=self.max_level).contains(&level) {
            return Err(LogicError::invalid(format!(
                "level must be between {} and {}, got {level}",
                limits::MIN_LEVEL,
                self.max_level
            )));
        }
        for point in StatPoint::ALL {
            let v = allocation.get(point);
            if v > self.max_points_per_stat {
                return Err(LogicError::invalid(format!(
                    "{} points exceed cap of {}: {v}",
                    point.name(),
                    self.max_points_per_stat
                )));
            }
        }
        Ok(())
    }

    /// Reject limits that would make every build invalid.
    pub fn check_sane(&self) -> Result<(), LogicError> {
        if self.max_level < limits::MIN_LEVEL {
            return Err(LogicError::invalid("max_level must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accepts_typical_build() {
        let limits = PlannerLimits::default();
        assert!(limits.validate(50, &StatAllocation::new(40, 10, 60, 20)).is_ok());
    }

    #[test]
    fn test_level_bounds() {
        let limits = PlannerLimits {
            max_level: 60,
            max_points_per_stat: 99,
        };
        assert!(limits.validate(0, &StatAllocation::default()).is_err());
        assert!(limits.validate(1, &StatAllocation::default()).is_ok());
        assert!(limits.validate(60, &StatAllocation::default()).is_ok());
        assert!(limits.validate(61, &StatAllocation::default()).is_err());
    }

    #[test]
    fn test_point_cap() {
        let limits = PlannerLimits {
            max_level: 60,
            max_points_per_stat: 99,
        };
        assert!(limits.validate(10, &StatAllocation::new(99, 99, 99, 99)).is_ok());
        let err = limits
            .validate(10, &StatAllocation::new(0, 0, 100, 0))
            .unwrap_err();
        assert!(err.to_string().contains("str"));
    }

    #[test]
    fn test_check_sane() {
        assert!(PlannerLimits::default().check_sane().is_ok());
        let bad = PlannerLimits {
            max_level: 0,
            max_points_per_stat: 10,
        };
        assert!(bad.check_sane().is_err());
    }
}

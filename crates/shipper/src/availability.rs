//! Shipper availability
//!
//! A derived health signal combining transport health, ready-queue depth
//! and shutdown state. Producers poll it and stop writing while it reports
//! `Failed`; nothing is thrown from `put`.

use std::fmt;

/// Which availability conditions failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FailureCauses {
    /// Transport reports the type tag unhealthy
    pub io: bool,
    /// Ready queue reached its threshold
    pub buffers: bool,
    /// Shipper is closed
    pub shutdown: bool,
}

impl FailureCauses {
    #[inline]
    pub fn any(&self) -> bool {
        self.io || self.buffers || self.shutdown
    }
}

impl fmt::Display for FailureCauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (self.io, "IO"),
            (self.buffers, "BUFFERS"),
            (self.shutdown, "SHUTDOWN"),
        ];
        let mut first = true;
        for (_, name) in names.iter().filter(|(set, _)| *set) {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Composite availability of a shipper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Operational,
    Failed(FailureCauses),
}

impl Availability {
    /// `Operational` when no cause is set
    pub fn from_causes(causes: FailureCauses) -> Self {
        if causes.any() {
            Self::Failed(causes)
        } else {
            Self::Operational
        }
    }

    #[inline]
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::Operational)
    }

    /// Failed sub-conditions; all false when operational
    #[inline]
    pub fn causes(&self) -> FailureCauses {
        match self {
            Self::Operational => FailureCauses::default(),
            Self::Failed(causes) => *causes,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational => f.write_str("OPERATIONAL"),
            Self::Failed(causes) => write!(f, "FAILED ({causes})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_causes_is_operational() {
        let availability = Availability::from_causes(FailureCauses::default());
        assert!(availability.is_operational());
        assert_eq!(availability.to_string(), "OPERATIONAL");
        assert!(!availability.causes().any());
    }

    #[test]
    fn test_failed_lists_causes() {
        let causes = FailureCauses {
            io: true,
            buffers: false,
            shutdown: true,
        };
        let availability = Availability::from_causes(causes);
        assert!(!availability.is_operational());
        assert_eq!(availability.causes(), causes);
        assert_eq!(availability.to_string(), "FAILED (IO, SHUTDOWN)");
    }

    #[test]
    fn test_single_cause() {
        let causes = FailureCauses {
            buffers: true,
            ..Default::default()
        };
        assert_eq!(causes.to_string(), "BUFFERS");
    }
}

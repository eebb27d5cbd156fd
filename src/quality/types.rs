use serde::{Deserialize, Serialize};

/// How serious a finding is. Ordered from `Info` up to `Critical`.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A single finding, with the points it cost.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct ValidationFlag {
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    /// Points deducted from the owning sub-score (never negative).
    pub impact: f64,
}

impl ValidationFlag {
    /// Builds a flag. Negative impacts are clamped to zero.
    pub fn new(severity: Severity, message: impl Into<String>, impact: f64) -> Self {
        Self {
            severity,
            column: None,
            message: message.into(),
            impact: impact.max(0.0),
        }
    }

    pub fn info(message: impl Into<String>, impact: f64) -> Self {
        Self::new(Severity::Info, message, impact)
    }

    pub fn warning(message: impl Into<String>, impact: f64) -> Self {
        Self::new(Severity::Warning, message, impact)
    }

    pub fn critical(message: impl Into<String>, impact: f64) -> Self {
        Self::new(Severity::Critical, message, impact)
    }

    #[must_use]
    pub fn for_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Coarse verdict derived from the mean of the three sub-scores.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Output of one scorer: its 0-100 score and the flags behind every point it
/// lost.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct SubScore {
    /// 0-100
    pub score: u8,
    pub flags: Vec<ValidationFlag>,
}

/// Combined quality verdict for a table.
///
/// `overall` weights the sub-scores 35/35/30. `risk_level` is bucketed from
/// their unweighted mean.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ValidationScore {
    pub structural: u8,
    pub statistical: u8,
    pub anomaly: u8,
    pub overall: u8,
    pub risk_level: RiskLevel,
    /// Structural flags, then statistical, then anomaly.
    pub flags: Vec<ValidationFlag>,
}

impl ValidationScore {
    /// True when the risk level is low.
    pub fn is_trustworthy(&self) -> bool {
        self.risk_level == RiskLevel::Low
    }

    /// Flags of one severity, in report order.
    pub fn flags_with(&self, severity: Severity) -> impl Iterator<Item = &ValidationFlag> {
        self.flags.iter().filter(move |f| f.severity == severity)
    }
}

/// Running total of deductions for one scorer.
#[derive(Default, Debug)]
pub(crate) struct Deductions {
    total: f64,
    flags: Vec<ValidationFlag>,
}

impl Deductions {
    pub(crate) fn deduct(&mut self, flag: ValidationFlag) {
        self.total += flag.impact;
        self.flags.push(flag);
    }

    /// `max(0, 100 - total)`, rounded half up to an integer.
    pub(crate) fn finish(self) -> SubScore {
        let remaining = (100.0 - self.total).clamp(0.0, 100.0);
        SubScore {
            score: (remaining + 0.5).floor() as u8,
            flags: self.flags,
        }
    }
}

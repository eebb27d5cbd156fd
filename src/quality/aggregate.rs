//! Weighted combination of the three sub-scores.

use super::types::{RiskLevel, SubScore, ValidationScore};

pub const STRUCTURAL_WEIGHT: u32 = 35;
pub const STATISTICAL_WEIGHT: u32 = 35;
pub const ANOMALY_WEIGHT: u32 = 30;

/// Risk thresholds on the plain sum of the three sub-scores, i.e. a mean of
/// 85 and 70. Integer comparison keeps 76.67-style means exact.
const LOW_RISK_MIN_SUM: u32 = 85 * 3;
const MEDIUM_RISK_MIN_SUM: u32 = 70 * 3;

fn weighted_sum(structural: u8, statistical: u8, anomaly: u8) -> u32 {
    STRUCTURAL_WEIGHT * u32::from(structural)
        + STATISTICAL_WEIGHT * u32::from(statistical)
        + ANOMALY_WEIGHT * u32::from(anomaly)
}

/// `round(0.35 s + 0.35 st + 0.30 a)`, half up.
pub fn overall_score(structural: u8, statistical: u8, anomaly: u8) -> u8 {
    let rounded = (weighted_sum(structural, statistical, anomaly) + 50) / 100;
    u8::try_from(rounded).unwrap_or(u8::MAX)
}

/// Risk follows the unweighted mean of the sub-scores, not `overall`, so the
/// two can disagree near a boundary.
pub fn risk_level(structural: u8, statistical: u8, anomaly: u8) -> RiskLevel {
    match u32::from(structural) + u32::from(statistical) + u32::from(anomaly) {
        sum if sum >= LOW_RISK_MIN_SUM => RiskLevel::Low,
        sum if sum >= MEDIUM_RISK_MIN_SUM => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// Builds the final score, keeping flags in structural, statistical, anomaly
/// order.
pub fn combine(structural: SubScore, statistical: SubScore, anomaly: SubScore) -> ValidationScore {
    let overall = overall_score(structural.score, statistical.score, anomaly.score);
    let risk_level = risk_level(structural.score, statistical.score, anomaly.score);

    let mut flags = structural.flags;
    flags.extend(statistical.flags);
    flags.extend(anomaly.flags);

    ValidationScore {
        structural: structural.score,
        statistical: statistical.score,
        anomaly: anomaly.score,
        overall,
        risk_level,
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::ValidationFlag;

    fn sub(score: u8, message: &str) -> SubScore {
        SubScore {
            score,
            flags: vec![ValidationFlag::info(message, 0.0)],
        }
    }

    #[test]
    fn test_weighted_overall() {
        // 31.5 + 28 + 18 = 77.5, rounds up
        assert_eq!(overall_score(90, 80, 60), 78);
        assert_eq!(risk_level(90, 80, 60), RiskLevel::Medium);
        assert_eq!(overall_score(100, 100, 100), 100);
        assert_eq!(overall_score(0, 0, 0), 0);
    }

    #[test]
    fn test_risk_boundaries() {
        assert_eq!(risk_level(85, 85, 85), RiskLevel::Low);
        assert_eq!(risk_level(85, 85, 84), RiskLevel::Medium);
        assert_eq!(risk_level(70, 70, 70), RiskLevel::Medium);
        assert_eq!(risk_level(70, 70, 69), RiskLevel::High);
    }

    #[test]
    fn test_risk_ignores_weights() {
        // mean 85 is low risk even though the weighted overall is 84
        assert_eq!(overall_score(79, 80, 96), 84);
        assert_eq!(risk_level(79, 80, 96), RiskLevel::Low);
    }

    #[test]
    fn test_combine_keeps_flag_order() {
        let score = combine(sub(90, "structural"), sub(80, "statistical"), sub(60, "anomaly"));
        let messages: Vec<&str> = score.flags.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, ["structural", "statistical", "anomaly"]);
        assert_eq!(score.overall, 78);
        assert_eq!(score.risk_level, RiskLevel::Medium);
        assert!(!score.is_trustworthy());
    }
}

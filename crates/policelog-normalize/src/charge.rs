//! Charge-type classification from offense text.

use policelog_core::ChargeType;

// Ordered: the first rule with any matching marker wins. Matching is
// case-sensitive on the exact marker text.
const CHARGE_RULES: &[(ChargeType, &[&str])] = &[
    (ChargeType::Misdemeanor, &["(M)", "Misdemeanor"]),
    (ChargeType::Felony, &["(F)", "Felony"]),
    (ChargeType::Violation, &["(V)"]),
    (ChargeType::Infraction, &["(I)", "Infraction"]),
];

/// Map offense text to a charge type. Defaults to `Unknown`.
pub fn classify_charge(offense: &str) -> ChargeType {
    CHARGE_RULES
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| offense.contains(m)))
        .map(|(charge, _)| *charge)
        .unwrap_or_default()
}

//! Blood type compatibility policy.

use lifelink_entity::blood::BloodType;

/// Donor blood types eligible to serve a request for `requested`.
///
/// The matching policy is exact-type: a request for A+ surfaces only A+
/// donors. Medical cross-type compatibility (e.g. O- as universal donor)
/// is deliberately not applied here; clinical substitution decisions stay
/// with the hospital, not the matching engine.
pub fn compatible_donor_types(requested: BloodType) -> Vec<BloodType> {
    vec![requested]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_is_exact_type() {
        for bt in BloodType::ALL {
            assert_eq!(compatible_donor_types(bt), vec![bt]);
        }
    }

    #[test]
    fn test_no_universal_donor_substitution() {
        let types = compatible_donor_types(BloodType::APositive);
        assert!(!types.contains(&BloodType::ONegative));
    }
}

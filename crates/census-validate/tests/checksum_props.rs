//! Property tests for the id check-digit algorithms.

use proptest::prelude::*;

use census_validate::{national_id_is_valid, tax_id_is_valid};

/// Independent recomputation of the expected check digit, using the
/// digit-sum formulation instead of the subtract-9 shortcut.
fn reference_check_digit(digits: &[u32]) -> u32 {
    let mut sum = 0;
    for (idx, digit) in digits.iter().take(9).enumerate() {
        let coefficient = if idx % 2 == 0 { 2 } else { 1 };
        let product = digit * coefficient;
        sum += product / 10 + product % 10;
    }
    (10 - sum % 10) % 10
}

proptest! {
    #[test]
    fn national_id_validity_matches_reference(id in "[0-9]{10}") {
        let digits: Vec<u32> = id.bytes().map(|b| u32::from(b - b'0')).collect();
        let province = digits[0] * 10 + digits[1];
        let expected = (1..=24).contains(&province)
            && digits[9] == reference_check_digit(&digits);
        prop_assert_eq!(national_id_is_valid(&id), expected);
    }

    #[test]
    fn non_digit_input_is_never_valid(id in "[0-9]{4}[a-zA-Z ][0-9]{5}") {
        prop_assert!(!national_id_is_valid(&id));
    }

    #[test]
    fn tax_id_requires_001_establishment(prefix in "[0-9]{10}", tail in "[0-9]{3}") {
        prop_assume!(tail != "001");
        let candidate = format!("{}{}", prefix, tail);
        prop_assert!(!tax_id_is_valid(&candidate));
    }

    #[test]
    fn tax_id_rejects_entity_kind_digits(
        province in 1u32..=24,
        kind in 6u32..=9,
        body in "[0-9]{7}",
    ) {
        let id = format!("{province:02}{kind}{body}001");
        prop_assert!(!tax_id_is_valid(&id));
    }
}

#[test]
fn every_single_digit_mutation_invalidates_a_known_id() {
    let valid = "1710034065";
    assert!(national_id_is_valid(valid));
    for position in 0..valid.len() {
        for replacement in b'0'..=b'9' {
            if valid.as_bytes()[position] == replacement {
                continue;
            }
            let mut mutated = valid.as_bytes().to_vec();
            mutated[position] = replacement;
            let mutated = String::from_utf8(mutated).expect("ascii digits");
            assert!(
                !national_id_is_valid(&mutated),
                "mutation {mutated} unexpectedly valid"
            );
        }
    }
}

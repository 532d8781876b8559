use proptest::prelude::*;

use ballot_types::{CandidateId, Gender, SportCategory, VoterId, VotingPair};

fn any_category() -> impl Strategy<Value = SportCategory> {
    prop::sample::select(SportCategory::ALL.to_vec())
}

fn any_gender() -> impl Strategy<Value = Gender> {
    prop::sample::select(Gender::ALL.to_vec())
}

proptest! {
    /// A candidate id survives the trip through its hex form and bincode.
    #[test]
    fn candidate_id_text_and_bincode(bytes in prop::array::uniform12(0u8..)) {
        let id = CandidateId::new(bytes);
        prop_assert_eq!(id.to_string().parse::<CandidateId>().unwrap(), id);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: CandidateId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Hex strings of any other length never parse.
    #[test]
    fn candidate_id_rejects_other_lengths(len in 0usize..40) {
        prop_assume!(len != CandidateId::LEN * 2);
        let text = "a".repeat(len);
        prop_assert!(text.parse::<CandidateId>().is_err());
    }

    /// Category display names parse back to the same category.
    #[test]
    fn category_display_parses(category in any_category()) {
        prop_assert_eq!(category.as_str().parse::<SportCategory>().unwrap(), category);
    }

    /// Pair display always has the `<category> (<gender>)` shape.
    #[test]
    fn pair_display_shape(category in any_category(), gender in any_gender()) {
        let pair = VotingPair::new(category, gender);
        let text = pair.to_string();
        prop_assert!(text.starts_with(category.as_str()));
        let suffix = format!("({})", gender.as_str());
        prop_assert!(text.ends_with(&suffix));
    }

    /// Voter ids are trimmed and never empty.
    #[test]
    fn voter_id_trimmed(raw in "[ ]{0,3}[a-z0-9@.]{1,40}[ ]{0,3}") {
        let id = VoterId::new(raw.clone()).unwrap();
        prop_assert_eq!(id.as_str(), raw.trim());
    }
}

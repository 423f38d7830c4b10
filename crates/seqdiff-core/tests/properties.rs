use proptest::prelude::*;
use seqdiff_core::{
    diff, lcs, patch, patch_sdiff, sdiff, unpatch, unpatch_sdiff, Alignment, ChangeKind, Hunk,
    SdiffChange,
};
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Small alphabets make repeated elements, and so real alignment choices,
/// likely.
fn sequence() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 0..40)
}

fn myers_common_len(old: &[u8], new: &[u8]) -> usize {
    capture_diff_slices(Algorithm::Myers, old, new)
        .iter()
        .map(|op| match op {
            DiffOp::Equal { len, .. } => *len,
            _ => 0,
        })
        .sum()
}

proptest! {
    #[test]
    fn lcs_is_as_long_as_myers(old in sequence(), new in sequence()) {
        let alignment = Alignment::new(&old, &new);
        prop_assert_eq!(alignment.lcs_len(), myers_common_len(&old, &new));
    }

    #[test]
    fn alignment_is_a_common_subsequence(old in sequence(), new in sequence()) {
        let alignment = Alignment::new(&old, &new);
        let pairs: Vec<(usize, usize)> = alignment.pairs().collect();
        for window in pairs.windows(2) {
            prop_assert!(window[0].1 < window[1].1);
        }
        for &(i, j) in &pairs {
            prop_assert_eq!(old[i], new[j]);
        }
        prop_assert_eq!(lcs(&old, &new).len(), pairs.len());
    }

    #[test]
    fn sdiff_rebuilds_both_sides(old in sequence(), new in sequence()) {
        let changes = sdiff(&old, &new);

        let rebuilt_new: Vec<u8> = changes
            .iter()
            .filter(|c| !c.is_delete())
            .filter_map(|c| c.new_element().copied())
            .collect();
        let rebuilt_old: Vec<u8> = changes
            .iter()
            .filter(|c| !c.is_add())
            .filter_map(|c| c.old_element().copied())
            .collect();

        prop_assert_eq!(rebuilt_new, new.clone());
        prop_assert_eq!(rebuilt_old, old.clone());
        prop_assert!(changes.len() >= old.len().max(new.len()));
        prop_assert!(changes.len() <= old.len() + new.len());
    }

    #[test]
    fn patches_round_trip(old in sequence(), new in sequence()) {
        let hunks = diff(&old, &new);
        prop_assert_eq!(patch(&old, &hunks), Ok(new.clone()));
        prop_assert_eq!(unpatch(&new, &hunks), Ok(old.clone()));

        let changes = sdiff(&old, &new);
        prop_assert_eq!(patch_sdiff(&old, &changes), Ok(new.clone()));
        prop_assert_eq!(unpatch_sdiff(&new, &changes), Ok(old.clone()));
    }

    #[test]
    fn hunks_only_hold_adds_and_deletes(old in sequence(), new in sequence()) {
        let hunks = diff(&old, &new);
        let common = Alignment::new(&old, &new).lcs_len();

        let deletions: usize = hunks.iter().map(Hunk::deletions).sum();
        let insertions: usize = hunks.iter().map(Hunk::insertions).sum();
        prop_assert_eq!(deletions, old.len() - common);
        prop_assert_eq!(insertions, new.len() - common);
        prop_assert!(hunks.iter().all(|h| !h.is_empty()));
    }

    #[test]
    fn identical_inputs_have_no_diff(old in sequence()) {
        prop_assert!(diff(&old, &old).is_empty());
        let changes = sdiff(&old, &old);
        prop_assert_eq!(changes.len(), old.len());
        prop_assert!(changes.iter().all(|c| c.kind() == ChangeKind::Unchanged));
    }

    #[test]
    fn serialized_changes_round_trip(old in sequence(), new in sequence()) {
        let hunks = diff(&old, &new);
        let json = serde_json::to_string(&hunks).unwrap();
        let back: Vec<Hunk<u8>> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, hunks);

        let changes = sdiff(&old, &new);
        let json = serde_json::to_string(&changes).unwrap();
        let back: Vec<SdiffChange<u8>> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, changes);
    }
}

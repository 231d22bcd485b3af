use proptest::prelude::*;

use tui_pairs::core::Outcome;
use tui_pairs::engine::Session;
use tui_pairs::types::{Phase, TICK_MS};

#[derive(Debug, Clone, Copy)]
enum Step {
    Select(u8),
    NewGame,
    Tick(u8),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (0u8..18).prop_map(Step::Select),
        1 => Just(Step::NewGame),
        4 => (1u8..50).prop_map(Step::Tick),
    ]
}

proptest! {
    #[test]
    fn invariants_hold_for_any_input(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        let mut s = Session::new(seed);

        for step in steps {
            let before = s.snapshot();

            let outcome = match step {
                Step::Select(id) => Some(s.select_tile(id)),
                Step::NewGame => Some(s.new_game()),
                Step::Tick(n) => {
                    let mut last = None;
                    for _ in 0..n {
                        if let Some(o) = s.tick(TICK_MS) {
                            last = Some(o);
                        }
                    }
                    last
                }
            };
            let after = s.snapshot();

            // Pairing: every symbol on exactly two tiles.
            prop_assert!(s.state().board().is_well_paired());

            // Matched tiles are face up; selection never exceeds two.
            for t in &after.tiles {
                if t.matched {
                    prop_assert!(t.face_up);
                }
            }
            prop_assert!(after.selection.len() <= 2);
            if after.phase == Phase::Resolving {
                prop_assert_eq!(after.selection.len(), 2);
            }

            // Win condition.
            prop_assert_eq!(after.won, after.matched.len() == after.tiles.len());
            prop_assert_eq!(after.won, after.phase == Phase::Won);

            match outcome {
                Some(Outcome::NewGame { .. }) => {
                    prop_assert_eq!(after.move_count, 0);
                    prop_assert!(after.matched.is_empty());
                }
                Some(Outcome::Rejected(_)) | Some(Outcome::Stale) => {
                    prop_assert_eq!(&after, &before);
                }
                Some(Outcome::SecondPick(_)) => {
                    prop_assert_eq!(after.move_count, before.move_count + 1);
                }
                _ => {
                    // Matches only grow and moves only count at second picks.
                    prop_assert!(after.matched.is_superset(&before.matched));
                    prop_assert_eq!(after.move_count, before.move_count);
                }
            }
        }
    }

    #[test]
    fn shuffle_keeps_pairs_for_any_seed(seed in any::<u64>()) {
        let s = Session::new(seed);
        prop_assert!(s.state().board().is_well_paired());
        prop_assert_eq!(s.state().tiles().len(), 16);
    }
}

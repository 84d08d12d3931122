use proptest::prelude::*;

use opensig::{select, Payment, Target, UnspentOutput};

fn arb_outputs() -> impl Strategy<Value = Vec<UnspentOutput>> {
    prop::collection::vec(1u64..10_000_000, 1..12).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| UnspentOutput::new(format!("{:064x}", i + 1), i as u32, v))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn selection_balances(
        outputs in arb_outputs(),
        payment in 1u64..20_000_000,
        fee in 0u64..20_000,
    ) {
        let total: u64 = outputs.iter().map(|o| o.value).sum();
        let selection = select(&outputs, Payment::Amount(payment), fee).unwrap();

        match selection {
            Some(selection) => {
                prop_assert_eq!(selection.total_value() - selection.change(), payment + fee);
                prop_assert_eq!(selection.target(), Target::Value(payment + fee));
                let sum: u64 = selection.chosen_outputs().iter().map(|o| o.value).sum();
                prop_assert_eq!(sum, selection.total_value());
            }
            None => prop_assert!(total < payment + fee),
        }
    }

    #[test]
    fn smallest_single_output_is_preferred(
        outputs in arb_outputs(),
        payment in 1u64..10_000_000,
    ) {
        let smallest_cover = outputs.iter().map(|o| o.value).filter(|v| *v >= payment).min();
        prop_assume!(smallest_cover.is_some());

        let selection = select(&outputs, Payment::Amount(payment), 0).unwrap().unwrap();
        prop_assert_eq!(selection.chosen_outputs().len(), 1);
        prop_assert_eq!(Some(selection.chosen_outputs()[0].value), smallest_cover);
    }

    #[test]
    fn accumulation_takes_a_descending_prefix(
        outputs in arb_outputs(),
        payment in 1u64..20_000_000,
    ) {
        let largest = outputs.iter().map(|o| o.value).max().unwrap_or(0);
        prop_assume!(largest < payment);

        if let Some(selection) = select(&outputs, Payment::Amount(payment), 0).unwrap() {
            let mut sorted: Vec<u64> = outputs.iter().map(|o| o.value).collect();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            let chosen: Vec<u64> = selection.chosen_outputs().iter().map(|o| o.value).collect();

            prop_assert_eq!(&chosen[..], &sorted[..chosen.len()]);
            // Dropping the last output would leave the target uncovered.
            let without_last: u64 = chosen[..chosen.len() - 1].iter().sum();
            prop_assert!(without_last < payment);
        }
    }

    #[test]
    fn all_spends_everything_in_order(
        outputs in arb_outputs(),
        fee in 0u64..20_000,
    ) {
        let total: u64 = outputs.iter().map(|o| o.value).sum();
        match select(&outputs, Payment::All, fee).unwrap() {
            Some(selection) => {
                prop_assert_eq!(selection.chosen_outputs(), &outputs[..]);
                prop_assert_eq!(selection.change(), 0);
                prop_assert!(selection.total_value() > fee);
            }
            None => prop_assert!(total <= fee),
        }
    }
}

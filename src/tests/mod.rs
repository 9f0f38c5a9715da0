
use crate::{analyse, mine, Algorithm, CancelToken, MiningConfig, MiningError, TransactionStore};

fn groceries() -> TransactionStore<&'static str> {
    TransactionStore::new(vec![
        vec!["bread", "milk"],
        vec!["bread", "diapers", "beer", "eggs"],
        vec!["milk", "diapers", "beer", "cola"],
        vec!["bread", "milk", "diapers", "beer"],
        vec!["bread", "milk", "diapers", "cola"],
    ])
    .unwrap()
}

fn config(algorithm: Algorithm) -> MiningConfig {
    MiningConfig {
        min_support: 0.4,
        min_confidence: 0.6,
        min_lift: 1.0,
        algorithm,
        max_len: None,
    }
}

#[test]
fn mine_dispatches_on_algorithm() {
    let store = groceries();
    let cancel = CancelToken::new();

    let by_apriori = mine(&store, &config(Algorithm::Apriori), &cancel).unwrap();
    let by_growth = mine(&store, &config(Algorithm::FpGrowth), &cancel).unwrap();
    assert_eq!(by_apriori, by_growth);

    let beer = store.id_of(&"beer").unwrap();
    let diapers = store.id_of(&"diapers").unwrap();
    assert_eq!(by_growth.support(&[beer, diapers]), Some(0.6));
}

#[test]
fn analyse_ranks_rules_by_lift() {
    let store = groceries();
    let (frequent_itemsets, rules) =
        analyse(&store, &config(Algorithm::FpGrowth), &CancelToken::new()).unwrap();

    assert!(!frequent_itemsets.is_empty());
    // cola only shows up alongside diapers and milk
    assert_eq!(rules[0].describe(&store), "cola => diapers, milk");
    assert_eq!(rules[0].confidence, 1.0);
    assert!((rules[0].lift - 5.0 / 3.0).abs() < 1e-12);

    let beer_diapers = rules
        .iter()
        .find(|rule| rule.describe(&store) == "beer => diapers")
        .unwrap();
    assert!((beer_diapers.lift - 1.25).abs() < 1e-12);
    assert!(rules.iter().all(|rule| rule.confidence >= 0.6 && rule.lift >= 1.0));
}

#[test]
fn analyse_validates_config_first() {
    let store = groceries();
    let config = MiningConfig {
        min_lift: -1.0,
        ..MiningConfig::default()
    };
    assert!(matches!(
        analyse(&store, &config, &CancelToken::new()),
        Err(MiningError::InvalidParameter { name: "min_lift", .. })
    ));
}

#[test]
fn cancelled_analysis_returns_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();
    for algorithm in [Algorithm::Apriori, Algorithm::FpGrowth] {
        assert_eq!(
            analyse(&groceries(), &config(algorithm), &cancel),
            Err(MiningError::Cancelled)
        );
    }
}

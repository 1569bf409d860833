use baynet::diagnostics::asia_network;
use baynet::{enumeration_ask, BayesError, Evidence, InferenceEngine};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn cancer_prior_is_mixture_over_smoking() {
    let model = asia_network().expect("asia");
    let post = enumeration_ask("Cancer", &Evidence::new(), &model).expect("ask");
    assert!(close(post.probability(true), 0.055));
    assert!(close(post.probability(false), 0.945));
}

#[test]
fn cancer_given_smoking_is_cpt_row() {
    let model = asia_network().expect("asia");
    let post = enumeration_ask("Cancer", &Evidence::new().with("Smoking", true), &model).expect("ask");
    assert!(close(post.probability(true), 0.1));
    assert!(close(post.probability(false), 0.9));
}

#[test]
fn marginals_of_other_variables() {
    let model = asia_network().expect("asia");
    let e = Evidence::new();
    assert!(close(enumeration_ask("TB", &e, &model).unwrap().probability(true), 0.0104));
    assert!(close(enumeration_ask("Bronchitis", &e, &model).unwrap().probability(true), 0.45));
    assert!(close(enumeration_ask("TBorC", &e, &model).unwrap().probability(true), 0.064828));
    assert!(close(enumeration_ask("Xray", &e, &model).unwrap().probability(true), 0.11093832));
}

#[test]
fn explaining_away_through_the_or_node() {
    let model = asia_network().expect("asia");
    let evidence = Evidence::new().with("Smoking", true).with("Xray", true);
    let cancer = enumeration_ask("Cancer", &evidence, &model).unwrap();
    let tb = enumeration_ask("TB", &evidence, &model).unwrap();
    assert!(close(cancer.probability(true), 0.6479125435868439));
    assert!(close(tb.probability(true), 0.06738290453303175));
}

#[test]
fn posterior_with_four_observations() {
    let model = asia_network().expect("asia");
    let evidence = Evidence::new()
        .with("Asia", true)
        .with("Xray", true)
        .with("Smoking", false)
        .with("Dyspnea", false);
    let tb = enumeration_ask("TB", &evidence, &model).unwrap();
    assert!(close(tb.probability(true), 0.25502072043353524));
    let bronchitis = enumeration_ask("Bronchitis", &evidence, &model).unwrap();
    assert!(close(bronchitis.probability(true), 0.09850175326745296));
}

#[test]
fn contradictory_evidence_on_or_node_is_degenerate() {
    let model = asia_network().expect("asia");
    let evidence = Evidence::new()
        .with("TB", false)
        .with("Cancer", false)
        .with("TBorC", true);
    let err = enumeration_ask("Xray", &evidence, &model).unwrap_err();
    assert!(matches!(err, BayesError::DegenerateEvidence { ref query, total } if query == "Xray" && total == 0.0));
}

#[test]
fn degenerate_query_leaves_model_usable() {
    let model = asia_network().expect("asia");
    let bad = Evidence::new().with("TB", true).with("TBorC", false);
    assert!(enumeration_ask("Cancer", &bad, &model).is_err());
    let post = enumeration_ask("Cancer", &Evidence::new(), &model).unwrap();
    assert!(close(post.probability(true), 0.055));
}

#[test]
fn evidence_probability_of_abnormal_xray() {
    let model = asia_network().expect("asia");
    let p = InferenceEngine::new()
        .evidence_probability(&Evidence::new().with("Xray", true), &model)
        .unwrap();
    assert!(close(p, 0.11093832));
}

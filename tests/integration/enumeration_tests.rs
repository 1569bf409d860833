use baynet::diagnostics::asia_network;
use baynet::{
    enumeration_ask, BayesError, Evidence, InferenceEngine, NetworkModel, NodeSpec, Value,
};

fn weather_model() -> NetworkModel {
    NetworkModel::construct(vec![
        NodeSpec::new(
            "Sky",
            vec!["clear".into(), "cloudy".into(), "overcast".into()],
            &[],
            vec![(vec![], vec![0.5, 0.3, 0.2])],
        ),
        NodeSpec::boolean(
            "Umbrella",
            &[],
            vec![(vec![], 0.4)],
        ),
        NodeSpec::new(
            "Rain",
            vec!["none".into(), "drizzle".into(), "pour".into()],
            &["Sky"],
            vec![
                (vec!["clear".into()], vec![0.95, 0.04, 0.01]),
                (vec!["cloudy".into()], vec![0.6, 0.3, 0.1]),
                (vec!["overcast".into()], vec![0.2, 0.4, 0.4]),
            ],
        ),
        NodeSpec::new(
            "Soaked",
            vec![true.into(), false.into()],
            &["Rain", "Umbrella"],
            vec![
                (vec!["none".into(), true.into()], vec![0.0, 1.0]),
                (vec!["none".into(), false.into()], vec![0.0, 1.0]),
                (vec!["drizzle".into(), true.into()], vec![0.05, 0.95]),
                (vec!["drizzle".into(), false.into()], vec![0.5, 0.5]),
                (vec!["pour".into(), true.into()], vec![0.3, 0.7]),
                (vec!["pour".into(), false.into()], vec![0.95, 0.05]),
            ],
        ),
    ])
    .expect("weather model")
}

#[test]
fn multi_valued_posterior_matches_hand_computation() {
    let model = weather_model();
    let post = enumeration_ask("Rain", &Evidence::new(), &model).unwrap();
    // P(Rain) = Σ_sky P(sky) P(rain | sky)
    let none = 0.5 * 0.95 + 0.3 * 0.6 + 0.2 * 0.2;
    let drizzle = 0.5 * 0.04 + 0.3 * 0.3 + 0.2 * 0.4;
    let pour = 0.5 * 0.01 + 0.3 * 0.1 + 0.2 * 0.4;
    assert!((post.probability("none") - none).abs() < 1e-12);
    assert!((post.probability("drizzle") - drizzle).abs() < 1e-12);
    assert!((post.probability("pour") - pour).abs() < 1e-12);
}

#[test]
fn diagnostic_reasoning_over_labels() {
    let model = weather_model();
    let evidence = Evidence::new().with("Soaked", true).with("Umbrella", false);
    let post = enumeration_ask("Sky", &evidence, &model).unwrap();
    let w = |p_sky: f64, rain: [f64; 3]| p_sky * (rain[0] * 0.0 + rain[1] * 0.5 + rain[2] * 0.95);
    let clear = w(0.5, [0.95, 0.04, 0.01]);
    let cloudy = w(0.3, [0.6, 0.3, 0.1]);
    let overcast = w(0.2, [0.2, 0.4, 0.4]);
    let total = clear + cloudy + overcast;
    assert!((post.probability("overcast") - overcast / total).abs() < 1e-12);
    assert_eq!(post.most_likely().unwrap().0, &Value::from("overcast"));
}

#[test]
fn posteriors_sum_to_one() {
    let model = asia_network().unwrap();
    let evidence = Evidence::new().with("Dyspnea", true).with("Asia", false);
    for name in model.topological_order() {
        if evidence.contains(name) {
            continue;
        }
        let post = enumeration_ask(name, &evidence, &model).unwrap();
        assert!((post.total() - 1.0).abs() < 1e-9, "{name} sums to {}", post.total());
    }
}

#[test]
fn repeated_asks_are_bit_identical() {
    let model = asia_network().unwrap();
    let evidence = Evidence::new().with("Xray", true);
    let engine = InferenceEngine::new();
    let a = engine.ask("TB", &evidence, &model).unwrap();
    let b = engine.ask("TB", &evidence, &model).unwrap();
    for ((_, pa), (_, pb)) in a.iter().zip(b.iter()) {
        assert_eq!(pa.to_bits(), pb.to_bits());
    }
}

#[test]
fn evidence_insertion_order_is_irrelevant() {
    let model = asia_network().unwrap();
    let forward = Evidence::new().with("Asia", true).with("Xray", true).with("Dyspnea", false);
    let mut backward = Evidence::new();
    backward.insert("Dyspnea", false);
    backward.insert("Xray", true);
    backward.insert("Asia", true);
    assert_eq!(
        enumeration_ask("Cancer", &forward, &model).unwrap(),
        enumeration_ask("Cancer", &backward, &model).unwrap()
    );
}

#[test]
fn query_already_in_evidence_is_invalid() {
    let model = asia_network().unwrap();
    let err = enumeration_ask("Smoking", &Evidence::new().with("Smoking", true), &model).unwrap_err();
    assert!(matches!(err, BayesError::InvalidQuery { ref variable, .. } if variable == "Smoking"));
}

#[test]
fn bad_evidence_is_invalid() {
    let model = asia_network().unwrap();
    let err = enumeration_ask("TB", &Evidence::new().with("Fever", true), &model).unwrap_err();
    assert!(matches!(err, BayesError::InvalidEvidence { ref variable, .. } if variable == "Fever"));

    let err = enumeration_ask("TB", &Evidence::new().with("Xray", "blurry"), &model).unwrap_err();
    assert!(matches!(err, BayesError::InvalidEvidence { ref variable, .. } if variable == "Xray"));
}

#[test]
fn concurrent_queries_share_one_model() {
    let model = asia_network().unwrap();
    let engine = InferenceEngine::new();
    let expected = engine.ask("Cancer", &Evidence::new(), &model).unwrap();

    std::thread::scope(|s| {
        let mut handles = Vec::new();
        for _ in 0..4 {
            handles.push(s.spawn(|| engine.ask("Cancer", &Evidence::new(), &model).unwrap()));
        }
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn evidenced_chain_of_ten_thousand_nodes() {
    // Every node observed except the query at the root.
    let len = 10_000;
    let mut specs = vec![NodeSpec::boolean_prior("X0", 0.6)];
    for i in 1..len {
        let parent = format!("X{}", i - 1);
        specs.push(NodeSpec::boolean(
            format!("X{}", i),
            &[parent.as_str()],
            vec![(vec![true], 1.0), (vec![false], 0.5)],
        ));
    }
    let model = NetworkModel::construct(specs).unwrap();
    let evidence: Evidence = (1..len).map(|i| (format!("X{}", i), true)).collect();

    let post = enumeration_ask("X0", &evidence, &model).unwrap();
    assert!((post.probability(true) - 0.75).abs() < 1e-12);

    // Query at the leaf instead, with every ancestor observed.
    let evidence: Evidence = (0..len - 1).map(|i| (format!("X{}", i), true)).collect();
    let post = enumeration_ask(&format!("X{}", len - 1), &evidence, &model).unwrap();
    assert!((post.probability(true) - 1.0).abs() < 1e-12);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_config_matches_sequential() {
    use baynet::InferenceConfig;

    let model = weather_model();
    let evidence = Evidence::new().with("Soaked", true);
    let sequential = InferenceEngine::with_config(InferenceConfig { parallel: false, ..Default::default() })
        .unwrap()
        .ask("Sky", &evidence, &model)
        .unwrap();
    let parallel = InferenceEngine::with_config(InferenceConfig { parallel: true, ..Default::default() })
        .unwrap()
        .ask("Sky", &evidence, &model)
        .unwrap();
    assert_eq!(sequential, parallel);
}

use baynet::diagnostics::{Diagnostics, Disease, PatientObservations};
use baynet::BayesError;

#[test]
fn no_observations_favours_bronchitis() {
    let diagnostics = Diagnostics::new().expect("diagnostics");
    let d = diagnostics.diagnose("NA", "NA", "NA", "NA").expect("diagnose");
    assert_eq!(d.disease, Disease::Bronchitis);
    assert!((d.probability - 0.45).abs() < 1e-12);
    assert_eq!(d.posteriors.len(), 3);
    assert_eq!(d.posteriors[0].0, Disease::Tb);
    assert!((d.posteriors[1].1 - 0.055).abs() < 1e-12);
}

#[test]
fn asia_visit_with_abnormal_xray_points_to_tb() {
    let diagnostics = Diagnostics::new().expect("diagnostics");
    let d = diagnostics.diagnose("Yes", "No", "Abnormal", "NA").expect("diagnose");
    assert_eq!(d.disease, Disease::Tb);
    assert!((d.probability - 0.4672897196261682).abs() < 1e-12);
}

#[test]
fn smoker_with_abnormal_xray_points_to_cancer() {
    let diagnostics = Diagnostics::new().expect("diagnostics");
    let d = diagnostics.diagnose("na", "yes", "abnormal", "").expect("diagnose");
    assert_eq!(d.disease, Disease::Cancer);
    assert_eq!(d.to_string(), "Cancer with chance 64.79%");
}

#[test]
fn dyspnea_with_abnormal_xray_points_to_bronchitis() {
    let diagnostics = Diagnostics::new().expect("diagnostics");
    let obs = PatientObservations { xray: Some(true), dyspnea: Some(true), ..Default::default() };
    let d = diagnostics.diagnose_observations(&obs).expect("diagnose");
    assert_eq!(d.disease, Disease::Bronchitis);
    assert!((d.probability - 0.6813677931906954).abs() < 1e-12);
}

#[test]
fn invalid_input_is_reported_with_expected_words() {
    let diagnostics = Diagnostics::new().expect("diagnostics");
    let err = diagnostics.diagnose("Maybe", "NA", "NA", "NA").unwrap_err();
    match err {
        BayesError::InvalidObservation { field, input, expected } => {
            assert_eq!(field, "Asia");
            assert_eq!(input, "Maybe");
            assert_eq!(expected, "Yes, No, or NA");
        }
        other => panic!("expected invalid observation, got {other:?}"),
    }
}

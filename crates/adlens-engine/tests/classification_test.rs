//! End-to-end classification tests against the built-in rule set

use adlens_engine::Analyzer;

#[test]
fn test_urgent_deal_ad_gets_both_labels() {
    let analyzer = Analyzer::with_builtin_rules().unwrap();

    let result = analyzer.classify("Last chance! Save 50% today only!", Some("ad_1"));

    assert!(result
        .typology_labels
        .iter()
        .any(|label| label == "Urgency / Scarcity"));
    assert!(result
        .typology_labels
        .iter()
        .any(|label| label == "Value Proposition / Deal"));

    // "last chance" (1.0) + "today only" (0.9), each counted once
    assert!(result.score("urgency_scarcity") >= 1.6);
    assert_eq!(result.score("brand_voice"), 0.0);

    // urgency outranks value, so it leads the ordered label list
    assert_eq!(result.typology_labels[0], "Urgency / Scarcity");
}

#[test]
fn test_score_map_covers_every_typology() {
    let analyzer = Analyzer::with_builtin_rules().unwrap();

    let result = analyzer.classify("completely unremarkable text", None);
    assert_eq!(
        result.confidence_scores.len(),
        analyzer.rules().typologies().len()
    );
    assert!(result.confidence_scores.values().all(|&score| score >= 0.0));
}

#[test]
fn test_empty_string_is_a_valid_input() {
    let analyzer = Analyzer::with_builtin_rules().unwrap();

    let result = analyzer.classify("", Some("empty"));
    assert!(result.typology_labels.is_empty());
    assert_eq!(result.typology_count, 0);
    assert!(result.confidence_scores.values().all(|&score| score == 0.0));
    assert_eq!(result.features.word_count, 0);
}

#[test]
fn test_label_cap_and_floor_hold_for_selected_labels() {
    let analyzer = Analyzer::with_builtin_rules().unwrap();
    let rules = analyzer.rules();

    let loud = "Last chance! Hurry! Save 50% off this exclusive deal, trusted by \
                thousands of customers. Experts say: discover the secret. Tired of \
                waiting? No more! Imagine the freedom. Guaranteed!";
    let result = analyzer.classify(loud, None);

    assert!(result.typology_count <= rules.settings().max_labels_per_ad);
    assert_eq!(result.typology_count, result.typology_labels.len());

    for label in &result.typology_labels {
        let typology = rules
            .typologies()
            .iter()
            .find(|typology| typology.name() == label.as_str())
            .expect("label maps back to a typology");
        let floor = typology
            .threshold()
            .max(rules.settings().min_confidence);
        assert!(result.score(typology.id()) >= floor);
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scores_are_total_and_non_negative(text in ".{0,200}") {
            let analyzer = Analyzer::with_builtin_rules().unwrap();
            let result = analyzer.classify(&text, None);

            prop_assert_eq!(
                result.confidence_scores.len(),
                analyzer.rules().typologies().len()
            );
            for score in result.confidence_scores.values() {
                prop_assert!(*score >= 0.0);
            }
        }

        #[test]
        fn label_count_never_exceeds_cap(text in ".{0,200}") {
            let analyzer = Analyzer::with_builtin_rules().unwrap();
            let result = analyzer.classify(&text, None);

            let cap = analyzer.rules().settings().max_labels_per_ad;
            prop_assert!(result.typology_count <= cap);
        }

        #[test]
        fn classification_is_deterministic(text in ".{0,200}") {
            let analyzer = Analyzer::with_builtin_rules().unwrap();
            prop_assert_eq!(
                analyzer.classify(&text, None),
                analyzer.classify(&text, None)
            );
        }
    }
}

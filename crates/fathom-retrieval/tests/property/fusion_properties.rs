use std::collections::HashSet;

use fathom_core::config::{BiasConfig, FusionConfig};
use fathom_core::models::{Candidate, SearchHit, SearchMode, SourceMetadata};
use fathom_retrieval::fusion::{bias as group_boost, weighted, FusionEngine};
use fathom_retrieval::search::normalize_scores;
use fathom_retrieval::TaggedHit;
use proptest::prelude::*;

fn arb_hit() -> impl Strategy<Value = TaggedHit> {
    (
        prop_oneof![Just(SearchMode::Semantic), Just(SearchMode::Keyword)],
        0usize..6,
        0usize..3,
        0.0f64..1.0,
        prop_oneof![Just(None), Just(Some("A")), Just(Some("B")), Just(Some("C"))],
    )
        .prop_map(|(mode, doc, span, score, group)| TaggedHit {
            mode,
            hit: SearchHit {
                doc_id: format!("doc{doc}"),
                span: format!("p{span}"),
                text: format!("doc{doc} passage {span}"),
                score,
                metadata: SourceMetadata {
                    // Group follows the document so every span of a doc agrees.
                    group: group.map(|g| format!("{g}{}", doc % 2)),
                    ..Default::default()
                },
            },
        })
}

fn arb_bias() -> impl Strategy<Value = BiasConfig> {
    (0.0f64..1.0, 1.01f64..2.0, prop_oneof![Just(None), (0.1f64..1.5).prop_map(Some)]).prop_map(
        |(floor, boost_factor, boost_cap)| BiasConfig {
            floor,
            boost_factor,
            boost_cap,
        },
    )
}

fn position(cands: &[Candidate], c: &Candidate) -> usize {
    cands.iter().position(|x| x.key == c.key).unwrap_or(usize::MAX)
}

proptest! {
    #[test]
    fn fused_candidates_have_unique_keys(hits in prop::collection::vec(arb_hit(), 0..60)) {
        let engine = FusionEngine::new(FusionConfig::default(), BiasConfig::default());
        let out = engine.fuse(&hits);
        let keys: HashSet<_> = out.candidates.iter().map(|c| c.key.clone()).collect();
        prop_assert_eq!(keys.len(), out.candidates.len());
    }

    #[test]
    fn output_is_sorted_by_fused_score(hits in prop::collection::vec(arb_hit(), 0..60), bias in arb_bias()) {
        let engine = FusionEngine::new(FusionConfig::default(), bias);
        let out = engine.fuse(&hits).candidates;
        for pair in out.windows(2) {
            prop_assert!(pair[0].fused_score >= pair[1].fused_score);
        }
    }

    #[test]
    fn boosting_preserves_relative_order(hits in prop::collection::vec(arb_hit(), 0..60), bias in arb_bias()) {
        let fused = weighted::fuse(&hits, &FusionConfig::default());
        let mut before = fused.clone();
        fathom_retrieval::fusion::sort_candidates(&mut before);

        let engine = FusionEngine::new(FusionConfig::default(), bias);
        let after = engine.fuse(&hits).candidates;

        // Within one group, and among the non-boosted, order is unchanged.
        for (i, a) in before.iter().enumerate() {
            for b in before.iter().skip(i + 1) {
                let same_group = a.group().is_some() && a.group() == b.group();
                let a_after = &after[position(&after, a)];
                let b_after = &after[position(&after, b)];
                let both_plain = !a_after.boosted && !b_after.boosted;
                if same_group || both_plain {
                    prop_assert!(position(&after, a) < position(&after, b));
                }
            }
        }
    }

    #[test]
    fn boost_applies_at_most_once(hits in prop::collection::vec(arb_hit(), 0..40), bias in arb_bias()) {
        let fused = weighted::fuse(&hits, &FusionConfig::default());
        let (once, _) = group_boost::apply_group_boost(fused, &bias);
        for c in &once {
            if c.boosted {
                let again = c.boosted_by(bias.boost_factor, bias.boost_cap);
                prop_assert_eq!(again.fused_score, c.fused_score);
                prop_assert!(c.fused_score >= c.base_score);
                prop_assert!(c.fused_score <= c.base_score * bias.boost_factor + 1e-12);
            } else {
                prop_assert_eq!(c.fused_score, c.base_score);
            }
        }
    }

    #[test]
    fn normalized_scores_are_in_unit_range(scores in prop::collection::vec(-5.0f64..50.0, 0..30)) {
        let mut hits: Vec<SearchHit> = scores
            .iter()
            .map(|&score| SearchHit {
                doc_id: "d".into(),
                span: "s".into(),
                text: String::new(),
                score,
                metadata: SourceMetadata::default(),
            })
            .collect();
        normalize_scores(&mut hits);
        for h in &hits {
            prop_assert!((0.0..=1.0).contains(&h.score));
        }
    }
}

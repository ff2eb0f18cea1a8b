//! Merge local annotations and ratings into fetched records.

use common::{AnnotationMap, EnrichedWine, ScoreMap, WineRecord};

/// Attach the user's annotation and personal score to each wine.
///
/// A matching annotation replaces the record's `pairings` and `description`;
/// records without one keep whatever the payload carried. The personal
/// score always comes from `scores`, defaulting to 0 (unrated).
pub fn enrich(
    wines: Vec<WineRecord>,
    annotations: &AnnotationMap,
    scores: &ScoreMap,
) -> Vec<EnrichedWine> {
    wines
        .into_iter()
        .map(|mut record| {
            if let Some(ann) = annotations.get(&record.name) {
                record.pairings = Some(ann.pairings.clone());
                record.description = Some(ann.description.clone());
            }
            let personal_score = scores.get(&record.name).copied().unwrap_or(0);
            EnrichedWine {
                record,
                personal_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::LocalAnnotation;

    fn wine(name: &str, pairings: Option<Vec<&str>>) -> WineRecord {
        WineRecord {
            name: name.into(),
            wine_type: "Red".into(),
            store: "Carrefour".into(),
            pairings: pairings.map(|p| p.into_iter().map(String::from).collect()),
            description: Some("from payload".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_annotation_overrides_remote_pairings() {
        let mut annotations = AnnotationMap::new();
        annotations.insert(
            "A".into(),
            LocalAnnotation {
                pairings: vec!["Fish".into()],
                description: "Crisp".into(),
            },
        );

        let out = enrich(
            vec![wine("A", Some(vec!["Red meat", "Dessert"]))],
            &annotations,
            &ScoreMap::new(),
        );

        assert_eq!(out[0].record.pairings, Some(vec!["Fish".to_string()]));
        assert_eq!(out[0].record.description.as_deref(), Some("Crisp"));
    }

    #[test]
    fn test_empty_annotation_clears_remote_fields() {
        let mut annotations = AnnotationMap::new();
        annotations.insert("A".into(), LocalAnnotation::default());

        let out = enrich(vec![wine("A", Some(vec!["Fish"]))], &annotations, &ScoreMap::new());

        assert_eq!(out[0].record.pairings, Some(vec![]));
        assert_eq!(out[0].record.description.as_deref(), Some(""));
    }

    #[test]
    fn test_unannotated_wine_keeps_payload_fields() {
        let out = enrich(
            vec![wine("B", None), wine("C", Some(vec!["Seafood"]))],
            &AnnotationMap::new(),
            &ScoreMap::new(),
        );

        assert_eq!(out[0].record.pairings, None);
        assert_eq!(out[1].record.pairings, Some(vec!["Seafood".to_string()]));
        assert_eq!(out[1].record.description.as_deref(), Some("from payload"));
    }

    #[test]
    fn test_personal_score_defaults_to_zero() {
        let mut scores = ScoreMap::new();
        scores.insert("A".into(), 4);

        let out = enrich(
            vec![wine("A", None), wine("B", None)],
            &AnnotationMap::new(),
            &scores,
        );

        assert_eq!(out[0].personal_score, 4);
        assert_eq!(out[1].personal_score, 0);
    }

    #[test]
    fn test_join_is_by_exact_name() {
        let mut scores = ScoreMap::new();
        scores.insert("Chateau X".into(), 5);

        // A renamed wine no longer matches its old rating.
        let out = enrich(vec![wine("Château X", None)], &AnnotationMap::new(), &scores);
        assert_eq!(out[0].personal_score, 0);
    }
}

use fathom_core::config::FathomConfig;
use fathom_core::errors::ConfigError;
use fathom_core::models::SearchMode;
use fathom_core::traits::{IIndexProvider, IReasoningModel};
use fathom_providers::{index_from_config, model_from_config, InMemoryIndex};
use test_fixtures::fixture_path;

#[tokio::test]
async fn corpus_fixture_answers_both_modes() {
    let index = InMemoryIndex::from_path(fixture_path("corpora/company_revenue.json")).unwrap();
    assert!(index.len() >= 3);

    for mode in SearchMode::ALL {
        let hits = index.search("Company B revenue 2023", mode, 5).await.unwrap();
        assert!(!hits.is_empty(), "{mode:?} returned nothing");
        assert_eq!(hits[0].doc_id, "bolt-10k-2023");
        assert_eq!(hits[0].metadata.group.as_deref(), Some("Company B"));
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[tokio::test]
async fn quarterly_fixture_has_no_q4_passage() {
    let index = InMemoryIndex::from_path(fixture_path("corpora/quarterly_no_q4.json")).unwrap();
    let hits = index.search("Company A Q4 2023 revenue", SearchMode::Keyword, 10).await.unwrap();
    assert!(hits.iter().all(|h| !h.text.contains("Q4")));
}

#[test]
fn missing_corpus_file_is_reported() {
    let err = InMemoryIndex::from_path("/definitely/not/here.json").err().unwrap();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn malformed_corpus_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.json");
    std::fs::write(&path, "{\"documents\": 3}").unwrap();
    assert!(matches!(
        InMemoryIndex::from_path(&path).err().unwrap(),
        ConfigError::ParseError { .. }
    ));
}

#[test]
fn config_selects_the_local_corpus() {
    let mut config = FathomConfig::default();
    config.providers.corpus_path = Some(fixture_path("corpora/company_revenue.json").display().to_string());
    let index = index_from_config(&config).unwrap();
    assert_eq!(index.name(), "in-memory");
}

#[test]
fn remote_index_without_key_is_fatal() {
    let mut config = FathomConfig::default();
    config.providers.index_base_url = Some("https://search.example".into());
    config.providers.index_api_key_env = "FATHOM_TEST_KEY_THAT_IS_NEVER_SET".into();
    let err = index_from_config(&config).err().unwrap();
    assert!(matches!(err, ConfigError::MissingCredential { ref name } if name == "FATHOM_TEST_KEY_THAT_IS_NEVER_SET"));
}

#[test]
fn no_index_configured_is_fatal() {
    assert!(matches!(
        index_from_config(&FathomConfig::default()).err().unwrap(),
        ConfigError::MissingCredential { .. }
    ));
}

#[test]
fn default_model_points_at_local_ollama() {
    let model = model_from_config(&FathomConfig::default()).unwrap();
    assert!(model.name().starts_with("ollama:"));
}

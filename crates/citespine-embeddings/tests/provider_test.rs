use citespine_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use citespine_core::traits::IQueryEmbedder;
use citespine_embeddings::EmbeddingProvider;

#[tokio::test]
async fn default_config_builds_hashed_provider() {
    let embedder = EmbeddingProvider::cached_from_config(&EmbeddingConfig::default()).unwrap();
    assert_eq!(embedder.model_id(), "hashed-384");
    assert_eq!(embedder.dimensions(), 384);
    let v = embedder.embed("right-of-use asset").await.unwrap();
    assert_eq!(v.len(), 384);
}

#[test]
fn api_provider_requires_endpoint() {
    let config = EmbeddingConfig {
        provider: EmbeddingProviderKind::Api,
        api_endpoint: None,
        ..Default::default()
    };
    assert!(EmbeddingProvider::from_config(&config).is_err());
}

#[test]
fn api_provider_uses_configured_model_id() {
    let config = EmbeddingConfig {
        provider: EmbeddingProviderKind::Api,
        api_endpoint: Some("http://127.0.0.1:9/embeddings".into()),
        model_id: "bge-small-en".into(),
        ..Default::default()
    };
    let provider = EmbeddingProvider::from_config(&config).unwrap();
    assert_eq!(provider.model_id(), "bge-small-en");
    assert!(matches!(provider, EmbeddingProvider::Api(_)));
}

#![cfg(feature = "reqwest")]

// self
use vercel_token_backend::{
	_preludet::*,
	config::{CONFIG_KEY, ConfigCandidate, DEFAULT_BASE_URL},
	store::Storage,
};

#[tokio::test]
async fn minimal_configuration_resolves_defaults() {
	let (backend, storage, _) = build_memory_test_backend();

	backend.configure(ConfigCandidate::new("k1")).await.expect("Configure should succeed.");

	let config = backend
		.config_store()
		.get()
		.await
		.expect("Stored config should load.")
		.expect("Stored config should exist.");

	assert_eq!(config.api_key.expose(), "k1");
	assert_eq!(config.base_url, DEFAULT_BASE_URL);
	assert_eq!(config.max_ttl, Duration::seconds(600));
	assert_eq!(config.clone().with_defaults(), config);

	let summary = backend.config_summary().await.expect("Summary should load.");

	assert!(summary.api_key_set);
	assert_eq!(summary.max_ttl, Duration::seconds(600));
	assert!(
		!serde_json::to_string(&summary).expect("Summary should serialize.").contains("k1")
	);
	assert!(storage.contains(CONFIG_KEY));
}

#[tokio::test]
async fn missing_api_key_never_overwrites_record() {
	let (backend, storage, _) = build_memory_test_backend();

	backend
		.configure(ConfigCandidate::new("k1").with_max_ttl_secs(30))
		.await
		.expect("Configure should succeed.");

	let before = storage.raw(CONFIG_KEY);
	let err = backend
		.configure(ConfigCandidate::default().with_max_ttl_secs(60))
		.await
		.expect_err("Missing API key should be rejected.");

	assert!(matches!(err, Error::MissingApiKey));
	assert_eq!(storage.raw(CONFIG_KEY), before);
}

#[tokio::test]
async fn writes_replace_the_whole_record() {
	let (backend, _, _) = build_memory_test_backend();

	backend
		.configure(ConfigCandidate::new("k1").with_max_ttl_secs(30).with_default_scope("team_a"))
		.await
		.expect("First configure should succeed.");
	backend.configure(ConfigCandidate::new("k2")).await.expect("Second configure should succeed.");

	let summary = backend.config_summary().await.expect("Summary should load.");

	assert_eq!(summary.max_ttl, Duration::seconds(600));
	assert_eq!(summary.default_scope, None);
}

#[tokio::test]
async fn unusable_max_ttl_is_rejected_before_storing() {
	let (backend, storage, _) = build_memory_test_backend();
	let err = backend
		.configure(ConfigCandidate::new("k1").with_max_ttl_secs(i64::MAX as u64))
		.await
		.expect_err("Max TTL past the representable range should be rejected.");

	assert!(matches!(err, Error::InvalidTtl { .. }));
	assert!(!storage.contains(CONFIG_KEY));
}

#[tokio::test]
async fn invalid_base_url_is_rejected() {
	let (backend, storage, _) = build_memory_test_backend();
	let err = backend
		.configure(ConfigCandidate::new("k1").with_base_url("not a url"))
		.await
		.expect_err("Unparseable base URL should be rejected.");

	assert!(matches!(err, Error::InvalidBaseUrl { .. }));
	assert!(!storage.contains(CONFIG_KEY));
}

#[tokio::test]
async fn corrupt_record_is_decode_error() {
	let (backend, storage, _) = build_memory_test_backend();

	storage
		.put(CONFIG_KEY, b"{\"max_ttl\":\"ten\"}".to_vec())
		.await
		.expect("Raw write should succeed.");

	let err = backend.config_summary().await.expect_err("Corrupt record should fail to decode.");

	match err {
		Error::Decode { source } => assert_eq!(source.path().to_string(), "max_ttl"),
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn storage_failures_surface_as_storage_errors() {
	let (backend, storage, _) = build_memory_test_backend();

	storage.fail_put(true);

	assert!(matches!(
		backend.configure(ConfigCandidate::new("k1")).await,
		Err(Error::Storage(_))
	));

	storage.fail_put(false);
	backend.configure(ConfigCandidate::new("k1")).await.expect("Configure should succeed.");
	storage.fail_delete(true);

	assert!(matches!(backend.delete_config().await, Err(Error::Storage(_))));
	assert!(storage.contains(CONFIG_KEY));

	storage.fail_get(true);

	assert!(matches!(backend.config_exists().await, Err(Error::Storage(_))));
}

#[tokio::test]
async fn delete_config_requires_existing_record() {
	let (backend, _, _) = build_memory_test_backend();

	assert!(matches!(backend.delete_config().await, Err(Error::NotConfigured)));
	assert!(!backend.config_exists().await.expect("Existence check should succeed."));

	backend.configure(ConfigCandidate::new("k1")).await.expect("Configure should succeed.");
	backend.delete_config().await.expect("Delete should succeed.");
	backend.config_store().delete().await.expect("Store-level delete should be idempotent.");

	assert!(matches!(backend.config_summary().await, Err(Error::NotConfigured)));
}

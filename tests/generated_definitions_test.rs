//! Loading generated client documents into a registry.
//!
//! The documents mirror what the configuration generator emits: a name, a
//! provider tag, an optional retry-policy reference, and a provider-shaped
//! options payload.

use llm_registry::prelude::*;

#[path = "support/mock_clients.rs"]
mod support;

use support::{ScriptedFactory, scripted_registry};

fn loaded_registry() -> llm_registry::ClientRegistry {
    scripted_registry(
        ScriptedFactory::replying(ProviderKind::OpenAi, "ok from openai"),
        ScriptedFactory::replying(ProviderKind::Azure, "ok from azure"),
    )
}

#[tokio::test]
async fn generated_documents_decode_and_register() {
    let raw = serde_json::json!([
        {
            "name": "AZURE_DEFAULT",
            "provider": "baml-azure-chat",
            "options": { "deployment": "gpt-35-turbo-default" }
        },
        {
            "name": "AZURE_GPT4",
            "provider": "baml-azure-chat",
            "options": { "deployment": "gpt-4", "api_key": "sk-test" }
        },
        {
            "name": "LARGE_RESPONSE",
            "provider": "baml-openai-chat",
            "options": { "model": "gpt-4-32k" }
        },
        {
            "name": "ResilientGPT4",
            "retry_policy": "DefaultRetry",
            "provider": "baml-fallback",
            "options": {
                "strategy": [
                    { "client": "AZURE_DEFAULT" },
                    { "client": "AZURE_GPT4" },
                    { "client": "LARGE_RESPONSE" }
                ]
            }
        }
    ]);
    let definitions: Vec<ClientDefinition> = serde_json::from_value(raw).unwrap();

    let registry = loaded_registry();
    let handles = registry.register_all(definitions).unwrap();
    assert_eq!(handles.len(), 4);
    assert_eq!(
        registry.client_names(),
        vec!["AZURE_DEFAULT", "AZURE_GPT4", "LARGE_RESPONSE", "ResilientGPT4"]
    );

    // The fallback references a policy no document has registered yet.
    let err = registry.validate().unwrap_err();
    assert!(matches!(err, ClientError::UnknownRetryPolicy { ref name } if name == "DefaultRetry"));

    registry
        .register_retry_policy(
            "DefaultRetry",
            RetryPolicy::exponential_backoff(3, 200, 10_000, 1.5),
        )
        .unwrap();
    registry.validate().unwrap();

    let resilient = registry.client("ResilientGPT4").unwrap();
    assert_eq!(resilient.retry_policy().unwrap().unwrap().max_retries, 3);
    let response = resilient.ask("hello").await.unwrap();
    assert_eq!(response.content, "ok from azure");
}

#[test]
fn retry_policy_documents_decode_with_generator_defaults() {
    let policy: RetryPolicy = serde_json::from_value(serde_json::json!({
        "max_retries": 5,
        "strategy": { "type": "exponential_backoff", "params": { "delay_ms": 300 } }
    }))
    .unwrap();

    assert_eq!(policy.max_retries, 5);
    match policy.strategy {
        RetryStrategy::ExponentialBackoff {
            delay_ms,
            max_delay_ms,
            multiplier,
        } => {
            assert_eq!(delay_ms, 300);
            assert_eq!(max_delay_ms, 10_000);
            assert!((multiplier - 1.5).abs() < f64::EPSILON);
        }
        other => panic!("unexpected strategy: {other:?}"),
    }

    let registry = loaded_registry();
    registry.register_retry_policy("CustomRetry", policy).unwrap();
    let handle = registry
        .register(
            ClientDefinition::new(
                "GPT4",
                ProviderOptions::OpenAi(OpenAiOptions::new("gpt-4o")),
            )
            .with_retry_policy("CustomRetry"),
        )
        .unwrap();
    assert_eq!(handle.retry_policy().unwrap().unwrap().max_retries, 5);
}

#[test]
fn unknown_provider_tags_are_rejected() {
    // Typed path: the tagged union refuses the tag outright.
    serde_json::from_value::<ClientDefinition>(serde_json::json!({
        "name": "Mystery",
        "provider": "baml-round-robin",
        "options": { "strategy": [] }
    }))
    .unwrap_err();

    // Raw path: the registry reports which tag it did not recognize.
    let registry = loaded_registry();
    let err = registry
        .register_raw(
            "Mystery",
            "baml-round-robin",
            None,
            serde_json::json!({ "strategy": [] }),
        )
        .unwrap_err();
    assert!(
        matches!(err, ClientError::UnknownProvider { ref provider } if provider == "baml-round-robin")
    );
}

#[tokio::test]
async fn register_raw_checks_the_payload_shape() {
    let registry = loaded_registry();

    let handle = registry
        .register_raw(
            "AZURE_GPT4",
            "azure",
            None,
            serde_json::json!({ "deployment": "gpt-4" }),
        )
        .unwrap();
    assert_eq!(handle.provider(), ProviderKind::Azure);
    let response = handle.ask("hello").await.unwrap();
    assert_eq!(response.content, "ok from azure");

    // An azure payload without a deployment does not decode.
    let err = registry
        .register_raw(
            "Broken",
            "azure",
            None,
            serde_json::json!({ "model": "gpt-4" }),
        )
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidOptions(_)));
    assert!(!registry.contains("Broken"));
}

#[test]
fn dangling_references_fail_validation() {
    let registry = loaded_registry();

    registry
        .register_raw(
            "Resilient",
            "fallback",
            None,
            serde_json::json!({ "strategy": [{ "client": "GHOST" }] }),
        )
        .unwrap();

    let err = registry.validate().unwrap_err();
    assert!(matches!(
        err,
        ClientError::UnresolvedDelegate { ref client, ref delegate }
            if client == "Resilient" && delegate == "GHOST"
    ));
}

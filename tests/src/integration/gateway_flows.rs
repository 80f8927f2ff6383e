//! # Gateway Flows
//!
//! Behaviour the gateway adds on top of the chaincode: the query cache,
//! the registration proxy, the election catalog and configuration loading.
//!
//! ## Flows Tested:
//!
//! 1. **Query cache**: stale reads within the TTL, refresh after expiry
//! 2. **Registration proxy**: duplicates, validation, eager vs saga recovery
//! 3. **Election catalog**: off-ledger elections feeding on-chain candidates
//! 4. **Configuration**: TOML file plus environment overrides
//! 5. **Telemetry**: gateway activity shows up in the metrics registry

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::time::Duration;

    use ballot_telemetry::{init_telemetry, TelemetryConfig};
    use bc_01_voting_ledger::{
        Candidate, CommitMode, ContractConfig, InMemoryStateStore, KeyLayout, VotingContract,
    };
    use bc_02_chain_gateway::{
        CandidateProfile, GatewayApi, GatewayConfig, InMemoryDeployment,
        InMemoryRegistrationStore, InProcessLedger, LedgerQueryExecutor, NewElection,
        RegistrationConfig, RegistrationMode, RegistrationProxy, RegistrationStore,
        TransactionGateway,
    };
    use shared_types::{functions, Classify, ErrorKind};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const CHANNEL: &str = "mychannel";
    const CONTRACT: &str = "basic";

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    async fn register_voter(gateway: &TransactionGateway, idnp: &str, name: &str) {
        gateway
            .invoke(functions::REGISTER_VOTER, &args(&[idnp, name]))
            .await
            .unwrap();
    }

    async fn register_candidate(gateway: &TransactionGateway, id: &str, election: &str) {
        gateway
            .invoke(functions::REGISTER_CANDIDATE, &args(&[id, "Candidate", election]))
            .await
            .unwrap();
    }

    async fn vote_count(gateway: &TransactionGateway, candidate: &str) -> String {
        gateway
            .query(CHANNEL, CONTRACT, functions::GET_VOTE_COUNT, &args(&[candidate]))
            .await
            .unwrap()
    }

    /// Proxy and gateway over a ledger the caller controls, so a test can
    /// decide when the chaincode becomes reachable.
    struct ProxyFixture {
        gateway: TransactionGateway,
        ledger: Arc<InProcessLedger>,
        registrations: Arc<InMemoryRegistrationStore>,
        contract: Arc<VotingContract<InMemoryStateStore>>,
    }

    fn proxy_fixture(mode: RegistrationMode) -> ProxyFixture {
        let mut config = GatewayConfig::default();
        config.cache.enabled = false;
        config.registration = RegistrationConfig {
            mode,
            ..RegistrationConfig::default()
        };

        let ledger = Arc::new(InProcessLedger::new());
        let registrations = Arc::new(InMemoryRegistrationStore::new());
        let contract = Arc::new(VotingContract::new(
            Arc::new(InMemoryStateStore::new()),
            config.contract_config(),
        ));
        let proxy = RegistrationProxy::new(
            registrations.clone(),
            ledger.clone(),
            &config.registration,
        );
        let gateway = TransactionGateway::new(
            &config,
            proxy,
            Arc::new(LedgerQueryExecutor::new(ledger.clone())),
        );

        ProxyFixture {
            gateway,
            ledger,
            registrations,
            contract,
        }
    }

    // =============================================================================
    // QUERY CACHE
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_cached_count_is_stale_until_ttl_expires() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();
        register_voter(&d.gateway, "v1", "Alice").await;
        register_candidate(&d.gateway, "c1", "E1").await;

        assert_eq!(vote_count(&d.gateway, "c1").await, "0");
        let evaluations = d.ledger.evaluations();

        d.gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();

        // Writes do not invalidate: the pre-vote value is served from cache
        assert_eq!(vote_count(&d.gateway, "c1").await, "0");
        assert_eq!(d.ledger.evaluations(), evaluations);

        tokio::time::advance(Duration::from_secs(300)).await;
        assert_eq!(vote_count(&d.gateway, "c1").await, "1");
        assert_eq!(d.ledger.evaluations(), evaluations + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_keys_separate_arguments_and_routes() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();
        register_candidate(&d.gateway, "c1", "E1").await;
        register_candidate(&d.gateway, "c2", "E1").await;

        vote_count(&d.gateway, "c1").await;
        vote_count(&d.gateway, "c2").await;
        vote_count(&d.gateway, "c1").await;
        assert_eq!(d.ledger.evaluations(), 2);
        assert_eq!(d.cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_queries_are_retried_not_cached() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();

        for _ in 0..2 {
            let err = d
                .gateway
                .query(
                    CHANNEL,
                    CONTRACT,
                    functions::GET_CANDIDATES_BY_ELECTION,
                    &args(&["E9"]),
                )
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert_eq!(d.ledger.evaluations(), 2);
        assert!(d.cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_purged() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();
        register_candidate(&d.gateway, "c1", "E1").await;
        vote_count(&d.gateway, "c1").await;
        assert_eq!(d.cache.len(), 1);

        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(d.cache.purge_expired(), 1);
        assert!(d.cache.is_empty());
    }

    // =============================================================================
    // REGISTRATION PROXY
    // =============================================================================

    #[tokio::test]
    async fn test_duplicate_registration_never_reaches_ledger() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();
        register_voter(&d.gateway, "2001", "Alice").await;
        let submissions = d.ledger.submissions();

        let err = d
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Mallory"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "user with IDNP 2001 already registered");
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
        assert_eq!(d.ledger.submissions(), submissions);

        let record = d
            .registrations
            .find_by_external_id("2001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "Alice");
        assert_eq!(record.role, "user");
        assert!(record.registered);
    }

    #[tokio::test]
    async fn test_invalid_registration_touches_nothing() {
        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();

        let err = d
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["", "Alice"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "voter IDNP cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = d
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Alice", "extra"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments: expected 2, got 3"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert_eq!(d.ledger.submissions(), 0);
        assert!(d.registrations.is_empty());
    }

    #[tokio::test]
    async fn test_eager_registration_diverges_on_ledger_failure() {
        let f = proxy_fixture(RegistrationMode::Eager);

        // Chaincode not deployed yet: the ledger rejects the submission
        let err = f
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Alice"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "contract basic not found on channel mychannel");

        let record = f
            .registrations
            .find_by_external_id("2001")
            .await
            .unwrap()
            .unwrap();
        assert!(record.registered);

        // The local record now blocks the retry even though the ledger never saw it
        f.ledger.deploy(CHANNEL, f.contract.clone());
        let err = f
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Alice"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);
        assert_eq!(f.ledger.submissions(), 1);
    }

    #[tokio::test]
    async fn test_saga_registration_resumes_after_ledger_failure() {
        let f = proxy_fixture(RegistrationMode::Saga);

        assert!(f
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Alice"]))
            .await
            .is_err());
        let pending = f
            .registrations
            .find_by_external_id("2001")
            .await
            .unwrap()
            .unwrap();
        assert!(!pending.registered);

        f.ledger.deploy(CHANNEL, f.contract.clone());
        f.gateway
            .invoke(functions::REGISTER_VOTER, &args(&["2001", "Alice"]))
            .await
            .unwrap();

        let record = f
            .registrations
            .find_by_external_id("2001")
            .await
            .unwrap()
            .unwrap();
        assert!(record.registered);
        assert_eq!(record.id, pending.id);
        assert_eq!(f.registrations.len(), 1);

        // The voter now exists on the ledger and can vote
        register_candidate(&f.gateway, "c1", "E1").await;
        f.gateway
            .invoke(functions::CAST_VOTE, &args(&["2001", "c1"]))
            .await
            .unwrap();
        assert_eq!(vote_count(&f.gateway, "c1").await, "1");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_admit_one() {
        let d = Arc::new(InMemoryDeployment::new(&GatewayConfig::default()).unwrap());

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let d = d.clone();
                tokio::spawn(async move {
                    let name = format!("n{i}");
                    d.gateway
                        .invoke(functions::REGISTER_VOTER, &args(&["2001", &name]))
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyRegistered),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(d.registrations.len(), 1);
        assert_eq!(d.ledger.submissions(), 1);
    }

    // =============================================================================
    // ELECTION CATALOG
    // =============================================================================

    #[tokio::test]
    async fn test_catalog_election_feeds_on_chain_candidates() {
        let mut config = GatewayConfig::default();
        config.cache.enabled = false;
        let d = InMemoryDeployment::new(&config).unwrap();

        let election = d
            .catalog
            .register_election(NewElection {
                title: "Mayor".into(),
                election_type: "local".into(),
                start_date: "2025-05-01".into(),
                end_date: "2025-05-02".into(),
                ..NewElection::default()
            })
            .await
            .unwrap();

        let profiles = d
            .catalog
            .register_candidates(
                election.id,
                vec![CandidateProfile {
                    first_name: "Ana".into(),
                    last_name: "Popescu".into(),
                    age: 45,
                    ..CandidateProfile::default()
                }],
            )
            .await
            .unwrap();
        assert_eq!(profiles[0].election_id, election.id);

        let election_id = election.id.to_string();
        let candidate_id = format!("cand-{}", profiles[0].id);
        register_candidate(&d.gateway, &candidate_id, &election_id).await;

        let json = d
            .gateway
            .query(
                CHANNEL,
                CONTRACT,
                functions::GET_CANDIDATES_BY_ELECTION,
                &args(&[&election_id]),
            )
            .await
            .unwrap();
        let on_chain: Vec<Candidate> = serde_json::from_str(&json).unwrap();
        assert_eq!(on_chain.len(), 1);
        assert_eq!(on_chain[0].id, candidate_id);
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    #[tokio::test]
    async fn test_deployment_from_toml_and_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[ledger]
channel = "votechannel"
submit_timeout = "15s"

[cache]
enabled = true
ttl = "1m"

[registration]
mode = "saga"

[contract]
key_layout = "namespaced"
commit_mode = "atomic"
"#
        )
        .unwrap();

        let mut config = GatewayConfig::load(file.path()).unwrap();
        config
            .apply_overrides_from(|name| match name {
                "BC_CACHE_ENABLED" => Some("false".into()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.ledger.channel, "votechannel");
        assert_eq!(config.ledger.contract, "basic");
        assert_eq!(config.ledger.submit_timeout, Duration::from_secs(15));
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert!(!config.cache.enabled);
        assert_eq!(config.registration.mode, RegistrationMode::Saga);
        assert_eq!(
            config.contract_config(),
            ContractConfig::default()
                .with_key_layout(KeyLayout::Namespaced)
                .with_commit_mode(CommitMode::Atomic)
        );

        let d = InMemoryDeployment::new(&config).unwrap();
        assert_eq!(d.gateway.channel(), "votechannel");
        register_voter(&d.gateway, "v1", "Alice").await;
        register_candidate(&d.gateway, "c1", "E1").await;
        d.gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();

        let count = d
            .gateway
            .query("votechannel", CONTRACT, functions::GET_VOTE_COUNT, &args(&["c1"]))
            .await
            .unwrap();
        assert_eq!(count, "1");
        assert!(d.cache.is_empty());
    }

    #[test]
    fn test_bad_env_override_is_rejected() {
        let mut config = GatewayConfig::default();
        let err = config
            .apply_overrides_from(|name| match name {
                "BC_REGISTRATION_MODE" => Some("lazy".into()),
                _ => None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("BC_REGISTRATION_MODE"));
        assert_eq!(config.registration.mode, RegistrationMode::Eager);
    }

    // =============================================================================
    // TELEMETRY
    // =============================================================================

    #[tokio::test]
    async fn test_gateway_activity_is_exported() {
        let telemetry = init_telemetry(TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::for_component("gateway-flows")
        })
        .unwrap();

        let d = InMemoryDeployment::new(&GatewayConfig::default()).unwrap();
        register_voter(&d.gateway, "v1", "Alice").await;
        let _ = d
            .gateway
            .invoke(functions::REGISTER_VOTER, &args(&["v1", "Alice"]))
            .await;

        let exported = telemetry.metrics().gather().unwrap();
        assert!(exported.contains("bc_registrations_total"));
        assert!(exported.contains("bc_gateway_errors_total"));
        assert!(exported.contains("bc_ledger_calls_total"));
    }
}

//! # Voting Flows
//!
//! The voting chaincode deployed behind the in-process ledger and driven
//! through [`TransactionGateway`], the way callers reach it.
//!
//! ## Flows Tested:
//!
//! 1. **Register, vote, count**: the five reference scenarios end to end
//! 2. **Crash window**: a failure between the candidate and voter writes
//! 3. **Same-voter race**: sequential vs atomic commit under interleaving
//! 4. **Key layout**: flat collisions vs namespaced keys

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bc_01_voting_ledger::test_utils::{FaultyStore, GatedStore};
    use bc_01_voting_ledger::{
        Candidate, CommitMode, ContractConfig, InMemoryStateStore, KeyLayout, LedgerStateStore,
        VotingContract,
    };
    use bc_02_chain_gateway::{
        GatewayApi, GatewayConfig, GatewayError, InMemoryDeployment, InMemoryRegistrationStore,
        InProcessLedger, LedgerQueryExecutor, RegistrationProxy, TransactionGateway,
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

    /// Gateway without a query cache over a caller-supplied world state.
    fn gateway_over<S>(store: Arc<S>, contract: ContractConfig) -> TransactionGateway
    where
        S: LedgerStateStore + 'static,
    {
        let mut config = GatewayConfig::default();
        config.cache.enabled = false;

        let chaincode = Arc::new(VotingContract::new(store, contract));
        let ledger = Arc::new(InProcessLedger::new());
        ledger.deploy(CHANNEL, chaincode);

        let proxy = RegistrationProxy::new(
            Arc::new(InMemoryRegistrationStore::new()),
            ledger.clone(),
            &config.registration,
        );
        TransactionGateway::new(&config, proxy, Arc::new(LedgerQueryExecutor::new(ledger)))
    }

    async fn seed(gateway: &TransactionGateway) {
        gateway
            .invoke(functions::REGISTER_VOTER, &args(&["v1", "Alice"]))
            .await
            .unwrap();
        gateway
            .invoke(functions::REGISTER_CANDIDATE, &args(&["c1", "Bob", "E1"]))
            .await
            .unwrap();
    }

    async fn vote_count(gateway: &TransactionGateway, candidate: &str) -> String {
        gateway
            .query(CHANNEL, CONTRACT, functions::GET_VOTE_COUNT, &args(&[candidate]))
            .await
            .unwrap()
    }

    fn uncached_deployment() -> InMemoryDeployment {
        let mut config = GatewayConfig::default();
        config.cache.enabled = false;
        InMemoryDeployment::new(&config).unwrap()
    }

    // =============================================================================
    // REFERENCE SCENARIOS
    // =============================================================================

    #[tokio::test]
    async fn test_vote_is_counted() {
        let d = uncached_deployment();
        seed(&d.gateway).await;

        let receipt = d
            .gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();
        assert!(receipt.starts_with("Transaction ID : "));
        assert_eq!(vote_count(&d.gateway, "c1").await, "1");
    }

    #[tokio::test]
    async fn test_repeat_vote_rejected_and_count_unchanged() {
        let d = uncached_deployment();
        seed(&d.gateway).await;
        d.gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();

        let err = d
            .gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "voter v1 has already voted");
        assert_eq!(err.kind(), ErrorKind::AlreadyVoted);
        assert_eq!(vote_count(&d.gateway, "c1").await, "1");
    }

    #[tokio::test]
    async fn test_unregistered_voter_rejected() {
        let d = uncached_deployment();
        seed(&d.gateway).await;

        let err = d
            .gateway
            .invoke(functions::CAST_VOTE, &args(&["v2", "c1"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "voter v2 does not exist");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(vote_count(&d.gateway, "c1").await, "0");
    }

    #[tokio::test]
    async fn test_empty_election_id_rejected() {
        let d = uncached_deployment();
        let err = d
            .gateway
            .query(
                CHANNEL,
                CONTRACT,
                functions::GET_CANDIDATES_BY_ELECTION,
                &args(&[""]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "electionID cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_election_without_candidates_is_not_found() {
        let d = uncached_deployment();
        seed(&d.gateway).await;

        let err = d
            .gateway
            .query(
                CHANNEL,
                CONTRACT,
                functions::GET_CANDIDATES_BY_ELECTION,
                &args(&["E2"]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "no candidates found for election ID: E2");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_election_filter_returns_only_its_candidates() {
        let d = uncached_deployment();
        seed(&d.gateway).await;
        d.gateway
            .invoke(functions::REGISTER_CANDIDATE, &args(&["c2", "Carol", "E2"]))
            .await
            .unwrap();

        let json = d
            .gateway
            .query(
                CHANNEL,
                CONTRACT,
                functions::GET_CANDIDATES_BY_ELECTION,
                &args(&["E1"]),
            )
            .await
            .unwrap();
        let candidates: Vec<Candidate> = serde_json::from_str(&json).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "c1");
        assert_eq!(candidates[0].election_id, "E1");
    }

    #[tokio::test]
    async fn test_wrong_arity_is_a_validation_error() {
        let d = uncached_deployment();
        let err = d
            .gateway
            .invoke(functions::CAST_VOTE, &args(&["v1"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unknown_contract_is_reported() {
        let d = uncached_deployment();
        let err = d
            .gateway
            .query(CHANNEL, "fabcar", functions::GET_ALL_ASSETS, &[])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "contract fabcar not found on channel mychannel");
    }

    // =============================================================================
    // CRASH WINDOW BETWEEN THE TWO VOTE WRITES
    // =============================================================================

    #[tokio::test]
    async fn test_sequential_crash_then_retry_over_counts() {
        let store = Arc::new(FaultyStore::new(InMemoryStateStore::new()));
        let gateway = gateway_over(store.clone(), ContractConfig::default());
        seed(&gateway).await;

        // Candidate write lands, voter write fails
        store.fail_puts_after(1);
        let err = gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
        assert_eq!(vote_count(&gateway, "c1").await, "1");

        store.heal();
        gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();
        assert_eq!(vote_count(&gateway, "c1").await, "2");
    }

    #[tokio::test]
    async fn test_atomic_crash_leaves_no_partial_vote() {
        let store = Arc::new(FaultyStore::new(InMemoryStateStore::new()));
        let gateway = gateway_over(
            store.clone(),
            ContractConfig::default().with_commit_mode(CommitMode::Atomic),
        );
        seed(&gateway).await;

        store.fail_commits(true);
        let err = gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendUnavailable);
        assert_eq!(vote_count(&gateway, "c1").await, "0");

        store.heal();
        gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap();
        assert_eq!(vote_count(&gateway, "c1").await, "1");

        let err = gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyVoted);
    }

    // =============================================================================
    // SAME-VOTER RACE
    // =============================================================================

    /// Two submissions of `CastVote(v1, c1)` that both read the voter and the
    /// candidate before either writes. Returns the results and the final count.
    async fn race_same_voter(commit_mode: CommitMode) -> (Vec<Result<String, GatewayError>>, u64) {
        let world_state = Arc::new(InMemoryStateStore::new());
        let setup = gateway_over(world_state.clone(), ContractConfig::default());
        seed(&setup).await;

        let gated = Arc::new(GatedStore::new(world_state.clone(), ["v1", "c1"], 2));
        let gateway = Arc::new(gateway_over(
            gated,
            ContractConfig::default().with_commit_mode(commit_mode),
        ));

        // Chaincode runs synchronously, so each vote gets its own blocking thread
        let runtime = tokio::runtime::Handle::current();
        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let gateway = gateway.clone();
                let runtime = runtime.clone();
                tokio::task::spawn_blocking(move || {
                    runtime.block_on(async {
                        gateway
                            .invoke(functions::CAST_VOTE, &args(&["v1", "c1"]))
                            .await
                    })
                })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        let count = vote_count(&setup, "c1").await.parse().unwrap();
        (results, count)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_sequential_race_lets_both_votes_through() {
        let (results, count) = race_same_voter(CommitMode::Sequential).await;
        assert!(results.iter().all(|r| r.is_ok()));
        // Two accepted votes, one counted: the second write overwrote the first
        assert_eq!(count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_atomic_race_admits_exactly_one_vote() {
        let (results, count) = race_same_voter(CommitMode::Atomic).await;
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

        let err = results.into_iter().find_map(|r| r.err()).unwrap();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(count, 1);
    }

    // =============================================================================
    // KEY LAYOUT
    // =============================================================================

    #[tokio::test]
    async fn test_flat_layout_lists_voters_as_candidates() {
        let d = uncached_deployment();
        seed(&d.gateway).await;

        let json = d
            .gateway
            .query(CHANNEL, CONTRACT, functions::GET_ALL_ASSETS, &[])
            .await
            .unwrap();
        let assets: Vec<Candidate> = serde_json::from_str(&json).unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().any(|a| a.id == "v1" && a.votes == 0));
    }

    #[tokio::test]
    async fn test_namespaced_layout_lists_candidates_only() {
        let mut config = GatewayConfig::default();
        config.cache.enabled = false;
        config.contract.key_layout = KeyLayout::Namespaced;
        let d = InMemoryDeployment::new(&config).unwrap();
        seed(&d.gateway).await;

        // Same id for a voter and a candidate no longer collides
        d.gateway
            .invoke(functions::REGISTER_CANDIDATE, &args(&["v1", "Dan", "E1"]))
            .await
            .unwrap();
        d.gateway
            .invoke(functions::CAST_VOTE, &args(&["v1", "v1"]))
            .await
            .unwrap();

        let json = d
            .gateway
            .query(CHANNEL, CONTRACT, functions::GET_ALL_ASSETS, &[])
            .await
            .unwrap();
        let assets: Vec<Candidate> = serde_json::from_str(&json).unwrap();
        let ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "v1"]);
        assert_eq!(vote_count(&d.gateway, "v1").await, "1");
    }
}

//! Concurrency tests: many threads casting votes against one environment.
//!
//! LMDB serialises writers, so for every (voter, pair) exactly one of the
//! racing votes may apply and every tally must match the ledgers.

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::thread;

use ballot_store::{BallotStore, Candidate, CandidateStore, VoteOutcome, Voter, VoterStore, DEFAULT_PHOTO};
use ballot_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use ballot_types::{CandidateId, Gender, Role, SportCategory, Timestamp, VoterId};

fn temp_env() -> (tempfile::TempDir, Arc<LmdbEnvironment>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
    (dir, Arc::new(env))
}

fn add_candidate(env: &LmdbEnvironment, byte: u8, category: SportCategory, gender: Gender) -> CandidateId {
    let candidate = Candidate {
        id: CandidateId::new([byte; 12]),
        name: format!("runner {byte}"),
        gender,
        sport_category: category,
        photo: DEFAULT_PHOTO.to_string(),
        votes: 0,
        created_by: None,
        created_at: Timestamp::new(1),
    };
    env.insert_candidate(&candidate).expect("insert candidate");
    candidate.id
}

fn add_voter(env: &LmdbEnvironment, n: usize) -> VoterId {
    let id = VoterId::new(format!("student{n}@college.edu")).expect("voter id");
    env.insert_voter(&Voter::new(id.clone(), format!("student{n}"), "hash", Role::User, Timestamp::new(1)))
        .expect("insert voter");
    id
}

#[test]
fn racing_votes_in_one_pair_apply_exactly_once() {
    let (_dir, env) = temp_env();
    let x = add_candidate(&env, 1, SportCategory::CricketSecretary, Gender::Male);
    let y = add_candidate(&env, 2, SportCategory::CricketSecretary, Gender::Male);
    let voter = add_voter(&env, 0);

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [x, y]
        .into_iter()
        .map(|target| {
            let env = Arc::clone(&env);
            let barrier = Arc::clone(&barrier);
            let voter = voter.clone();
            thread::spawn(move || {
                barrier.wait();
                env.cast_vote(&voter, &target, Timestamp::new(10)).expect("cast vote")
            })
        })
        .collect();

    let outcomes: Vec<VoteOutcome> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let applied = outcomes
        .iter()
        .filter(|o| matches!(o, VoteOutcome::Applied(_)))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|o| matches!(o, VoteOutcome::AlreadyVoted(_)))
        .count();
    assert_eq!(applied, 1);
    assert_eq!(rejected, 1);

    let total = env.get_candidate(&x).unwrap().votes + env.get_candidate(&y).unwrap().votes;
    assert_eq!(total, 1);
    assert_eq!(env.get_voter(&voter).unwrap().voted_categories.len(), 1);
}

#[test]
fn many_voters_many_threads_keep_tallies_consistent() {
    let (_dir, env) = temp_env();
    let male = [
        add_candidate(&env, 1, SportCategory::IndoorGamesSecretary, Gender::Male),
        add_candidate(&env, 2, SportCategory::IndoorGamesSecretary, Gender::Male),
        add_candidate(&env, 3, SportCategory::IndoorGamesSecretary, Gender::Male),
    ];
    let female = add_candidate(&env, 4, SportCategory::IndoorGamesSecretary, Gender::Female);
    let voters: Vec<VoterId> = (0..16).map(|n| add_voter(&env, n)).collect();

    // Every voter fires at all three male candidates and the female one
    // from separate threads.
    let mut handles = Vec::new();
    for voter in &voters {
        for target in male.iter().chain(std::iter::once(&female)) {
            let env = Arc::clone(&env);
            let voter = voter.clone();
            let target = *target;
            handles.push(thread::spawn(move || {
                env.cast_vote(&voter, &target, Timestamp::new(20)).expect("cast vote")
            }));
        }
    }
    for h in handles {
        h.join().expect("thread panicked");
    }

    let mut ledger_counts: HashMap<CandidateId, u64> = HashMap::new();
    for voter in env.iter_voters().unwrap() {
        assert_eq!(voter.voted_categories.len(), 2, "one male and one female vote");
        for entry in voter.voted_categories {
            *ledger_counts.entry(entry.candidate).or_default() += 1;
        }
    }
    for candidate in env.iter_candidates().unwrap() {
        assert_eq!(
            candidate.votes,
            ledger_counts.get(&candidate.id).copied().unwrap_or(0),
            "tally drift for {}",
            candidate.name
        );
    }
    let male_total: u64 = male
        .iter()
        .map(|id| env.get_candidate(id).unwrap().votes)
        .sum();
    assert_eq!(male_total, voters.len() as u64);
    assert_eq!(env.get_candidate(&female).unwrap().votes, voters.len() as u64);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (x, voter) = {
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
        let x = add_candidate(&env, 1, SportCategory::OverallSportsSecretary, Gender::Female);
        let voter = add_voter(&env, 1);
        env.cast_vote(&voter, &x, Timestamp::new(5)).unwrap();
        (x, voter)
    };

    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("reopen env");
    assert_eq!(env.get_candidate(&x).unwrap().votes, 1);
    assert_eq!(env.get_voter(&voter).unwrap().voted_categories[0].candidate, x);
}

//! Demo roster: three candidates per race plus default accounts.

use ballot_store::{BallotStore, Candidate};
use ballot_types::{CandidateId, Gender, Role, SportCategory, Timestamp, VoterId};
use serde::Serialize;

use crate::{CandidateDraft, Election, ElectionError};

const MALE_NAMES: [&str; 10] = [
    "Aarav Sharma",
    "Vivaan Patel",
    "Aditya Singh",
    "Vihaan Reddy",
    "Arjun Mehra",
    "Reyansh Gupta",
    "Krishna Nair",
    "Ishaan Joshi",
    "Dhruv Choudhary",
    "Kabir Verma",
];

const FEMALE_NAMES: [&str; 10] = [
    "Ananya Iyer",
    "Diya Kapoor",
    "Aadhya Jain",
    "Myra Desai",
    "Ira Agarwal",
    "Kiara Bhat",
    "Saanvi Pillai",
    "Pari Rao",
    "Aarohi Shah",
    "Navya Menon",
];

const AVATARS: [&str; 3] = [
    "https://i.ibb.co/0Jmshvb/avatar1.png",
    "https://i.ibb.co/6WZy7yB/avatar2.png",
    "https://i.ibb.co/3yqQw1p/avatar3.png",
];

const PER_RACE: usize = 3;

/// Default accounts: (id, username, role).
const ACCOUNTS: [(&str, &str, Role); 2] = [
    ("admin@college.edu", "admin", Role::Admin),
    ("student@college.edu", "student", Role::User),
];

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub candidates_created: Vec<CandidateId>,
    pub candidates_skipped: u64,
    pub voters_created: Vec<VoterId>,
    pub voters_skipped: u64,
}

/// The seeded drafts, in creation order. Names rotate by category index
/// so neighbouring races field different people.
pub fn roster() -> Vec<CandidateDraft> {
    let mut drafts = Vec::with_capacity(SportCategory::ALL.len() * Gender::ALL.len() * PER_RACE);
    for (cat_idx, category) in SportCategory::ALL.into_iter().enumerate() {
        for gender in Gender::ALL {
            let names = match gender {
                Gender::Male => &MALE_NAMES,
                Gender::Female => &FEMALE_NAMES,
            };
            for i in 0..PER_RACE {
                let name = names[(i + cat_idx) % names.len()];
                let avatar = AVATARS[(i + cat_idx) % AVATARS.len()];
                drafts.push(CandidateDraft::new(name, gender, category).with_photo(avatar));
            }
        }
    }
    drafts
}

impl<S: BallotStore> Election<S> {
    /// Load the demo roster and default accounts. Records that already
    /// exist are skipped, so seeding twice is harmless.
    ///
    /// Seeded accounts get an empty credential; the authentication service
    /// provisions the real one.
    pub fn seed_roster(&self, now: Timestamp) -> Result<SeedReport, ElectionError> {
        let mut report = SeedReport::default();

        for draft in roster() {
            match self.create_candidate(None, &draft, now) {
                Ok(Candidate { id, .. }) => report.candidates_created.push(id),
                Err(ElectionError::Conflict(_)) => report.candidates_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        for (id, username, role) in ACCOUNTS {
            let id = VoterId::new(id).map_err(|e| ElectionError::Internal(e.to_string()))?;
            match self.register_voter(id.clone(), username, "", role, now) {
                Ok(_) => report.voters_created.push(id),
                Err(ElectionError::Conflict(_)) => report.voters_skipped += 1,
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            candidates_created = report.candidates_created.len(),
            candidates_skipped = report.candidates_skipped,
            voters_created = report.voters_created.len(),
            voters_skipped = report.voters_skipped,
            "roster seeded"
        );
        Ok(report)
    }
}

//! Per-race results for the dashboard.

use ballot_store::BallotStore;
use ballot_types::{CandidateId, Gender, SportCategory, VotingPair};
use serde::Serialize;

use crate::{CandidateView, Election, ElectionError};

/// Standings of one (category, gender) race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub category: SportCategory,
    pub gender: Gender,
    /// Sorted by votes descending, then name.
    pub candidates: Vec<CandidateView>,
    pub total_votes: u64,
    /// Everyone tied for the top score; empty until a vote is cast.
    pub leaders: Vec<CandidateId>,
}

impl RaceResult {
    pub fn pair(&self) -> VotingPair {
        VotingPair::new(self.category, self.gender)
    }
}

/// Group candidates into one race per pair, in dashboard order. Races
/// without candidates are kept so every slot can be rendered.
pub fn tabulate(candidates: Vec<CandidateView>) -> Vec<RaceResult> {
    let mut races: Vec<RaceResult> = VotingPair::all()
        .map(|pair| RaceResult {
            category: pair.category,
            gender: pair.gender,
            candidates: Vec::new(),
            total_votes: 0,
            leaders: Vec::new(),
        })
        .collect();

    for candidate in candidates {
        let pair = VotingPair::new(candidate.sport_category, candidate.gender);
        if let Some(race) = races.iter_mut().find(|r| r.pair() == pair) {
            race.total_votes += candidate.votes;
            race.candidates.push(candidate);
        }
    }

    for race in &mut races {
        race.candidates.sort_by(|a, b| {
            b.votes
                .cmp(&a.votes)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        let top = race.candidates.first().map(|c| c.votes).unwrap_or(0);
        if top > 0 {
            race.leaders = race
                .candidates
                .iter()
                .take_while(|c| c.votes == top)
                .map(|c| c.id)
                .collect();
        }
    }
    races
}

impl<S: BallotStore> Election<S> {
    /// Current standings of every race.
    pub fn results(&self) -> Result<Vec<RaceResult>, ElectionError> {
        Ok(tabulate(self.list_candidates()?))
    }
}

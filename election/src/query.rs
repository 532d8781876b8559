//! Candidate listings joined with their creators.

use std::collections::HashMap;

use ballot_store::{BallotStore, Candidate};
use ballot_types::{CandidateId, Gender, SportCategory, Timestamp, VoterId};
use serde::Serialize;

use crate::{Election, ElectionError};

/// The admin who created a candidate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatorRef {
    pub id: VoterId,
    pub username: String,
}

/// A candidate as shown to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: CandidateId,
    pub name: String,
    pub gender: Gender,
    pub sport_category: SportCategory,
    pub photo: String,
    pub votes: u64,
    /// `None` for seeded candidates and for creators no longer registered.
    pub created_by: Option<CreatorRef>,
    pub created_at: Timestamp,
}

impl CandidateView {
    fn new(candidate: Candidate, usernames: &HashMap<VoterId, String>) -> Self {
        let created_by = candidate.created_by.as_ref().and_then(|id| {
            usernames.get(id).map(|username| CreatorRef {
                id: id.clone(),
                username: username.clone(),
            })
        });
        Self {
            id: candidate.id,
            name: candidate.name,
            gender: candidate.gender,
            sport_category: candidate.sport_category,
            photo: candidate.photo,
            votes: candidate.votes,
            created_by,
            created_at: candidate.created_at,
        }
    }
}

impl<S: BallotStore> Election<S> {
    /// Every candidate, ordered by race then name.
    pub fn list_candidates(&self) -> Result<Vec<CandidateView>, ElectionError> {
        let mut candidates = self.store().iter_candidates()?;
        candidates.sort_by_cached_key(|c| (c.pair(), c.name.to_lowercase(), c.id));
        let usernames = self.creator_names(&candidates)?;
        Ok(candidates
            .into_iter()
            .map(|c| CandidateView::new(c, &usernames))
            .collect())
    }

    /// One page of [`list_candidates`](Self::list_candidates).
    pub fn list_candidates_paged(
        &self,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<CandidateView>, ElectionError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(self
            .list_candidates()?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    pub fn get_candidate(&self, id: &CandidateId) -> Result<CandidateView, ElectionError> {
        let candidate = self.store().get_candidate(id)?;
        self.view(candidate)
    }

    /// Join one candidate with its creator's username.
    pub fn view(&self, candidate: Candidate) -> Result<CandidateView, ElectionError> {
        let usernames = self.creator_names(std::slice::from_ref(&candidate))?;
        Ok(CandidateView::new(candidate, &usernames))
    }

    fn creator_names(
        &self,
        candidates: &[Candidate],
    ) -> Result<HashMap<VoterId, String>, ElectionError> {
        let mut names = HashMap::new();
        for id in candidates.iter().filter_map(|c| c.created_by.as_ref()) {
            if names.contains_key(id) {
                continue;
            }
            match self.store().get_voter(id) {
                Ok(voter) => {
                    names.insert(voter.id, voter.username);
                }
                Err(ballot_store::StoreError::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CandidateDraft;
    use ballot_nullables::NullStore;
    use ballot_types::Role;
    use std::sync::Arc;

    fn election() -> Election<NullStore> {
        Election::new(Arc::new(NullStore::new()))
    }

    #[test]
    fn listing_is_ordered_by_race_then_name() {
        let e = election();
        for (name, cat, g) in [
            ("Zoe", SportCategory::OverallSportsSecretary, Gender::Female),
            ("bob", SportCategory::CricketSecretary, Gender::Male),
            ("Amit", SportCategory::CricketSecretary, Gender::Male),
            ("Cara", SportCategory::CricketSecretary, Gender::Female),
            ("Dev", SportCategory::VolleyballSecretaryBoys, Gender::Male),
        ] {
            e.create_candidate(None, &CandidateDraft::new(name, g, cat), Timestamp::EPOCH)
                .unwrap();
        }
        let names: Vec<_> = e
            .list_candidates()
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["Dev", "Amit", "bob", "Cara", "Zoe"]);

        let page: Vec<_> = e
            .list_candidates_paged(1, 2)
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(page, ["Amit", "bob"]);
        assert!(e.list_candidates_paged(10, 2).unwrap().is_empty());
    }

    #[test]
    fn views_carry_creator_username() {
        let e = election();
        let admin = VoterId::new("admin@college.edu").unwrap();
        e.register_voter(admin.clone(), "admin", "h", Role::Admin, Timestamp::EPOCH)
            .unwrap();
        let ghost = VoterId::new("gone@college.edu").unwrap();

        let by_admin = e
            .create_candidate(
                Some(&admin),
                &CandidateDraft::new("A", Gender::Male, SportCategory::CricketSecretary),
                Timestamp::EPOCH,
            )
            .unwrap();
        let by_ghost = e
            .create_candidate(
                Some(&ghost),
                &CandidateDraft::new("B", Gender::Male, SportCategory::CricketSecretary),
                Timestamp::EPOCH,
            )
            .unwrap();

        let view = e.get_candidate(&by_admin.id).unwrap();
        assert_eq!(
            view.created_by,
            Some(CreatorRef {
                id: admin,
                username: "admin".into()
            })
        );
        assert_eq!(e.get_candidate(&by_ghost.id).unwrap().created_by, None);
        assert_eq!(e.view(by_admin.clone()).unwrap(), view);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["createdBy"]["username"], "admin");
        assert_eq!(json["sportCategory"], "Cricket Secretary");
    }

    #[test]
    fn get_missing_candidate_is_not_found() {
        let e = election();
        assert!(matches!(
            e.get_candidate(&CandidateId::new([3; 12])),
            Err(ElectionError::NotFound { kind: "candidate", .. })
        ));
    }
}

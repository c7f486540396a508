//! Post Registry
//!
//! Append-only store of verified posts.
//!
//! # Invariants
//!
//! - **Sequential ids**: the first post is 1, each registration takes the
//!   next id, ids are never reused
//! - **Ref uniqueness**: one external ref maps to exactly one post forever;
//!   `ref_to_post` enforces this
//! - **Immutable identity**: ref, creator, content and creation time never
//!   change after registration
//! - **Monotonic counters**: lit/shit counts and tip totals only grow
//! - **Terminal deactivation**: an inactive post never becomes active again

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use lib_types::{Address, Amount, ExternalRef, PostContent, PostId, Timestamp};

use crate::errors::{SonadError, SonadResult};

/// Direction of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteDirection {
    Lit,
    Shit,
}

impl VoteDirection {
    pub fn from_is_lit(is_lit: bool) -> Self {
        if is_lit {
            VoteDirection::Lit
        } else {
            VoteDirection::Shit
        }
    }

    pub fn is_lit(self) -> bool {
        self == VoteDirection::Lit
    }
}

/// A registered, verified post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Identifier of the attested social artifact
    pub external_ref: ExternalRef,
    pub creator: Address,
    pub content: PostContent,
    pub created_at: Timestamp,
    pub lit_count: u64,
    pub shit_count: u64,
    /// Sum of every tip accepted for this post
    pub total_tips: Amount,
    /// Always true: registration implies verification
    pub verified: bool,
    pub active: bool,
}

impl Post {
    /// Total votes received
    pub fn vote_count(&self) -> u64 {
        self.lit_count.saturating_add(self.shit_count)
    }

    pub(crate) fn record_vote(&mut self, direction: VoteDirection) -> SonadResult<()> {
        match direction {
            VoteDirection::Lit => {
                self.lit_count = self.lit_count.checked_add(1).ok_or(SonadError::Overflow)?;
            }
            VoteDirection::Shit => {
                self.shit_count = self.shit_count.checked_add(1).ok_or(SonadError::Overflow)?;
            }
        }
        Ok(())
    }
}

/// Root-of-truth store of posts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRegistry {
    /// Primary storage: post id -> post
    posts: BTreeMap<PostId, Post>,

    /// Lookup index: external ref -> post id (enforces ref uniqueness)
    ref_to_post: HashMap<ExternalRef, PostId>,

    /// Posts per creator, in registration order
    creator_posts: HashMap<Address, Vec<PostId>>,

    /// Last assigned id (0 before the first registration)
    post_id_counter: PostId,
}

impl PostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a post and return its id
    ///
    /// # Failure modes
    /// - creator is the null identity (`InvalidArgument`)
    /// - external ref already registered (`DuplicateExternalRef`)
    pub fn register(
        &mut self,
        external_ref: ExternalRef,
        creator: Address,
        content: PostContent,
        created_at: Timestamp,
    ) -> SonadResult<PostId> {
        // === VALIDATION PHASE (before any mutation) ===
        if creator.is_zero() {
            return Err(SonadError::InvalidArgument("creator is the null identity".to_string()));
        }
        if let Some(existing) = self.ref_to_post.get(&external_ref) {
            return Err(SonadError::DuplicateExternalRef {
                external_ref,
                existing: *existing,
            });
        }
        let post_id = self.post_id_counter.checked_add(1).ok_or(SonadError::Overflow)?;

        // === MUTATION PHASE ===
        self.ref_to_post.insert(external_ref.clone(), post_id);
        self.creator_posts.entry(creator).or_default().push(post_id);
        self.posts.insert(
            post_id,
            Post {
                id: post_id,
                external_ref,
                creator,
                content,
                created_at,
                lit_count: 0,
                shit_count: 0,
                total_tips: 0,
                verified: true,
                active: true,
            },
        );
        self.post_id_counter = post_id;

        Ok(post_id)
    }

    /// Freeze a post; calling twice leaves it frozen
    pub fn deactivate(&mut self, post_id: PostId) -> SonadResult<()> {
        let post = self.posts.get_mut(&post_id).ok_or(SonadError::PostNotFound(post_id))?;
        post.active = false;
        Ok(())
    }

    pub fn get(&self, post_id: PostId) -> SonadResult<&Post> {
        self.posts.get(&post_id).ok_or(SonadError::PostNotFound(post_id))
    }

    /// Mutable access to a post that still accepts votes and tips
    pub(crate) fn get_active_mut(&mut self, post_id: PostId) -> SonadResult<&mut Post> {
        let post = self.posts.get_mut(&post_id).ok_or(SonadError::PostNotFound(post_id))?;
        if !post.active {
            return Err(SonadError::InactivePost(post_id));
        }
        Ok(post)
    }

    /// Read-only variant of [`Self::get_active_mut`] for validation phases
    pub(crate) fn get_active(&self, post_id: PostId) -> SonadResult<&Post> {
        let post = self.get(post_id)?;
        if !post.active {
            return Err(SonadError::InactivePost(post_id));
        }
        Ok(post)
    }

    /// Raw lookup; a string no ref could be built from is simply absent
    pub fn post_id_for(&self, external_ref: &str) -> SonadResult<PostId> {
        self.ref_to_post
            .get(external_ref)
            .copied()
            .ok_or_else(|| SonadError::ExternalRefNotFound(external_ref.to_string()))
    }

    pub fn creator_posts(&self, creator: &Address) -> &[PostId] {
        self.creator_posts
            .get(creator)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_posts(&self) -> u64 {
        self.posts.len() as u64
    }

    pub fn post_id_counter(&self) -> PostId {
        self.post_id_counter
    }

    /// All posts in id order
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.posts.values()
    }
}

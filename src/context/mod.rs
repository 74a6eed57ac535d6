//! # Execution Context
//!
//! One [`ExecutionContext`] exists per coach (and per subcoach instance). It
//! outlives every evaluation and accumulates what the scripts write:
//! variables, scores, badges, recommendations and hidden questions.
//!
//! Contexts form a tree. A subcoach's context is linked to the context that
//! created it; the link is set once and never changes, and the
//! [`ContextStore`] refuses links that would parent a context to itself or
//! create a cycle. Because the links never change, locks taken while walking
//! up the tree are always taken in the same direction.
//!
//! A parent keeps caches for each of its subcoach instances, keyed by
//! `childCoachId.instanceName`: the child's variables, the child's hidden
//! questions, and the bucket that receives the child's recommendations.

pub mod badge;
pub mod recommendation;
pub mod score;
pub mod store;
pub mod variables;
pub mod visibility;

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

pub use badge::{Badge, BadgeStore};
pub use recommendation::{Recommendation, RecommendationStore, RecommendationTag};
pub use score::{Score, ScoreEntry, ScoreStore};
pub use store::ContextStore;
pub use variables::{VariableSnapshot, VariableStore};
pub use visibility::VisibilityStore;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("parent of context {0} is already set")]
    ParentAlreadySet(String),
    #[error("context {0} cannot be its own parent")]
    SelfParent(String),
    #[error("linking {child} under {parent} would create a cycle")]
    Cycle { child: String, parent: String },
    #[error("unknown context {0}")]
    UnknownContext(String),
    #[error("unknown badge {0}")]
    UnknownBadge(String),
    #[error("badge {badge} has no class {class}")]
    UnknownBadgeClass { badge: String, class: String },
}

pub type ContextResult<T> = Result<T, ContextError>;

/// What a parent context knows about one of its subcoach instances.
#[derive(Debug, Clone)]
pub struct SubcoachHandle {
    pub coach_id: String,
    pub instance_id: String,
    pub fqcn: String,
    pub variables: Arc<VariableStore>,
    pub visibility: Arc<VisibilityStore>,
}

/// Per-pass bookkeeping, guarded by the context's run lock.
#[derive(Debug, Default)]
pub struct RunState {
    fired: HashSet<String>,
}

impl RunState {
    pub fn clear(&mut self) {
        self.fired.clear();
    }

    /// Marks a line group as fired. Returns `false` if the group already fired
    /// in this pass. Nameless lines never belong to a group.
    pub fn fire(&mut self, name: &str) -> bool {
        name.is_empty() || self.fired.insert(name.to_string())
    }

    pub fn has_fired(&self, name: &str) -> bool {
        !name.is_empty() && self.fired.contains(name)
    }
}

#[derive(Debug)]
pub struct ExecutionContext {
    coach_id: String,
    fqcn: String,
    active_instance: Option<String>,
    parent_argument: String,
    parent: OnceLock<Arc<ExecutionContext>>,
    variables: Arc<VariableStore>,
    scores: ScoreStore,
    badges: BadgeStore,
    recommendations: Arc<RecommendationStore>,
    visibility: Arc<VisibilityStore>,
    subcoaches: DashMap<String, SubcoachHandle>,
    subcoach_recommendations: DashMap<String, Arc<RecommendationStore>>,
    run: Mutex<RunState>,
}

impl ExecutionContext {
    /// Context of a top-level coach; its FQCN is the lowercased coach id.
    pub fn new(coach_id: impl Into<String>) -> Self {
        let coach_id = coach_id.into();
        let fqcn = coach_id.to_lowercase();
        Self::build(coach_id, fqcn, None, String::new())
    }

    /// Context of a subcoach instance created from the context named
    /// `parent_fqcn`. Not linked yet; see [`ContextStore::create_subcoach`].
    pub fn new_subcoach(
        parent_fqcn: &str,
        coach_id: &str,
        instance_id: &str,
        argument: impl Into<String>,
    ) -> Self {
        let tag = subcoach_tag(coach_id, instance_id);
        let fqcn = format!("{}.{}", parent_fqcn, tag).to_lowercase();
        Self::build(coach_id.to_string(), fqcn, Some(tag), argument.into())
    }

    fn build(
        coach_id: String,
        fqcn: String,
        active_instance: Option<String>,
        parent_argument: String,
    ) -> Self {
        Self {
            coach_id,
            fqcn,
            active_instance,
            parent_argument,
            parent: OnceLock::new(),
            variables: Arc::new(VariableStore::new()),
            scores: ScoreStore::new(),
            badges: BadgeStore::new(),
            recommendations: Arc::new(RecommendationStore::new()),
            visibility: Arc::new(VisibilityStore::new()),
            subcoaches: DashMap::new(),
            subcoach_recommendations: DashMap::new(),
            run: Mutex::new(RunState::default()),
        }
    }

    pub fn coach_id(&self) -> &str {
        &self.coach_id
    }

    pub fn fqcn(&self) -> &str {
        &self.fqcn
    }

    /// `coachId.instanceName` when this context is a subcoach instance.
    pub fn active_instance(&self) -> Option<&str> {
        self.active_instance.as_deref()
    }

    /// String the parent attached when creating this instance; empty otherwise.
    pub fn parent_argument(&self) -> &str {
        &self.parent_argument
    }

    pub fn parent(&self) -> Option<&Arc<ExecutionContext>> {
        self.parent.get()
    }

    /// Parent, grandparent, ... up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Arc<ExecutionContext>> {
        std::iter::successors(self.parent(), |context| context.parent())
    }

    pub(crate) fn set_parent(&self, parent: Arc<ExecutionContext>) -> ContextResult<()> {
        self.parent
            .set(parent)
            .map_err(|_| ContextError::ParentAlreadySet(self.fqcn.clone()))
    }

    pub fn variables(&self) -> &Arc<VariableStore> {
        &self.variables
    }

    pub fn scores(&self) -> &ScoreStore {
        &self.scores
    }

    pub fn badges(&self) -> &BadgeStore {
        &self.badges
    }

    /// Recommendations stored in this context itself.
    pub fn recommendations(&self) -> &Arc<RecommendationStore> {
        &self.recommendations
    }

    pub fn visibility(&self) -> &Arc<VisibilityStore> {
        &self.visibility
    }

    /// Where recommendation commands acting on this context read and write.
    ///
    /// A parented context always goes to its parent's bucket for this
    /// instance; only a root context uses its own store.
    pub fn recommendation_target(&self) -> Arc<RecommendationStore> {
        match self.parent() {
            Some(parent) => {
                let tag = self.active_instance().unwrap_or(&self.fqcn);
                parent.subcoach_recommendations(tag)
            }
            None => self.recommendations.clone(),
        }
    }

    /// The bucket holding recommendations of the subcoach instance `tag`,
    /// created on first use.
    pub fn subcoach_recommendations(&self, tag: &str) -> Arc<RecommendationStore> {
        self.subcoach_recommendations
            .entry(tag.to_string())
            .or_default()
            .clone()
    }

    pub fn subcoach_recommendation_buckets(&self) -> BTreeMap<String, Arc<RecommendationStore>> {
        self.subcoach_recommendations
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub(crate) fn register_subcoach(&self, handle: SubcoachHandle) {
        let tag = subcoach_tag(&handle.coach_id, &handle.instance_id);
        self.subcoaches.insert(tag, handle);
    }

    pub(crate) fn unregister_subcoach(&self, coach_id: &str, instance_id: &str) -> Option<SubcoachHandle> {
        let tag = subcoach_tag(coach_id, instance_id);
        self.subcoach_recommendations.remove(&tag);
        self.subcoaches.remove(&tag).map(|(_, handle)| handle)
    }

    pub fn subcoach(&self, coach_id: &str, instance_id: &str) -> Option<SubcoachHandle> {
        self.subcoaches
            .get(&subcoach_tag(coach_id, instance_id))
            .map(|handle| handle.clone())
    }

    pub fn subcoaches(&self) -> Vec<SubcoachHandle> {
        let mut handles: Vec<SubcoachHandle> =
            self.subcoaches.iter().map(|h| h.value().clone()).collect();
        handles.sort_by(|a, b| a.fqcn.cmp(&b.fqcn));
        handles
    }

    /// Takes the exclusive run lock of this context.
    pub fn lock_run(&self) -> MutexGuard<'_, RunState> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forgets everything written so far. Links and subcoach caches stay.
    pub fn clear(&self) {
        self.variables.clear();
        self.scores.clear();
        self.badges.clear();
        self.recommendations.clear();
        self.visibility.clear();
        for bucket in self.subcoach_recommendations.iter() {
            bucket.value().clear();
        }
        self.lock_run().clear();
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            coach_id: self.coach_id.clone(),
            fqcn: self.fqcn.clone(),
            active_instance: self.active_instance.clone(),
            parent: self.parent().map(|p| p.fqcn.clone()),
            variables: self.variables.snapshot(),
            scores: self.scores.snapshot(),
            badges: self.badges.snapshot(),
            recommendations: self.recommendations.list(),
            subcoach_recommendations: self
                .subcoach_recommendation_buckets()
                .into_iter()
                .map(|(tag, bucket)| (tag, bucket.list()))
                .collect(),
            hidden_questions: self.visibility.hidden(),
            subcoaches: self.subcoaches().into_iter().map(|h| h.fqcn).collect(),
        }
    }
}

/// Cache key of a subcoach instance inside its parent.
pub fn subcoach_tag(coach_id: &str, instance_id: &str) -> String {
    format!("{}.{}", coach_id, instance_id)
}

/// Serializable view of one context, for rendering and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextSnapshot {
    pub coach_id: String,
    pub fqcn: String,
    pub active_instance: Option<String>,
    pub parent: Option<String>,
    pub variables: BTreeMap<String, VariableSnapshot>,
    pub scores: BTreeMap<String, String>,
    pub badges: BTreeMap<String, Badge>,
    pub recommendations: Vec<Recommendation>,
    pub subcoach_recommendations: BTreeMap<String, Vec<Recommendation>>,
    pub hidden_questions: Vec<String>,
    pub subcoaches: Vec<String>,
}

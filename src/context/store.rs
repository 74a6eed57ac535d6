use std::sync::Arc;

use dashmap::DashMap;

use super::{
    recommendation::sort_recommendations, ContextError, ContextResult, ExecutionContext,
    Recommendation, SubcoachHandle,
};

/// Owner of every execution context, keyed case-insensitively by coach id
/// (top-level coaches) or FQCN (subcoach instances).
///
/// Contexts are created on first reference and live until [`reset`] or
/// [`reset_all`]. Stores are independent of each other, so tests can run
/// against isolated ones.
///
/// [`reset`]: ContextStore::reset
/// [`reset_all`]: ContextStore::reset_all
#[derive(Debug, Default)]
pub struct ContextStore {
    contexts: DashMap<String, Arc<ExecutionContext>>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context of a top-level coach, created if needed.
    pub fn get_or_create(&self, coach_id: &str) -> Arc<ExecutionContext> {
        self.contexts
            .entry(coach_id.to_lowercase())
            .or_insert_with(|| {
                tracing::debug!("creating execution context for {}", coach_id);
                Arc::new(ExecutionContext::new(coach_id))
            })
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Arc<ExecutionContext>> {
        self.contexts
            .get(&key.to_lowercase())
            .map(|context| context.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.contexts.contains_key(&key.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.contexts.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Links `child` under `parent`.
    ///
    /// Fails if `child` already has a parent, if it would become its own
    /// parent, or if `parent` already descends from `child`.
    pub fn link(
        &self,
        child: &Arc<ExecutionContext>,
        parent: &Arc<ExecutionContext>,
    ) -> ContextResult<()> {
        if Arc::ptr_eq(child, parent) || child.fqcn() == parent.fqcn() {
            return Err(ContextError::SelfParent(child.fqcn().to_string()));
        }
        if child.parent().is_some() {
            return Err(ContextError::ParentAlreadySet(child.fqcn().to_string()));
        }
        if parent
            .ancestors()
            .any(|ancestor| Arc::ptr_eq(ancestor, child) || ancestor.fqcn() == child.fqcn())
        {
            return Err(ContextError::Cycle {
                child: child.fqcn().to_string(),
                parent: parent.fqcn().to_string(),
            });
        }
        child.set_parent(parent.clone())
    }

    /// Creates (or finds) the context of subcoach instance
    /// `coach_id`/`instance_id` under `parent`, linked and registered in the
    /// parent's caches. The flag tells whether the context is new.
    pub fn create_subcoach(
        &self,
        parent: &Arc<ExecutionContext>,
        coach_id: &str,
        instance_id: &str,
        argument: &str,
    ) -> ContextResult<(Arc<ExecutionContext>, bool)> {
        let child = ExecutionContext::new_subcoach(parent.fqcn(), coach_id, instance_id, argument);
        let key = child.fqcn().to_string();

        let mut created = false;
        let child = self
            .contexts
            .entry(key.clone())
            .or_insert_with(|| {
                created = true;
                Arc::new(child)
            })
            .clone();

        if created {
            if let Err(e) = self.link(&child, parent) {
                self.contexts.remove(&key);
                return Err(e);
            }
            parent.register_subcoach(SubcoachHandle {
                coach_id: coach_id.to_string(),
                instance_id: instance_id.to_string(),
                fqcn: key.clone(),
                variables: child.variables().clone(),
                visibility: child.visibility().clone(),
            });
            tracing::debug!("created subcoach context {}", key);
        }
        Ok((child, created))
    }

    /// Removes a subcoach instance, its descendants and the parent's caches
    /// for it. Returns whether the instance existed.
    pub fn remove_subcoach(
        &self,
        parent: &ExecutionContext,
        coach_id: &str,
        instance_id: &str,
    ) -> bool {
        let handle = parent.unregister_subcoach(coach_id, instance_id);
        let key = ExecutionContext::new_subcoach(parent.fqcn(), coach_id, instance_id, "")
            .fqcn()
            .to_string();
        let removed = self.remove_tree(&key);
        handle.is_some() || removed
    }

    /// Drops the context `key` and every context below it.
    pub fn reset(&self, key: &str) -> bool {
        self.remove_tree(&key.to_lowercase())
    }

    pub fn reset_all(&self) {
        self.contexts.clear();
    }

    fn remove_tree(&self, key: &str) -> bool {
        let prefix = format!("{}.", key);
        let existed = self.contexts.remove(key).is_some();
        self.contexts.retain(|k, _| !k.starts_with(&prefix));
        existed
    }

    /// Every recommendation visible from `key`: its own, plus those of all
    /// subcoach instances below it, ordered by `(order, id)`.
    pub fn recommendation_summary(&self, key: &str) -> ContextResult<Vec<Recommendation>> {
        let context = self
            .get(key)
            .ok_or_else(|| ContextError::UnknownContext(key.to_string()))?;
        let mut summary = Vec::new();
        self.collect_recommendations(&context, &mut summary);
        sort_recommendations(&mut summary);
        Ok(summary)
    }

    fn collect_recommendations(&self, context: &ExecutionContext, out: &mut Vec<Recommendation>) {
        out.extend(context.recommendations().list());
        for bucket in context.subcoach_recommendation_buckets().values() {
            out.extend(bucket.list());
        }
        for handle in context.subcoaches() {
            if let Some(child) = self.get(&handle.fqcn) {
                self.collect_recommendations(&child, out);
            }
        }
    }
}

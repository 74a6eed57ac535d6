use std::{
    collections::BTreeSet,
    sync::{PoisonError, RwLock},
};

/// Hidden question ids of one execution context.
#[derive(Debug, Default)]
pub struct VisibilityStore {
    hidden: RwLock<BTreeSet<String>>,
}

impl VisibilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the visibility of `question_id` changed.
    pub fn set_hidden(&self, question_id: &str, hidden: bool) -> bool {
        let mut set = self.hidden.write().unwrap_or_else(PoisonError::into_inner);
        if hidden {
            set.insert(question_id.to_string())
        } else {
            set.remove(question_id)
        }
    }

    pub fn is_hidden(&self, question_id: &str) -> bool {
        self.hidden
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(question_id)
    }

    pub fn hidden(&self) -> Vec<String> {
        self.hidden
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.hidden
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_hidden_reports_changes() {
        let store = VisibilityStore::new();
        assert!(store.set_hidden("q2", true));
        assert!(!store.set_hidden("q2", true));
        assert!(store.is_hidden("q2"));
        assert!(store.set_hidden("q2", false));
        assert!(!store.set_hidden("q3", false));
        assert!(store.hidden().is_empty());
    }
}

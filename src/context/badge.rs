use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::Serialize;

use super::{ContextError, ContextResult};

/// A named achievement with ordered classes, at most one of them awarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Badge {
    pub classes: Vec<String>,
    pub awarded: Option<String>,
}

#[derive(Debug, Default)]
pub struct BadgeStore {
    badges: DashMap<String, Badge>,
}

impl BadgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a badge. An awarded class survives a
    /// redefinition that still lists it.
    pub fn create(&self, name: &str, classes: Vec<String>) {
        let mut badge = self.badges.entry(name.to_string()).or_default();
        if badge
            .awarded
            .as_ref()
            .is_some_and(|awarded| !classes.contains(awarded))
        {
            badge.awarded = None;
        }
        badge.classes = classes;
    }

    /// Awards `class`, replacing any previously awarded class.
    pub fn award(&self, name: &str, class: &str) -> ContextResult<()> {
        let mut badge = self
            .badges
            .get_mut(name)
            .ok_or_else(|| ContextError::UnknownBadge(name.to_string()))?;
        if !badge.classes.iter().any(|c| c == class) {
            return Err(ContextError::UnknownBadgeClass {
                badge: name.to_string(),
                class: class.to_string(),
            });
        }
        badge.awarded = Some(class.to_string());
        Ok(())
    }

    /// Clears the awarded class. Unknown badges are ignored; returns whether
    /// a class was awarded before.
    pub fn revoke(&self, name: &str) -> bool {
        self.badges
            .get_mut(name)
            .and_then(|mut badge| badge.awarded.take())
            .is_some()
    }

    /// Whether the badge is awarded (at `class`, when given).
    pub fn has(&self, name: &str, class: Option<&str>) -> ContextResult<bool> {
        let badge = self
            .badges
            .get(name)
            .ok_or_else(|| ContextError::UnknownBadge(name.to_string()))?;
        match class {
            None => Ok(badge.awarded.is_some()),
            Some(class) if badge.classes.iter().any(|c| c == class) => {
                Ok(badge.awarded.as_deref() == Some(class))
            }
            Some(class) => Err(ContextError::UnknownBadgeClass {
                badge: name.to_string(),
                class: class.to_string(),
            }),
        }
    }

    pub fn awarded(&self, name: &str) -> ContextResult<Option<String>> {
        self.badges
            .get(name)
            .map(|badge| badge.awarded.clone())
            .ok_or_else(|| ContextError::UnknownBadge(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<Badge> {
        self.badges.get(name).map(|badge| badge.clone())
    }

    pub fn clear(&self) {
        self.badges.clear();
    }

    pub fn snapshot(&self) -> BTreeMap<String, Badge> {
        self.badges
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_award_replaces_previous_class() {
        let store = BadgeStore::new();
        store.create("reader", classes(&["bronze", "silver", "gold"]));
        store.award("reader", "bronze").unwrap();
        store.award("reader", "gold").unwrap();

        assert_eq!(store.awarded("reader").unwrap(), Some("gold".to_string()));
        assert!(store.has("reader", Some("gold")).unwrap());
        assert!(!store.has("reader", Some("bronze")).unwrap());
    }

    #[test]
    fn test_revoke_keeps_definition() {
        let store = BadgeStore::new();
        store.create("reader", classes(&["bronze"]));
        store.award("reader", "bronze").unwrap();
        assert!(store.revoke("reader"));
        assert!(!store.revoke("reader"));
        assert!(!store.revoke("unknown"));
        assert_eq!(store.get("reader").unwrap().classes, classes(&["bronze"]));
        assert!(!store.has("reader", None).unwrap());
    }

    #[test]
    fn test_unknown_badge_and_class_fault() {
        let store = BadgeStore::new();
        assert_eq!(
            store.award("x", "a"),
            Err(ContextError::UnknownBadge("x".to_string()))
        );
        store.create("x", classes(&["a"]));
        assert!(matches!(
            store.award("x", "b"),
            Err(ContextError::UnknownBadgeClass { .. })
        ));
        assert!(store.has("x", Some("b")).is_err());
    }

    #[test]
    fn test_redefinition_drops_missing_award() {
        let store = BadgeStore::new();
        store.create("x", classes(&["a", "b"]));
        store.award("x", "b").unwrap();
        store.create("x", classes(&["a", "b"]));
        assert_eq!(store.awarded("x").unwrap(), Some("b".to_string()));
        store.create("x", classes(&["a"]));
        assert_eq!(store.awarded("x").unwrap(), None);
    }
}

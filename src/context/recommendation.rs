use dashmap::DashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationTag {
    pub label: String,
    pub category: String,
    pub color: String,
}

impl RecommendationTag {
    /// Parses a comma-separated list of `label:category:color` tags.
    /// Entries that do not have exactly three non-empty parts are skipped.
    pub fn parse_list(text: &str) -> Vec<RecommendationTag> {
        text.split(',')
            .filter_map(|tag| {
                let parts: Vec<&str> = tag.split(':').map(str::trim).collect();
                match parts.as_slice() {
                    [label, category, color]
                        if !label.is_empty() && !category.is_empty() && !color.is_empty() =>
                    {
                        Some(RecommendationTag {
                            label: label.to_string(),
                            category: category.to_string(),
                            color: color.to_string(),
                        })
                    }
                    _ => {
                        if !tag.trim().is_empty() {
                            tracing::debug!("skipping malformed recommendation tag {:?}", tag);
                        }
                        None
                    }
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: String,
    pub order: i64,
    pub title: String,
    pub text: String,
    pub tags: Vec<RecommendationTag>,
    /// Instance tag of the subcoach that contributed it, if any.
    pub instance: Option<String>,
}

/// Recommendations deduplicated by id.
#[derive(Debug, Default)]
pub struct RecommendationStore {
    items: DashMap<String, Recommendation>,
}

impl RecommendationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by id.
    pub fn add(&self, recommendation: Recommendation) {
        self.items
            .insert(recommendation.id.clone(), recommendation);
    }

    pub fn remove(&self, id: &str) -> bool {
        self.items.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Recommendation> {
        self.items.get(id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&self) {
        self.items.clear();
    }

    /// All recommendations ordered by `(order, id)`.
    pub fn list(&self) -> Vec<Recommendation> {
        let mut items: Vec<Recommendation> = self.items.iter().map(|r| r.clone()).collect();
        sort_recommendations(&mut items);
        items
    }
}

pub fn sort_recommendations(items: &mut [Recommendation]) {
    items.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

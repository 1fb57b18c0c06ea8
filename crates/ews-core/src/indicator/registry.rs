//! Registry for early-warning indicators.
//!
//! The registry maps indicator ids to implementations. It is created with
//! every built-in indicator registered; custom indicators can be added at
//! runtime before the registry is shared with a calculator or pipeline.

use std::collections::HashMap;

use ndarray::ArrayView1;

use super::{
    BuiltinIndicator, FnIndicator, Indicator, IndicatorCategory, IndicatorKind, IndicatorMetadata,
};

/// Registry of all available indicators.
pub struct IndicatorRegistry {
    indicators: Vec<Box<dyn Indicator>>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<IndicatorCategory, Vec<usize>>,
}

impl IndicatorRegistry {
    /// Create a new registry with all built-in indicators registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            indicators: Vec::new(),
            by_id: HashMap::new(),
            by_category: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        for kind in IndicatorKind::ALL {
            self.register(Box::new(BuiltinIndicator::new(kind)));
        }
    }

    /// Register an indicator with the registry.
    ///
    /// An indicator with an id that is already registered replaces the
    /// previous one.
    pub fn register(&mut self, indicator: Box<dyn Indicator>) {
        let metadata = indicator.metadata();

        if let Some(&index) = self.by_id.get(&metadata.id) {
            let old_category = self.indicators[index].metadata().category;
            if let Some(indices) = self.by_category.get_mut(&old_category) {
                indices.retain(|&i| i != index);
            }
            self.by_category
                .entry(metadata.category)
                .or_default()
                .push(index);
            self.indicators[index] = indicator;
            return;
        }

        let index = self.indicators.len();
        self.by_id.insert(metadata.id.clone(), index);
        self.by_category
            .entry(metadata.category)
            .or_default()
            .push(index);

        self.indicators.push(indicator);
    }

    /// Register a closure as a custom indicator.
    pub fn register_fn<F>(&mut self, id: &str, name: &str, category: IndicatorCategory, func: F)
    where
        F: Fn(ArrayView1<'_, f64>) -> f64 + Send + Sync + 'static,
    {
        let metadata = IndicatorMetadata {
            id: id.to_string(),
            name: name.to_string(),
            category,
            description: String::new(),
        };
        self.register(Box::new(FnIndicator::new(metadata, func)));
    }

    /// Get an indicator by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn Indicator> {
        self.by_id
            .get(id)
            .map(|&index| self.indicators[index].as_ref())
    }

    /// Whether an indicator with this ID is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// List all available indicators.
    pub fn list_all(&self) -> Vec<&IndicatorMetadata> {
        self.indicators.iter().map(|i| i.metadata()).collect()
    }

    /// List indicators in a specific category.
    pub fn list_by_category(&self, category: IndicatorCategory) -> Vec<&IndicatorMetadata> {
        self.by_category
            .get(&category)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| self.indicators[i].metadata())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the total number of registered indicators.
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! A read-only registry of named market curves.

use crate::curve::{DiscountCurve, ForwardCurve};
use irmc_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable collection of market curves, looked up by name.
///
/// Built once from its curves and never mutated afterwards, so it can be
/// shared freely between models.
#[derive(Default)]
pub struct AnalyticModel {
    discount_curves: HashMap<String, Arc<dyn DiscountCurve>>,
    forward_curves: HashMap<String, Arc<dyn ForwardCurve>>,
}

impl AnalyticModel {
    /// Build a registry from the given curves.
    pub fn new(
        discount_curves: Vec<Arc<dyn DiscountCurve>>,
        forward_curves: Vec<Arc<dyn ForwardCurve>>,
    ) -> Self {
        Self {
            discount_curves: discount_curves
                .into_iter()
                .map(|c| (c.name().to_owned(), c))
                .collect(),
            forward_curves: forward_curves
                .into_iter()
                .map(|c| (c.name().to_owned(), c))
                .collect(),
        }
    }

    /// Look up a discount curve by name.
    pub fn discount_curve(&self, name: &str) -> Result<Arc<dyn DiscountCurve>> {
        self.discount_curves
            .get(name)
            .cloned()
            .ok_or_else(|| Error::InvalidArgument(format!("no discount curve named '{name}'")))
    }

    /// Look up a forward curve by name.
    pub fn forward_curve(&self, name: &str) -> Result<Arc<dyn ForwardCurve>> {
        self.forward_curves
            .get(name)
            .cloned()
            .ok_or_else(|| Error::InvalidArgument(format!("no forward curve named '{name}'")))
    }
}

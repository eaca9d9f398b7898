//! Flat-rate price table

use crate::domain::types::Plan;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Plan → fee lookup
///
/// Total over its input: a plan without an entry, or a plan name that does
/// not parse, prices at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceTable {
    fees: FxHashMap<Plan, u64>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::from_fees([
            (Plan::Standard, 5000),
            (Plan::Vip, 10000),
            (Plan::Vvip, 15000),
            (Plan::Vvvip, 20000),
        ])
    }
}

impl PriceTable {
    /// Table with no entries; every plan prices at zero
    pub fn empty() -> Self {
        Self { fees: FxHashMap::default() }
    }

    pub fn from_fees(fees: impl IntoIterator<Item = (Plan, u64)>) -> Self {
        Self { fees: fees.into_iter().collect() }
    }

    #[inline]
    pub fn price_for(&self, plan: Plan) -> u64 {
        self.fees.get(&plan).copied().unwrap_or(0)
    }

    /// Lookup by plan name, case-insensitive
    pub fn price_for_name(&self, name: &str) -> u64 {
        name.parse::<Plan>().map(|plan| self.price_for(plan)).unwrap_or(0)
    }

    /// Set the fee for a plan, returning the previous fee
    pub fn set(&mut self, plan: Plan, fee: u64) -> u64 {
        self.fees.insert(plan, fee).unwrap_or(0)
    }

    /// Entries in plan order
    pub fn entries(&self) -> impl Iterator<Item = (Plan, u64)> + '_ {
        Plan::ALL.into_iter().map(|plan| (plan, self.price_for(plan)))
    }
}

//! Static recommendation text shown beneath the dashboard charts
//!
//! The copy is fixed; it is not derived from the data.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub detail: &'static str,
}

pub const RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation {
        title: "Double down on top product lines",
        detail: "Shift promotional budget toward the product lines with the highest revenue \
                 and protect their shelf placement.",
    },
    Recommendation {
        title: "Investigate high-return products",
        detail: "Product lines whose return rate sits above the portfolio average should be \
                 reviewed for quality or expectation issues before further discounting.",
    },
    Recommendation {
        title: "Rebalance regional distribution",
        detail: "Regions with low unit volume are candidates for targeted distribution and \
                 retailer partnerships.",
    },
    Recommendation {
        title: "Tighten discount discipline",
        detail: "Where deep average discounts do not translate into higher revenue, trial \
                 smaller discounts to recover margin.",
    },
];

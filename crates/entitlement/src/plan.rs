//! Subscription plan catalog.

use schemars::JsonSchema;
use serde::Serialize;

use crate::Tier;

/// Billing interval of a plan price.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Month,
    Year,
    Article,
}

/// A purchasable subscription plan.
#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct SubscriptionPlan {
    /// Tier granted by this plan.
    pub tier: Tier,

    /// Human-readable plan name.
    pub name: &'static str,

    /// Price in cents.
    pub price: u32,

    pub interval: Interval,

    /// Article count available per month, `null` for unlimited plans.
    pub monthly_articles: Option<usize>,

    pub features: &'static [&'static str],
}

impl SubscriptionPlan {
    /// Whether purchasing the plan requires a payment.
    pub fn is_paid(&self) -> bool {
        self.price > 0
    }
}

/// All plans offered to readers, from the cheapest to the most expensive one.
///
/// [`Tier::None`] is not listed, since it's the tier of readers who haven't
/// picked any plan.
pub static PLANS: [SubscriptionPlan; 3] = [
    SubscriptionPlan {
        tier: Tier::OneArticle,
        name: "Free",
        price: 0,
        interval: Interval::Month,
        monthly_articles: Some(1),
        features: &["One free article every month", "Bookmarks"],
    },
    SubscriptionPlan {
        tier: Tier::TwoArticles,
        name: "Reader",
        price: 299,
        interval: Interval::Article,
        monthly_articles: Some(2),
        features: &["Two articles every month", "Bookmarks", "Follow writers"],
    },
    SubscriptionPlan {
        tier: Tier::Unlimited,
        name: "Unlimited",
        price: 4900,
        interval: Interval::Year,
        monthly_articles: None,
        features: &["Unlimited articles", "Bookmarks", "Follow writers"],
    },
];

/// Find a plan that grants the provided tier.
pub fn plan(tier: Tier) -> Option<&'static SubscriptionPlan> {
    PLANS.iter().find(|plan| plan.tier == tier)
}

/// Whether switching to the provided tier requires a completed payment.
pub fn requires_payment(tier: Tier) -> bool {
    plan(tier).map_or(false, SubscriptionPlan::is_paid)
}

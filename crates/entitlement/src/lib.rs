//! Article access decisions.
//!
//! Given a [`Reader`] snapshot, this crate decides whether an article may be
//! viewed right now and produces the updated snapshot when a view consumes a
//! quota slot. Nothing here performs I/O: callers load the snapshot, call
//! [`resolve_article_view`] and persist the outcome.

pub mod period;
pub mod plan;
mod role;

use std::collections::BTreeSet;

pub use period::BillingPeriod;
pub use plan::{Interval, SubscriptionPlan, PLANS};
pub use role::{Role, Tier};

/// Number of distinct articles a tier allows per billing period.
///
/// `None` means the tier is not limited at all.
pub fn free_reads(tier: Tier) -> Option<usize> {
    match tier {
        Tier::Unlimited => None,
        Tier::TwoArticles => Some(2),
        Tier::OneArticle => Some(1),
        Tier::None => Some(0),
    }
}

/// Entitlement-relevant snapshot of a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reader {
    id: Option<i64>,
    role: Role,
    tier: Tier,
    viewed: BTreeSet<i64>,
}

impl Reader {
    /// Create a snapshot of a registered user with the articles they
    /// viewed during the current billing period.
    pub fn new(id: i64, role: Role, tier: Tier, viewed: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id: Some(id),
            role,
            tier,
            viewed: viewed.into_iter().collect(),
        }
    }

    /// Unauthenticated visitor.
    pub fn guest() -> Self {
        Self {
            id: None,
            role: Role::FreeUser,
            tier: Tier::None,
            viewed: BTreeSet::new(),
        }
    }

    /// User identifier, `None` for guests.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Articles consumed during the current billing period.
    pub fn viewed(&self) -> &BTreeSet<i64> {
        &self.viewed
    }

    pub fn has_viewed(&self, article_id: i64) -> bool {
        self.viewed.contains(&article_id)
    }

    /// Count of new articles this reader may still open during the current
    /// billing period, or `None` if access is not limited.
    pub fn remaining_reads(&self) -> Option<usize> {
        if self.role.is_staff() {
            return None;
        }

        free_reads(self.tier).map(|quota| quota.saturating_sub(self.viewed.len()))
    }
}

/// Outcome of an article view attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArticleView {
    /// The article may be shown.
    Granted {
        /// Snapshot to persist.
        reader: Reader,

        /// Whether the article was added to the view history by this call.
        newly_viewed: bool,
    },

    /// The reader has to upgrade their subscription first.
    Denied,
}

impl ArticleView {
    pub fn is_granted(&self) -> bool {
        matches!(self, ArticleView::Granted { .. })
    }
}

/// Check whether a reader may open an article they haven't viewed yet.
///
/// Only the size of the view history is compared against the tier quota,
/// so articles that are already part of the history must be exempted
/// by the caller, see [`resolve_article_view`].
pub fn check_access(reader: &Reader) -> bool {
    if reader.role.is_staff() {
        return true;
    }

    match reader.tier {
        Tier::Unlimited => true,
        Tier::TwoArticles => reader.viewed.len() < 2,
        Tier::OneArticle => reader.viewed.len() < 1,
        Tier::None => false,
    }
}

/// Decide whether a reader may view an article, recording the view
/// if it consumes a quota slot.
///
/// Articles already present in the view history can be re-read at any time
/// without consuming another slot. Staff views are never recorded.
pub fn resolve_article_view(reader: Reader, article_id: i64) -> ArticleView {
    let already_viewed = reader.has_viewed(article_id);

    if !already_viewed && !check_access(&reader) {
        return ArticleView::Denied;
    }

    if already_viewed || reader.role.is_staff() {
        return ArticleView::Granted {
            reader,
            newly_viewed: false,
        };
    }

    let mut reader = reader;
    reader.viewed.insert(article_id);

    ArticleView::Granted {
        reader,
        newly_viewed: true,
    }
}

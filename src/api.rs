//! Entry point tying the coverage pipeline together.

use crate::coverage::{
    filter, normalize_relay_url, select, CoverageConfig, CoverageError, CoverageResult, RelayPlan,
    RelayUrl, UserId,
};

/// Plans which relays to read followed users from.
///
/// Holds a [`CoverageConfig`] and runs filter then selector against it.
/// Each call is an independent, pure computation; the planner keeps no
/// state between calls besides its configuration.
#[derive(Debug, Clone, Default)]
pub struct RelayPlanner {
    config: CoverageConfig,
}

impl RelayPlanner {
    /// Creates a planner for the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use outbox_core::coverage::CoverageConfig;
    /// use outbox_core::RelayPlanner;
    ///
    /// let planner = RelayPlanner::new(CoverageConfig::new());
    /// assert!(!planner.config().onion_allowed);
    /// ```
    #[must_use]
    pub const fn new(config: CoverageConfig) -> Self {
        Self { config }
    }

    /// Returns the planner's configuration.
    #[must_use]
    pub const fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Filters raw relay lists with `normalize` and selects relays.
    ///
    /// # Arguments
    ///
    /// * `raw_lists` - Raw write-relay strings per followed user
    /// * `normalize` - Turns a raw string into a canonical relay URL
    #[must_use]
    pub fn plan<I, S, F>(&self, raw_lists: I, normalize: F) -> RelayPlan
    where
        I: IntoIterator<Item = (UserId, Vec<S>)>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<RelayUrl>,
    {
        let user_map = filter(raw_lists, normalize, self.config.onion_allowed);
        select(&user_map, self.config.relay_urls_to_ignore())
    }

    /// Same as [`plan`](Self::plan) with [`normalize_relay_url`].
    ///
    /// # Examples
    ///
    /// ```
    /// use outbox_core::coverage::{CoverageConfig, UserId};
    /// use outbox_core::RelayPlanner;
    ///
    /// let planner = RelayPlanner::new(CoverageConfig::new());
    /// let plan = planner.plan_default(vec![
    ///     (UserId::new("alice"), vec!["wss://nos.lol"]),
    ///     (UserId::new("bob"), vec!["wss://nos.lol", "wss://relay.damus.io"]),
    /// ]);
    ///
    /// assert_eq!(plan.recommendations[0].url.as_str(), "wss://nos.lol");
    /// assert_eq!(plan.recommendations.len(), 2);
    /// ```
    #[must_use]
    pub fn plan_default<I, S>(&self, raw_lists: I) -> RelayPlan
    where
        I: IntoIterator<Item = (UserId, Vec<S>)>,
        S: AsRef<str>,
    {
        self.plan(raw_lists, normalize_relay_url)
    }

    /// Runs [`plan_default`](Self::plan_default) on the tokio blocking pool.
    ///
    /// Large follow lists make planning expensive enough that it should not
    /// run on an async worker or UI thread.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::Task`] if the blocking task panics or is
    /// cancelled.
    pub async fn plan_in_background(
        &self,
        raw_lists: Vec<(UserId, Vec<String>)>,
    ) -> CoverageResult<RelayPlan> {
        let planner = self.clone();

        tokio::task::spawn_blocking(move || planner.plan_default(raw_lists))
            .await
            .map_err(|e| CoverageError::Task(e.to_string()))
    }
}

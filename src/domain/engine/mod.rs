//! The decision engine: deterministic rule-and-scoring evaluation.
//!
//! `Engine::decide` is pure with respect to its inputs; the caller supplies
//! the clock, and the catalog and narrative templates are immutable shared
//! data. All state mutation happens on the owned copy passed in and handed
//! back.

pub mod dont_do;
pub mod filters;
mod output;
mod request;
pub mod risk;
pub mod scoring;
pub mod templates;

pub use dont_do::{DontDoItem, PoolStatus, DONT_DO_MAX};
pub use output::{DecisionMeta, DecisionOutput, FailureExpectation, OutputMode};
pub use request::{DecisionRequest, MAX_DAILY_SLOTS, MIN_DAILY_SLOTS};
pub use risk::RiskKind;
pub use scoring::ConfidencePosture;

use filters::FilterVerdict;

use crate::domain::catalog::{catalog, Candidate, Season};
use crate::domain::foundation::{DecisionId, Timestamp, ValidationError};
use crate::domain::state::{HistoryRecord, LastReco, PoolItem, UserState};

/// Rule tags recorded for observability.
const RULE_HARD_AVOID: &str = "hard_filter:avoid";
const RULE_HARD_DEFER: &str = "hard_filter:defer";
const RULE_TIMING_DEFER: &str = "timing:defer";
const RULE_FALLBACK: &str = "fallback:no_filtered";
const RULE_ENV_UNFAVORABLE: &str = "env_unfavorable";

/// The decision engine over a candidate catalog.
pub struct Engine {
    candidates: Vec<Candidate>,
}

impl Engine {
    /// Engine over the built-in catalog.
    pub fn new() -> Self {
        Self {
            candidates: catalog().to_vec(),
        }
    }

    /// Engine over a caller-supplied catalog. Rejects an empty catalog,
    /// since a recommendation must always exist.
    pub fn with_catalog(candidates: Vec<Candidate>) -> Result<Self, ValidationError> {
        if candidates.is_empty() {
            return Err(ValidationError::empty_field("catalog"));
        }
        Ok(Self { candidates })
    }

    /// Evaluates one decision: filters and scores candidates, derives the
    /// confidence posture and primary risk, folds the result into the user
    /// state, and assembles the recommendation.
    ///
    /// Returns the recommendation draft, the updated state, and the rule
    /// tags fired during evaluation.
    pub fn decide(
        &self,
        req: &DecisionRequest,
        mut state: UserState,
        now: Timestamp,
    ) -> (DecisionOutput, UserState, Vec<String>) {
        let snapshot_version = state.onboarding_step;
        let mode = OutputMode::for_step(state.onboarding_step);
        let mut rules_fired: Vec<String> = Vec::new();

        // Category pre-selection, falling back to the whole catalog so a
        // recommendation always exists.
        let mut pool: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.matches_category(req.category))
            .collect();
        if pool.is_empty() {
            pool = self.candidates.iter().collect();
        }

        let season = Season::at(&now);
        let mut filtered: Vec<&Candidate> = Vec::new();
        for &candidate in &pool {
            match filters::hard_filters(req, candidate) {
                FilterVerdict::Avoid(reason) => {
                    rules_fired.push(RULE_HARD_AVOID.to_string());
                    state.avoid_pool.push(pool_item(candidate, reason, now));
                    continue;
                }
                FilterVerdict::Defer(reason) => {
                    rules_fired.push(RULE_HARD_DEFER.to_string());
                    state.defer_pool.push(pool_item(candidate, reason, now));
                    continue;
                }
                FilterVerdict::Pass => {}
            }

            if let FilterVerdict::Defer(reason) = filters::timing_heuristic(candidate, season) {
                rules_fired.push(RULE_TIMING_DEFER.to_string());
                state.defer_pool.push(pool_item(candidate, reason, now));
                continue;
            }

            filtered.push(candidate);
        }

        let scored_pool: &[&Candidate] = if filtered.is_empty() {
            rules_fired.push(RULE_FALLBACK.to_string());
            &pool
        } else {
            &filtered
        };

        // The pool is non-empty whenever the catalog is, which the
        // constructors guarantee.
        let ranked = scoring::rank(req, scored_pool).expect("candidate pool is never empty");
        let posture =
            scoring::confidence_posture(ranked.top_score, ranked.second_score, req.in_stock);

        let env_trigger = risk::env_unfavorable(&state, now);
        if env_trigger {
            rules_fired.push(RULE_ENV_UNFAVORABLE.to_string());
        }
        let risk_kind = risk::primary_risk(ranked.winner, env_trigger);

        let reason_one_line = if env_trigger {
            templates::ENV_REASON.to_string()
        } else {
            templates::reason(posture).to_string()
        };

        let dont_do = dont_do::assemble(
            &state.avoid_pool,
            &state.defer_pool,
            if filtered.is_empty() { &pool } else { &filtered },
        );

        let decision_id = DecisionId::new();
        let output = DecisionOutput {
            decision_id,
            headline: templates::headline(mode).to_string(),
            action: templates::action(posture).to_string(),
            reason_one_line,
            primary_risk: templates::risk_statement(risk_kind).to_string(),
            why_it: vec![
                format!("category match: {}", req.category),
                format!("price band fit: {}", req.price_band),
                format!("stage fit: {}", req.account_stage),
            ],
            dont_do,
            failure_expectation: FailureExpectation {
                likely: risk_kind,
                next_action: templates::next_action(risk_kind).to_string(),
            },
            meta: DecisionMeta {
                mode,
                confidence_style: posture,
                rules_fired: rules_fired.clone(),
                state_snapshot_version: snapshot_version,
            },
        };

        // Fold the decision into the rolling state.
        state.onboarding_step += 1;
        state.account_stage = req.account_stage;
        state.daily_slots = req.daily_slots;
        state.updated_at = now;
        state.last_reco = Some(LastReco {
            decision_id,
            label: ranked.winner.label.clone(),
            ts: now,
            category: req.category,
            price_band: req.price_band.clone(),
            in_stock: req.in_stock,
        });
        state.history.push(HistoryRecord {
            ts: now,
            decision_id,
            label: ranked.winner.label.clone(),
            category: req.category,
            price_band: req.price_band.clone(),
            in_stock: req.in_stock,
            decision: posture,
            outcome: None,
        });
        if env_trigger {
            state.stats.env_trigger_count += 1;
        } else {
            state.stats.env_trigger_count = 0;
        }
        state.enforce_caps();

        (output, state, rules_fired)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn pool_item(candidate: &Candidate, reason: &str, now: Timestamp) -> PoolItem {
    PoolItem {
        label: candidate.label.clone(),
        reason: reason.to_string(),
        ts: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{AccountStage, Candidate, Category, Season};
    use crate::domain::foundation::{DecisionId, Timestamp, UserId};
    use crate::domain::state::{HistoryRecord, Outcome, UserState, HISTORY_CAP, POOL_CAP};
    use chrono::{TimeZone, Utc};

    /// Mid-April: spring, matching most of the catalog.
    fn spring_now() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 4, 15, 12, 0, 0).unwrap())
    }

    fn summer_now() -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap())
    }

    fn request(category: Category, stage: AccountStage) -> DecisionRequest {
        DecisionRequest::new(
            UserId::new("seller-1").unwrap(),
            category,
            "60-80",
            stage,
            2,
            true,
            None,
        )
        .unwrap()
    }

    fn fresh_state() -> UserState {
        UserState::new(UserId::new("seller-1").unwrap(), spring_now())
    }

    #[test]
    fn explore_top_request_picks_the_in_season_explore_top() {
        let engine = Engine::new();
        let (output, state, rules) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );

        // basic tee is deferred (homogeneous), slim knit top avoided
        // (return risk), fleece hoodie deferred (winter); the base layer is
        // the only survivor.
        assert_eq!(
            state.last_reco.as_ref().unwrap().label,
            "slim long-sleeve base layer"
        );
        assert_eq!(output.meta.mode, OutputMode::Best);
        assert_eq!(output.meta.state_snapshot_version, 0);
        assert!(rules.contains(&"hard_filter:avoid".to_string()));
        assert!(rules.contains(&"hard_filter:defer".to_string()));
        assert!(rules.contains(&"timing:defer".to_string()));
        assert!(!rules.contains(&"fallback:no_filtered".to_string()));
    }

    #[test]
    fn sole_survivor_has_zero_margin_and_stays_conservative() {
        let engine = Engine::new();
        let (output, _, _) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );
        assert_eq!(output.meta.confidence_style, ConfidencePosture::Conservative);
    }

    #[test]
    fn off_season_request_falls_back_to_unfiltered_scoring() {
        let engine = Engine::new();
        let (output, state, rules) = engine.decide(
            &request(Category::Pants, AccountStage::Explore),
            fresh_state(),
            summer_now(),
        );

        // every pants candidate is out of season in July
        assert!(rules.contains(&"fallback:no_filtered".to_string()));
        assert!(state.last_reco.is_some());
        assert!(!output.dont_do.is_empty());
    }

    #[test]
    fn out_of_stock_forces_conservative() {
        let engine = Engine::new();
        let req = DecisionRequest::new(
            UserId::new("seller-1").unwrap(),
            Category::Pants,
            "100-160",
            AccountStage::Explore,
            2,
            false,
            None,
        )
        .unwrap();
        let (output, _, _) = engine.decide(&req, fresh_state(), spring_now());
        assert_eq!(output.meta.confidence_style, ConfidencePosture::Conservative);
    }

    #[test]
    fn onboarding_step_increments_once_per_call_and_mode_flips() {
        let engine = Engine::new();
        let req = request(Category::Top, AccountStage::Explore);
        let now = spring_now();

        let (first, state, _) = engine.decide(&req, fresh_state(), now);
        assert_eq!(first.meta.mode, OutputMode::Best);
        assert_eq!(state.onboarding_step, 1);

        let (second, state, _) = engine.decide(&req, state, now);
        assert_eq!(second.meta.mode, OutputMode::Best);
        assert_eq!(state.onboarding_step, 2);

        let (third, state, _) = engine.decide(&req, state, now);
        assert_eq!(third.meta.mode, OutputMode::Only);
        assert_eq!(state.onboarding_step, 3);
    }

    #[test]
    fn state_is_overwritten_from_the_request() {
        let engine = Engine::new();
        let req = DecisionRequest::new(
            UserId::new("seller-1").unwrap(),
            Category::Outer,
            "150-210",
            AccountStage::Converge,
            3,
            true,
            None,
        )
        .unwrap();
        let (_, state, _) = engine.decide(&req, fresh_state(), spring_now());

        assert_eq!(state.account_stage, AccountStage::Converge);
        assert_eq!(state.daily_slots, 3);
    }

    #[test]
    fn history_and_pools_stay_bounded_over_many_calls() {
        let engine = Engine::new();
        let req = request(Category::Top, AccountStage::Explore);
        let now = spring_now();

        let mut state = fresh_state();
        for _ in 0..50 {
            let (_, next, _) = engine.decide(&req, state, now);
            state = next;
        }

        assert_eq!(state.history.len(), HISTORY_CAP);
        assert!(state.avoid_pool.len() <= POOL_CAP);
        assert!(state.defer_pool.len() <= POOL_CAP);
        assert_eq!(state.onboarding_step, 50);
    }

    #[test]
    fn decision_ids_are_unique_across_calls() {
        let engine = Engine::new();
        let req = request(Category::Top, AccountStage::Explore);
        let now = spring_now();

        let (first, state, _) = engine.decide(&req, fresh_state(), now);
        let (second, _, _) = engine.decide(&req, state, now);
        assert_ne!(first.decision_id, second.decision_id);
    }

    #[test]
    fn env_trigger_fires_once_then_cools_down() {
        let engine = Engine::new();
        let now = spring_now();
        let req = request(Category::Top, AccountStage::Explore);

        let mut state = fresh_state();
        for (label, days_ago) in [("a", 1), ("a", 2), ("b", 3)] {
            state.history.push(HistoryRecord {
                ts: now.minus_days(days_ago),
                decision_id: DecisionId::new(),
                label: label.to_string(),
                category: Category::Top,
                price_band: "60-80".to_string(),
                in_stock: true,
                decision: ConfidencePosture::Conservative,
                outcome: Some(Outcome::NoVolume),
            });
        }

        let (output, state, rules) = engine.decide(&req, state, now);
        assert!(rules.contains(&"env_unfavorable".to_string()));
        assert_eq!(output.reason_one_line, templates::ENV_REASON);
        assert_eq!(output.failure_expectation.likely, RiskKind::Env);
        assert_eq!(state.stats.env_trigger_count, 1);

        // The failing records are still in the window, but the counter
        // suppresses a second trigger and then resets.
        let (output, state, rules) = engine.decide(&req, state, now);
        assert!(!rules.contains(&"env_unfavorable".to_string()));
        assert_ne!(output.reason_one_line, templates::ENV_REASON);
        assert_eq!(state.stats.env_trigger_count, 0);
    }

    #[test]
    fn winner_is_invariant_under_catalog_permutation_when_scores_differ() {
        let make = |label: &str, price: i64| {
            Candidate::new(
                label,
                vec![Category::Top],
                price,
                Season::Spring,
                AccountStage::Explore,
                vec![],
            )
        };
        let a = make("a", 70);
        let b = make("b", 120);
        let c = make("c", 170);
        let req = request(Category::Top, AccountStage::Explore);
        let now = spring_now();

        let forward = Engine::with_catalog(vec![a.clone(), b.clone(), c.clone()]).unwrap();
        let reversed = Engine::with_catalog(vec![c, b, a]).unwrap();

        let (_, fwd_state, _) = forward.decide(&req, fresh_state(), now);
        let (_, rev_state, _) = reversed.decide(&req, fresh_state(), now);
        assert_eq!(
            fwd_state.last_reco.unwrap().label,
            rev_state.last_reco.unwrap().label
        );
    }

    #[test]
    fn tied_candidates_resolve_to_catalog_order() {
        let make = |label: &str| {
            Candidate::new(
                label,
                vec![Category::Top],
                70,
                Season::Spring,
                AccountStage::Explore,
                vec![],
            )
        };
        let engine = Engine::with_catalog(vec![make("first"), make("second")]).unwrap();
        let (_, state, _) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );
        assert_eq!(state.last_reco.unwrap().label, "first");
    }

    #[test]
    fn unmatched_category_falls_back_to_the_whole_catalog() {
        let only_pants = Candidate::new(
            "pants-only",
            vec![Category::Pants],
            70,
            Season::Spring,
            AccountStage::Explore,
            vec![],
        );
        let engine = Engine::with_catalog(vec![only_pants]).unwrap();
        let (_, state, _) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );
        assert_eq!(state.last_reco.unwrap().label, "pants-only");
    }

    #[test]
    fn dont_do_is_never_empty_and_never_longer_than_three() {
        let engine = Engine::new();
        let now = spring_now();
        let mut state = fresh_state();
        for category in [Category::Top, Category::Pants, Category::Outer, Category::Set] {
            let (output, next, _) = engine.decide(
                &request(category, AccountStage::Explore),
                state,
                now,
            );
            assert!(!output.dont_do.is_empty());
            assert!(output.dont_do.len() <= DONT_DO_MAX);
            state = next;
        }
    }

    #[test]
    fn eliminations_land_in_the_matching_pools() {
        let engine = Engine::new();
        let (_, state, _) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );

        // slim knit top carries return_risk -> avoid pool
        assert!(state
            .avoid_pool
            .iter()
            .any(|item| item.label == "slim knit top"));
        // basic tee is homogeneous, fleece hoodie off-season -> defer pool
        assert!(state
            .defer_pool
            .iter()
            .any(|item| item.label == "basic short-sleeve tee"));
        assert!(state
            .defer_pool
            .iter()
            .any(|item| item.label == "fleece-lined hoodie"));
    }

    #[test]
    fn empty_catalog_is_rejected_at_construction() {
        assert!(Engine::with_catalog(Vec::new()).is_err());
    }

    #[test]
    fn rules_fired_matches_meta() {
        let engine = Engine::new();
        let (output, _, rules) = engine.decide(
            &request(Category::Top, AccountStage::Explore),
            fresh_state(),
            spring_now(),
        );
        assert_eq!(output.meta.rules_fired, rules);
    }
}

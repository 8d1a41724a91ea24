//! Rule-based priority scoring.
//!
//! The scorer starts every message at a neutral base score and adds the
//! weight of each matching rule. All matching rules apply, in table order,
//! and the sum is clamped to `[1, 10]`. A caller-supplied priority override
//! bypasses the rules entirely. Overrides are clamped into the same range; a
//! non-finite override is ignored and the content is scored instead.
//!
//! Text signals see the lowercased content.

use regex::Regex;
use tracing::{trace, warn};

use condense_core::constants::clamp_priority;
use condense_core::{Message, Role};
use condense_settings::{ScoringRule, ScoringSettings, Signal};

use crate::errors::ScoringError;

/// Compiled form of a [`Signal`].
#[derive(Debug)]
enum Matcher {
    ContainsAny(Vec<String>),
    ExactAny(Vec<String>),
    Pattern(Regex),
    ShorterThan(usize),
    CharCountAbove(char, usize),
    Role(Role),
}

impl Matcher {
    fn compile(rule: &ScoringRule) -> Result<Self, ScoringError> {
        Ok(match &rule.signal {
            Signal::ContainsAny { terms } => Self::ContainsAny(lowercase_all(terms)),
            Signal::ExactAny { terms } => Self::ExactAny(lowercase_all(terms)),
            Signal::Pattern { regex } => {
                Self::Pattern(Regex::new(regex).map_err(|source| ScoringError::InvalidPattern {
                    rule: rule.name.clone(),
                    source,
                })?)
            }
            Signal::ShorterThan { chars } => Self::ShorterThan(*chars),
            Signal::CharCountAbove { ch, count } => Self::CharCountAbove(*ch, *count),
            Signal::Role { role } => Self::Role(Role::from(role.as_str())),
        })
    }

    fn matches(&self, message: &Message, lowered: &str) -> bool {
        match self {
            Self::ContainsAny(terms) => terms.iter().any(|t| lowered.contains(t.as_str())),
            Self::ExactAny(terms) => {
                let trimmed = lowered.trim();
                terms.iter().any(|t| t == trimmed)
            }
            Self::Pattern(re) => re.is_match(lowered),
            Self::ShorterThan(chars) => message.content.chars().count() < *chars,
            Self::CharCountAbove(ch, count) => {
                message.content.chars().filter(|c| c == ch).count() > *count
            }
            Self::Role(role) => &message.role == role,
        }
    }
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

#[derive(Debug)]
struct CompiledRule {
    name: String,
    matcher: Matcher,
    weight: f64,
}

/// Scores messages against a compiled rule table.
#[derive(Debug)]
pub struct PriorityScorer {
    base_score: f64,
    rules: Vec<CompiledRule>,
}

impl PriorityScorer {
    /// Compile the rule table. Fails on an invalid `pattern` rule.
    pub fn new(settings: &ScoringSettings) -> Result<Self, ScoringError> {
        let rules = settings
            .rules
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    name: rule.name.clone(),
                    matcher: Matcher::compile(rule)?,
                    weight: rule.weight,
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;
        Ok(Self {
            base_score: settings.base_score,
            rules,
        })
    }

    /// Names of the rules that match `message`, in table order.
    pub fn matched_rules(&self, message: &Message) -> Vec<&str> {
        let lowered = message.content.to_lowercase();
        self.rules
            .iter()
            .filter(|r| r.matcher.matches(message, &lowered))
            .map(|r| r.name.as_str())
            .collect()
    }

    /// Effective priority of `message` in `[1, 10]`.
    pub fn score(&self, message: &Message) -> f64 {
        if let Some(priority) = message.priority_override {
            if priority.is_finite() {
                return clamp_priority(priority);
            }
            warn!(role = %message.role, priority, "non-finite priority override, scoring content");
        }
        let lowered = message.content.to_lowercase();
        let raw = self
            .rules
            .iter()
            .filter(|r| r.matcher.matches(message, &lowered))
            .fold(self.base_score, |acc, r| acc + r.weight);
        let score = clamp_priority(raw);
        trace!(role = %message.role, raw, score, "scored message");
        score
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use condense_core::logging::capture_logs;
    use tracing::Level;

    fn scorer() -> PriorityScorer {
        PriorityScorer::new(&ScoringSettings::default()).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_table_compiles() {
        assert_eq!(scorer().rules.len(), 10);
    }

    #[test]
    fn neutral_message_gets_base_score() {
        assert!(approx(scorer().score(&Message::user("let us look at the garden now")), 5.0));
    }

    #[test]
    fn decision_language_scores_high() {
        let msg = Message::user("I decided to use option B, remember that.");
        assert!(approx(scorer().score(&msg), 7.0));
        assert_eq!(scorer().matched_rules(&msg), ["decision"]);
    }

    #[test]
    fn greeting_question_scores_low() {
        let msg = Message::assistant("Hello! How can I help?");
        assert!(approx(scorer().score(&msg), 4.0));
        assert_eq!(scorer().matched_rules(&msg), ["question", "greeting"]);
    }

    #[test]
    fn short_greeting_scores_lowest() {
        let msg = Message::user("Hi there");
        assert!(approx(scorer().score(&msg), 1.5));
        assert_eq!(scorer().matched_rules(&msg), ["greeting", "short"]);
    }

    #[test]
    fn acknowledgment_is_exact_match_only() {
        let s = scorer();
        assert!(approx(s.score(&Message::user("  Got it ")), 1.5));
        // "ok" inside a longer sentence is not an acknowledgment
        assert!(!s.matched_rules(&Message::user("ok, here is the plan for today")).contains(&"acknowledgment"));
    }

    #[test]
    fn question_requires_trailing_mark() {
        let s = scorer();
        assert!(s.matched_rules(&Message::user("where does this go ?  ")).contains(&"question"));
        assert!(!s.matched_rules(&Message::user("is it? no, never mind it")).contains(&"question"));
    }

    #[test]
    fn rules_are_cumulative() {
        // decision +2, fact +1.5, problem +1, numeric +0.5
        let msg = Message::user("Important: the result shows bug 42 in the parser");
        assert!(approx(scorer().score(&msg), 10.0));
    }

    #[test]
    fn excitement_and_system_role() {
        let s = scorer();
        assert!(approx(s.score(&Message::user("this is so wonderful!!!")), 4.5));
        assert!(approx(s.score(&Message::system("you are reviewing a pull request")), 6.0));
    }

    #[test]
    fn score_is_clamped() {
        let s = scorer();
        let loud = Message::system("Always remember: the data and result of error 7 matter?");
        assert!(approx(s.score(&loud), 10.0));
    }

    #[test]
    fn score_is_clamped_below() {
        let settings = ScoringSettings {
            base_score: 2.0,
            rules: vec![ScoringRule::new("short", Signal::ShorterThan { chars: 20 }, -5.0)],
        };
        let s = PriorityScorer::new(&settings).unwrap();
        assert!(approx(s.score(&Message::user("ok")), 1.0));
    }

    #[test]
    fn override_is_returned_unchanged() {
        let msg = Message::user("Hi there").with_priority(9.25);
        assert!(approx(scorer().score(&msg), 9.25));
    }

    #[test]
    fn out_of_range_override_is_clamped() {
        let s = scorer();
        assert!(approx(s.score(&Message::user("a").with_priority(42.0)), 10.0));
        assert!(approx(s.score(&Message::user("b").with_priority(-3.0)), 1.0));
    }

    #[test]
    fn non_finite_override_falls_back_to_rules() {
        let (logs, _guard) = capture_logs();
        let s = scorer();
        let plain = Message::user("Let's review the deployment checklist");
        let expected = s.score(&plain);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let msg = plain.clone().with_priority(bad);
            assert!(approx(s.score(&msg), expected));
        }
        assert_eq!(logs.count_at_level(Level::WARN), 3);
    }

    #[test]
    fn custom_rules_and_base() {
        let settings = ScoringSettings {
            base_score: 3.0,
            rules: vec![ScoringRule::new(
                "ticket",
                Signal::Pattern {
                    regex: r"[a-z]+-\d+".into(),
                },
                4.0,
            )],
        };
        let s = PriorityScorer::new(&settings).unwrap();
        assert!(approx(s.score(&Message::user("see PROJ-123")), 7.0));
        assert!(approx(s.score(&Message::user("see the ticket")), 3.0));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let settings = ScoringSettings {
            base_score: 5.0,
            rules: vec![ScoringRule::new(
                "broken",
                Signal::Pattern { regex: "(".into() },
                1.0,
            )],
        };
        assert_matches!(
            PriorityScorer::new(&settings),
            Err(ScoringError::InvalidPattern { ref rule, .. }) if rule == "broken"
        );
    }

    #[test]
    fn terms_are_case_insensitive() {
        let settings = ScoringSettings {
            base_score: 5.0,
            rules: vec![ScoringRule::new(
                "shout",
                Signal::ContainsAny {
                    terms: vec!["URGENT".into()],
                },
                2.0,
            )],
        };
        let s = PriorityScorer::new(&settings).unwrap();
        assert!(approx(s.score(&Message::user("this is urgent")), 7.0));
    }

    #[test]
    fn role_signal_matches_other_roles() {
        let settings = ScoringSettings {
            base_score: 5.0,
            rules: vec![ScoringRule::new(
                "tool",
                Signal::Role { role: "tool".into() },
                -1.0,
            )],
        };
        let s = PriorityScorer::new(&settings).unwrap();
        assert!(approx(s.score(&Message::new("tool", "output")), 4.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn priority_always_in_range(content in "\\PC{0,120}", role in "user|assistant|system|tool") {
                let score = scorer().score(&Message::new(role.as_str(), content));
                prop_assert!((1.0..=10.0).contains(&score));
            }

            #[test]
            fn any_override_lands_in_range(priority in proptest::num::f64::ANY) {
                let score = scorer().score(&Message::user("x").with_priority(priority));
                prop_assert!((1.0..=10.0).contains(&score));
            }

            #[test]
            fn scoring_is_deterministic(content in "\\PC{0,120}") {
                let s = scorer();
                let msg = Message::user(content);
                prop_assert_eq!(s.score(&msg).to_bits(), s.score(&msg).to_bits());
            }
        }
    }
}

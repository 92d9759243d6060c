//! Maps a user's profile answers onto one onboarding path label.
//!
//! The completion service is asked to name a label; the reply is scanned for
//! the first catalog label (in catalog order) it contains. When the service
//! fails or names nothing useful, the result is `role` if it is itself a
//! label, otherwise the first catalog label. Classification never fails.

use std::sync::Arc;

use super::provider::CompletionProvider;
use crate::models::onboarding_path::default_labels;

const CLASSIFY_MAX_TOKENS: u32 = 100;
const WELCOME_MAX_TOKENS: u32 = 150;

/// Classifier and welcome-text generator over a completion provider.
#[derive(Clone)]
pub struct PathClassifier {
    provider: Arc<dyn CompletionProvider>,
    labels: Vec<String>,
}

impl PathClassifier {
    /// Uses the default path catalog's labels.
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        let labels = default_labels().into_iter().map(String::from).collect();
        Self::with_labels(provider, labels)
    }

    /// `labels` must be non-empty; the first one is the fallback.
    pub fn with_labels(provider: Arc<dyn CompletionProvider>, labels: Vec<String>) -> Self {
        debug_assert!(!labels.is_empty());
        Self { provider, labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Picks the onboarding path label for a profile.
    pub async fn classify(&self, role: &str, team_size: &str, goal: &str) -> String {
        let prompt = classification_prompt(role, team_size, goal, &self.labels);

        match self.provider.complete(&prompt, CLASSIFY_MAX_TOKENS).await {
            Ok(reply) => {
                if let Some(label) = first_label_in(&reply, &self.labels) {
                    tracing::debug!(label, "Completion named a path");
                    return label.to_string();
                }
                tracing::warn!(reply = %reply, "Completion named no known path, using fallback");
            }
            Err(e) => {
                tracing::warn!(error = %e, model = self.model_name(), "Path classification failed, using fallback");
            }
        }

        fallback_label(role, &self.labels).to_string()
    }

    /// Writes a short welcome message for a user starting a path.
    pub async fn compose_welcome(&self, name: &str, label: &str) -> String {
        let prompt = welcome_prompt(name, label);

        match self.provider.complete(&prompt, WELCOME_MAX_TOKENS).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            Ok(_) => fallback_welcome(label),
            Err(e) => {
                tracing::warn!(error = %e, "Welcome message generation failed, using template");
                UNAVAILABLE_WELCOME.to_string()
            }
        }
    }
}

pub(crate) fn classification_prompt(
    role: &str,
    team_size: &str,
    goal: &str,
    labels: &[String],
) -> String {
    format!(
        "Based on the following user profile, determine the best-fit onboarding path.\n\n\
         User Role: {role}\n\
         Team Size: {team_size}\n\
         Primary Goal: {goal}\n\n\
         Available paths: {}\n\n\
         Respond with ONLY the user type path name that best fits this profile. No explanation, just the path name.",
        labels.join(", ")
    )
}

pub(crate) fn welcome_prompt(name: &str, label: &str) -> String {
    format!(
        "Create a short, friendly welcome message (2-3 sentences) for a user who just signed up for an onboarding path.\n\n\
         User name: {name}\n\
         Onboarding path: {label}\n\n\
         Make it warm, encouraging, and relevant to their chosen path."
    )
}

/// First label, in catalog order, that occurs anywhere in `reply`.
pub(crate) fn first_label_in<'a>(reply: &str, labels: &'a [String]) -> Option<&'a str> {
    labels
        .iter()
        .find(|label| reply.contains(label.as_str()))
        .map(String::as_str)
}

pub(crate) fn fallback_label<'a>(role: &'a str, labels: &'a [String]) -> &'a str {
    if labels.iter().any(|label| label == role) {
        role
    } else {
        labels.first().map(String::as_str).unwrap_or_default()
    }
}

/// Welcome used when the completion service cannot be reached
pub const UNAVAILABLE_WELCOME: &str = "Welcome! We're excited to help you get the most out of our product.";

pub fn fallback_welcome(label: &str) -> String {
    format!("Welcome! We're excited to get you started with your {label} journey.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::provider::{CompletionError, UnavailableProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies with a fixed text and records prompts.
    struct FixedReply {
        reply: String,
        seen: Mutex<Vec<(String, u32)>>,
    }

    impl FixedReply {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for FixedReply {
        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens));
            Ok(self.reply.clone())
        }
    }

    fn labels() -> Vec<String> {
        default_labels().into_iter().map(String::from).collect()
    }

    #[test]
    fn first_label_follows_catalog_order() {
        let labels = labels();
        assert_eq!(first_label_in("Founder", &labels), Some("Founder"));
        // Sales Lead precedes Founder in the catalog
        assert_eq!(
            first_label_in("Founder, or maybe Sales Lead", &labels),
            Some("Sales Lead")
        );
        assert_eq!(
            first_label_in("The best path is: Marketing Manager.", &labels),
            Some("Marketing Manager")
        );
        assert_eq!(first_label_in("founder", &labels), None);
        assert_eq!(first_label_in("", &labels), None);
    }

    #[test]
    fn fallback_prefers_exact_role() {
        let labels = labels();
        assert_eq!(fallback_label("Support Manager", &labels), "Support Manager");
        assert_eq!(fallback_label("support manager", &labels), "Operations Manager");
        assert_eq!(fallback_label("CTO", &labels), "Operations Manager");
        assert_eq!(fallback_label("", &labels), "Operations Manager");
    }

    #[test]
    fn prompt_embeds_profile_and_labels() {
        let prompt = classification_prompt("CTO", "1-5 people", "Ship faster", &labels());
        assert!(prompt.contains("User Role: CTO"));
        assert!(prompt.contains("Team Size: 1-5 people"));
        assert!(prompt.contains("Primary Goal: Ship faster"));
        assert!(prompt.contains(
            "Available paths: Operations Manager, Sales Lead, Founder, Support Manager, Marketing Manager"
        ));

        let welcome = welcome_prompt("ada", "Founder");
        assert!(welcome.contains("User name: ada"));
        assert!(welcome.contains("Onboarding path: Founder"));
    }

    #[tokio::test]
    async fn classify_uses_completion_label() {
        let provider = FixedReply::new("  Support Manager\n");
        let classifier = PathClassifier::new(provider.clone());

        let label = classifier.classify("Founder", "1-5", "grow").await;
        assert_eq!(label, "Support Manager");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, 100);
    }

    #[tokio::test]
    async fn classify_falls_back_when_reply_names_nothing() {
        let classifier = PathClassifier::new(FixedReply::new("I am not sure."));

        assert_eq!(classifier.classify("Founder", "6-20", "x").await, "Founder");
        assert_eq!(
            classifier.classify("Engineer", "6-20", "x").await,
            "Operations Manager"
        );
    }

    #[tokio::test]
    async fn classify_fallback_is_deterministic_when_unavailable() {
        let classifier = PathClassifier::new(Arc::new(UnavailableProvider));

        for _ in 0..3 {
            assert_eq!(
                classifier.classify("Founder", "6-20 people", "Grow revenue").await,
                "Founder"
            );
            assert_eq!(
                classifier.classify("Designer", "1", "x").await,
                "Operations Manager"
            );
        }
    }

    #[tokio::test]
    async fn compose_welcome_uses_reply_or_template() {
        let provider = FixedReply::new("  Welcome aboard, ada!  ");
        let classifier = PathClassifier::new(provider.clone());
        assert_eq!(
            classifier.compose_welcome("ada", "Founder").await,
            "Welcome aboard, ada!"
        );
        assert_eq!(provider.seen.lock().unwrap()[0].1, 150);

        let blank = PathClassifier::new(FixedReply::new("   "));
        assert_eq!(
            blank.compose_welcome("ada", "Founder").await,
            "Welcome! We're excited to get you started with your Founder journey."
        );

        let down = PathClassifier::new(Arc::new(UnavailableProvider));
        assert_eq!(
            down.compose_welcome("ada", "Sales Lead").await,
            "Welcome! We're excited to help you get the most out of our product."
        );
    }

    #[tokio::test]
    async fn custom_labels() {
        let classifier = PathClassifier::with_labels(
            FixedReply::new("nothing"),
            vec!["Alpha".to_string(), "Beta".to_string()],
        );
        assert_eq!(classifier.labels().len(), 2);
        assert_eq!(classifier.classify("Beta", "", "").await, "Beta");
        assert_eq!(classifier.classify("Gamma", "", "").await, "Alpha");
    }
}

//! Per-sender conversational state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::SelectableItem;

/// Whether automation is handling the sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Active,
    /// A human operator owns the conversation until an explicit resume
    HumanHandoff,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::HumanHandoff => "human_handoff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" | "bot" => Some(Self::Active),
            "human_handoff" | "human" => Some(Self::HumanHandoff),
            _ => None,
        }
    }
}

/// Language used for outbound rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ar,
    En,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::En => "en",
        }
    }
}

/// The multi-choice flow currently awaiting a numeric reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    AwaitingServiceChoice,
    AwaitingOfferChoice,
    AwaitingUmrahChoice,
    AwaitingFlightChoice,
    AwaitingVisaCountryChoice,
    AwaitingVisaTypeChoice,
    AwaitingVisaDetailsChoice,
}

impl StepKind {
    /// Steps whose choice re-queries the catalog instead of rendering a detail view
    pub fn is_cascade(&self) -> bool {
        matches!(
            self,
            Self::AwaitingVisaCountryChoice | Self::AwaitingVisaTypeChoice
        )
    }
}

#[derive(Deserialize)]
struct RawPendingSelection {
    step: StepKind,
    items: Vec<SelectableItem>,
}

/// A rendered numbered list and the items aligned with it
///
/// Always holds at least one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPendingSelection")]
pub struct PendingSelection {
    step: StepKind,
    items: Vec<SelectableItem>,
}

impl TryFrom<RawPendingSelection> for PendingSelection {
    type Error = String;

    fn try_from(raw: RawPendingSelection) -> Result<Self, Self::Error> {
        Self::new(raw.step, raw.items).ok_or_else(|| "pending selection without items".to_string())
    }
}

impl PendingSelection {
    /// Returns `None` when `items` is empty
    pub fn new(step: StepKind, items: Vec<SelectableItem>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { step, items })
        }
    }

    pub fn step(&self) -> StepKind {
        self.step
    }

    pub fn items(&self) -> &[SelectableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve a 1-based choice
    pub fn choose(&self, choice: usize) -> Option<&SelectableItem> {
        choice.checked_sub(1).and_then(|idx| self.items.get(idx))
    }
}

/// Conversation context carried between turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub lang: Lang,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingSelection>,
}

impl Context {
    pub fn with_lang(lang: Lang) -> Self {
        Self { lang, pending: None }
    }
}

/// Persisted state for one sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub sender_id: String,
    #[serde(default)]
    pub state: SessionState,
    #[serde(default)]
    pub context: Context,
}

impl Session {
    /// Fresh session: `Active` with an empty context
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            state: SessionState::Active,
            context: Context::default(),
        }
    }

    pub fn is_handoff(&self) -> bool {
        self.state == SessionState::HumanHandoff
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.context.pending.as_ref()
    }

    /// Hand the conversation to a human, dropping any pending selection
    pub fn hand_off(&mut self) {
        self.state = SessionState::HumanHandoff;
        self.context = Context::default();
    }

    /// Return control to automation with an empty context
    pub fn reactivate(&mut self) {
        self.state = SessionState::Active;
        self.context = Context::default();
    }

    /// Keep the language, drop any pending selection
    pub fn clear_pending(&mut self) {
        self.context = Context::with_lang(self.context.lang);
    }

    /// Serialize the context for storage
    pub fn context_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.context)
    }
}

/// A stored session with its last update time (admin listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub sender_id: String,
    pub state: SessionState,
    pub context: Context,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<SelectableItem> {
        names.iter().map(|n| SelectableItem::Label(n.to_string())).collect()
    }

    #[test]
    fn test_pending_selection_rejects_empty() {
        assert!(PendingSelection::new(StepKind::AwaitingOfferChoice, vec![]).is_none());
        assert!(PendingSelection::new(StepKind::AwaitingOfferChoice, labels(&["a"])).is_some());
    }

    #[test]
    fn test_choose_is_one_based() {
        let pending =
            PendingSelection::new(StepKind::AwaitingVisaCountryChoice, labels(&["الأردن", "مصر"]))
                .unwrap();

        assert_eq!(pending.choose(0), None);
        assert_eq!(pending.choose(1).and_then(|i| i.as_label()), Some("الأردن"));
        assert_eq!(pending.choose(2).and_then(|i| i.as_label()), Some("مصر"));
        assert_eq!(pending.choose(3), None);
    }

    #[test]
    fn test_context_serialization() {
        let mut session = Session::new("963900000000@c.us");
        session.context.pending =
            PendingSelection::new(StepKind::AwaitingVisaTypeChoice, labels(&["عمل"]));

        let json = session.context_json().unwrap();
        assert!(json.contains("awaiting_visa_type_choice"));

        let back: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session.context);
    }

    #[test]
    fn test_empty_pending_is_rejected_on_load() {
        let json = r#"{"lang":"ar","pending":{"step":"awaiting_offer_choice","items":[]}}"#;
        assert!(serde_json::from_str::<Context>(json).is_err());

        let json = r#"{"lang":"en"}"#;
        let ctx: Context = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.lang, Lang::En);
        assert!(ctx.pending.is_none());
    }

    #[test]
    fn test_hand_off_and_reactivate() {
        let mut session = Session::new("s");
        session.context.pending =
            PendingSelection::new(StepKind::AwaitingFlightChoice, labels(&["x"]));

        session.hand_off();
        assert!(session.is_handoff());
        assert!(session.pending().is_none());

        session.reactivate();
        assert_eq!(session.state, SessionState::Active);
        assert_eq!(session.context, Context::default());
    }

    #[test]
    fn test_state_parse_accepts_legacy_names() {
        assert_eq!(SessionState::parse("bot"), Some(SessionState::Active));
        assert_eq!(SessionState::parse("human"), Some(SessionState::HumanHandoff));
        assert_eq!(SessionState::parse("human_handoff"), Some(SessionState::HumanHandoff));
        assert_eq!(SessionState::parse("other"), None);
    }
}

//! Domain entities for Switchboard
//!
//! This module contains the entities tracked by the lifecycle engine:
//! customers, conversations, per-conversation messages, resolutions, and
//! issued auth tokens. Each entity includes its serialization rules and the
//! business rules the HTTP surface relies on. Wire names are camelCase to
//! match the public API contract.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use switchboard_common::{Error, Result};

use crate::auth::AuthUser;
use crate::state::{ConversationEvent, ConversationState, ConversationStateMachine};

/// Customer tier levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTier {
    #[default]
    Standard,
    Enterprise,
}

impl std::fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerTier::Standard => write!(f, "standard"),
            CustomerTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Conversation severity tier, P0 highest.
///
/// Severity is an annotation stamped by an external classifier (or defaulted
/// at creation); the engine only stores and sorts it. `Unknown` absorbs any
/// tier this build does not recognize and sorts after P3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    P0,
    P1,
    #[default]
    P2,
    P3,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl Severity {
    /// Fixed priority order for list sorting: P0 < P1 < P2 < P3 < unknown
    pub fn sort_rank(&self) -> u8 {
        match self {
            Severity::P0 => 0,
            Severity::P1 => 1,
            Severity::P2 => 2,
            Severity::P3 => 3,
            Severity::Unknown => 4,
        }
    }

    /// Offset from creation to the first-response SLA deadline
    pub fn first_response_offset(&self) -> Duration {
        match self {
            Severity::P0 => Duration::minutes(15),
            Severity::P1 => Duration::hours(1),
            Severity::P2 | Severity::Unknown => Duration::hours(4),
            Severity::P3 => Duration::hours(8),
        }
    }

    /// Offset from creation to the resolution SLA deadline
    pub fn resolution_offset(&self) -> Duration {
        match self {
            Severity::P0 => Duration::hours(4),
            Severity::P1 => Duration::hours(8),
            Severity::P2 | Severity::Unknown => Duration::hours(24),
            Severity::P3 => Duration::hours(72),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::P0 => write!(f, "P0"),
            Severity::P1 => write!(f, "P1"),
            Severity::P2 => write!(f, "P2"),
            Severity::P3 => write!(f, "P3"),
            Severity::Unknown => write!(f, "unknown"),
        }
    }
}

/// Conversation sentiment annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
    Angry,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Angry => write!(f, "angry"),
        }
    }
}

/// Message direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Inbound,
    Outbound,
    Internal,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
            Direction::Internal => write!(f, "internal"),
        }
    }
}

/// Message sender type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    #[default]
    Customer,
    Agent,
    System,
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderType::Customer => write!(f, "customer"),
            SenderType::Agent => write!(f, "agent"),
            SenderType::System => write!(f, "system"),
        }
    }
}

/// Conversation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Open,
    AwaitingCustomer,
    AwaitingAgent,
    Escalated,
    Resolved,
}

impl ConversationStatus {
    /// Check if status is terminal
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    /// Convert to state machine state
    pub fn to_state(&self) -> ConversationState {
        match self {
            ConversationStatus::Open => ConversationState::Open,
            ConversationStatus::AwaitingCustomer => ConversationState::AwaitingCustomer,
            ConversationStatus::AwaitingAgent => ConversationState::AwaitingAgent,
            ConversationStatus::Escalated => ConversationState::Escalated,
            ConversationStatus::Resolved => ConversationState::Resolved,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: ConversationState) -> Self {
        match state {
            ConversationState::Open => ConversationStatus::Open,
            ConversationState::AwaitingCustomer => ConversationStatus::AwaitingCustomer,
            ConversationState::AwaitingAgent => ConversationStatus::AwaitingAgent,
            ConversationState::Escalated => ConversationStatus::Escalated,
            ConversationState::Resolved => ConversationStatus::Resolved,
        }
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Customer entity — immutable identity record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub tier: CustomerTier,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Create a new customer
    pub fn new(name: String, email: Option<String>, company: Option<String>) -> Self {
        Customer {
            id: Uuid::new_v4(),
            name,
            email,
            company,
            tier: CustomerTier::default(),
            created_at: Utc::now(),
        }
    }
}

/// SLA deadlines, fixed at conversation creation.
///
/// `breached` is a static flag written by an external SLA monitor; the
/// engine never recomputes it against a clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sla {
    pub first_response_due_at: DateTime<Utc>,
    pub resolution_due_at: DateTime<Utc>,
    pub breached: bool,
}

impl Sla {
    /// Compute deadlines for a severity tier from the creation instant
    pub fn for_severity(severity: Severity, created_at: DateTime<Utc>) -> Self {
        Sla {
            first_response_due_at: created_at + severity.first_response_offset(),
            resolution_due_at: created_at + severity.resolution_offset(),
            breached: false,
        }
    }
}

/// Conversation entity — the central aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub state: ConversationStatus,
    pub severity: Severity,
    pub sentiment: Sentiment,
    pub intent: String,
    pub current_channel: String,
    pub channels_used: Vec<String>,
    pub assigned_agent_id: Option<String>,
    pub assigned_team_id: Option<String>,
    pub subject: Option<String>,
    pub tags: Vec<String>,
    pub sla: Sla,
    pub resolution_id: Option<Uuid>,
    pub message_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Create a new conversation. Annotations (severity, sentiment, intent)
    /// come from the caller or an upstream classifier and are stored as-is.
    pub fn new(
        customer_id: Uuid,
        channel: String,
        subject: Option<String>,
        severity: Severity,
        sentiment: Sentiment,
        intent: String,
    ) -> Self {
        let now = Utc::now();
        Conversation {
            id: Uuid::new_v4(),
            customer_id,
            state: ConversationStatus::default(),
            severity,
            sentiment,
            intent,
            current_channel: channel.clone(),
            channels_used: vec![channel],
            assigned_agent_id: None,
            assigned_team_id: None,
            subject,
            tags: Vec::new(),
            sla: Sla::for_severity(severity, now),
            resolution_id: None,
            message_count: 0,
            created_at: now,
            updated_at: now,
            last_message_at: None,
            resolved_at: None,
        }
    }

    /// Apply message bookkeeping: count, timestamps, channel tracking, and
    /// the message-driven state transition. Must be called exactly once per
    /// stored message so that `message_count` equals the stored sequence
    /// length.
    pub fn record_message(&mut self, message: &Message) {
        let now = Utc::now();

        self.state = ConversationStatus::from_state(ConversationStateMachine::after_message(
            self.state.to_state(),
            message.direction,
            message.sender_type,
        ));

        if !self.channels_used.contains(&message.channel) {
            self.channels_used.push(message.channel.clone());
        }
        self.current_channel = message.channel.clone();

        self.message_count += 1;
        self.last_message_at = Some(now);
        self.updated_at = now;
    }

    /// Assign an agent (and optionally a team) to the conversation
    pub fn assign(&mut self, agent_id: String, team_id: Option<String>) -> Result<()> {
        let next =
            ConversationStateMachine::transition(self.state.to_state(), ConversationEvent::Assign)
                .map_err(|e| Error::Conflict(e.to_string()))?;

        self.state = ConversationStatus::from_state(next);
        self.assigned_agent_id = Some(agent_id);
        if team_id.is_some() {
            self.assigned_team_id = team_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Escalate the conversation, optionally overriding its severity with
    /// the priority the escalating party supplied
    pub fn escalate(&mut self, priority: Option<Severity>) -> Result<()> {
        let next = ConversationStateMachine::transition(
            self.state.to_state(),
            ConversationEvent::Escalate,
        )
        .map_err(|e| Error::Conflict(e.to_string()))?;

        self.state = ConversationStatus::from_state(next);
        if let Some(priority) = priority {
            self.severity = priority;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Resolve the conversation
    pub fn resolve(&mut self) -> Result<()> {
        let next =
            ConversationStateMachine::transition(self.state.to_state(), ConversationEvent::Resolve)
                .map_err(|e| Error::Conflict(e.to_string()))?;

        let now = Utc::now();
        self.state = ConversationStatus::from_state(next);
        self.resolved_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Record the back-reference to the resolution spawned for this
    /// conversation. Set exactly once.
    pub fn attach_resolution(&mut self, resolution_id: Uuid) -> Result<()> {
        if let Some(existing) = self.resolution_id {
            return Err(Error::Conflict(format!(
                "Conversation {} already has resolution {}",
                self.id, existing
            )));
        }
        self.resolution_id = Some(resolution_id);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Message entity — immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub channel: String,
    pub direction: Direction,
    pub sender_type: SenderType,
    pub sender_id: Option<String>,
    pub content: String,
    pub content_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(
        conversation_id: Uuid,
        channel: String,
        direction: Direction,
        sender_type: SenderType,
        sender_id: Option<String>,
        content: String,
    ) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::Validation(
                "Message content cannot be empty or whitespace-only".to_string(),
            ));
        }

        let status = match direction {
            Direction::Inbound => "received",
            Direction::Outbound => "sent",
            Direction::Internal => "recorded",
        };

        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            channel,
            direction,
            sender_type,
            sender_id,
            content,
            content_type: "text".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Create an internal system message recording an engine-side event
    /// (escalation reason, resolution notes)
    pub fn system(conversation_id: Uuid, channel: String, content: String) -> Self {
        Message {
            id: Uuid::new_v4(),
            conversation_id,
            channel,
            direction: Direction::Internal,
            sender_type: SenderType::System,
            sender_id: None,
            content,
            content_type: "text".to_string(),
            status: "recorded".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Resolution workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    #[default]
    Investigating,
    FixInProgress,
    AwaitingDeploy,
    Monitoring,
    Resolved,
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStatus::Investigating => write!(f, "investigating"),
            ResolutionStatus::FixInProgress => write!(f, "fix_in_progress"),
            ResolutionStatus::AwaitingDeploy => write!(f, "awaiting_deploy"),
            ResolutionStatus::Monitoring => write!(f, "monitoring"),
            ResolutionStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// One entry in a resolution's append-only timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
}

/// Resolution entity — long-running issue record, 0-or-1 per conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub customer_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub issue_type: Option<String>,
    pub priority: Severity,
    pub status: ResolutionStatus,
    pub assigned_team_id: Option<String>,
    pub assigned_engineer_id: Option<String>,
    pub root_cause: Option<String>,
    pub affected_systems: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Resolution {
    /// Create a new resolution in `investigating` status. The creation event
    /// is always the first timeline entry.
    pub fn new(
        conversation_id: Uuid,
        customer_id: Uuid,
        title: String,
        description: Option<String>,
        issue_type: Option<String>,
        priority: Severity,
    ) -> Self {
        let now = Utc::now();
        Resolution {
            id: Uuid::new_v4(),
            conversation_id,
            customer_id,
            title,
            description,
            issue_type,
            priority,
            status: ResolutionStatus::default(),
            assigned_team_id: None,
            assigned_engineer_id: None,
            root_cause: None,
            affected_systems: Vec::new(),
            timeline: vec![TimelineEntry {
                timestamp: now,
                event: "created".to_string(),
            }],
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    /// Change the workflow status. Transitions are free-form; every actual
    /// change appends a `previous -> new` timeline entry, and moving to
    /// `resolved` also stamps `resolved_at`. Setting the current status
    /// again is a no-op.
    pub fn set_status(&mut self, status: ResolutionStatus) {
        if status == self.status {
            return;
        }

        let now = Utc::now();
        self.timeline.push(TimelineEntry {
            timestamp: now,
            event: format!("{} -> {}", self.status, status),
        });
        self.status = status;
        if status == ResolutionStatus::Resolved {
            self.resolved_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Update investigation fields without a status change. Field updates
    /// never append timeline entries.
    pub fn update_details(
        &mut self,
        root_cause: Option<String>,
        affected_systems: Option<Vec<String>>,
        assigned_team_id: Option<String>,
        assigned_engineer_id: Option<String>,
    ) {
        let mut touched = false;

        if let Some(root_cause) = root_cause {
            self.root_cause = Some(root_cause);
            touched = true;
        }
        if let Some(systems) = affected_systems {
            self.affected_systems = systems;
            touched = true;
        }
        if let Some(team) = assigned_team_id {
            self.assigned_team_id = Some(team);
            touched = true;
        }
        if let Some(engineer) = assigned_engineer_id {
            self.assigned_engineer_id = Some(engineer);
            touched = true;
        }

        if touched {
            self.updated_at = Utc::now();
        }
    }

    /// Terminal resolve with optional notes. Appends exactly one `resolved`
    /// timeline entry. Calling this twice re-stamps `resolved_at` and
    /// appends another entry; the record of each call is kept.
    pub fn resolve(&mut self, notes: Option<&str>) {
        let now = Utc::now();
        let event = match notes {
            Some(notes) if !notes.trim().is_empty() => format!("resolved: {}", notes),
            _ => "resolved".to_string(),
        };

        self.timeline.push(TimelineEntry {
            timestamp: now,
            event,
        });
        self.status = ResolutionStatus::Resolved;
        self.resolved_at = Some(now);
        self.updated_at = now;
    }
}

/// Issued auth token — ephemeral credential mapping an opaque string to the
/// authenticated user. Expiry is advisory only; the engine returns it to the
/// caller but does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Issue a fresh opaque token for an authenticated user
    pub fn issue(user: &AuthUser, ttl: Duration) -> Self {
        let raw: [u8; 24] = rand::thread_rng().gen();
        let now = Utc::now();

        Token {
            token: format!("swt_{}", hex::encode(raw)),
            user_id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// The actor this token authenticates
    pub fn user(&self) -> AuthUser {
        AuthUser {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

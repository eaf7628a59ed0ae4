//! Direct messages and the conversation list built from them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The other participant, seen from `viewer`.
    pub fn counterpart_of(&self, viewer: Uuid) -> Uuid {
        if self.sender_id == viewer {
            self.recipient_id
        } else {
            self.sender_id
        }
    }
}

/// Latest exchange with one other user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub counterpart_id: Uuid,
    pub counterpart_name: String,
    pub last_message: Message,
}

/// Reduce a user's sent and received messages to one entry per
/// counterpart holding the most recent message, newest conversation first.
///
/// Ties on timestamp keep the message seen first; ties between
/// conversations are ordered by counterpart id so the output is stable.
pub fn latest_per_counterpart(
    viewer: Uuid,
    sent: Vec<Message>,
    received: Vec<Message>,
) -> Vec<(Uuid, Message)> {
    let mut latest: HashMap<Uuid, Message> = HashMap::new();

    for message in sent.into_iter().chain(received) {
        let counterpart = message.counterpart_of(viewer);
        match latest.get(&counterpart) {
            Some(existing) if existing.created_at >= message.created_at => {}
            _ => {
                latest.insert(counterpart, message);
            }
        }
    }

    let mut conversations: Vec<(Uuid, Message)> = latest.into_iter().collect();
    conversations.sort_by(|(a_id, a), (b_id, b)| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a_id.cmp(b_id))
    });
    conversations
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    #[schema(example = "See you at the meetup!")]
    pub content: String,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            content: message.content,
            sender_id: message.sender_id,
            recipient_id: message.recipient_id,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationResponse {
    pub counterpart_id: Uuid,
    #[schema(example = "Grace Hopper")]
    pub counterpart_name: String,
    pub last_message: MessageResponse,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            counterpart_id: conversation.counterpart_id,
            counterpart_name: conversation.counterpart_name,
            last_message: conversation.last_message.into(),
        }
    }
}

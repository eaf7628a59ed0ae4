//! Message service - direct messages and the conversation list.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::container::parallel;
use crate::domain::{latest_per_counterpart, Conversation, Message};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Shown when a counterpart's account no longer resolves
const UNKNOWN_COUNTERPART: &str = "Deleted user";

#[async_trait]
pub trait MessageService: Send + Sync {
    /// Send a message to another user
    async fn send(&self, sender_id: Uuid, recipient_id: Uuid, content: String)
        -> AppResult<Message>;

    /// One entry per counterpart holding the latest message, newest first
    async fn conversations(&self, user_id: Uuid) -> AppResult<Vec<Conversation>>;

    /// Every message exchanged with `other_id`, oldest first
    async fn thread(&self, user_id: Uuid, other_id: Uuid) -> AppResult<Vec<Message>>;
}

pub struct MessageManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> MessageManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn ensure_user_exists(&self, id: Uuid) -> AppResult<()> {
        match self.uow.users().find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> MessageService for MessageManager<U> {
    async fn send(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    ) -> AppResult<Message> {
        if sender_id == recipient_id {
            return Err(AppError::validation("You cannot send a message to yourself"));
        }

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(AppError::validation("Message content is required"));
        }

        self.ensure_user_exists(recipient_id).await?;

        let message = self
            .uow
            .messages()
            .create(sender_id, recipient_id, content)
            .await?;
        tracing::debug!(message_id = %message.id, %sender_id, %recipient_id, "Message sent");
        Ok(message)
    }

    async fn conversations(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        let messages = self.uow.messages();
        let (sent, received) =
            parallel::join2(messages.list_sent(user_id), messages.list_received(user_id)).await?;

        let latest = latest_per_counterpart(user_id, sent, received);
        if latest.is_empty() {
            return Ok(Vec::new());
        }

        let ids = latest.iter().map(|(id, _)| *id).collect();
        let names: HashMap<Uuid, String> = self
            .uow
            .users()
            .find_by_ids(ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        Ok(latest
            .into_iter()
            .map(|(counterpart_id, last_message)| Conversation {
                counterpart_name: names
                    .get(&counterpart_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_COUNTERPART.to_string()),
                counterpart_id,
                last_message,
            })
            .collect())
    }

    async fn thread(&self, user_id: Uuid, other_id: Uuid) -> AppResult<Vec<Message>> {
        self.ensure_user_exists(other_id).await?;
        self.uow.messages().list_between(user_id, other_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::services::test_support::TestRepos;
    use chrono::{Duration, Utc};

    fn message(from: Uuid, to: Uuid, minutes_ago: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            content: "hi".into(),
            sender_id: from,
            recipient_id: to,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn named(id: Uuid, name: &str) -> User {
        User::new(id, name.into(), format!("{name}@example.com"), "h".into())
    }

    #[tokio::test]
    async fn test_send_to_self_is_rejected() {
        let mut repos = TestRepos::default();
        repos.messages.expect_create().never();

        let service = MessageManager::new(repos.into_uow());
        let me = Uuid::new_v4();

        assert!(matches!(
            service.send(me, me, "hello".into()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_send_to_unknown_recipient() {
        let mut repos = TestRepos::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.messages.expect_create().never();

        let service = MessageManager::new(repos.into_uow());
        let result = service
            .send(Uuid::new_v4(), Uuid::new_v4(), "hello".into())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_send_blank_content() {
        let service = MessageManager::new(TestRepos::default().into_uow());
        let result = service
            .send(Uuid::new_v4(), Uuid::new_v4(), " \n ".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_send_trims_content() {
        let mut repos = TestRepos::default();
        repos
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(named(id, "grace"))));
        repos
            .messages
            .expect_create()
            .withf(|_, _, content| content == "hello")
            .returning(|from, to, content| {
                Ok(Message {
                    content,
                    ..message(from, to, 0)
                })
            });

        let service = MessageManager::new(repos.into_uow());
        let sent = service
            .send(Uuid::new_v4(), Uuid::new_v4(), "  hello ".into())
            .await
            .unwrap();

        assert_eq!(sent.content, "hello");
    }

    #[tokio::test]
    async fn test_conversations_resolve_names_in_one_batch() {
        let me = Uuid::new_v4();
        let grace = Uuid::new_v4();
        let linus = Uuid::new_v4();

        let sent = vec![message(me, grace, 30), message(me, linus, 5)];
        let received = vec![message(grace, me, 1)];

        let mut repos = TestRepos::default();
        repos
            .messages
            .expect_list_sent()
            .returning(move |_| Ok(sent.clone()));
        repos
            .messages
            .expect_list_received()
            .returning(move |_| Ok(received.clone()));
        repos
            .users
            .expect_find_by_ids()
            .times(1)
            .withf(|ids| ids.len() == 2)
            .returning(move |_| Ok(vec![named(grace, "grace")]));

        let service = MessageManager::new(repos.into_uow());
        let conversations = service.conversations(me).await.unwrap();

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].counterpart_id, grace);
        assert_eq!(conversations[0].counterpart_name, "grace");
        assert_eq!(conversations[0].last_message.sender_id, grace);
        assert_eq!(conversations[1].counterpart_id, linus);
        assert_eq!(conversations[1].counterpart_name, UNKNOWN_COUNTERPART);
    }

    #[tokio::test]
    async fn test_no_conversations_skips_name_lookup() {
        let mut repos = TestRepos::default();
        repos.messages.expect_list_sent().returning(|_| Ok(vec![]));
        repos.messages.expect_list_received().returning(|_| Ok(vec![]));
        repos.users.expect_find_by_ids().never();

        let service = MessageManager::new(repos.into_uow());
        assert!(service.conversations(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_thread_with_unknown_user() {
        let mut repos = TestRepos::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.messages.expect_list_between().never();

        let service = MessageManager::new(repos.into_uow());
        assert!(matches!(
            service.thread(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }
}

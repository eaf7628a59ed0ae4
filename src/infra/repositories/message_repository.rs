//! Direct message repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::message::{self, ActiveModel, Entity as MessageEntity};
use crate::domain::Message;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, sender_id: Uuid, recipient_id: Uuid, content: String)
        -> AppResult<Message>;

    /// Messages sent by `user_id`, newest first
    async fn list_sent(&self, user_id: Uuid) -> AppResult<Vec<Message>>;

    /// Messages received by `user_id`, newest first
    async fn list_received(&self, user_id: Uuid) -> AppResult<Vec<Message>>;

    /// Both directions between two users, oldest first
    async fn list_between(&self, a: Uuid, b: Uuid) -> AppResult<Vec<Message>>;

    async fn count(&self) -> AppResult<u64>;
}

pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn create(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    ) -> AppResult<Message> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            content: Set(content),
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Message::from(model))
    }

    async fn list_sent(&self, user_id: Uuid) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::SenderId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn list_received(&self, user_id: Uuid) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::RecipientId.eq(user_id))
            .order_by_desc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn list_between(&self, a: Uuid, b: Uuid) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(message::Column::SenderId.eq(a))
                            .add(message::Column::RecipientId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(message::Column::SenderId.eq(b))
                            .add(message::Column::RecipientId.eq(a)),
                    ),
            )
            .order_by_asc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Message::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(MessageEntity::find().count(&self.db).await?)
    }
}

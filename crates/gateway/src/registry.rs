//! In-memory bot registry and conversation transcripts.
//!
//! The registry is the caller of the responder: it owns every bot's
//! knowledge store and every conversation, and appends the visitor message
//! and the reply after each turn. Locks are never held across a reply.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use sitechat_core::{BotId, ChatMessage, Conversation, ConversationId, KnowledgeError};
use sitechat_knowledge::{KnowledgeStore, Responder};

/// Maximum number of bots before the oldest is evicted.
pub const MAX_BOTS: usize = 1_000;
/// Maximum number of conversations before the oldest is evicted.
pub const MAX_CONVERSATIONS: usize = 1_000;
/// Maximum number of messages kept per conversation.
pub const MAX_MESSAGES: usize = 200;

/// Capacity limits for a [`BotRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryLimits {
    pub max_bots: usize,
    pub max_conversations: usize,
    pub max_messages: usize,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            max_bots: MAX_BOTS,
            max_conversations: MAX_CONVERSATIONS,
            max_messages: MAX_MESSAGES,
        }
    }
}

/// A named support bot and its knowledge.
#[derive(Debug)]
pub struct Bot {
    pub id: BotId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub responder: Responder,
}

impl Bot {
    pub fn knowledge(&self) -> &KnowledgeStore {
        self.responder.store()
    }
}

/// The result of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub conversation_id: ConversationId,
    pub reply: String,
}

pub struct BotRegistry {
    bots: RwLock<HashMap<String, Arc<Bot>>>,
    conversations: RwLock<HashMap<String, Conversation>>,
    response_delay: Duration,
    limits: RegistryLimits,
}

impl BotRegistry {
    pub fn new(response_delay: Duration) -> Self {
        Self {
            bots: RwLock::new(HashMap::new()),
            conversations: RwLock::new(HashMap::new()),
            response_delay,
            limits: RegistryLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: RegistryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Create a bot. The name must not be blank.
    pub async fn create(
        &self,
        name: &str,
        source_label: Option<String>,
        snippets: Vec<String>,
    ) -> Result<Arc<Bot>, KnowledgeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KnowledgeError::InvalidInput(
                "bot name must not be empty".into(),
            ));
        }

        let store = Arc::new(KnowledgeStore::with_snippets(snippets, source_label));
        let bot = Arc::new(Bot {
            id: BotId::new(),
            name: name.to_string(),
            created_at: Utc::now(),
            responder: Responder::new(store).with_delay(self.response_delay),
        });

        let evicted = {
            let mut bots = self.bots.write().await;
            let evicted = if bots.len() >= self.limits.max_bots {
                bots.values()
                    .min_by_key(|b| b.created_at)
                    .map(|b| b.id.0.clone())
            } else {
                None
            };
            if let Some(oldest) = &evicted {
                bots.remove(oldest);
            }
            bots.insert(bot.id.0.clone(), bot.clone());
            evicted
        };

        if let Some(oldest) = evicted {
            let dropped = self.drop_conversations_of(&oldest).await;
            info!(bot_id = %oldest, conversations_dropped = dropped, "Evicted oldest bot");
        }

        info!(bot_id = %bot.id, snippets = bot.knowledge().len(), "Bot created");
        Ok(bot)
    }

    /// All bots, oldest first.
    pub async fn list(&self) -> Vec<Arc<Bot>> {
        let mut bots: Vec<Arc<Bot>> = self.bots.read().await.values().cloned().collect();
        bots.sort_by_key(|b| b.created_at);
        bots
    }

    pub async fn get(&self, id: &str) -> Result<Arc<Bot>, KnowledgeError> {
        self.bots
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| KnowledgeError::BotNotFound(id.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.bots.read().await.len()
    }

    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Delete a bot and every conversation with it.
    pub async fn delete(&self, id: &str) -> Result<(), KnowledgeError> {
        if self.bots.write().await.remove(id).is_none() {
            return Err(KnowledgeError::BotNotFound(id.to_string()));
        }

        let dropped = self.drop_conversations_of(id).await;
        info!(bot_id = %id, conversations_dropped = dropped, "Bot deleted");
        Ok(())
    }

    /// Remove every conversation held with `bot_id`, returning how many went.
    async fn drop_conversations_of(&self, bot_id: &str) -> usize {
        let mut conversations = self.conversations.write().await;
        let before = conversations.len();
        conversations.retain(|_, c| c.bot_id.0 != bot_id);
        before - conversations.len()
    }

    /// Replace a bot's knowledge wholesale.
    pub async fn replace_knowledge(
        &self,
        id: &str,
        snippets: Vec<String>,
        source_label: Option<String>,
    ) -> Result<Arc<Bot>, KnowledgeError> {
        let bot = self.get(id).await?;
        bot.knowledge().replace(snippets, source_label);
        info!(bot_id = %bot.id, snippets = bot.knowledge().len(), "Knowledge replaced");
        Ok(bot)
    }

    /// Run one chat turn and record it in the conversation.
    ///
    /// An unknown `conversation_id` starts a new conversation under that ID;
    /// an ID that belongs to a different bot is rejected. Ownership is checked
    /// again once the write lock is held, since another bot may have claimed
    /// the ID while the reply was being produced.
    pub async fn chat(
        &self,
        bot_id: &str,
        message: &str,
        conversation_id: Option<String>,
    ) -> Result<ChatTurn, KnowledgeError> {
        let bot = self.get(bot_id).await?;

        if let Some(cid) = conversation_id.as_deref() {
            let conversations = self.conversations.read().await;
            if let Some(existing) = conversations.get(cid)
                && existing.bot_id != bot.id
            {
                return Err(KnowledgeError::ConversationNotFound(cid.to_string()));
            }
        }

        let user_message = ChatMessage::user(message);
        let reply = bot.responder.reply(message).await;
        let bot_message = ChatMessage::bot(reply.clone());

        let conv_id = conversation_id
            .map(|c| ConversationId::from(&c))
            .unwrap_or_default();

        let mut conversations = self.conversations.write().await;

        if let Some(existing) = conversations.get(&conv_id.0)
            && existing.bot_id != bot.id
        {
            return Err(KnowledgeError::ConversationNotFound(conv_id.0));
        }

        // The bot may have been deleted or evicted during the reply.
        if !self.bots.read().await.contains_key(&bot.id.0) {
            return Err(KnowledgeError::BotNotFound(bot.id.0.clone()));
        }

        if conversations.len() >= self.limits.max_conversations
            && !conversations.contains_key(&conv_id.0)
            && let Some(oldest) = conversations
                .iter()
                .min_by_key(|(_, c)| c.created_at)
                .map(|(k, _)| k.clone())
        {
            conversations.remove(&oldest);
        }

        let conv = conversations
            .entry(conv_id.0.clone())
            .or_insert_with(|| Conversation::with_id(conv_id.clone(), bot.id.clone()));
        conv.push(user_message);
        conv.push(bot_message);
        conv.truncate_front(self.limits.max_messages);

        Ok(ChatTurn {
            conversation_id: conv_id,
            reply,
        })
    }

    /// A copy of one conversation's transcript.
    pub async fn conversation(
        &self,
        bot_id: &str,
        conversation_id: &str,
    ) -> Result<Conversation, KnowledgeError> {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .filter(|c| c.bot_id.0 == bot_id)
            .cloned()
            .ok_or_else(|| KnowledgeError::ConversationNotFound(conversation_id.to_string()))
    }
}

//! Ask - handler for free-form Q&A, a stateless forward to the chat model.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::ports::{ChatLog, ChatLogError, ChatModel, ChatModelError, ChatTurn};

/// Errors surfaced by the ask operation.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    #[error("Question cannot be empty")]
    QuestionRequired,

    #[error(transparent)]
    Model(#[from] ChatModelError),

    #[error(transparent)]
    Log(#[from] ChatLogError),
}

/// Handler for seller questions. No decision logic: recent turns go in,
/// the model's answer comes out, both are appended to the bounded log.
pub struct AskHandler {
    chat_log: Arc<dyn ChatLog>,
    model: Arc<dyn ChatModel>,
}

impl AskHandler {
    pub fn new(chat_log: Arc<dyn ChatLog>, model: Arc<dyn ChatModel>) -> Self {
        Self { chat_log, model }
    }

    pub async fn handle(&self, user_id: UserId, question: &str) -> Result<String, AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::QuestionRequired);
        }

        let history = self.chat_log.recent(&user_id).await?;
        let answer = self.model.answer(question, &history).await?;

        self.chat_log.append(&user_id, ChatTurn::user(question)).await?;
        self.chat_log.append(&user_id, ChatTurn::ai(&answer)).await?;

        tracing::info!(user_id = %user_id, turns = history.len(), "question answered");

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryChatLog;
    use crate::domain::foundation::UserId;
    use crate::ports::{ChatLog, ChatModel, ChatModelError, ChatRole, ChatTurn};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted model that records what it was asked.
    struct ScriptedChatModel {
        reply: String,
        seen_history_len: Mutex<Option<usize>>,
    }

    impl ScriptedChatModel {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen_history_len: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChatModel {
        async fn answer(
            &self,
            _question: &str,
            history: &[ChatTurn],
        ) -> Result<String, ChatModelError> {
            *self.seen_history_len.lock().unwrap() = Some(history.len());
            Ok(self.reply.clone())
        }
    }

    fn user() -> UserId {
        UserId::new("seller-1").unwrap()
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let handler = AskHandler::new(
            Arc::new(InMemoryChatLog::new(20)),
            Arc::new(ScriptedChatModel::new("answer")),
        );

        let result = handler.handle(user(), "   ").await;
        assert!(matches!(result, Err(AskError::QuestionRequired)));
    }

    #[tokio::test]
    async fn answer_is_returned_and_both_turns_are_logged() {
        let log = Arc::new(InMemoryChatLog::new(20));
        let handler = AskHandler::new(log.clone(), Arc::new(ScriptedChatModel::new("try bundles")));

        let answer = handler.handle(user(), "what should I list?").await.unwrap();

        assert_eq!(answer, "try bundles");
        let turns = log.recent(&user()).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].content, "what should I list?");
        assert_eq!(turns[1].role, ChatRole::Ai);
        assert_eq!(turns[1].content, "try bundles");
    }

    #[tokio::test]
    async fn prior_turns_are_passed_to_the_model() {
        let log = Arc::new(InMemoryChatLog::new(20));
        let model = Arc::new(ScriptedChatModel::new("ok"));
        let handler = AskHandler::new(log.clone(), model.clone());

        handler.handle(user(), "first question").await.unwrap();
        handler.handle(user(), "second question").await.unwrap();

        assert_eq!(*model.seen_history_len.lock().unwrap(), Some(2));
    }

    #[tokio::test]
    async fn model_failure_leaves_the_log_untouched() {
        struct FailingModel;

        #[async_trait]
        impl ChatModel for FailingModel {
            async fn answer(
                &self,
                _question: &str,
                _history: &[ChatTurn],
            ) -> Result<String, ChatModelError> {
                Err(ChatModelError::Transport("boom".to_string()))
            }
        }

        let log = Arc::new(InMemoryChatLog::new(20));
        let handler = AskHandler::new(log.clone(), Arc::new(FailingModel));

        let result = handler.handle(user(), "question").await;
        assert!(matches!(result, Err(AskError::Model(_))));
        assert!(log.recent(&user()).await.unwrap().is_empty());
    }
}

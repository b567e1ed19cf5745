use async_trait::async_trait;
use futures::Stream;
use std::{pin::Pin, sync::Arc};

use crate::{
    domain::{request::{ChatMessage, ChatRequest}, response::ErrorResponse},
    utils::AppError,
};

/// Content deltas as they arrive from the model.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, AppError>> + Send>>;

pub type DynChatProvider = Arc<dyn ChatProviderTrait + Send + Sync>;
pub type DynAiService = Arc<dyn AiServiceTrait + Send + Sync>;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ChatProviderTrait {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, AppError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AiServiceTrait {
    async fn chat(&self, user_id: i32, input: &ChatRequest) -> Result<ChatStream, ErrorResponse>;
}

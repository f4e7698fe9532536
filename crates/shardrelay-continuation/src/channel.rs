//! `ContinuationChannel` trait — abstraction over the point-to-point
//! continuation queue.
//!
//! The real transport (and its retry policy) lives behind this seam;
//! the publisher only needs `send`.

use crate::message::ContinuationMessage;
use async_trait::async_trait;
use shardrelay_core::ChannelError;
use std::sync::Mutex;

/// A point-to-point queue accepting continuation messages.
#[async_trait]
pub trait ContinuationChannel: Send + Sync {
    /// Enqueue one message. Implementations own their retry policy;
    /// an error here means the message was not durably accepted.
    async fn send(&self, message: &ContinuationMessage) -> Result<(), ChannelError>;
}

/// In-process channel collecting messages in memory.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    messages: Mutex<Vec<ContinuationMessage>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything sent so far, in send order.
    pub fn drain(&self) -> Vec<ContinuationMessage> {
        std::mem::take(&mut self.messages.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ContinuationChannel for MemoryChannel {
    async fn send(&self, message: &ContinuationMessage) -> Result<(), ChannelError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

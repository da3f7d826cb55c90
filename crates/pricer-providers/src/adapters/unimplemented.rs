//! Adapter for providers that are recognized but have no live integration
//! (AWS Bedrock needs SigV4 signing, Azure needs per-deployment routing, Meta
//! has no first-party hosted API). Every call fails with `NotImplemented`.

use async_trait::async_trait;

use crate::traits::{ClientError, LlmClient};

#[derive(Debug)]
pub struct UnimplementedClient {
    provider: &'static str,
    model: String,
}

impl UnimplementedClient {
    pub fn new(provider: &'static str, model: &str) -> Self {
        Self {
            provider,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for UnimplementedClient {
    async fn send_prompt(&self, _prompt: &str) -> Result<String, ClientError> {
        Err(ClientError::NotImplemented {
            provider: self.provider.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn provider_name(&self) -> &str {
        self.provider
    }
}

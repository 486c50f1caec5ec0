use std::path::Path;

use async_trait::async_trait;
use futures_util::stream;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PlanError, Result};
use crate::service::{ModelRequest, ModerationVerdict, PlanModel, TokenStream};

/// Split `text` into fragments of 1..=`max_fragment` characters.
///
/// The same seed always yields the same split.
pub fn split_fragments(text: &str, max_fragment: usize, seed: u64) -> Vec<String> {
    let max_fragment = max_fragment.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let chars: Vec<char> = text.chars().collect();

    let mut fragments = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        let len = rng.gen_range(1..=max_fragment).min(chars.len() - pos);
        fragments.push(chars[pos..pos + len].iter().collect());
        pos += len;
    }
    fragments
}

/// Replays a captured model response as a token stream.
///
/// Moderation always passes.
#[derive(Debug, Clone)]
pub struct RecordedModel {
    response: String,
    max_fragment: usize,
    seed: u64,
}

impl RecordedModel {
    pub fn new(response: impl Into<String>, max_fragment: usize, seed: u64) -> Self {
        Self {
            response: response.into(),
            max_fragment,
            seed,
        }
    }

    pub fn from_file(path: &Path, max_fragment: usize, seed: u64) -> Result<Self> {
        let response = std::fs::read_to_string(path)?;
        if response.trim().is_empty() {
            return Err(PlanError::InvalidInput(format!(
                "recorded response {} is empty",
                path.display()
            )));
        }
        Ok(Self::new(response, max_fragment, seed))
    }
}

#[async_trait]
impl PlanModel for RecordedModel {
    async fn stream_plan(&self, request: &ModelRequest) -> Result<TokenStream> {
        let fragments = split_fragments(&self.response, self.max_fragment, self.seed);
        tracing::debug!(
            fragments = fragments.len(),
            system_prompt_len = request.system_prompt.len(),
            "replaying recorded response"
        );
        Ok(Box::pin(stream::iter(fragments.into_iter().map(Ok))))
    }

    async fn moderate(&self, _input: &str) -> Result<ModerationVerdict> {
        Ok(ModerationVerdict::Allowed)
    }
}

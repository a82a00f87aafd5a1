//! Chunk-at-a-time body rewriting.

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::pin::Pin;

use crate::observability::metrics;
use crate::rewrite::policy::{ContentPolicy, RewriteRules};
use crate::rewrite::utf8::Utf8Carry;

/// Per-response rewriting state.
///
/// The only state carried between chunks is the content policy, the rules
/// and the UTF-8 decoder's held-back bytes.
#[derive(Debug)]
pub struct BodyRewriter {
    policy: ContentPolicy,
    rules: RewriteRules,
    decoder: Utf8Carry,
}

impl BodyRewriter {
    pub fn new(content_type: &str, rules: RewriteRules) -> Self {
        Self {
            policy: ContentPolicy::from_content_type(content_type),
            rules,
            decoder: Utf8Carry::new(),
        }
    }

    pub fn policy(&self) -> &ContentPolicy {
        &self.policy
    }

    /// True when chunks are forwarded byte-for-byte.
    pub fn is_passthrough(&self) -> bool {
        !self.policy.textual
    }

    /// Transform one upstream chunk. May return an empty chunk when all of
    /// its bytes are held back for the next one.
    pub fn rewrite_chunk(&mut self, chunk: Bytes) -> Bytes {
        if self.is_passthrough() {
            return chunk;
        }
        let text = self.decoder.decode(&chunk);
        self.encode(text)
    }

    /// Emit whatever the decoder still holds at end of stream.
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.is_passthrough() {
            return None;
        }
        let tail = self.decoder.finish()?;
        Some(self.encode(tail))
    }

    fn encode(&self, text: String) -> Bytes {
        match self.rules.apply(&self.policy, &text) {
            Some(rewritten) => {
                metrics::record_rewrite(self.policy.kind());
                Bytes::from(rewritten)
            }
            None => Bytes::from(text),
        }
    }
}

struct RewriteState<S> {
    upstream: Pin<Box<S>>,
    rewriter: BodyRewriter,
    finished: bool,
}

/// Wrap an upstream body stream with a [`BodyRewriter`].
///
/// Chunks are transformed and yielded as they arrive; byte order is kept.
/// An upstream error is forwarded once and ends the stream.
pub fn rewrite_stream<S, E>(
    upstream: S,
    rewriter: BodyRewriter,
) -> impl Stream<Item = Result<Bytes, E>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    let state = RewriteState {
        upstream: Box::pin(upstream),
        rewriter,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }
        loop {
            match state.upstream.next().await {
                Some(Ok(chunk)) => {
                    let out = state.rewriter.rewrite_chunk(chunk);
                    if out.is_empty() {
                        continue;
                    }
                    return Some((Ok(out), state));
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.finished = true;
                    let tail = state.rewriter.finish()?;
                    return Some((Ok(tail), state));
                }
            }
        }
    })
}

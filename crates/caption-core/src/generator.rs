//! Caption Generator - the request lifecycle behind the caption form.
//!
//! Holds the form inputs and the current caption, runs one completion at a
//! time, and substitutes the local fallback caption when the provider fails.
//!
//! ```text
//! Idle ──generate──▶ Generating ──ok──▶ Succeeded ─┐
//!   ▲                    │                         │ (generate again)
//!   │                    └──err──▶ FallenBack ─────┤
//!   └──────────────── reset ◀──────────────────────┘
//! ```

use crate::flag::timer_runtime;
use crate::{
    fallback_caption, CaptionError, Clipboard, CompletionProvider, GenerationRequest,
    GenerationResult, HashtagCount, Origin, Prompt, Result, SentenceCount, Style, StudioConfig,
    TimerScope, TransientFlag,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Where the generator is in its request lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing generated yet, or the form was reset.
    #[default]
    Idle,
    /// A completion call is in flight.
    Generating,
    /// The last caption came from the provider.
    Succeeded,
    /// The last caption is the local fallback.
    FallenBack,
}

#[derive(Debug, Default)]
struct FormState {
    content: String,
    style: Style,
    sentence_count: SentenceCount,
    hashtag_count: HashtagCount,
    result: Option<GenerationResult>,
    phase: Phase,
}

impl FormState {
    fn request(&self) -> GenerationRequest {
        GenerationRequest {
            content: self.content.clone(),
            style: self.style,
            sentence_count: self.sentence_count,
            hashtag_count: self.hashtag_count,
        }
    }
}

/// Caption form state plus its injected completion provider.
///
/// # Example
///
/// ```rust,ignore
/// use caption_core::{CaptionGenerator, StudioConfig, Style};
/// use caption_ai::OpenAiProvider;
///
/// let generator = CaptionGenerator::new(OpenAiProvider::from_env()?, StudioConfig::from_env());
/// generator.set_content("Our team just shipped v2!");
/// generator.set_style(Style::Promotional);
///
/// let caption = generator.generate().await?;
/// println!("{}", caption.text);
/// ```
pub struct CaptionGenerator<P: CompletionProvider> {
    provider: P,
    copied_reset: Duration,
    state: Mutex<FormState>,
    copied: TransientFlag,
    _timers: TimerScope,
}

impl<P: CompletionProvider> CaptionGenerator<P> {
    /// Create a generator around an explicitly constructed provider.
    pub fn new(provider: P, config: StudioConfig) -> Self {
        let timers = TimerScope::new();
        Self {
            provider,
            copied_reset: config.copied_reset,
            state: Mutex::new(FormState::default()),
            copied: timers.flag("copied"),
            _timers: timers,
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The injected provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn set_content(&self, content: impl Into<String>) {
        self.state().content = content.into();
    }

    pub fn set_style(&self, style: Style) {
        self.state().style = style;
    }

    pub fn set_sentence_count(&self, count: SentenceCount) {
        self.state().sentence_count = count;
    }

    pub fn set_hashtag_count(&self, count: HashtagCount) {
        self.state().hashtag_count = count;
    }

    pub fn content(&self) -> String {
        self.state().content.clone()
    }

    /// Snapshot of the request the next generation would send.
    pub fn current_request(&self) -> GenerationRequest {
        self.state().request()
    }

    /// The caption currently shown, if any.
    pub fn result(&self) -> Option<GenerationResult> {
        self.state().result.clone()
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn is_generating(&self) -> bool {
        self.phase() == Phase::Generating
    }

    /// Whether the generate control is enabled.
    pub fn can_generate(&self) -> bool {
        let state = self.state();
        state.phase != Phase::Generating && !state.content.trim().is_empty()
    }

    /// Text for the generate control.
    pub fn action_label(&self) -> &'static str {
        let state = self.state();
        match (state.phase, &state.result) {
            (Phase::Generating, _) => "Generating...",
            (_, Some(_)) => "Generate Again",
            (_, None) => "Generate Caption",
        }
    }

    /// Whether the "copied" acknowledgement is showing.
    pub fn is_copied(&self) -> bool {
        self.copied.is_raised()
    }

    /// Generate a caption for the current form state.
    ///
    /// Performs exactly one provider call. A provider failure is logged and
    /// replaced by the fallback caption, so the only errors returned are the
    /// refusals: blank content or a generation already in flight.
    #[instrument(skip(self), fields(provider = %self.provider.name(), generation_id = tracing::field::Empty))]
    pub async fn generate(&self) -> Result<GenerationResult> {
        let request = {
            let mut state = self.state();
            if state.phase == Phase::Generating {
                return Err(CaptionError::GenerationInProgress);
            }
            let request = state.request();
            if !request.has_content() {
                return Err(CaptionError::EmptyContent);
            }
            state.phase = Phase::Generating;
            request
        };

        let generation_id = Uuid::new_v4();
        tracing::Span::current().record("generation_id", tracing::field::display(generation_id));
        debug!(style = %request.style, "Requesting caption");

        let mut in_flight = InFlight {
            state: &self.state,
            finished: false,
        };

        let prompt = Prompt::build(&request);
        let result = match self.provider.complete(&prompt).await {
            Ok(text) => {
                info!(chars = text.len(), "Caption generated");
                GenerationResult::remote(text)
            }
            Err(e) => {
                warn!(error = %e, "Caption generation failed, using fallback caption");
                GenerationResult::fallback(fallback_caption(&request.content, request.style))
            }
        };

        let mut state = self.state();
        state.phase = if result.is_fallback() {
            Phase::FallenBack
        } else {
            Phase::Succeeded
        };
        state.result = Some(result.clone());
        in_flight.finished = true;

        Ok(result)
    }

    /// Clear content and caption, returning to `Idle`.
    ///
    /// A generation already in flight keeps running and will store its
    /// caption when it completes.
    pub fn reset(&self) {
        let mut state = self.state();
        state.content.clear();
        state.result = None;
        if state.phase != Phase::Generating {
            state.phase = Phase::Idle;
        }
    }

    /// Copy the current caption and raise the "copied" flag.
    ///
    /// Refused while the flag is still up, matching the disabled copy control.
    /// The flag's timer needs a tokio runtime; without one nothing is written
    /// and a `ConfigError` is returned.
    pub fn copy(&self, clipboard: &dyn Clipboard) -> Result<()> {
        if self.copied.is_raised() {
            return Err(CaptionError::AlreadyCopied);
        }
        let text = self
            .result()
            .map(|r| r.text)
            .ok_or(CaptionError::NothingToCopy)?;
        let runtime = timer_runtime()?;

        clipboard.write_text(&text)?;
        debug!(chars = text.len(), "Caption copied");
        self.copied.raise_on(&runtime, self.copied_reset);
        Ok(())
    }
}

/// Returns the generator to `Idle` if a generation future is dropped mid-call.
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.phase = match state.result.as_ref().map(|r| r.origin) {
                Some(Origin::Remote) => Phase::Succeeded,
                Some(Origin::Fallback) => Phase::FallenBack,
                None => Phase::Idle,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryClipboard, MockProvider};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn generator(provider: MockProvider) -> CaptionGenerator<MockProvider> {
        CaptionGenerator::new(provider, StudioConfig::default())
    }

    #[tokio::test]
    async fn test_success_shows_provider_text_verbatim() {
        let reply = "  Sunrise summit 🌄 One step at a time.\n#hiking #teamwork  ";
        let gen = generator(MockProvider::replying(reply));
        gen.set_content("sunrise hike");

        let result = gen.generate().await.unwrap();
        assert_eq!(result, GenerationResult::remote(reply));
        assert_eq!(gen.result(), Some(result));
        assert_eq!(gen.phase(), Phase::Succeeded);
        assert_eq!(gen.provider().calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let gen = generator(MockProvider::failing());
        gen.set_content("a b c d e f g h i j");

        let result = gen.generate().await.unwrap();
        assert_eq!(result.origin, Origin::Fallback);
        assert_eq!(
            result.text,
            "Elevate your professional presence with a b c d e f g h... #caption #professionalcontent #trending"
        );
        assert_eq!(gen.phase(), Phase::FallenBack);
        assert!(gen.can_generate());
    }

    #[tokio::test]
    async fn test_fallback_uses_selected_style() {
        let gen = generator(MockProvider::failing());
        gen.set_content("new menu");
        gen.set_style(Style::Casual);

        let result = gen.generate().await.unwrap();
        assert_eq!(
            result.text,
            "Just hanging out with new menu #caption #casualcontent #trending"
        );
    }

    #[tokio::test]
    async fn test_blank_content_is_refused() {
        let gen = generator(MockProvider::replying("unused"));
        assert!(!gen.can_generate());
        assert!(matches!(gen.generate().await, Err(CaptionError::EmptyContent)));

        gen.set_content("   \n");
        assert!(!gen.can_generate());
        assert!(matches!(gen.generate().await, Err(CaptionError::EmptyContent)));
        assert_eq!(gen.provider().calls(), 0);
        assert_eq!(gen.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_prompt_reflects_form_state() {
        let gen = generator(MockProvider::replying("ok"));
        gen.set_content("quarterly results");
        gen.set_style(Style::Inspirational);
        gen.set_sentence_count(SentenceCount::new(4).unwrap());
        gen.set_hashtag_count(HashtagCount::new(1).unwrap());

        gen.generate().await.unwrap();
        let prompt = gen.provider().last_prompt().unwrap();
        assert_eq!(prompt, Prompt::build(&gen.current_request()));
        assert!(prompt.user.contains("exactly 4 sentences"));
    }

    #[tokio::test]
    async fn test_reset_clears_content_and_result() {
        let gen = generator(MockProvider::replying("caption"));
        gen.set_content("something");
        gen.generate().await.unwrap();

        gen.reset();
        assert_eq!(gen.content(), "");
        assert_eq!(gen.result(), None);
        assert_eq!(gen.phase(), Phase::Idle);
        assert!(!gen.can_generate());

        // Reset from a fresh state is harmless.
        gen.reset();
        assert_eq!(gen.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_action_label() {
        let gen = generator(MockProvider::replying("caption"));
        assert_eq!(gen.action_label(), "Generate Caption");

        gen.set_content("x");
        gen.generate().await.unwrap();
        assert_eq!(gen.action_label(), "Generate Again");

        gen.reset();
        assert_eq!(gen.action_label(), "Generate Caption");
    }

    #[tokio::test]
    async fn test_editing_content_keeps_result() {
        let gen = generator(MockProvider::replying("caption"));
        gen.set_content("first");
        gen.generate().await.unwrap();

        gen.set_content("second");
        assert_eq!(gen.result().map(|r| r.text), Some("caption".to_string()));
    }

    /// Blocks inside `complete` until released.
    struct GatedProvider {
        reply: &'static str,
        entered: Notify,
        release: Notify,
    }

    impl GatedProvider {
        fn new(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply,
                entered: Notify::new(),
                release: Notify::new(),
            })
        }
    }

    #[async_trait]
    impl CompletionProvider for GatedProvider {
        fn name(&self) -> &str {
            "gated"
        }

        async fn complete(&self, _prompt: &Prompt) -> Result<String> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(self.reply.to_string())
        }
    }

    #[tokio::test]
    async fn test_only_one_generation_in_flight() {
        let provider = GatedProvider::new("done");
        let gen = Arc::new(CaptionGenerator::new(
            Arc::clone(&provider),
            StudioConfig::default(),
        ));
        gen.set_content("launch");

        let first = tokio::spawn({
            let gen = Arc::clone(&gen);
            async move { gen.generate().await }
        });
        provider.entered.notified().await;

        assert!(gen.is_generating());
        assert!(!gen.can_generate());
        assert_eq!(gen.action_label(), "Generating...");
        assert!(matches!(
            gen.generate().await,
            Err(CaptionError::GenerationInProgress)
        ));

        provider.release.notify_one();
        let result = first.await.unwrap().unwrap();
        assert_eq!(result.text, "done");
        assert!(gen.can_generate());
    }

    #[tokio::test]
    async fn test_dropped_generation_returns_to_idle() {
        let provider = GatedProvider::new("done");
        let gen = CaptionGenerator::new(Arc::clone(&provider), StudioConfig::default());
        gen.set_content("launch");

        tokio::select! {
            _ = gen.generate() => unreachable!("provider never releases"),
            _ = provider.entered.notified() => {}
        }

        assert_eq!(gen.phase(), Phase::Idle);
        assert!(gen.can_generate());
    }

    #[tokio::test]
    async fn test_reset_during_generation_keeps_late_caption() {
        let provider = GatedProvider::new("late caption");
        let gen = Arc::new(CaptionGenerator::new(
            Arc::clone(&provider),
            StudioConfig::default(),
        ));
        gen.set_content("launch");

        let pending = tokio::spawn({
            let gen = Arc::clone(&gen);
            async move { gen.generate().await }
        });
        provider.entered.notified().await;

        gen.reset();
        assert_eq!(gen.phase(), Phase::Generating);
        assert_eq!(gen.content(), "");
        assert_eq!(gen.result(), None);

        provider.release.notify_one();
        pending.await.unwrap().unwrap();
        assert_eq!(gen.phase(), Phase::Succeeded);
        assert_eq!(gen.result(), Some(GenerationResult::remote("late caption")));
        assert_eq!(gen.content(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_sets_transient_flag() {
        let gen = generator(MockProvider::replying("copy me"));
        let clipboard = MemoryClipboard::new();
        gen.set_content("x");
        gen.generate().await.unwrap();

        gen.copy(&clipboard).unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("copy me"));
        assert!(gen.is_copied());

        // Other actions during the interval do not affect the timer.
        gen.set_content("edited");
        assert!(matches!(gen.copy(&clipboard), Err(CaptionError::AlreadyCopied)));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(gen.is_copied());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!gen.is_copied());

        assert_eq!(gen.phase(), Phase::Succeeded);
    }

    #[tokio::test]
    async fn test_copy_without_result() {
        let gen = generator(MockProvider::replying("unused"));
        let clipboard = MemoryClipboard::new();

        assert!(matches!(gen.copy(&clipboard), Err(CaptionError::NothingToCopy)));
        assert!(!gen.is_copied());
        assert_eq!(clipboard.contents(), None);
    }

    #[test]
    fn test_copy_outside_runtime_is_refused_without_side_effects() {
        let gen = generator(MockProvider::replying("copy me"));
        let clipboard = MemoryClipboard::new();
        gen.set_content("x");
        tokio_test::block_on(gen.generate()).unwrap();

        for _ in 0..2 {
            assert!(matches!(
                gen.copy(&clipboard),
                Err(CaptionError::ConfigError(_))
            ));
            assert!(!gen.is_copied());
            assert_eq!(clipboard.contents(), None);
        }
    }
}

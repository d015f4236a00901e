//! Reply generation pipeline
//!
//! Chooses between the remote completion call and a local template corpus,
//! post-processes the result, and never lets an error escape: the outcome
//! of generation is always `Some(reply)` or `None`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::traits::CompletionClient;
use shared::{truncate_chars, EngagementStyle, FallbackPolicy, REPLY_CHAR_LIMIT};

/// Word cap given to the model; max_tokens is derived from it.
const MAX_REPLY_WORDS: u32 = 40;

/// Sampling temperature for engagement replies
const TEMPERATURE: f32 = 0.95;

/// CJK character count above which the non-default instruction is used
const CJK_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Default,
    Chinese,
}

/// Script-based language heuristic: more than `CJK_THRESHOLD` characters in
/// the CJK Unified Ideographs block selects the Chinese branch.
pub fn detect_language(text: &str) -> Language {
    let cjk_count = text
        .chars()
        .filter(|c| ('\u{4e00}'..='\u{9fff}').contains(c))
        .count();
    if cjk_count > CJK_THRESHOLD {
        Language::Chinese
    } else {
        Language::Default
    }
}

/// Reply generator over an injected completion client
pub struct ReplyEngine<C: CompletionClient> {
    client: C,
    policy: FallbackPolicy,
}

impl<C: CompletionClient> ReplyEngine<C> {
    pub fn new(client: C, policy: FallbackPolicy) -> Self {
        Self { client, policy }
    }

    /// Produce reply text for a candidate, or `None` when generation fails
    /// and the fallback policy forbids templates.
    pub async fn generate(
        &self,
        text: &str,
        author: &str,
        style: EngagementStyle,
    ) -> Option<String> {
        let language = detect_language(text);

        // Blend policy: the default-language branch flips a coin up front
        // instead of only falling back on remote failure.
        if language == Language::Default && self.policy == FallbackPolicy::Blend {
            let take_template = rand::thread_rng().gen_bool(0.5);
            if take_template {
                return Some(fill_template(style));
            }
        }

        let system_prompt = system_prompt_for(style, language);
        let user_prompt =
            format!("Tweet from @{author}: {text}\n\nGenerate viral engagement reply:");

        match self
            .client
            .complete(system_prompt, &user_prompt, MAX_REPLY_WORDS * 3, TEMPERATURE)
            .await
        {
            Ok(raw) => {
                let reply = post_process(&raw);
                if reply.is_empty() {
                    tracing::warn!("⚠️ Completion returned no usable text");
                    self.fallback(style)
                } else {
                    Some(reply)
                }
            }
            Err(failure) => {
                tracing::warn!("⚠️ Completion failed: {}", failure);
                self.fallback(style)
            }
        }
    }

    fn fallback(&self, style: EngagementStyle) -> Option<String> {
        match self.policy {
            FallbackPolicy::Disabled => None,
            FallbackPolicy::Templates | FallbackPolicy::Blend => Some(fill_template(style)),
        }
    }
}

/// Strip hashtag tokens and wrapping quotes, then enforce the char limit.
fn post_process(raw: &str) -> String {
    let without_hashtags = raw
        .split_whitespace()
        .filter(|word| !word.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");
    let trimmed = without_hashtags.trim_matches(|c| c == '"' || c == '\'');
    truncate_chars(trimmed, REPLY_CHAR_LIMIT)
}

fn system_prompt_for(style: EngagementStyle, language: Language) -> &'static str {
    if language == Language::Chinese {
        return "你是社交媒体专家。用中文回复，要有争议性但礼貌。让人想互动。40字内，不用话题标签。";
    }

    match style {
        EngagementStyle::Provocative => {
            "You are a master at viral Twitter engagement. Reply to this tweet with controlled \
             controversy that makes people want to respond. Be provocative but not offensive. \
             Challenge assumptions. Make people think \"wait, what?\" and feel compelled to \
             reply. Under 40 words. NO hashtags."
        }
        EngagementStyle::HotTake => {
            "You are known for spicy hot takes. Reply with a contrarian but defensible opinion \
             that sparks debate. Be bold and confident. Make it conversation-worthy. Under 40 \
             words. NO hashtags."
        }
        EngagementStyle::WittyRoast => {
            "Reply with witty, playful criticism that's entertaining but not mean. Like a \
             friendly roast. Make people laugh while making a point. Under 40 words. NO \
             hashtags."
        }
        EngagementStyle::DevilsAdvocate => {
            "Play devil's advocate. Challenge the tweet's premise with an interesting \
             counterpoint that makes people think. Be intellectually engaging. Under 40 words. \
             NO hashtags."
        }
        EngagementStyle::ProbingQuestion => {
            "Ask a thought-provoking question that challenges the tweet and sparks discussion. \
             Make people want to answer and debate. Under 40 words. NO hashtags."
        }
    }
}

/// Fill a style template with a random topical point.
fn fill_template(style: EngagementStyle) -> String {
    let mut rng = rand::thread_rng();
    let template = templates_for(style)
        .choose(&mut rng)
        .copied()
        .unwrap_or("Hard disagree. {point} is what actually matters.");
    let point = TOPICAL_POINTS
        .choose(&mut rng)
        .copied()
        .unwrap_or("the core problem");
    truncate_chars(&template.replace("{point}", point), REPLY_CHAR_LIMIT)
}

fn templates_for(style: EngagementStyle) -> &'static [&'static str] {
    match style {
        EngagementStyle::Provocative => &[
            "This is exactly the type of thinking that's holding us back. {point}",
            "Unpopular opinion: This take misses the entire point about {point}",
            "Everyone's celebrating this but nobody's talking about {point}",
            "Hot take: This is actually {point} if you think about it",
            "Respectfully disagree. {point} is what actually matters",
            "Am I the only one seeing {point} as the obvious problem here?",
            "This sounds good until you realize {point}",
            "Wrong. {point} is the actual solution everyone's ignoring",
        ],
        EngagementStyle::HotTake => &[
            "Controversial: {point} and nobody wants to admit it",
            "Say what you want but {point} is just facts",
            "Everyone's afraid to say it but {point}",
            "Spicy take: {point} proves the opposite of this",
            "Bold claim: {point} matters more than anything in this tweet",
        ],
        EngagementStyle::WittyRoast => &[
            "Tell me you don't understand {point} without telling me",
            "My brother in Christ, {point} exists",
            "POV: You forgot {point} was a thing",
            "This would work if {point} wasn't literally right there",
        ],
        EngagementStyle::DevilsAdvocate => &[
            "Playing devil's advocate: What if {point} though?",
            "Counterpoint: Wouldn't {point} actually solve this better?",
            "But consider: {point} completely flips this argument",
        ],
        EngagementStyle::ProbingQuestion => &[
            "Genuine question: Have you considered {point}?",
            "But wait - how does {point} factor into this?",
            "Curious: What's your take on {point} here?",
        ],
    }
}

const TOPICAL_POINTS: [&str; 12] = [
    "the actual implementation",
    "scalability issues",
    "the real-world data",
    "what happened last time",
    "the obvious solution",
    "user experience",
    "the core problem",
    "market reality",
    "basic game theory",
    "opportunity cost",
    "the incentive structure",
    "distribution",
];

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use basket_core::{
    BasketError, BasketLeg, BasketResult, BasketTheme, Direction, Exchange, MarketSnapshot,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// How many open markets to fetch as raw material
const OPEN_MARKET_FETCH: usize = 500;

/// How many candidates fit the prompt comfortably
const CANDIDATE_MAX: usize = 80;

/// Hard cap on generated legs
const LEG_MAX: usize = 10;

/// Rules text is truncated to keep candidate lines short
const RULES_MAX: usize = 200;

#[derive(Debug, Clone)]
pub struct BasketGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

/// The shape the model is asked to return (untrusted until validated)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedBasket {
    #[serde(default)]
    pub theme_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub legs: Vec<ProposedLeg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedLeg {
    #[serde(default)]
    pub market_ticker: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub weight: Option<Decimal>,
    /// Brief reason for this leg; displayed, never parsed
    #[serde(default)]
    pub rationale: Option<String>,
}

impl BasketGenerator {
    /// Build a generator from the environment; missing `OPENAI_API_KEY`
    /// means generation is unavailable, not a broken process.
    pub fn from_env() -> BasketResult<Self> {
        if std::env::var("OPENAI_API_KEY").unwrap_or_default().is_empty() {
            return Err(BasketError::config("OPENAI_API_KEY not set"));
        }
        // async-openai reads OPENAI_API_KEY from env automatically
        let config = OpenAIConfig::default();
        Ok(Self {
            client: Client::with_config(config),
            model: "gpt-4o-mini".to_string(),
        })
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Generate a basket theme for a natural-language trend.
    #[instrument(skip(self, exchange))]
    pub async fn generate<E>(&self, exchange: &E, query: &str) -> BasketResult<BasketTheme>
    where
        E: Exchange + ?Sized,
    {
        let markets = exchange.fetch_open_markets(OPEN_MARKET_FETCH).await?;
        if markets.is_empty() {
            return Err(BasketError::validation("No open markets returned from Kalshi"));
        }

        let candidates: Vec<&MarketSnapshot> = markets.iter().take(CANDIDATE_MAX).collect();
        let candidates_text = candidates
            .iter()
            .map(|m| market_doc(m))
            .collect::<Vec<_>>()
            .join("\n");
        let candidates_by_ticker: HashMap<&str, &MarketSnapshot> =
            candidates.iter().map(|m| (m.ticker.as_str(), *m)).collect();

        let system_prompt = "You are building a prediction-market \"basket\" (like an ETF) on Kalshi. \
            Given a user's trend and a list of candidate markets, choose the legs that best express \
            the trend and respond with valid JSON only.";

        let user_prompt = format!(
            r#"The user's trend or belief: "{query}"

Below are CANDIDATE MARKETS (one per line). Each line is: ticker | title | yes: ... / no: ... | event: ... | rules...

CANDIDATE MARKETS:
{candidates_text}

Choose 5 to 10 markets that best fit the user's trend. Return a JSON object:
{{"theme_name": "...", "description": "...", "legs": [{{"market_ticker": "...", "direction": "...", "weight": 0.2, "rationale": "..."}}]}}

For each leg:
- market_ticker: must be EXACTLY one of the tickers from the list above (copy-paste it).
- direction: BUY_YES, BUY_NO, SELL_YES, or SELL_NO (e.g. if the user thinks something won't happen, use SELL_YES or BUY_NO).
- weight: a number between 0 and 1 (they will be renormalized to sum to 1).
- rationale: one short sentence."#
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| BasketError::internal(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| BasketError::internal(e.to_string()))?
                    .into(),
            ])
            .temperature(0.3)
            .build()
            .map_err(|e| BasketError::internal(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| BasketError::api(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| BasketError::parse("No response from OpenAI"))?;

        let json_str = extract_json(content)?;
        let proposal: ProposedBasket = serde_json::from_str(&json_str)
            .map_err(|e| BasketError::parse(format!("Failed to parse basket proposal: {}", e)))?;

        debug!(legs = proposal.legs.len(), "Generated basket proposal");
        build_theme(proposal, &candidates_by_ticker)
    }
}

/// One candidate line for the prompt
fn market_doc(market: &MarketSnapshot) -> String {
    let title = market.title.as_deref().unwrap_or("(no title)").trim();
    let yes_sub = market.yes_subtitle.as_deref().unwrap_or("").trim();
    let no_sub = market.no_subtitle.as_deref().unwrap_or("").trim();
    let event = market.event_ticker.as_deref().unwrap_or("").trim();
    let rules: String = market
        .rules
        .as_deref()
        .unwrap_or("")
        .trim()
        .chars()
        .take(RULES_MAX)
        .collect();
    format!(
        "{} | {} | yes: {} / no: {} | event: {} | {}",
        market.ticker, title, yes_sub, no_sub, event, rules
    )
}

/// Validate a proposal into a theme.
///
/// The model's output is only a suggestion: tickers outside the candidate
/// set are dropped, duplicates collapse to the first occurrence, unknown
/// directions coerce to BUY_YES, weights are clamped then renormalized, and
/// the leg count is capped.
fn build_theme(
    proposal: ProposedBasket,
    candidates: &HashMap<&str, &MarketSnapshot>,
) -> BasketResult<BasketTheme> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut legs: Vec<BasketLeg> = Vec::new();

    for leg in proposal.legs.into_iter() {
        if legs.len() >= LEG_MAX {
            break;
        }
        let ticker = leg
            .market_ticker
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_string();
        let Some(market) = candidates.get(ticker.as_str()) else {
            continue;
        };
        if !seen.insert(ticker.clone()) {
            continue;
        }

        let direction = leg
            .direction
            .as_deref()
            .and_then(|d| d.parse::<Direction>().ok())
            .unwrap_or(Direction::BuyYes);
        let weight = leg
            .weight
            .unwrap_or_else(|| Decimal::new(2, 1))
            .clamp(Decimal::ZERO, Decimal::ONE);

        legs.push(BasketLeg {
            event_ticker: market
                .event_ticker
                .clone()
                .unwrap_or_else(|| ticker.clone()),
            title: market.title.clone().unwrap_or_else(|| ticker.clone()),
            market_ticker: ticker,
            direction,
            weight,
            enabled: true,
        });
    }

    if legs.is_empty() {
        return Err(BasketError::validation(
            "LLM returned no valid legs (tickers must be from the candidate list)",
        ));
    }

    let mut total: Decimal = legs.iter().map(|l| l.weight).sum();
    if total <= Decimal::ZERO {
        total = Decimal::ONE;
    }
    for leg in legs.iter_mut() {
        leg.weight /= total;
    }

    let name: String = proposal
        .theme_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Generated basket")
        .chars()
        .take(100)
        .collect();
    let description: String = proposal
        .description
        .as_deref()
        .unwrap_or("")
        .trim()
        .chars()
        .take(500)
        .collect();

    Ok(BasketTheme {
        theme_id: "generated".to_string(),
        name,
        description,
        legs,
    })
}

/// Pull a JSON object out of the reply, tolerating markdown code fences.
fn extract_json(content: &str) -> BasketResult<String> {
    if let Some(start) = content.find("```json") {
        let start = start + 7;
        if let Some(end) = content[start..].find("```") {
            return Ok(content[start..start + end].trim().to_string());
        }
    }

    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            return Ok(content[start..=end].to_string());
        }
    }

    Err(BasketError::parse("No JSON found in response"))
}

use crate::core::types::ProviderId;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRule {
    pub provider: ProviderId,
    pub model_pattern: String,
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl PriceRule {
    pub fn new(
        provider: ProviderId,
        model_pattern: impl Into<String>,
        input_per_million: f64,
        output_per_million: f64,
    ) -> Self {
        Self {
            provider,
            model_pattern: model_pattern.into(),
            input_per_million,
            output_per_million,
        }
    }

    fn has_valid_rates(&self) -> bool {
        is_valid_rate(self.input_per_million) && is_valid_rate(self.output_per_million)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingTable {
    pub rules: Vec<PriceRule>,
}

impl PricingTable {
    pub fn new(rules: Vec<PriceRule>) -> Self {
        Self { rules }
    }

    pub fn find_rule(&self, provider: ProviderId, model: &str) -> Option<&PriceRule> {
        let mut best_index: Option<usize> = None;
        let mut best_score: Option<RuleMatchScore> = None;

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.provider != provider {
                continue;
            }

            let Some(score) = match_pattern(&rule.model_pattern, model) else {
                continue;
            };

            let should_replace = match best_score {
                Some(current) => score > current,
                None => true,
            };

            if should_replace {
                best_index = Some(index);
                best_score = Some(score);
            }
        }

        best_index.map(|index| &self.rules[index])
    }

    pub fn label_for(&self, provider: ProviderId, model: &str) -> Option<String> {
        self.find_rule(provider, model)
            .filter(|rule| rule.has_valid_rates())
            .map(|rule| format_price_label(rule.input_per_million, rule.output_per_million))
    }
}

pub fn format_price_label(input_per_million: f64, output_per_million: f64) -> String {
    format!("${input_per_million:.2}/1M in, ${output_per_million:.2}/1M out")
}

pub fn per_token_price_label(prompt_per_token: f64, completion_per_token: f64) -> String {
    if prompt_per_token <= 0.0 && completion_per_token <= 0.0 {
        return "Free".to_string();
    }

    format_price_label(
        prompt_per_token * TOKENS_PER_MILLION,
        completion_per_token * TOKENS_PER_MILLION,
    )
}

pub fn builtin_pricing_table() -> PricingTable {
    use ProviderId::{Anthropic, Openai};

    PricingTable::new(vec![
        PriceRule::new(Openai, "gpt-4o-mini*", 0.15, 0.60),
        PriceRule::new(Openai, "gpt-4o*", 2.50, 10.00),
        PriceRule::new(Openai, "gpt-4-turbo*", 10.00, 30.00),
        PriceRule::new(Openai, "gpt-4*", 30.00, 60.00),
        PriceRule::new(Openai, "gpt-3.5-turbo*", 0.50, 1.50),
        PriceRule::new(Openai, "o1-mini*", 3.00, 12.00),
        PriceRule::new(Openai, "o1-preview*", 15.00, 60.00),
        PriceRule::new(Openai, "o1*", 15.00, 60.00),
        PriceRule::new(Anthropic, "claude-3-5-haiku*", 0.80, 4.00),
        PriceRule::new(Anthropic, "claude-3-5-sonnet*", 3.00, 15.00),
        PriceRule::new(Anthropic, "claude-sonnet-4*", 3.00, 15.00),
        PriceRule::new(Anthropic, "claude-3-opus*", 15.00, 75.00),
        PriceRule::new(Anthropic, "claude-3-sonnet*", 3.00, 15.00),
        PriceRule::new(Anthropic, "claude-3-haiku*", 0.25, 1.25),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RuleMatchScore {
    exact: bool,
    prefix_len: usize,
}

fn match_pattern(pattern: &str, model: &str) -> Option<RuleMatchScore> {
    if pattern == model {
        return Some(RuleMatchScore {
            exact: true,
            prefix_len: pattern.len(),
        });
    }

    if pattern == "*" {
        return Some(RuleMatchScore {
            exact: false,
            prefix_len: 0,
        });
    }

    let prefix = pattern.strip_suffix('*')?;
    if model.starts_with(prefix) {
        return Some(RuleMatchScore {
            exact: false,
            prefix_len: prefix.len(),
        });
    }

    None
}

fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

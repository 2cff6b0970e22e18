//! Single-quote analysis prompt

use crate::error::Result;
use quote_prompt::{JinjaTemplate, Language, PromptBuilder};
use serde_json::json;

/// Template for one symbol at one price
pub fn quote_analysis_template() -> Result<JinjaTemplate> {
    Ok(JinjaTemplate::bilingual(
        "market.quote_analysis",
        "You are a professional stock analyst. Provide a concise analysis of the current market condition for {{ symbol }} at price {{ price }}.",
        "你是一名专业的股票分析师。请简要分析 {{ symbol }} 在价格 {{ price }} 时的当前市场状况。",
    )?)
}

/// Render a price the way it is shown to the model: whole numbers keep one
/// decimal place (`50.0`)
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        price.to_string()
    }
}

/// Analyst instruction for `symbol` at `price`, followed by optional extra
/// instructions on their own line
pub fn quote_analysis_prompt(
    symbol: &str,
    price: f64,
    extra: Option<&str>,
    language: Language,
) -> Result<String> {
    let instruction = quote_analysis_template()?.render(
        language,
        &json!({ "symbol": symbol, "price": format_price(price) }),
    )?;

    Ok(PromptBuilder::new()
        .line(instruction)
        .optional(extra)
        .build())
}

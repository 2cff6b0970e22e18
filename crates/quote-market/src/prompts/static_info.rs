//! Static-info comparison prompt

use crate::error::Result;
use quote_prompt::{Language, PromptBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TITLE_ZH: &str = "你是一名金融分析AI，请对以下股票标的基础数据进行结构化分析与比较。";
const TITLE_EN: &str = "You are a financial analysis AI. Analyse and compare the following securities' reference data in a structured way.";

const TASKS_ZH: &[&str] = &[
    "将以上数据转换为表格形式（每行一只标的）；",
    "计算以下指标：股息收益率 = dividend / bps；EPS增长率 = (eps_ttm - eps) / eps（若 eps=0 则置为null）；",
    "统计并比较：① 股息收益率最高的前3家公司；② EPS_TTM 最高的前3家公司；",
    "按 currency 分组对比平均 eps_ttm、bps、dividend；",
    "检测异常：如 dividend > eps_ttm、eps_ttm < 0、或缺失关键字段；在结果表格中以“⚠️”标注；",
    "以 Markdown 表格输出列：symbol/name_cn/currency/eps_ttm/bps/dividend/股息收益率/EPS增长率/ local_time / utc_time；",
];

const TASKS_EN: &[&str] = &[
    "Convert the data above into a table (one security per row);",
    "Compute: dividend yield = dividend / bps; EPS growth = (eps_ttm - eps) / eps (null when eps = 0);",
    "Rank and compare: (1) top 3 by dividend yield; (2) top 3 by EPS_TTM;",
    "Group by currency and compare average eps_ttm, bps and dividend;",
    "Flag anomalies such as dividend > eps_ttm, eps_ttm < 0 or missing key fields with \"⚠️\" in the table;",
    "Output a Markdown table with columns: symbol/name_cn/currency/eps_ttm/bps/dividend/dividend yield/EPS growth/local_time/utc_time;",
];

const EXTRA_ZH: &str = "结尾给出中文总结，说明整体财务特征、差异与显著异常。";
const EXTRA_EN: &str = "Finish with a summary of the overall financial profile, differences and notable anomalies.";

/// Section headings: input data, tasks, extra requirements
fn headings(language: Language) -> [&'static str; 3] {
    match language {
        Language::Chinese => ["输入数据", "分析任务", "额外要求"],
        Language::English => ["Input Data", "Analysis Tasks", "Additional Requirements"],
    }
}

fn summary_hint(language: Language, words: usize) -> String {
    match language {
        Language::Chinese => format!("中文总结请控制在约{words}字。"),
        Language::English => format!("Keep the summary to about {words} words."),
    }
}

/// Knobs for [`static_info_prompt`]
///
/// Empty `tasks` or `extra_requirements` fall back to the built-in lists for
/// the chosen language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPromptOptions {
    pub title: Option<String>,
    pub tasks: Vec<String>,
    pub extra_requirements: Vec<String>,
    pub summary_words: usize,
    pub language: Language,
}

impl Default for AnalysisPromptOptions {
    fn default() -> Self {
        Self {
            title: None,
            tasks: Vec::new(),
            extra_requirements: Vec::new(),
            summary_words: 200,
            language: Language::Chinese,
        }
    }
}

impl AnalysisPromptOptions {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra_requirements<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_requirements = extra.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_summary_words(mut self, words: usize) -> Self {
        self.summary_words = words;
        self
    }

    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(match self.language {
            Language::Chinese => TITLE_ZH,
            Language::English => TITLE_EN,
        })
    }

    fn tasks(&self) -> Vec<String> {
        if !self.tasks.is_empty() {
            return self.tasks.clone();
        }
        let defaults = match self.language {
            Language::Chinese => TASKS_ZH,
            Language::English => TASKS_EN,
        };
        defaults.iter().map(ToString::to_string).collect()
    }

    /// Extra requirements with the summary-length hint appended when absent
    fn extra_requirements(&self) -> Vec<String> {
        let mut extra = if self.extra_requirements.is_empty() {
            vec![
                match self.language {
                    Language::Chinese => EXTRA_ZH,
                    Language::English => EXTRA_EN,
                }
                .to_string(),
            ]
        } else {
            self.extra_requirements.clone()
        };
        let hint = summary_hint(self.language, self.summary_words);
        if !extra.iter().any(|req| req.contains(&hint)) {
            extra.push(hint);
        }
        extra
    }
}

/// Build the comparison prompt for a batch of enriched records
///
/// Records are embedded as pretty-printed JSON with non-ASCII text kept
/// as-is. The prompt ends with a newline.
pub fn static_info_prompt(records: &[Value], options: &AnalysisPromptOptions) -> Result<String> {
    let data = serde_json::to_string_pretty(records)?;
    let [input, tasks, extra] = headings(options.language);

    let prompt = PromptBuilder::new()
        .line(options.title())
        .blank_line()
        .heading(input)
        .line(data)
        .blank_line()
        .heading(tasks)
        .keycap_list(options.tasks())
        .blank_line()
        .heading(extra)
        .bullets(options.extra_requirements())
        .build();

    Ok(prompt + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_chinese_prompt() {
        let records = vec![json!({"标的代码": "700.HK", "每股盈利": 3.6})];
        let prompt = static_info_prompt(&records, &AnalysisPromptOptions::default()).unwrap();

        assert!(prompt.starts_with(&format!("{TITLE_ZH}\n\n【输入数据】\n[\n  {{\n")));
        assert!(prompt.contains("\"标的代码\": \"700.HK\""));
        assert!(prompt.contains("\n\n【分析任务】\n1️⃣ 将以上数据转换为表格形式"));
        assert!(prompt.contains("6️⃣ 以 Markdown 表格输出列"));
        assert!(prompt.ends_with(&format!(
            "【额外要求】\n- {EXTRA_ZH}\n- 中文总结请控制在约200字。\n"
        )));
    }

    #[test]
    fn test_custom_options() {
        let options = AnalysisPromptOptions::default()
            .with_title("Custom title")
            .with_tasks(["only task"])
            .with_extra_requirements(["be brief"])
            .with_summary_words(50);
        let prompt = static_info_prompt(&[], &options).unwrap();

        assert_eq!(
            prompt,
            "Custom title\n\n【输入数据】\n[]\n\n【分析任务】\n1️⃣ only task\n\n【额外要求】\n- be brief\n- 中文总结请控制在约50字。\n"
        );
    }

    #[test]
    fn test_summary_hint_not_duplicated() {
        let options = AnalysisPromptOptions::default()
            .with_extra_requirements(["总结：中文总结请控制在约200字。"]);
        let prompt = static_info_prompt(&[], &options).unwrap();
        assert_eq!(prompt.matches("中文总结请控制在约200字。").count(), 1);
    }

    #[test]
    fn test_english_prompt() {
        let options = AnalysisPromptOptions::default().with_language(Language::English);
        let prompt = static_info_prompt(&[json!({"symbol": "AAPL.US"})], &options).unwrap();

        assert!(prompt.starts_with(TITLE_EN));
        assert!(prompt.contains("【Input Data】"));
        assert!(prompt.contains("1️⃣ Convert the data above"));
        assert!(prompt.ends_with("- Keep the summary to about 200 words.\n"));
    }
}

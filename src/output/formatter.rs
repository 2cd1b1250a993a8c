//! Output formatters for test results
//!
//! Renders a suite after it has run, either as plain text or as JSON.

use serde_json::Value;

use crate::executor::{TestCase, TestSuite};

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, result values rendered as text
    #[default]
    Text,
    /// Plain text, result values rendered as JSON
    TextJson,
    /// Full suite report as JSON
    Json,
    /// Full suite report as pretty-printed JSON
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "text-json" | "textjson" => Some(OutputFormat::TextJson),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Which cases to print
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintFilter {
    #[default]
    All,
    Succeeded,
    Failed,
}

impl PrintFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(PrintFilter::All),
            "succeeded" | "success" | "passed" => Some(PrintFilter::Succeeded),
            "failed" | "fail" => Some(PrintFilter::Failed),
            _ => None,
        }
    }

    fn includes(&self, test: &TestCase) -> bool {
        let succeeded = test.succeeded() == Some(true);
        match self {
            PrintFilter::All => true,
            PrintFilter::Succeeded => succeeded,
            PrintFilter::Failed => !succeeded,
        }
    }
}

type ResultProcessor = Box<dyn Fn(Option<&Value>) -> String + Send + Sync>;

/// Result formatter
#[derive(Default)]
pub struct ResultFormatter {
    format: OutputFormat,
    filter: PrintFilter,
    processor: Option<ResultProcessor>,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: PrintFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Render result values with a custom function (text format only)
    pub fn with_processor(
        mut self,
        processor: impl Fn(Option<&Value>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.processor = Some(Box::new(processor));
        self
    }

    /// Format a whole suite
    pub fn format_suite(&self, suite: &TestSuite) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(&suite.report()).unwrap_or_default(),
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(&suite.report()).unwrap_or_default()
            }
            OutputFormat::Text | OutputFormat::TextJson => self.format_suite_text(suite),
        }
    }

    fn format_suite_text(&self, suite: &TestSuite) -> String {
        let mut output = String::new();

        for test in suite.tests().iter().filter(|t| self.filter.includes(t)) {
            output.push_str(&self.format_case(test));
            output.push('\n');
        }

        let report = suite.report();
        output.push_str(&format!(
            "{}/{} succeeded ({:.2}%)\n",
            report.succeed_count, report.run_count, report.pass_rate
        ));

        output
    }

    /// Format a single case
    pub fn format_case(&self, test: &TestCase) -> String {
        let mut output = format!("Test {}: {}\n", test.index() + 1, test.description());
        output.push_str(&format!("Result: {}\n", self.format_value(test.result())));
        if test.succeeded() == Some(true) {
            output.push_str("Status: success\n");
        } else {
            output.push_str("Status: fail\n");
            let reason = test
                .error()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "none".to_string());
            output.push_str(&format!("Reason: {reason}\n"));
        }
        output
    }

    fn format_value(&self, value: Option<&Value>) -> String {
        if self.format == OutputFormat::TextJson {
            return value
                .map(|v| serde_json::to_string(v).unwrap_or_default())
                .unwrap_or_else(|| "none".to_string());
        }
        if let Some(processor) = &self.processor {
            return processor(value);
        }
        match value {
            None => "none".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::models::Rejection;
    use serde_json::json;

    async fn sample_suite() -> TestSuite {
        let mut suite = TestSuite::new(SuiteConfig::default());
        suite.add().describe("returns text").test(|| Ok("hello"));
        suite
            .add()
            .describe("rejects")
            .test_async(|| async { Err(Rejection::value("rejection")) });
        suite.run().await;
        suite
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(
            OutputFormat::from_str("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("csv"), None);
        assert_eq!(PrintFilter::from_str("failed"), Some(PrintFilter::Failed));
        assert_eq!(PrintFilter::from_str("bogus"), None);
    }

    #[tokio::test]
    async fn test_format_text() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::Text).format_suite(&suite);

        assert!(output.contains("Test 1: returns text\nResult: hello\nStatus: success\n"));
        assert!(output.contains("Test 2: rejects\nResult: none\nStatus: fail\nReason: rejection\n"));
        assert!(output.ends_with("1/2 succeeded (50.00%)\n"));
    }

    #[tokio::test]
    async fn test_format_text_json_quotes_strings() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::TextJson).format_suite(&suite);
        assert!(output.contains("Result: \"hello\"\n"));
    }

    #[tokio::test]
    async fn test_filter_failed() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::Text)
            .with_filter(PrintFilter::Failed)
            .format_suite(&suite);
        assert!(!output.contains("returns text"));
        assert!(output.contains("Test 2: rejects"));
    }

    #[tokio::test]
    async fn test_custom_processor() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::Text)
            .with_filter(PrintFilter::Succeeded)
            .with_processor(|v| format!("<{}>", v.map(|v| v.to_string()).unwrap_or_default()))
            .format_suite(&suite);
        assert!(output.contains("Result: <\"hello\">\n"));
    }

    #[tokio::test]
    async fn test_format_json() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::Json).format_suite(&suite);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["succeed_count"], json!(1));
        assert_eq!(value["tests"][1]["error"]["kind"], json!("action_rejected"));
        assert_eq!(value["tests"][1]["error"]["value"], json!("rejection"));
    }

    #[test]
    fn test_case_that_never_ran_prints_as_failed() {
        let mut suite = TestSuite::default();
        suite.add().describe("never ran").test(|| Ok(1));

        let output = ResultFormatter::new(OutputFormat::Text).format_suite(&suite);
        assert!(output.contains("Test 1: never ran\nResult: none\nStatus: fail\nReason: none\n"));
        assert!(!output.contains("not run"));
    }

    #[tokio::test]
    async fn test_format_json_includes_pass_rate() {
        let suite = sample_suite().await;
        let output = ResultFormatter::new(OutputFormat::JsonPretty).format_suite(&suite);
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["pass_rate"], json!(50.0));
    }

    #[test]
    fn test_empty_suite_rate() {
        let suite = TestSuite::default();
        let output = ResultFormatter::default().format_suite(&suite);
        assert_eq!(output, "0/0 succeeded (0.00%)\n");
    }
}

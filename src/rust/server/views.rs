//! The two HTML pages, rendered with minijinja.

use minijinja::{context, Environment};

use crate::store::AnalyzedText;

const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");
const RECORDS_TEMPLATE: &str = include_str!("../../../templates/records.html");

/// Compiled page templates. `.html` names turn on HTML auto-escaping.
#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        env.add_template("records.html", RECORDS_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn index(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("index.html")?.render(context! {})
    }

    pub fn records(&self, records: &[AnalyzedText]) -> Result<String, minijinja::Error> {
        self.env
            .get_template("records.html")?
            .render(context! { records => records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sentiment;

    #[test]
    fn test_records_table_escapes_text() {
        let views = Views::new().unwrap();
        let html = views
            .records(&[AnalyzedText {
                id: 7,
                text: "<b> & brave".to_string(),
                sentiment: Sentiment::Negative,
            }])
            .unwrap();
        assert!(html.contains("<td>7</td>"));
        assert!(html.contains("&lt;b&gt; &amp; brave"));
        assert!(html.contains("<td>-1</td>"));
    }

    #[test]
    fn test_index_renders() {
        let html = Views::new().unwrap().index().unwrap();
        assert!(html.contains("/analyze"));
    }
}

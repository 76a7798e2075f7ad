use serde::{Deserialize, Serialize};

/// Chart shapes the dashboard can render.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// Lenient parse for chart types coming from untrusted sources
    /// (AI suggestions, stored rows).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "pie" => Some(ChartKind::Pie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
        }
    }
}

/// One renderable chart: parallel label/value series plus presentation
/// metadata. `labels` and `values` always have equal length >= 1 and every
/// value is a finite number.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub source_sheet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!(ChartKind::parse("bar"), Some(ChartKind::Bar));
        assert_eq!(ChartKind::parse(" Pie "), Some(ChartKind::Pie));
        assert_eq!(ChartKind::parse("LINE"), Some(ChartKind::Line));
        assert_eq!(ChartKind::parse("donut"), None);
        assert_eq!(ChartKind::parse(""), None);
    }

    #[test]
    fn test_chart_spec_serializes_type_field() {
        let spec = ChartSpec {
            chart_type: ChartKind::Bar,
            title: "Vendas – Total por Produto".to_string(),
            labels: vec!["Caneta".to_string()],
            values: vec![12.5],
            source_sheet: "Vendas".to_string(),
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["source_sheet"], "Vendas");
    }
}

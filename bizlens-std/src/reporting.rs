use bizlens_core::config::ReportingConfig;
use bizlens_core::reporting::{
    cost_vs_profit, format_money, format_tonnes, kpis, monthly_series, production_share,
    profit_gauge, to_csv, ReportFilter,
};
use bizlens_core::DataSource;
use bizlens_view::{parse_params, Result, View, ViewOutput};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Production report with KPIs, charts and a CSV export.
pub struct ReportingView {
    source: Arc<dyn DataSource>,
    config: ReportingConfig,
}

impl ReportingView {
    pub fn new(source: Arc<dyn DataSource>, config: ReportingConfig) -> Self {
        Self { source, config }
    }
}

impl View for ReportingView {
    fn name(&self) -> &str {
        "reporting"
    }

    fn title(&self) -> &str {
        "Reporting"
    }

    fn description(&self) -> &str {
        "Interactive mining production report: output over time, cost against profit, production mix and profit target"
    }

    fn parameter_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "from": {
                    "type": "string",
                    "format": "date",
                    "description": "First date to include (inclusive)"
                },
                "to": {
                    "type": "string",
                    "format": "date",
                    "description": "Last date to include (inclusive)"
                },
                "minerals": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Minerals to include (defaults to all)"
                }
            }
        })
    }

    fn render(&self, params: Value) -> Result<ViewOutput> {
        let filter: ReportFilter = parse_params(params)?;
        let records = filter.apply(&self.source.production()?)?;
        debug!(records = records.len(), "Rendering production report");

        let totals = kpis(&records);
        let gauge = profit_gauge(totals.total_profit, self.config.profit_target);
        let csv = to_csv(&records)?;

        let content = format!(
            "Total production: {}\nTotal cost: {}\nTotal profit: {} ({:.0}% of target)",
            format_tonnes(totals.total_tonnes),
            format_money(totals.total_cost),
            format_money(totals.total_profit),
            gauge.ratio * 100.0
        );

        let data = serde_json::json!({
            "kpis": {
                "total_tonnes": totals.total_tonnes,
                "total_cost": totals.total_cost,
                "total_profit": totals.total_profit,
                "display": {
                    "total_tonnes": format_tonnes(totals.total_tonnes),
                    "total_cost": format_money(totals.total_cost),
                    "total_profit": format_money(totals.total_profit),
                },
            },
            "monthly_production": monthly_series(&records),
            "cost_vs_profit": cost_vs_profit(&records),
            "production_share": production_share(&records),
            "profit_gauge": gauge,
            "table": records,
            "download": {
                "file_name": self.config.csv_file_name,
                "mime": "text/csv",
                "content": csv,
            },
        });

        Ok(ViewOutput::new(content).with_data(data))
    }
}

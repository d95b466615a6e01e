use crate::queries;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::info;
use wealthlens_common::ResultTable;
use wealthlens_error::{ErrorCode, Result, WealthlensError};
use wealthlens_runtime::{QueryRequest, QueryService};

/// Interaction window used by `advisor_productivity` when none is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Headline figures for the book of business.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalKpis {
    pub num_clients: i64,
    pub num_advisors: i64,
    /// Latest non-cash market value across all portfolios.
    pub aum: f64,
    /// Fractional growth since January 1st; `None` when there is no
    /// start-of-year value to compare against.
    pub ytd_growth_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer360 {
    pub segments: ResultTable,
    pub engagement: ResultTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthNarrative {
    pub client_id: String,
    pub overview: ResultTable,
    pub portfolios: ResultTable,
}

/// Named entry in the report catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Report {
    GlobalKpis,
    Customer360,
    NextBestActions,
    ChurnEarlyWarning,
    EventDrivenOpportunities,
    SentimentAnalysis,
    SuitabilityRiskAlerts,
    PortfolioDrift,
    IdleCash,
    TradeFeeAnomalies,
    AdvisorProductivity,
    WealthNarrative,
    KycInsights,
    GeographicDistribution,
}

impl Report {
    pub const ALL: [Report; 14] = [
        Report::GlobalKpis,
        Report::Customer360,
        Report::NextBestActions,
        Report::ChurnEarlyWarning,
        Report::EventDrivenOpportunities,
        Report::SentimentAnalysis,
        Report::SuitabilityRiskAlerts,
        Report::PortfolioDrift,
        Report::IdleCash,
        Report::TradeFeeAnomalies,
        Report::AdvisorProductivity,
        Report::WealthNarrative,
        Report::KycInsights,
        Report::GeographicDistribution,
    ];

    pub fn all() -> &'static [Report] {
        &Self::ALL
    }

    /// Stable kebab-case name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Report::GlobalKpis => "global-kpis",
            Report::Customer360 => "customer-360",
            Report::NextBestActions => "next-best-actions",
            Report::ChurnEarlyWarning => "churn-early-warning",
            Report::EventDrivenOpportunities => "event-driven-opportunities",
            Report::SentimentAnalysis => "sentiment-analysis",
            Report::SuitabilityRiskAlerts => "suitability-risk-alerts",
            Report::PortfolioDrift => "portfolio-drift",
            Report::IdleCash => "idle-cash",
            Report::TradeFeeAnomalies => "trade-fee-anomalies",
            Report::AdvisorProductivity => "advisor-productivity",
            Report::WealthNarrative => "wealth-narrative",
            Report::KycInsights => "kyc-insights",
            Report::GeographicDistribution => "geographic-distribution",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Report::GlobalKpis => "Client and advisor counts, AUM and year-to-date growth",
            Report::Customer360 => "Wealth segment tiers and interaction engagement per client",
            Report::NextBestActions => "Recommended action, priority and revenue impact per client",
            Report::ChurnEarlyWarning => "Clients at high or medium risk of leaving",
            Report::EventDrivenOpportunities => "Outreach prompted by life events or long silences",
            Report::SentimentAnalysis => "Keyword sentiment of the last 30 days of interaction notes",
            Report::SuitabilityRiskAlerts => "Strategies that do not fit client risk tolerance",
            Report::PortfolioDrift => "Asset classes drifting more than 3 points from target",
            Report::IdleCash => "Cash balances above 10k with sweep priority",
            Report::TradeFeeAnomalies => "Unusual transactions from the last 90 days",
            Report::AdvisorProductivity => "Clients, AUM and recent interactions per advisor",
            Report::WealthNarrative => "Overview and portfolios of a single client",
            Report::KycInsights => "Clients due for a KYC review",
            Report::GeographicDistribution => "Clients and AUM by state",
        }
    }

    /// Whether the report needs [`ReportParams::client_id`].
    pub fn requires_client_id(&self) -> bool {
        matches!(self, Report::WealthNarrative)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Report {
    type Err = WealthlensError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(Report::name).collect();
                WealthlensError::new(ErrorCode::InvalidParameter, format!("Unknown report '{}'", s))
                    .with_hint(format!("Available reports: {}", names.join(", ")))
            })
    }
}

/// Arguments for parameterized reports; ignored by the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    pub client_id: Option<String>,
    pub window_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
    Kpis(GlobalKpis),
    Customer360(Customer360),
    Narrative(WealthNarrative),
    Table(ResultTable),
}

impl ReportOutput {
    /// Result tables carried by this output, labelled for display.
    pub fn tables(&self) -> Vec<(&'static str, &ResultTable)> {
        match self {
            ReportOutput::Kpis(_) => Vec::new(),
            ReportOutput::Customer360(c) => {
                vec![("segments", &c.segments), ("engagement", &c.engagement)]
            }
            ReportOutput::Narrative(n) => {
                vec![("overview", &n.overview), ("portfolios", &n.portfolios)]
            }
            ReportOutput::Table(t) => vec![("rows", t)],
        }
    }
}

/// Report builders over a [`QueryService`]. Every statement goes through the
/// service cache with its default TTL.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'a> {
    service: &'a QueryService,
}

impl<'a> Analytics<'a> {
    pub fn new(service: &'a QueryService) -> Self {
        Self { service }
    }

    pub async fn run(&self, report: Report, params: &ReportParams) -> Result<ReportOutput> {
        let started = Instant::now();
        let output = match report {
            Report::GlobalKpis => ReportOutput::Kpis(self.global_kpis().await?),
            Report::Customer360 => ReportOutput::Customer360(self.customer_360_segments().await?),
            Report::NextBestActions => ReportOutput::Table(self.next_best_actions().await?),
            Report::ChurnEarlyWarning => ReportOutput::Table(self.churn_early_warning().await?),
            Report::EventDrivenOpportunities => {
                ReportOutput::Table(self.event_driven_opportunities().await?)
            }
            Report::SentimentAnalysis => ReportOutput::Table(self.sentiment_analysis().await?),
            Report::SuitabilityRiskAlerts => {
                ReportOutput::Table(self.suitability_risk_alerts().await?)
            }
            Report::PortfolioDrift => ReportOutput::Table(self.portfolio_drift_analysis().await?),
            Report::IdleCash => ReportOutput::Table(self.idle_cash_analysis().await?),
            Report::TradeFeeAnomalies => ReportOutput::Table(self.trade_fee_anomalies().await?),
            Report::AdvisorProductivity => {
                let window = params.window_days.unwrap_or(DEFAULT_WINDOW_DAYS);
                ReportOutput::Table(self.advisor_productivity(window).await?)
            }
            Report::WealthNarrative => {
                let client_id = params.client_id.as_deref().unwrap_or_default();
                ReportOutput::Narrative(self.wealth_narrative(client_id).await?)
            }
            Report::KycInsights => ReportOutput::Table(self.kyc_insights().await?),
            Report::GeographicDistribution => {
                ReportOutput::Table(self.client_geographic_distribution().await?)
            }
        };

        info!(
            target: "reports",
            report = report.name(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Report built"
        );
        Ok(output)
    }

    async fn table(&self, sql: &str) -> Result<ResultTable> {
        self.service.run_sql(sql).await
    }

    pub async fn global_kpis(&self) -> Result<GlobalKpis> {
        let clients = self.table(queries::CLIENT_COUNT).await?;
        let advisors = self.table(queries::ADVISOR_COUNT).await?;
        let aum = self.table(queries::TOTAL_AUM).await?;
        let ytd = self.table(queries::YTD_GROWTH).await?;

        Ok(GlobalKpis {
            num_clients: clients.first_i64("CNT").unwrap_or(0),
            num_advisors: advisors.first_i64("CNT").unwrap_or(0),
            aum: aum.first_f64("AUM").unwrap_or(0.0),
            ytd_growth_pct: ytd.first_f64("YTD_GROWTH_PCT"),
        })
    }

    pub async fn customer_360_segments(&self) -> Result<Customer360> {
        Ok(Customer360 {
            segments: self.table(queries::WEALTH_SEGMENTS).await?,
            engagement: self.table(queries::CLIENT_ENGAGEMENT).await?,
        })
    }

    pub async fn next_best_actions(&self) -> Result<ResultTable> {
        self.table(queries::NEXT_BEST_ACTIONS).await
    }

    pub async fn churn_early_warning(&self) -> Result<ResultTable> {
        self.table(queries::CHURN_EARLY_WARNING).await
    }

    pub async fn event_driven_opportunities(&self) -> Result<ResultTable> {
        self.table(queries::EVENT_DRIVEN_OPPORTUNITIES).await
    }

    pub async fn sentiment_analysis(&self) -> Result<ResultTable> {
        self.table(queries::SENTIMENT_ANALYSIS).await
    }

    pub async fn suitability_risk_alerts(&self) -> Result<ResultTable> {
        self.table(queries::SUITABILITY_RISK_ALERTS).await
    }

    pub async fn portfolio_drift_analysis(&self) -> Result<ResultTable> {
        self.table(queries::PORTFOLIO_DRIFT).await
    }

    pub async fn idle_cash_analysis(&self) -> Result<ResultTable> {
        self.table(queries::IDLE_CASH).await
    }

    pub async fn trade_fee_anomalies(&self) -> Result<ResultTable> {
        self.table(queries::TRADE_FEE_ANOMALIES).await
    }

    /// `window_days` must be at least 1.
    pub async fn advisor_productivity(&self, window_days: i64) -> Result<ResultTable> {
        if window_days < 1 {
            return Err(WealthlensError::new(
                ErrorCode::InvalidParameter,
                format!("window_days must be at least 1, got {}", window_days),
            ));
        }
        let request = QueryRequest::new(queries::ADVISOR_PRODUCTIVITY).bind(window_days);
        self.service.run_query(&request).await
    }

    pub async fn wealth_narrative(&self, client_id: &str) -> Result<WealthNarrative> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(
                WealthlensError::new(ErrorCode::InvalidParameter, "client_id must not be empty")
                    .with_hint("Pass --client-id, e.g. --client-id CLI_001"),
            );
        }

        let overview = QueryRequest::new(queries::CLIENT_OVERVIEW).bind(client_id);
        let portfolios = QueryRequest::new(queries::CLIENT_PORTFOLIOS).bind(client_id);
        Ok(WealthNarrative {
            client_id: client_id.to_string(),
            overview: self.service.run_query(&overview).await?,
            portfolios: self.service.run_query(&portfolios).await?,
        })
    }

    pub async fn kyc_insights(&self) -> Result<ResultTable> {
        self.table(queries::KYC_INSIGHTS).await
    }

    pub async fn client_geographic_distribution(&self) -> Result<ResultTable> {
        self.table(queries::GEOGRAPHIC_DISTRIBUTION).await
    }
}

//! Sector and metric reference table
//!
//! Maps each covered industry sector to the ordered list of financial
//! metrics that matter most for stocks in that sector. The table is used
//! purely as prompt context by the agents; it is the one piece of durable
//! reference data in the system.

use serde::{Deserialize, Serialize};

/// Industry sectors covered by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    BankingFinancials,
    ItServices,
    Fmcg,
    Automobiles,
    PharmaHealthcare,
    Infrastructure,
    OilGasEnergy,
    Telecom,
    MetalsMining,
    RealEstate,
}

/// Financial metrics referenced by the sector table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Roe,
    DebtToEquity,
    PeRatio,
    Eps,
    NetProfitMargin,
    RevenueGrowthYoy,
    DividendYield,
}

impl Metric {
    /// Display name of the metric
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Roe => "ROE",
            Metric::DebtToEquity => "Debt-to-Equity",
            Metric::PeRatio => "P/E Ratio",
            Metric::Eps => "EPS",
            Metric::NetProfitMargin => "Net Profit Margin",
            Metric::RevenueGrowthYoy => "Revenue Growth(YoY)",
            Metric::DividendYield => "Dividend Yield",
        }
    }
}

impl Sector {
    /// Display name of the sector
    pub fn name(&self) -> &'static str {
        match self {
            Sector::BankingFinancials => "Banking & Financials",
            Sector::ItServices => "IT Services/Tech Sector",
            Sector::Fmcg => "FMCG",
            Sector::Automobiles => "Automobiles & Auto Ancillaries",
            Sector::PharmaHealthcare => "Pharma & Healthcare",
            Sector::Infrastructure => "Infrastructure & Construction",
            Sector::OilGasEnergy => "Oil, Gas & Energy",
            Sector::Telecom => "Telecom",
            Sector::MetalsMining => "Metals & Mining",
            Sector::RealEstate => "Real Estate",
        }
    }

    /// The top metrics for stocks in this sector, in priority order
    pub fn top_metrics(&self) -> &'static [Metric] {
        use Metric::*;
        match self {
            Sector::BankingFinancials => &[Roe, DebtToEquity, PeRatio, Eps],
            Sector::ItServices => &[PeRatio, Eps, Roe, NetProfitMargin],
            Sector::Fmcg => &[RevenueGrowthYoy, NetProfitMargin, PeRatio, Roe],
            Sector::Automobiles => &[RevenueGrowthYoy, Roe, PeRatio, Eps],
            Sector::PharmaHealthcare => &[RevenueGrowthYoy, Eps, PeRatio, Roe],
            Sector::Infrastructure => &[DebtToEquity, RevenueGrowthYoy, Eps, Roe],
            Sector::OilGasEnergy => &[PeRatio, Eps, DividendYield, Roe],
            Sector::Telecom => &[DebtToEquity, RevenueGrowthYoy, PeRatio, Eps],
            Sector::MetalsMining => &[RevenueGrowthYoy, PeRatio, Eps, Roe],
            Sector::RealEstate => &[DebtToEquity, RevenueGrowthYoy, PeRatio, Eps],
        }
    }

    /// All covered sectors, in declaration order
    pub fn all() -> Vec<Sector> {
        vec![
            Sector::BankingFinancials,
            Sector::ItServices,
            Sector::Fmcg,
            Sector::Automobiles,
            Sector::PharmaHealthcare,
            Sector::Infrastructure,
            Sector::OilGasEnergy,
            Sector::Telecom,
            Sector::MetalsMining,
            Sector::RealEstate,
        ]
    }

    /// Parse a sector from a display name or common short form
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "banking & financials" | "banking" | "financials" | "banks" => {
                Some(Sector::BankingFinancials)
            }
            "it services/tech sector" | "it services" | "it" | "tech" | "technology" => {
                Some(Sector::ItServices)
            }
            "fmcg" | "consumer goods" => Some(Sector::Fmcg),
            "automobiles & auto ancillaries" | "automobiles" | "auto" => Some(Sector::Automobiles),
            "pharma & healthcare" | "pharma" | "healthcare" => Some(Sector::PharmaHealthcare),
            "infrastructure & construction" | "infrastructure" | "construction" => {
                Some(Sector::Infrastructure)
            }
            "oil, gas & energy" | "oil & gas" | "energy" => Some(Sector::OilGasEnergy),
            "telecom" | "telecommunications" => Some(Sector::Telecom),
            "metals & mining" | "metals" | "mining" => Some(Sector::MetalsMining),
            "real estate" | "realestate" | "realty" => Some(Sector::RealEstate),
            _ => None,
        }
    }
}

/// Render the full sector→metrics mapping as a markdown table
///
/// The result is embedded in agent system prompts so the models pick the
/// right metrics for a stock's sector.
pub fn metric_table() -> String {
    let mut table = String::from("| Sector | Key Metrics |\n|---|---|\n");
    for sector in Sector::all() {
        let metrics: Vec<&str> = sector.top_metrics().iter().map(Metric::name).collect();
        table.push_str(&format!("| {} | {} |\n", sector.name(), metrics.join(", ")));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sectors_present() {
        assert_eq!(Sector::all().len(), 10);
    }

    #[test]
    fn test_every_sector_has_four_metrics() {
        for sector in Sector::all() {
            assert_eq!(
                sector.top_metrics().len(),
                4,
                "sector {} should list four metrics",
                sector.name()
            );
        }
    }

    #[test]
    fn test_banking_metrics_order() {
        assert_eq!(
            Sector::BankingFinancials.top_metrics(),
            &[
                Metric::Roe,
                Metric::DebtToEquity,
                Metric::PeRatio,
                Metric::Eps
            ]
        );
    }

    #[test]
    fn test_energy_includes_dividend_yield() {
        assert!(
            Sector::OilGasEnergy
                .top_metrics()
                .contains(&Metric::DividendYield)
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Sector::parse("banking"), Some(Sector::BankingFinancials));
        assert_eq!(Sector::parse("Tech"), Some(Sector::ItServices));
        assert_eq!(Sector::parse("FMCG"), Some(Sector::Fmcg));
        assert_eq!(Sector::parse("unknown sector"), None);
    }

    #[test]
    fn test_metric_table_contains_all_sectors() {
        let table = metric_table();
        for sector in Sector::all() {
            assert!(table.contains(sector.name()), "missing {}", sector.name());
        }
        assert!(table.contains("Revenue Growth(YoY)"));
    }

    #[test]
    fn test_metric_table_row_order_is_stable() {
        let table = metric_table();
        let banking = table.find("Banking & Financials").unwrap();
        let real_estate = table.find("Real Estate").unwrap();
        assert!(banking < real_estate);
    }
}

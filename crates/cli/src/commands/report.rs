use super::helpers::{compact_amount, ReportSummary};
use crate::output::{print_success, render_table, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use wealthlens_analytics::{Analytics, GlobalKpis, Report, ReportOutput, ReportParams};
use wealthlens_runtime::QueryService;

pub async fn kpis(service: &QueryService, format: OutputFormat) -> Result<()> {
    let kpis = Analytics::new(service).global_kpis().await?;
    if !format.is_machine_readable() {
        print_kpis(&kpis);
    }
    print_success(format, kpis)
}

pub async fn report(
    service: &QueryService,
    name: &str,
    params: ReportParams,
    format: OutputFormat,
) -> Result<()> {
    let report: Report = name.parse()?;
    let output = Analytics::new(service).run(report, &params).await?;

    if !format.is_machine_readable() {
        println!("{} {}", "Report:".bold().cyan(), report.name().bold());
        println!("{}", report.description().dimmed());
        println!();
        match &output {
            ReportOutput::Kpis(kpis) => print_kpis(kpis),
            other => {
                for (label, table) in other.tables() {
                    if !matches!(other, ReportOutput::Table(_)) {
                        println!("{}", label.bold().blue());
                    }
                    if table.is_empty() {
                        println!("{}", "No rows.".dimmed());
                    } else {
                        print!("{}", render_table(table));
                        println!("{}", format!("{} rows", table.row_count()).dimmed());
                    }
                    println!();
                }
            }
        }
    }

    print_success(format, output)
}

pub fn reports(format: OutputFormat) -> Result<()> {
    if !format.is_machine_readable() {
        let width = Report::all()
            .iter()
            .map(|r| r.name().len())
            .max()
            .unwrap_or(0);
        for report in Report::all() {
            let flag = if report.requires_client_id() {
                " (--client-id)"
            } else {
                ""
            };
            println!(
                "  {}  {}{}",
                format!("{:<width$}", report.name(), width = width).bold(),
                report.description(),
                flag.dimmed()
            );
        }
    }

    let summaries: Vec<ReportSummary> = Report::all().iter().map(ReportSummary::from).collect();
    print_success(format, summaries)
}

fn print_kpis(kpis: &GlobalKpis) {
    let growth = kpis
        .ytd_growth_pct
        .map(|g| format!("{:+.2}%", g * 100.0))
        .unwrap_or_else(|| "n/a".to_string());

    println!("  {:<12} {}", "Clients".dimmed(), kpis.num_clients.bold());
    println!("  {:<12} {}", "Advisors".dimmed(), kpis.num_advisors.bold());
    println!("  {:<12} {}", "AUM".dimmed(), compact_amount(kpis.aum).bold());
    println!("  {:<12} {}", "YTD growth".dimmed(), growth.bold());
}

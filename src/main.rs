use chrono::Utc;
use daybook::{
    config::{database, settings},
    core::{
        calendar::{finance_calendar, month_summary, study_calendar, study_month_total},
        ledger::Ledger,
        period::Period,
        record::{Record, RecordKind},
        report::{finance_report, format_minutes, format_minutes_compact, format_yen, study_report},
    },
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Settings and report period
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    let period: Period = std::env::var("DAYBOOK_PERIOD")
        .unwrap_or_else(|_| "month".to_string())
        .parse()?;
    let today = Utc::now()
        .with_timezone(&settings.utc_offset()?)
        .date_naive();

    // 4. Open the record store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to record store: {}", e))?;
    database::create_tables(&db).await?;
    let ledger = Ledger::open(db, settings).await?;

    // 5. Aggregate the current snapshots
    let finance = ledger.finance_snapshot();
    let study = ledger.study_snapshot();
    if finance.is_degraded() || study.is_degraded() {
        warn!(
            finance_skipped = finance.skipped,
            study_skipped = study.skipped,
            "some stored records could not be read and are not shown"
        );
    }

    let summary = month_summary(&finance.records, today);
    info!(
        income = %format_yen(summary.income),
        expense = %format_yen(summary.expense),
        balance = %format_yen(summary.balance),
        "this month"
    );
    for cell in finance_calendar(&finance.records, today, today, Some(today)) {
        if let Some(day) = cell.summary {
            info!(
                day = %cell.key,
                income = %format_yen(day.income_total),
                expense = %format_yen(day.expense_total),
                "finance day"
            );
        }
    }

    for record in ledger.records_on_day(today) {
        match record {
            Record::Finance(r) => {
                info!(
                    kind = %r.kind,
                    category = %r.category,
                    amount = %format_yen(r.amount),
                    "today"
                );
            }
            Record::Study(r) => {
                info!(
                    nickname = %r.nickname,
                    subject = %r.subject,
                    time = %format_minutes(r.duration_minutes),
                    "today"
                );
            }
        }
    }
    info!(
        income = ?ledger.finance_categories(RecordKind::Income),
        expense = ?ledger.finance_categories(RecordKind::Expense),
        "finance categories"
    );

    let preview_limit = ledger.settings().calendar.preview_limit;
    info!(total = %format_minutes(study_month_total(&study.records, today)), "study this month");
    for cell in study_calendar(&study.records, today, today, Some(today)) {
        if let Some(day) = &cell.summary {
            let (shown, more) = day.preview(preview_limit);
            let names: Vec<&str> = shown.iter().map(|s| s.nickname.as_str()).collect();
            info!(
                day = %cell.key,
                total = %format_minutes_compact(day.total_minutes),
                sessions = ?names,
                more,
                "study day"
            );
        }
    }

    let report = finance_report(&finance.records, period, today);
    info!(
        %period,
        start = %report.range.start,
        end = %report.range.end,
        balance = %format_yen(report.balance()),
        categories = report.expense_pie.len(),
        "finance report"
    );
    let report = study_report(&study.records, period, today);
    for bar in &report.nickname_bar {
        info!(%period, nickname = %bar.label, time = %format_minutes(bar.value), "study report");
    }

    Ok(())
}

//! Cross-module overview.

use chrono::Utc;

use crate::config::FinanceConfig;
use crate::dtos::{FinanceSummaryResponse, NetAmount, SummaryParams};
use crate::models::{Payable, Receivable};
use crate::services::cash_entries::CashEntryService;
use crate::services::obligations::{self, ObligationService};
use crate::services::receipts::ReceiptService;
use crate::services::rollup::{self, Bucket, PeriodSummary};
use crate::services::ServiceError;
use crate::utils::dates::today;

#[derive(Clone)]
pub struct FinanceService {
    incomes: CashEntryService,
    expenses: CashEntryService,
    receipts: ReceiptService,
    payables: ObligationService<Payable>,
    receivables: ObligationService<Receivable>,
    finance: FinanceConfig,
}

impl FinanceService {
    pub fn new(
        incomes: CashEntryService,
        expenses: CashEntryService,
        receipts: ReceiptService,
        payables: ObligationService<Payable>,
        receivables: ObligationService<Receivable>,
        finance: FinanceConfig,
    ) -> Self {
        Self {
            incomes,
            expenses,
            receipts,
            payables,
            receivables,
            finance,
        }
    }

    pub async fn summary(&self, params: &SummaryParams) -> Result<FinanceSummaryResponse, ServiceError> {
        let (incomes, expenses, receipts, payables, receivables) = tokio::try_join!(
            self.incomes.scan(params),
            self.expenses.scan(params),
            self.receipts.scan(params),
            self.payables.scan(params),
            self.receivables.scan(params),
        )?;

        let now = Utc::now();
        let tz = self.finance.timezone;
        let income = rollup::summarize(incomes.iter().map(|e| (e.transaction_date, e.amount)), now, tz);
        let expense = rollup::summarize(expenses.iter().map(|e| (e.transaction_date, e.amount)), now, tz);
        let receipts = rollup::summarize(
            receipts.iter().map(|r| (r.receipt_date, r.total_amount)),
            now,
            tz,
        );
        let today = today(tz);

        Ok(FinanceSummaryResponse {
            net: net(&income, &expense),
            income,
            expense,
            receipts,
            payables: obligations::summarize(&payables, today),
            receivables: obligations::summarize(&receivables, today),
        })
    }
}

fn net(income: &PeriodSummary, expense: &PeriodSummary) -> PeriodSummary<NetAmount> {
    let diff = |a: &Bucket, b: &Bucket| NetAmount {
        amount: a.total_amount - b.total_amount,
    };
    PeriodSummary {
        today: diff(&income.today, &expense.today),
        this_month: diff(&income.this_month, &expense.this_month),
        all_time: diff(&income.all_time, &expense.all_time),
    }
}

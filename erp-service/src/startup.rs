use crate::config::ErpConfig;
use crate::handlers::{
    self, bank_accounts, cash_entries, finance, payables, payment_transactions, receipts,
    receivables,
};
use crate::models::{CashEntryKind, Payable, Receivable};
use crate::services::{
    BankAccountService, CashEntryService, FinanceService, MongoDb, ObligationService,
    PaymentTransactionService, ReceiptService,
};
use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: ErpConfig,
    pub db: MongoDb,
    pub bank_accounts: BankAccountService,
    pub receipts: ReceiptService,
    pub payables: ObligationService<Payable>,
    pub receivables: ObligationService<Receivable>,
    pub payments: PaymentTransactionService,
    pub incomes: CashEntryService,
    pub expenses: CashEntryService,
    pub finance: FinanceService,
}

impl AppState {
    pub fn new(config: ErpConfig, db: MongoDb) -> Self {
        let finance_config = config.finance.clone();
        let bank_accounts = BankAccountService::new(&db);
        let receipts = ReceiptService::new(&db, bank_accounts.clone(), finance_config.clone());
        let payables = ObligationService::new(&db, bank_accounts.clone(), finance_config.clone());
        let receivables =
            ObligationService::new(&db, bank_accounts.clone(), finance_config.clone());
        let incomes = CashEntryService::new(
            &db,
            CashEntryKind::Income,
            bank_accounts.clone(),
            finance_config.clone(),
        );
        let expenses = CashEntryService::new(
            &db,
            CashEntryKind::Expense,
            bank_accounts.clone(),
            finance_config.clone(),
        );
        let finance = FinanceService::new(
            incomes.clone(),
            expenses.clone(),
            receipts.clone(),
            payables.clone(),
            receivables.clone(),
            finance_config.clone(),
        );

        Self {
            payments: PaymentTransactionService::new(&db, finance_config),
            config,
            db,
            bank_accounts,
            receipts,
            payables,
            receivables,
            incomes,
            expenses,
            finance,
        }
    }
}

fn cash_entry_routes(service: CashEntryService) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(cash_entries::create_entry).get(cash_entries::list_entries),
        )
        .route("/summary", get(cash_entries::entry_summary))
        .route("/report", get(cash_entries::entry_report))
        .route(
            "/:id",
            get(cash_entries::get_entry)
                .put(cash_entries::update_entry)
                .delete(cash_entries::delete_entry),
        )
        .with_state(service)
}

/// Every HTTP route of the service. Fixed segments such as `/summary` are
/// registered alongside `/:id`; axum prefers the static match.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/bank-accounts",
            post(bank_accounts::create_bank_account).get(bank_accounts::list_bank_accounts),
        )
        .route(
            "/bank-accounts/:id",
            get(bank_accounts::get_bank_account)
                .put(bank_accounts::update_bank_account)
                .delete(bank_accounts::delete_bank_account),
        )
        .route(
            "/receipts",
            post(receipts::create_receipt).get(receipts::list_receipts),
        )
        .route("/receipts/next-number", get(receipts::next_receipt_number))
        .route("/receipts/summary", get(receipts::receipt_summary))
        .route("/receipts/report", get(receipts::receipt_report))
        .route(
            "/receipts/:id",
            get(receipts::get_receipt)
                .put(receipts::update_receipt)
                .delete(receipts::delete_receipt),
        )
        .route(
            "/payables",
            post(payables::create_payable).get(payables::list_payables),
        )
        .route("/payables/summary", get(payables::payable_summary))
        .route(
            "/payables/:id",
            get(payables::get_payable)
                .put(payables::update_payable)
                .delete(payables::delete_payable),
        )
        .route(
            "/payables/:id/payments",
            post(payables::record_payable_payment).get(payables::payable_payments),
        )
        .route(
            "/receivables",
            post(receivables::create_receivable).get(receivables::list_receivables),
        )
        .route("/receivables/summary", get(receivables::receivable_summary))
        .route(
            "/receivables/:id",
            get(receivables::get_receivable)
                .put(receivables::update_receivable)
                .delete(receivables::delete_receivable),
        )
        .route(
            "/receivables/:id/payments",
            post(receivables::record_receivable_payment).get(receivables::receivable_payments),
        )
        .route(
            "/payment-transactions",
            get(payment_transactions::list_payment_transactions),
        )
        .route("/finance/summary", get(finance::finance_summary))
        .nest("/incomes", cash_entry_routes(state.incomes.clone()))
        .nest("/expenses", cash_entry_routes(state.expenses.clone()));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_handler))
        .merge(api)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request| {
                let request_id = req
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ErpConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            e
        })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let state = AppState::new(config.clone(), db);
        let app = router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

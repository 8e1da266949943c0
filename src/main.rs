use bridal_storefront::api::{HttpCatalog, Product, ProductSearch, SearchError, StaticCatalog};
use bridal_storefront::bid::{BidConfig, BidDialog};
use bridal_storefront::checkout::{
    clear_completed_order, BrowserStorage, FieldInput, MemoryStorage, PaymentField, PaymentForm,
    ORDER_LOCAL_KEYS,
};
use bridal_storefront::config::Config;
use bridal_storefront::events::Event;
use bridal_storefront::format::format_vnd;
use bridal_storefront::history::{mask_buyer, HistoryRow, Transaction, TransactionHistory};
use bridal_storefront::logging;
use bridal_storefront::overlay::SearchOverlay;
use bridal_storefront::state::{Location, SearchStore, SearchSync};
use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

const DEMO_CATALOG: &str = r#"[
    {"id": "vc-01", "name": "Váy cưới ren Pháp đuôi cá", "dailyRentalPrice": 1500000,
     "purchasePrice": 25000000, "images": ["/img/vc-01.jpg"], "avgRating": 4.8},
    {"id": "vc-02", "name": "Váy cưới công chúa", "dailyRentalPrice": 1200000,
     "purchasePrice": 18000000, "images": ["/img/vc-02.jpg"]},
    {"id": "ad-01", "name": "Áo dài cưới đỏ thêu phượng", "dailyRentalPrice": 800000,
     "purchasePrice": 9000000, "images": []}
]"#;

/// Live API when `STOREFRONT_LIVE_SEARCH` is set, bundled demo data otherwise.
enum Catalog {
    Http(HttpCatalog),
    Static(StaticCatalog),
}

impl ProductSearch for Catalog {
    async fn search(&self, query: &str) -> Result<Vec<Product>, SearchError> {
        match self {
            Catalog::Http(api) => api.search(query).await,
            Catalog::Static(api) => api.search(query).await,
        }
    }
}

fn demo_history() -> Vec<Transaction> {
    let buyers = ["Nguyen", "Tran", "Pham", "Hoang", "Vu", "Dang", "Bui"];
    let now = Utc::now();
    buyers
        .iter()
        .enumerate()
        .map(|(i, name)| Transaction {
            id: format!("tx-{:03}", i + 1),
            timestamp: now - ChronoDuration::hours(i as i64 * 3),
            buyer: mask_buyer(name),
            price: dec!(1000000) - Decimal::from(i as u64 * 50000),
        })
        .collect()
}

async fn run_checkout(storage: &mut MemoryStorage) {
    let mut form = PaymentForm::new();
    form.handle_input(PaymentField::CardNumber, FieldInput::Text("4111111111111111"));
    form.handle_input(PaymentField::CardholderName, FieldInput::Text("NGUYEN VAN A"));
    form.handle_input(PaymentField::ExpiryDate, FieldInput::Text("1230"));
    form.handle_input(PaymentField::Cvv, FieldInput::Text("123"));
    form.handle_input(PaymentField::SaveCard, FieldInput::Checked(true));

    let result = form
        .submit(|data| async move {
            info!(card = %data.card_number, save = data.save_card, "charging card");
            Ok(())
        })
        .await;

    match result {
        Ok(()) => clear_completed_order(storage),
        Err(e) => warn!(error = %e, "checkout failed"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let path = std::env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let cfg = Config::load_or_default(&path)?;
    logging::init(&cfg.general.log_level)?;
    info!(?cfg, "loaded config");

    let catalog = if std::env::var("STOREFRONT_LIVE_SEARCH").is_ok() {
        Catalog::Http(HttpCatalog::new(cfg.search.api_base.clone()))
    } else {
        Catalog::Static(StaticCatalog::from_json(DEMO_CATALOG)?)
    };

    let (tx, mut rx) = mpsc::channel::<Event>(100);

    let shutdown_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(Event::Shutdown).await;
        }
    });

    let mut store = SearchStore::new();
    let mut sync = SearchSync::new();
    let mut overlay = SearchOverlay::new(cfg.search.debounce());
    let mut bid = BidDialog::new(dec!(1000000), dec!(50000), BidConfig::from(&cfg.bid));
    let mut storage = MemoryStorage::new();
    for key in ORDER_LOCAL_KEYS {
        storage.local_set(key, "{}".to_string());
    }

    let history = demo_history();
    let mut table = TransactionHistory::with_page_size(&history, cfg.history.page_size);
    table.set_page(1);
    for row in table.rows() {
        match row {
            HistoryRow::Record(t) => {
                info!(id = %t.id, buyer = %t.buyer, price = %format_vnd(t.price), "history")
            }
            HistoryRow::Empty => info!("no transactions yet"),
        }
    }

    // Scripted session: land on a search URL, type into the overlay, place a bid, pay
    tx.send(Event::Navigated {
        href: "/search?q=v%C3%A1y&category=bridal&endTime=desc".to_string(),
    })
    .await?;
    for text in ["v", "vá", "váy"] {
        overlay.on_input(text, tx.clone());
    }
    bid.open();
    info!(seed = %format_vnd(bid.seed_amount()), "bid dialog open");
    bid.submit(tx.clone())?;
    run_checkout(&mut storage).await;

    // End the demo once the debounce and the bid call have both had time to land
    let demo_tx = tx.clone();
    let demo_length =
        cfg.search.debounce().max(BidConfig::from(&cfg.bid).settle_delay) + Duration::from_millis(500);
    tokio::spawn(async move {
        tokio::time::sleep(demo_length).await;
        let _ = demo_tx.send(Event::Shutdown).await;
    });

    info!("starting event loop (Ctrl+C to quit)");
    while let Some(event) = rx.recv().await {
        match event {
            Event::Navigated { href } => {
                let location = Location::from_href(&href);
                if sync.observe(&location, &mut store) {
                    info!(query = %store.search_query(), filters = ?store.filters(), "navigated");
                }
            }
            Event::SearchDue { query } => {
                overlay.run(&catalog, &query).await;
                for product in overlay.results() {
                    info!(
                        name = %product.name,
                        rent = %format_vnd(product.daily_rental_price),
                        buy = %format_vnd(product.purchase_price),
                        "result"
                    );
                }
                if let Some(banner) = overlay.banner() {
                    warn!(message = %banner.message, "search banner shown");
                }
            }
            Event::BidSettled { session, outcome } => {
                if let Some(price) = bid.settle(session, outcome) {
                    info!(price = %format_vnd(price), "listing price updated");
                }
                info!(state = ?bid.state(), "bid answered");
                bid.close();
            }
            Event::Shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

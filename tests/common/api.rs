//! Throw-away catalog HTTP service
//!
//! Serves canned bodies for `GET /categories` and `GET /products?category=`,
//! counting hits and recording the category names it was asked for.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
}

impl Canned {
    fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

#[derive(Default)]
struct ApiState {
    categories: Option<Canned>,
    products: HashMap<String, Canned>,
    category_hits: usize,
    product_requests: Vec<String>,
}

type SharedState = Arc<Mutex<ApiState>>;

async fn categories(State(state): State<SharedState>) -> Response {
    let mut state = state.lock().unwrap();
    state.category_hits += 1;
    match state.categories.clone() {
        Some(canned) => canned.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn products(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    let category = params.get("category").cloned().unwrap_or_default();
    state.product_requests.push(category.clone());
    match state.products.get(&category).cloned() {
        Some(canned) => canned.into_response(),
        None => Canned::ok("[]").into_response(),
    }
}

/// Test catalog service on a random local port
///
/// When dropped, the server is asked to shut down.
pub struct TestApi {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    state: SharedState,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApi {
    pub async fn spawn() -> Self {
        let state = SharedState::default();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = Router::new()
            .route("/categories", get(categories))
            .route("/products", get(products))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Test catalog service failed");
        });

        Self {
            base_url,
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn serve_categories(&self, body: &str) {
        self.state.lock().unwrap().categories = Some(Canned::ok(body));
    }

    pub fn serve_categories_with_status(&self, status: StatusCode, body: &str) {
        self.state.lock().unwrap().categories = Some(Canned {
            status,
            body: body.to_string(),
        });
    }

    pub fn serve_products(&self, category: &str, body: &str) {
        self.state
            .lock()
            .unwrap()
            .products
            .insert(category.to_string(), Canned::ok(body));
    }

    pub fn category_hits(&self) -> usize {
        self.state.lock().unwrap().category_hits
    }

    pub fn product_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().product_requests.clone()
    }
}

/// Base URL of a local port with nothing listening on it.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::main_context::MainContext;
use crate::catalog::Product;
use crate::gateway::{CatalogGateway, NoNetworkNotice};

type Completion<T> = Box<dyn FnOnce(Vec<T>) + Send>;

struct Callbacks<T> {
    completion: Option<Completion<T>>,
    on_no_network: Option<NoNetworkNotice>,
}

fn lock<T>(callbacks: &Mutex<Callbacks<T>>) -> MutexGuard<'_, Callbacks<T>> {
    callbacks.lock().unwrap_or_else(PoisonError::into_inner)
}

trait Discard: Send + Sync {
    fn discard(&self);
    fn is_subscribed(&self) -> bool;
}

impl<T: Send> Discard for Mutex<Callbacks<T>> {
    fn discard(&self) {
        let mut callbacks = lock(self);
        callbacks.completion = None;
        callbacks.on_no_network = None;
    }

    fn is_subscribed(&self) -> bool {
        lock(self).completion.is_some()
    }
}

/// Caller's side of one in-flight request.
///
/// Dropping the handle does not cancel anything; call [`RequestHandle::unsubscribe`]
/// to stop caring about the result.
pub struct RequestHandle {
    callbacks: Arc<dyn Discard>,
    task: JoinHandle<()>,
}

impl RequestHandle {
    /// Drops both callbacks so neither will ever run.
    ///
    /// The network request and its cache write-through still complete.
    pub fn unsubscribe(&self) {
        self.callbacks.discard();
    }

    /// `true` until the completion has been delivered or discarded.
    pub fn is_subscribed(&self) -> bool {
        self.callbacks.is_subscribed()
    }

    /// Waits for the underlying request (and its write-through) to finish.
    ///
    /// Delivery itself happens later, when the main loop runs.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            debug!("Catalog request task ended abnormally: {}", e);
        }
    }
}

/// Callback-style front end of [`CatalogGateway`].
///
/// Requests run on the tokio runtime; completions and no-network notices are
/// posted to the [`MainContext`], each at most once per request, the notice
/// always before its completion.
pub struct CatalogDispatcher {
    gateway: Arc<CatalogGateway>,
    main: MainContext,
    runtime: Handle,
}

impl CatalogDispatcher {
    pub fn new(gateway: Arc<CatalogGateway>, main: MainContext, runtime: Handle) -> Self {
        Self {
            gateway,
            main,
            runtime,
        }
    }

    pub fn request_categories<C, N>(&self, completion: C, on_no_network: Option<N>) -> RequestHandle
    where
        C: FnOnce(Vec<String>) + Send + 'static,
        N: FnOnce() + Send + 'static,
    {
        self.dispatch(completion, on_no_network, |gateway, notice| async move {
            gateway.fetch_categories(notice).await
        })
    }

    pub fn request_products<C, N>(
        &self,
        category: &str,
        completion: C,
        on_no_network: Option<N>,
    ) -> RequestHandle
    where
        C: FnOnce(Vec<Product>) + Send + 'static,
        N: FnOnce() + Send + 'static,
    {
        let category = category.to_string();
        self.dispatch(completion, on_no_network, |gateway, notice| async move {
            gateway.fetch_products(&category, notice).await
        })
    }

    fn dispatch<T, C, N, Request, Fut>(
        &self,
        completion: C,
        on_no_network: Option<N>,
        request: Request,
    ) -> RequestHandle
    where
        T: Send + 'static,
        C: FnOnce(Vec<T>) + Send + 'static,
        N: FnOnce() + Send + 'static,
        Request: FnOnce(Arc<CatalogGateway>, Option<NoNetworkNotice>) -> Fut,
        Fut: Future<Output = Vec<T>> + Send + 'static,
    {
        let has_notice = on_no_network.is_some();
        let callbacks = Arc::new(Mutex::new(Callbacks {
            completion: Some(Box::new(completion) as Completion<T>),
            on_no_network: on_no_network.map(|n| Box::new(n) as NoNetworkNotice),
        }));

        let notice: Option<NoNetworkNotice> = has_notice.then(|| {
            let callbacks = callbacks.clone();
            let main = self.main.clone();
            Box::new(move || {
                main.post(move || {
                    let notice = lock(&callbacks).on_no_network.take();
                    if let Some(notice) = notice {
                        notice();
                    }
                });
            }) as NoNetworkNotice
        });

        let fut = request(self.gateway.clone(), notice);
        let main = self.main.clone();
        let delivery = callbacks.clone();
        let task = self.runtime.spawn(async move {
            let result = fut.await;
            let posted = main.post(move || {
                let mut callbacks = lock(&delivery);
                let completion = callbacks.completion.take();
                callbacks.on_no_network = None;
                drop(callbacks);
                if let Some(completion) = completion {
                    completion(result);
                }
            });
            if !posted {
                debug!("Main loop is gone, dropping catalog result");
            }
        });

        RequestHandle { callbacks, task }
    }
}

use heat_risk::{Aggregator, AggregatorConfig, ProbePoint, SeriesSource};
use std::sync::Arc;
use weather_alerts::{AlertDispatcher, Notifier, SubscriptionStore};

/// Shared handler state. `S` samples heat risk, `F` supplies active alerts.
pub struct AppState<S, F> {
    pub heat: Arc<Aggregator<S>>,
    pub catalog: Arc<Vec<ProbePoint>>,
    pub feed: Arc<F>,
    pub subscriptions: SubscriptionStore,
    pub notifier: Arc<dyn Notifier>,
    pub dispatcher: Arc<AlertDispatcher>,
}

impl<S: SeriesSource, F> AppState<S, F> {
    pub fn new(
        source: S,
        aggregator: AggregatorConfig,
        catalog: Vec<ProbePoint>,
        feed: F,
        subscriptions: SubscriptionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let dispatcher = AlertDispatcher::new(subscriptions.clone(), notifier.clone());
        Self {
            heat: Arc::new(Aggregator::new(source, aggregator)),
            catalog: Arc::new(catalog),
            feed: Arc::new(feed),
            subscriptions,
            notifier,
            dispatcher: Arc::new(dispatcher),
        }
    }
}

impl<S, F> Clone for AppState<S, F> {
    fn clone(&self) -> Self {
        Self {
            heat: self.heat.clone(),
            catalog: self.catalog.clone(),
            feed: self.feed.clone(),
            subscriptions: self.subscriptions.clone(),
            notifier: self.notifier.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

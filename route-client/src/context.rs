//! Explicit application wiring.
//!
//! All collaborators are built once here and handed out by reference; there
//! are no lazily-initialized globals.

use std::sync::Arc;

use crate::dispatch::{Dispatcher, Store};
use crate::gateway::{
    DebounceConfig, GatewayConfig, GatewayError, Geocoder, LocationHit, RoutingClient,
    RoutingGateway,
};
use crate::route::Segmenter;
use crate::stores::map_options::MapOptionsReducer;
use crate::stores::query::QueryReducer;
use crate::stores::route::RouteReducer;
use crate::stores::settings::SettingsReducer;

/// The application's object graph.
pub struct AppContext {
    pub dispatcher: Arc<Dispatcher>,
    pub client: Arc<RoutingClient>,
    pub gateway: Arc<RoutingGateway<RoutingClient>>,
    pub geocoder: Arc<Geocoder<RoutingClient>>,
    pub query_store: Arc<Store<QueryReducer>>,
    pub route_store: Arc<Store<RouteReducer>>,
    pub map_store: Arc<Store<MapOptionsReducer>>,
    pub settings_store: Arc<Store<SettingsReducer>>,
}

impl AppContext {
    /// Build the full graph: HTTP client, gateway, geocoder, and all four
    /// stores registered with the dispatcher.
    pub fn new(
        config: GatewayConfig,
        on_hits: impl Fn(&str, Vec<LocationHit>) + Send + Sync + 'static,
    ) -> Result<Self, GatewayError> {
        let dispatcher = Arc::new(Dispatcher::new());
        let client = Arc::new(RoutingClient::new(config)?);

        let query_store = Store::new(QueryReducer);
        let route_store = Store::new(RouteReducer);
        let map_store = Store::new(MapOptionsReducer);
        let settings_store = Store::new(SettingsReducer);
        dispatcher.register(query_store.clone());
        dispatcher.register(route_store.clone());
        dispatcher.register(map_store.clone());
        dispatcher.register(settings_store.clone());

        let gateway = RoutingGateway::new(
            Arc::clone(&client),
            Arc::clone(&dispatcher),
            Segmenter::default(),
        );
        let geocoder = Geocoder::new(Arc::clone(&client), DebounceConfig::default(), on_hits);

        Ok(Self {
            dispatcher,
            client,
            gateway,
            geocoder,
            query_store,
            route_store,
            map_store,
            settings_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Action;

    #[test]
    fn all_stores_observe_dispatches() {
        let context = AppContext::new(GatewayConfig::new(), |_, _| {}).unwrap();
        context.dispatcher.dispatch(Action::SelectMapLayer {
            layer: "TomTom".to_string(),
        });
        context.dispatcher.dispatch(Action::SetVehicleProfile {
            profile: "bike".to_string(),
        });
        assert_eq!(context.map_store.state().selected_layer, "TomTom");
        assert_eq!(context.query_store.state().profile, "bike");
    }
}

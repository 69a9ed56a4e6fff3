use route_client::context::AppContext;
use route_client::gateway::{GatewayConfig, RoutingArgs};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let (from, to) = match (args.next(), args.next()) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            eprintln!("Usage: route-client <from> <to>");
            std::process::exit(2);
        }
    };

    let mut config = GatewayConfig::new();
    if let Ok(url) = std::env::var("ROUTES_URL") {
        config = config.with_routes_url(url);
    }
    if let Ok(url) = std::env::var("SEARCH_URL") {
        config = config.with_search_url(url);
    }
    if let Ok(url) = std::env::var("LEGACY_ROUTES_URL") {
        config = config.with_legacy_routes_url(url);
    }

    let context = AppContext::new(config, |_, _| {}).expect("failed to create HTTP client");

    // Resolve both endpoints to backend locations.
    let source = resolve(&context, &from).await;
    let destination = resolve(&context, &to).await;
    println!("From: {} ({})", source.name, source.id);
    println!("To:   {} ({})", destination.name, destination.id);

    let routing_args = RoutingArgs::new(Vec::new(), "car")
        .with_locations(source.location_ref(), destination.location_ref());
    let handle = context.gateway.route_with_dispatch(routing_args, true);
    handle.await.expect("routing task panicked");

    let state = context.route_store.state();
    if state.selected_path.is_empty() {
        eprintln!("No route found.");
        std::process::exit(1);
    }

    println!();
    for (index, path) in state.all_paths.iter().enumerate() {
        let marker = if *path == state.selected_path { "*" } else { " " };
        println!(
            "{marker} [{index}] {}: {:.1} km, {} min",
            path.summary,
            path.distance_meters / 1_000.0,
            path.time_millis / 60_000
        );
        for segment in &path.segments {
            println!(
                "      {:>6}: {:.1} km, {} min",
                segment.mode.as_str(),
                segment.distance_meters / 1_000.0,
                segment.time_millis / 60_000
            );
        }
    }
}

async fn resolve(context: &AppContext, query: &str) -> route_client::gateway::LocationHit {
    let hits = context
        .client
        .search(query)
        .await
        .expect("location search failed");
    match hits.into_iter().next() {
        Some(hit) => hit,
        None => {
            eprintln!("No location found for {query:?}");
            std::process::exit(1);
        }
    }
}

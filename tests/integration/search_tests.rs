//! Integration tests for the search pipeline
//!
//! These tests use wiremock to stand in for robots.txt, the marketplace
//! search pages, the search API and individual listing pages, and run the
//! full pipeline end-to-end against it.

use car_finder::config::{Config, RobotsFailurePolicy};
use car_finder::crawler::{build_http_client, Fetcher, NoDelay};
use car_finder::{find_cars, CarFinderError, SearchFilters};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration pointing every source at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.politeness.request_delay_ms = 0;
    config.politeness.robots_timeout_secs = 2;
    config.politeness.request_timeout_secs = 5;
    config.sources.ebay.base_url = format!("{}/sch/i.html", base_url);
    config.sources.serpapi.endpoint = format!("{}/search.json", base_url);
    config
}

/// Renders a search results page with one card per item id
fn results_page(base_url: &str, ids: &[u32]) -> String {
    let cards: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="s-item">
                     <a class="s-item__link" href="{base}/itm/{id}">
                       <div class="s-item__title">Car {id}</div>
                     </a>
                     <span class="s-item__price">${id},000</span>
                     <div class="s-item__subtitle">Used · {id}0,000 miles · from Dallas, TX</div>
                   </li>"#,
                base = base_url,
                id = id
            )
        })
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", cards)
}

/// Serves different cards depending on the `_pgn` query parameter
struct PagedResults {
    base_url: String,
}

impl Respond for PagedResults {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let page = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "_pgn")
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| "1".to_string());

        let ids: &[u32] = if page == "1" { &[1, 2, 3] } else { &[3, 4] };
        ResponseTemplate::new(200)
            .set_body_string(results_page(&self.base_url, ids))
            .insert_header("content-type", "text/html")
    }
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_empty_search_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><ul></ul></body></html>"),
        )
        .mount(server)
        .await;
}

fn listing_page(price: Option<&str>) -> ResponseTemplate {
    let meta = price
        .map(|p| format!(r#"<meta property="product:price:amount" content="{}">"#, p))
        .unwrap_or_default();
    ResponseTemplate::new(200).set_body_string(format!(
        "<html><head>{}<title>Listing</title></head><body></body></html>",
        meta
    ))
}

#[tokio::test]
async fn test_location_only_search_uses_marketplace_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_nkw", "used car Dallas TX"))
        .and(query_param("LH_ItemCondition", "3000"))
        .respond_with(PagedResults {
            base_url: base_url.clone(),
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters::for_location("Dallas TX");

    let table = find_cars(&filters, &config).await.expect("Search failed");

    // Item 3 appears on both pages and is kept once
    assert_eq!(table.len(), 4);
    assert!(table.iter().all(|row| row.source == "ebay"));

    let urls: Vec<String> = table.iter().map(|row| row.url.clone()).collect();
    let expected: Vec<String> = [1, 2, 3, 4]
        .iter()
        .map(|id| format!("{}/itm/{}", base_url, id))
        .collect();
    assert_eq!(urls, expected);

    let first = &table.rows()[0];
    assert_eq!(first.title.as_deref(), Some("Car 1"));
    assert_eq!(first.price.as_deref(), Some("$1,000"));
    assert_eq!(first.price_num, Some(1000.0));
    assert_eq!(first.mileage.as_deref(), Some("10000"));
    assert_eq!(first.location.as_deref(), Some("Dallas, TX"));
}

#[tokio::test]
async fn test_price_bounds_are_encoded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(query_param("_nkw", "Honda Civic Austin TX"))
        .and(query_param("_udlo", "3000"))
        .and(query_param("_udhi", "9000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[7])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        make: Some("Honda".to_string()),
        model: Some("Civic".to_string()),
        min_price: Some(3000),
        max_price: Some(9000),
        ..SearchFilters::for_location("Austin TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");
    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_robots_disallow_stops_pagination() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /sch/").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[1])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert!(table.is_empty());
}

#[tokio::test]
async fn test_robots_disallow_on_second_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: TestBot\nDisallow: /*_pgn=").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(PagedResults {
            base_url: base_url.clone(),
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert_eq!(table.len(), 3);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[5])))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_unavailable_robots_fails_open_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(PagedResults {
            base_url: base_url.clone(),
        })
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert_eq!(table.len(), 4);
}

#[tokio::test]
async fn test_unavailable_robots_denies_when_configured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[1])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.politeness.robots_unavailable = RobotsFailurePolicy::Deny;

    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert!(table.is_empty());
}

#[tokio::test]
async fn test_requests_carry_identifying_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .and(header("user-agent", "TestBot/1.0 (+https://example.com/contact)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[9])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.search.page_count = 1;

    let table = find_cars(&SearchFilters::for_location("Dallas TX"), &config)
        .await
        .expect("Search failed");

    assert_eq!(table.len(), 1);
}

#[tokio::test]
async fn test_serpapi_connector_collects_listing_prices() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/").await;
    mount_empty_search_page(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "Toyota Camry Dallas TX"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("engine", "google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "2015 Toyota Camry SE", "link": format!("{}/listing/1", base_url), "snippet": "Clean"},
                {"title": "2013 Toyota Camry", "link": format!("{}/listing/2", base_url)},
                {"title": "No link"},
                {"title": "Private", "link": format!("{}/private/3", base_url)},
                {"snippet": "Camry LE, one owner", "link": format!("{}/listing/4", base_url)}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing/1"))
        .respond_with(listing_page(Some("8500.00")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing/2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private/3"))
        .respond_with(listing_page(Some("1.00")))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing/4"))
        .respond_with(listing_page(None))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        make: Some("Toyota".to_string()),
        model: Some("Camry".to_string()),
        api_key: Some("test-key".to_string()),
        ..SearchFilters::for_location("Dallas TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");

    assert_eq!(table.len(), 2);

    let first = &table.rows()[0];
    assert_eq!(first.source, "serp");
    assert_eq!(first.url, format!("{}/listing/1", base_url));
    assert_eq!(first.title.as_deref(), Some("2015 Toyota Camry SE"));
    assert_eq!(first.price.as_deref(), Some("8500.00"));
    assert_eq!(first.price_num, Some(8500.0));
    assert_eq!(first.mileage, None);
    assert_eq!(first.location, None);

    let second = &table.rows()[1];
    assert_eq!(second.url, format!("{}/listing/4", base_url));
    // Title comes from the API result only, never the snippet
    assert_eq!(second.title, None);
    assert_eq!(second.price, None);
    assert_eq!(second.price_num, None);
}

#[tokio::test]
async fn test_failing_marketplace_does_not_abort_search() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "2010 Ford Fusion", "link": format!("{}/listing/10", base_url)}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/listing/10"))
        .respond_with(listing_page(Some("4999")))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        api_key: Some("test-key".to_string()),
        ..SearchFilters::for_location("Dallas TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].source, "serp");
    assert_eq!(table.rows()[0].price_num, Some(4999.0));
}

#[tokio::test]
async fn test_search_api_error_keeps_marketplace_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[1, 2])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Invalid API key. Your API key should be here: https://serpapi.com/manage-api-key"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        api_key: Some("bad-key".to_string()),
        ..SearchFilters::for_location("Dallas TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");

    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.source == "ebay"));
}

#[tokio::test]
async fn test_result_cap_skips_remaining_connectors() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(PagedResults {
            base_url: base_url.clone(),
        })
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic_results": []})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        api_key: Some("test-key".to_string()),
        max_results: Some(3),
        ..SearchFilters::for_location("Dallas TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");

    // The marketplace result is not truncated to the cap
    assert_eq!(table.len(), 4);
}

#[tokio::test]
async fn test_duplicate_across_connectors_keeps_first() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/sch/i.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&base_url, &[1])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "Same car", "link": format!("{}/itm/1", base_url)}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/itm/1"))
        .respond_with(listing_page(Some("999")))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let filters = SearchFilters {
        api_key: Some("test-key".to_string()),
        ..SearchFilters::for_location("Dallas TX")
    };

    let table = find_cars(&filters, &config).await.expect("Search failed");

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].source, "ebay");
    assert_eq!(table.rows()[0].title.as_deref(), Some("Car 1"));
}

#[tokio::test]
async fn test_fetcher_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&Config::default().user_agent, Duration::from_secs(5))
        .expect("Failed to build client");
    let fetcher = Fetcher::new(client, Arc::new(NoDelay));

    let url = format!("{}/gone", mock_server.uri());
    match fetcher.get(&url).await {
        Err(CarFinderError::HttpStatus { status, url: failed }) => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("Expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetcher_reports_timeouts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&Config::default().user_agent, Duration::from_secs(1))
        .expect("Failed to build client");
    let fetcher = Fetcher::new(client, Arc::new(NoDelay));

    let result = fetcher.get(&format!("{}/slow", mock_server.uri())).await;
    assert!(matches!(result, Err(CarFinderError::Timeout { .. })));
}

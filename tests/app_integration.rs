use rust_decimal::Decimal;
use std::fs;
use std::sync::Arc;
use tracing::info;
use xconv::cli::convert::{self, Banner, ConvertArgs};
use xconv::core::config::{AppConfig, CurrencyLayerConfig};
use xconv::core::{CurrencyListCache, ExchangeRateProvider};
use xconv::providers::CurrencyLayerProvider;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const ACCESS_KEY: &str = "integration-key";

    const LIST_BODY: &str = r#"{
        "success": true,
        "currencies": {"EUR": "Euro", "USD": "United States Dollar"}
    }"#;

    pub async fn create_mock_server(convert_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/list"))
            .and(query_param("access_key", ACCESS_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(LIST_BODY))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/convert"))
            .and(query_param("access_key", ACCESS_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_string(convert_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str, access_key: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        access_key: "{access_key}"
        providers:
          currencylayer:
            base_url: {base_url}
    "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn provider_for(base_url: &str) -> CurrencyLayerProvider {
    let config = CurrencyLayerConfig {
        base_url: base_url.to_string(),
        ..Default::default()
    };
    CurrencyLayerProvider::new(
        &config,
        test_utils::ACCESS_KEY,
        Arc::new(CurrencyListCache::new()),
    )
    .expect("Failed to build provider")
}

fn args(amount: i64, from: &str, to: &str) -> ConvertArgs {
    ConvertArgs {
        amount: Decimal::from(amount),
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        date: None,
    }
}

#[test_log::test(tokio::test)]
async fn test_usd_to_eur_scenario() {
    let mock_server = test_utils::create_mock_server(
        r#"{"success": true, "info": {"quote": 0.9235}, "result": 92.35}"#,
    )
    .await;
    let provider = provider_for(&mock_server.uri());

    let banner = convert::execute(&provider, &args(100, "USD", "EUR"))
        .await
        .expect("Conversion failed");
    info!(?banner, "Rendered conversion");

    assert_eq!(
        banner,
        Banner::Success {
            text: "€ 92.35".to_string(),
            detail: Some("1 USD = 0.9235 EUR".to_string()),
        }
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_currency_scenario() {
    let mock_server = test_utils::create_mock_server(
        r#"{"success": false, "error": {"code": 402, "info": "Invalid currency code"}}"#,
    )
    .await;
    let provider = provider_for(&mock_server.uri());

    let banner = convert::execute(&provider, &args(100, "USD", "ZZZ"))
        .await
        .expect("Conversion should render an error banner");

    assert_eq!(
        banner,
        Banner::Error("Error: Invalid currency code".to_string())
    );
}

#[test_log::test(tokio::test)]
async fn test_currency_list_fetched_once_per_session() {
    let mock_server =
        test_utils::create_mock_server(r#"{"success": true, "result": 1.0}"#).await;
    let provider = provider_for(&mock_server.uri());

    for _ in 0..3 {
        let banner = convert::execute(&provider, &args(1, "EUR", "USD"))
            .await
            .expect("Conversion failed");
        assert_eq!(banner.text(), "$ 1.00");
    }
    assert_eq!(provider.list_currencies().await.unwrap().len(), 2);

    mock_server.verify().await;
}

#[test_log::test(tokio::test)]
async fn test_unreachable_provider_blocks_form() {
    let provider = provider_for("http://127.0.0.1:1");

    let err = convert::execute(&provider, &args(100, "USD", "EUR"))
        .await
        .unwrap_err();

    let message = format!("{err:#}");
    assert!(message.starts_with("Currency list unavailable"));
    assert!(message.contains("Request error"));
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(
        r#"{"success": true, "info": {"quote": 83.1}, "result": 8310.0}"#,
    )
    .await;
    let config_file = test_utils::write_config(&mock_server.uri(), test_utils::ACCESS_KEY);

    let result = xconv::run_command(
        xconv::AppCommand::Convert(args(100, "USD", "INR")),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_currencies_command_with_mock() {
    let mock_server = test_utils::create_mock_server(r#"{"success": true, "result": 1.0}"#).await;
    let config_file = test_utils::write_config(&mock_server.uri(), test_utils::ACCESS_KEY);

    let result = xconv::run_command(
        xconv::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Main function failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_access_key_is_fatal() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        "providers:\n  currencylayer:\n    base_url: http://127.0.0.1:1\n",
    )
    .expect("Failed to write config file");

    let result = xconv::run_command(
        xconv::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("Config without access key must fail");
    assert!(format!("{err:#}").contains("access_key"));
    assert!(AppConfig::load_from_path(config_file.path()).is_err());
}

#[test_log::test(tokio::test)]
async fn test_zero_amount_never_reaches_provider() {
    let mock_server = wiremock::MockServer::start().await;
    let config_file = test_utils::write_config(&mock_server.uri(), test_utils::ACCESS_KEY);

    let result = xconv::run_command(
        xconv::AppCommand::Convert(ConvertArgs {
            amount: Decimal::ZERO,
            from: None,
            to: None,
            date: None,
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

use std::fs;
use std::sync::Arc;
use tracing::info;
use xcalc::core::{
    CalculationForm, CalculatorHandler, ConversionStatus, CurrencyService, StandardCalculator,
};
use xcalc::providers::FreeCurrencyApiGateway;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const CURRENCIES: &str = r#"{
        "data": {
            "EUR": {"symbol": "€", "name": "Euro", "symbol_native": "€", "decimal_digits": 2, "rounding": 0, "code": "EUR", "name_plural": "Euros"},
            "GBP": {"symbol": "£", "name": "British Pound Sterling", "symbol_native": "£", "decimal_digits": 2, "rounding": 0, "code": "GBP", "name_plural": "British pounds sterling"}
        }
    }"#;

    pub async fn create_mock_server(code: &str, rate: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/currencies"))
            .and(query_param("apikey", "integration-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/latest"))
            .and(query_param("apikey", "integration-key"))
            .and(query_param("currencies", code))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(format!(r#"{{"data": {{"{code}": {rate}}}}}"#)),
            )
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            providers:
              freecurrencyapi:
                base_url: {base_url}
                api_key: "integration-key"
            "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn handler_for(base_url: &str) -> CalculatorHandler {
    let gateway = FreeCurrencyApiGateway::new(
        base_url,
        Some("integration-key".to_string()),
        reqwest::Client::new(),
    );
    CalculatorHandler::new(
        Arc::new(StandardCalculator),
        CurrencyService::new(Arc::new(gateway)),
    )
}

fn form(first: &str, operator: &str, second: &str, currency: Option<&str>) -> CalculationForm {
    CalculationForm {
        first: first.to_string(),
        operator: operator.to_string(),
        second: second.to_string(),
        currency: currency.map(str::to_string),
    }
}

#[test_log::test(tokio::test)]
async fn test_conversion_against_mock_api() {
    let mock_server = test_utils::create_mock_server("EUR", "0.92345").await;
    let handler = handler_for(&mock_server.uri());

    let view = handler.handle(&form("100", "*", "1", Some("EUR"))).await;
    info!(?view, "Handled conversion request");

    assert_eq!(view.result.map(|r| r.to_string()).as_deref(), Some("100"));
    match view.conversion {
        ConversionStatus::Converted {
            conversion,
            currency,
        } => {
            assert_eq!(conversion.amount.to_string(), "92.35");
            assert_eq!(currency.expect("currency info").symbol, "€");
        }
        other => panic!("Expected a conversion, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_unknown_currency_is_unavailable() {
    let mock_server = test_utils::create_mock_server("EUR", "0.9").await;
    let handler = handler_for(&mock_server.uri());

    // No mock matches currencies=XYZ, so wiremock answers 404
    let view = handler.handle(&form("5.0", "+", "3.2", Some("XYZ"))).await;
    assert_eq!(view.result.map(|r| r.to_string()).as_deref(), Some("8.2"));
    assert!(matches!(view.conversion, ConversionStatus::Unavailable(_)));
    assert!(view.error_message.is_none());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_api_degrades_to_empty() {
    let service = CurrencyService::new(Arc::new(FreeCurrencyApiGateway::new(
        "http://127.0.0.1:1",
        Some("integration-key".to_string()),
        reqwest::Client::new(),
    )));

    assert!(service.list_currencies().await.is_empty());
    assert!(service.get_rate(&"EUR".parse().unwrap()).await.is_none());
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = test_utils::create_mock_server("GBP", "0.79").await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    for command in [
        xcalc::AppCommand::Eval(form("10", "/", "4", Some("GBP"))),
        xcalc::AppCommand::Eval(form("10", "/", "0", None)),
        xcalc::AppCommand::Currencies,
        xcalc::AppCommand::Rate("GBP".parse().unwrap()),
    ] {
        let result = xcalc::run_command(command.clone(), Some(config_path)).await;
        assert!(
            result.is_ok(),
            "Command {command:?} failed with: {:?}",
            result.err()
        );
    }
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_fails() {
    let config_file = tempfile::NamedTempFile::new().unwrap();
    fs::write(config_file.path(), "providers: [not, a, map]").unwrap();

    let result = xcalc::run_command(
        xcalc::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file")
    );
}
